use crate::domain::aggregate::OverallStage;
use crate::domain::board::{building_status, flat_status, task_stage};
use crate::domain::logic::Stage;
use crate::domain::snapshot::Snapshot;
use crate::tests::utils::{date, tower_snapshot, BUILDING, PROJECT};

fn stages(snapshot: &Snapshot, flat_no: &str) -> Vec<(String, Stage, u8)> {
    let index = snapshot.plan_index();
    flat_status(snapshot, &index, PROJECT, BUILDING, flat_no)
        .expect("flat exists")
        .tasks
        .iter()
        .map(|row| (row.task.id.clone(), row.stage, row.progress))
        .collect()
}

#[test]
fn flat_rows_cover_every_registered_task() {
    let snapshot = tower_snapshot();

    assert_eq!(
        stages(&snapshot, "101"),
        vec![
            ("t1".to_string(), Stage::Billed, 100),
            ("t2".to_string(), Stage::WorkInProgress, 50),
            ("t3".to_string(), Stage::Pending, 0),
            ("p1".to_string(), Stage::FinalCheck, 100),
        ]
    );
    assert_eq!(
        stages(&snapshot, "102"),
        vec![
            ("t1".to_string(), Stage::Planned, 0),
            ("t2".to_string(), Stage::Pending, 0),
            ("t3".to_string(), Stage::Pending, 0),
            ("p1".to_string(), Stage::Pending, 0),
        ]
    );
}

#[test]
fn billed_rows_carry_their_bill_date() {
    let snapshot = tower_snapshot();
    let index = snapshot.plan_index();
    let flat = flat_status(&snapshot, &index, PROJECT, BUILDING, "101").expect("flat");

    let t1 = flat.tasks.iter().find(|r| r.task.id == "t1").expect("t1");
    assert_eq!(t1.billed_date, Some(date(10)));
    assert_eq!(t1.plan_id(), Some("plan-el"));

    let t2 = flat.tasks.iter().find(|r| r.task.id == "t2").expect("t2");
    assert_eq!(t2.billed_date, None);
}

#[test]
fn billed_without_bill_record_has_no_date() {
    let mut snapshot = tower_snapshot();
    snapshot.bills.clear();
    let index = snapshot.plan_index();
    let flat = flat_status(&snapshot, &index, PROJECT, BUILDING, "101").expect("flat");

    let t1 = flat.tasks.iter().find(|r| r.task.id == "t1").expect("t1");
    assert_eq!(t1.stage, Stage::Billed);
    assert_eq!(t1.billed_date, None);
}

#[test]
fn flat_building_and_tile_summaries_agree() {
    let snapshot = tower_snapshot();
    let index = snapshot.plan_index();
    let status = building_status(&snapshot, &index, PROJECT, BUILDING);

    let flats: Vec<(&str, u8, OverallStage)> = status
        .flats
        .iter()
        .map(|f| (f.flat_no.as_str(), f.summary.progress, f.summary.stage))
        .collect();
    assert_eq!(
        flats,
        vec![
            ("101", 63, OverallStage::InProgress),
            ("102", 0, OverallStage::Planned),
        ]
    );

    let tiles: Vec<(&str, u8, usize)> = status
        .tiles
        .iter()
        .map(|t| (t.tile.name.as_str(), t.summary.progress, t.summary.task_count))
        .collect();
    assert_eq!(tiles, vec![("Electrical", 25, 6), ("Plumbing", 50, 2)]);

    assert_eq!(status.summary.task_count, 8);
    assert_eq!(status.summary.progress, 31);
    assert_eq!(status.summary.stage, OverallStage::InProgress);
    assert_eq!(status.summary.counts.get(Stage::Pending), 4);
}

#[test]
fn unknown_building_yields_empty_board() {
    let snapshot = tower_snapshot();
    let index = snapshot.plan_index();
    let status = building_status(&snapshot, &index, PROJECT, "Tower Z");

    assert!(status.flats.is_empty());
    assert!(status.tiles.is_empty());
    assert_eq!(status.summary.progress, 0);
    assert_eq!(status.summary.stage, OverallStage::Pending);
}

#[test]
fn flats_only_in_plans_still_appear() {
    let mut snapshot = tower_snapshot();
    snapshot.flats.retain(|f| f.flat_no != "102");
    let index = snapshot.plan_index();
    let status = building_status(&snapshot, &index, PROJECT, BUILDING);

    let numbers: Vec<&str> = status.flats.iter().map(|f| f.flat_no.as_str()).collect();
    assert_eq!(numbers, vec!["102", "101"]);
}

#[test]
fn task_stage_reports_the_authoritative_plan() {
    let snapshot = tower_snapshot();
    let index = snapshot.plan_index();

    let (stage, instance) = task_stage(&index, PROJECT, BUILDING, "tile-pl", "101", "p1");
    assert_eq!(stage, Stage::FinalCheck);
    assert_eq!(instance.map(|i| i.plan.id.as_str()), Some("plan-pl"));

    let (stage, instance) = task_stage(&index, PROJECT, BUILDING, "tile-pl", "102", "p1");
    assert_eq!(stage, Stage::Pending);
    assert!(instance.is_none());
}

#[test]
fn derived_views_are_repeatable() {
    let snapshot = tower_snapshot();
    assert_eq!(snapshot.digest(), tower_snapshot().digest());

    let first = stages(&snapshot, "101");
    let second = stages(&snapshot, "101");
    assert_eq!(first, second);
}

#[test]
fn digest_changes_with_progress() {
    let snapshot = tower_snapshot();
    let mut changed = tower_snapshot();
    if let Some(task) = changed.work_plans[0].flat_plans[0].tasks.get_mut("t2") {
        task.progress = 60;
    }
    assert_ne!(snapshot.digest(), changed.digest());
}

#[test]
fn buildings_and_kits_are_listed() {
    let snapshot = tower_snapshot();
    assert_eq!(
        snapshot.buildings(),
        vec![(PROJECT.to_string(), BUILDING.to_string())]
    );

    let report = snapshot.kit_report(PROJECT);
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].1.producible_count, 3);

    let elsewhere = snapshot.kit_report("Harbour");
    assert_eq!(elsewhere[0].1.producible_count, 0);
}
