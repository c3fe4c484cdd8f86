use super::{post_form, seeded_app};
use crate::db::records::{self, Collection};
use crate::db::load_snapshot;
use crate::domain::logic::Stage;
use crate::domain::models::{ContractorBill, WorkPlan};
use crate::errors::ServerError;
use crate::router::{handle, App};

fn task_form<'a>(tile: &'a str, flat: &'a str, task: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("project", "Skyline"),
        ("building", "Tower A"),
        ("flat", flat),
        ("tile", tile),
        ("task", task),
    ]
}

fn stage_now(app: &App, tile: &str, flat: &str, task: &str) -> Stage {
    let snapshot = app.db.with_conn(load_snapshot).expect("snapshot");
    let index = snapshot.plan_index();
    crate::domain::board::task_stage(&index, "Skyline", "Tower A", tile, flat, task).0
}

#[test]
fn progress_update_moves_stage_and_redirects() {
    let (_dir, app) = seeded_app();
    let mut form = task_form("tile-el", "102", "t1");
    form.push(("progress", "35"));

    let resp = handle(post_form("/progress", "progress", &form), &app).expect("Handler failed");

    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/flat?project=Skyline&building=Tower+A&flat=102"
    );
    assert_eq!(stage_now(&app, "tile-el", "102", "t1"), Stage::WorkInProgress);
}

#[test]
fn lower_progress_is_accepted() {
    let (_dir, app) = seeded_app();
    let mut form = task_form("tile-el", "101", "t2");
    form.push(("progress", "10"));

    handle(post_form("/progress", "progress", &form), &app).expect("Handler failed");

    let plan: WorkPlan = app
        .db
        .with_conn(|conn| records::get(conn, Collection::WorkPlans, "plan-el"))
        .expect("load")
        .expect("plan exists");
    assert_eq!(plan.flat_plan("101").unwrap().tasks["t2"].progress, 10);
}

#[test]
fn progress_rejects_out_of_range_and_unplanned() {
    let (_dir, app) = seeded_app();

    let mut form = task_form("tile-el", "101", "t2");
    form.push(("progress", "140"));
    let err = handle(post_form("/progress", "progress", &form), &app).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    // t3 is catalogued but not in any plan.
    let mut form = task_form("tile-el", "101", "t3");
    form.push(("progress", "20"));
    let err = handle(post_form("/progress", "progress", &form), &app).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn writes_need_permission() {
    let (_dir, app) = seeded_app();
    let mut form = task_form("tile-el", "102", "t1");
    form.push(("progress", "35"));

    let err = handle(post_form("/progress", "billing", &form), &app).unwrap_err();
    assert!(matches!(err, ServerError::Forbidden(_)));
    assert_eq!(err.status(), 403);
    assert_eq!(stage_now(&app, "tile-el", "102", "t1"), Stage::Planned);
}

#[test]
fn final_check_only_from_final_check_stage() {
    let (_dir, app) = seeded_app();

    // t2 is at 50%.
    let err = handle(
        post_form("/final-check", "final_check", &task_form("tile-el", "101", "t2")),
        &app,
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    // p1 is at 100% and pending inspection.
    let resp = handle(
        post_form("/final-check", "final_check", &task_form("tile-pl", "101", "p1")),
        &app,
    )
    .expect("approve");
    assert_eq!(resp.status(), 303);
    assert_eq!(stage_now(&app, "tile-pl", "101", "p1"), Stage::ForBilling);
}

#[test]
fn billing_flags_task_and_records_bill() {
    let (_dir, app) = seeded_app();

    handle(
        post_form("/final-check", "final_check", &task_form("tile-pl", "101", "p1")),
        &app,
    )
    .expect("approve");

    let mut form = task_form("tile-pl", "101", "p1");
    form.push(("rate", "250.5"));
    let resp = handle(post_form("/bill", "billing", &form), &app).expect("bill");
    assert_eq!(resp.status(), 303);
    assert_eq!(stage_now(&app, "tile-pl", "101", "p1"), Stage::Billed);

    let bill: ContractorBill = app
        .db
        .with_conn(|conn| records::get(conn, Collection::Bills, "plan-pl:101:p1"))
        .expect("load")
        .expect("bill stored");
    assert_eq!(bill.billed_items.len(), 1);
    assert_eq!(bill.billed_items[0].rate, Some(250.5));
    assert_eq!(bill.billed_items[0].work_tile, "Plumbing");

    // A second submit is refused; the task is no longer for billing.
    let err = handle(post_form("/bill", "billing", &form), &app).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn billing_refused_before_approval() {
    let (_dir, app) = seeded_app();

    let err = handle(
        post_form("/bill", "billing", &task_form("tile-pl", "101", "p1")),
        &app,
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let bills: Vec<ContractorBill> = app
        .db
        .with_conn(|conn| records::load_all(conn, Collection::Bills))
        .expect("bills");
    assert_eq!(bills.len(), 1);
}
