use crate::db::connection::{init_db, Database};
use crate::db::records::{upsert, Collection};
use crate::domain::models::{
    Assignment, BilledItem, ContractorBill, FinalCheckStatus, Flat, FlatPlan, InventoryItem,
    KitItem, MaterialKit, TaskDefinition, TaskProgress, WorkPlan, WorkTile,
};
use crate::domain::snapshot::Snapshot;
use crate::errors::ServerError;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tempfile::TempDir;

pub const PROJECT: &str = "Skyline";
pub const BUILDING: &str = "Tower A";

/// Initialize a fresh test DB using the production schema.
/// The directory is removed when the returned guard drops.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("test.sqlite3");
    let db = Database::new(path.to_string_lossy().to_string());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    (dir, db)
}

pub fn task(id: &str, label: &str) -> TaskDefinition {
    TaskDefinition::new(id, label)
}

pub fn tile(id: &str, name: &str, tasks: &[(&str, &str)]) -> WorkTile {
    WorkTile {
        id: id.to_string(),
        name: name.to_string(),
        tasks: tasks.iter().map(|(id, label)| task(id, label)).collect(),
    }
}

pub fn assignment(id: &str, building: &str, tile_id: &str, custom: &[(&str, &str)]) -> Assignment {
    Assignment {
        id: id.to_string(),
        project_name: PROJECT.to_string(),
        building_name: building.to_string(),
        work_tile_id: tile_id.to_string(),
        custom_tasks: custom.iter().map(|(id, label)| task(id, label)).collect(),
    }
}

pub fn progress(value: u8) -> TaskProgress {
    TaskProgress {
        progress: value,
        ..TaskProgress::default()
    }
}

pub fn approved(value: u8) -> TaskProgress {
    TaskProgress {
        progress: value,
        final_check_status: FinalCheckStatus::Approved,
        ..TaskProgress::default()
    }
}

pub fn billed(value: u8) -> TaskProgress {
    TaskProgress {
        billed: true,
        ..approved(value)
    }
}

pub fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid date")
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).expect("valid date")
}

/// A plan for one tile; `flats` lists (flat no, [(task id, progress)]).
pub fn plan(
    id: &str,
    tile_name: &str,
    created_day: u32,
    flats: Vec<(&str, Vec<(&str, TaskProgress)>)>,
) -> WorkPlan {
    WorkPlan {
        id: id.to_string(),
        project_name: PROJECT.to_string(),
        building_name: BUILDING.to_string(),
        contractor_name: "Volt & Sons".to_string(),
        work_tile: tile_name.to_string(),
        start_date: Some(date(1)),
        end_date: Some(date(30)),
        created_at: at(created_day),
        flat_plans: flats
            .into_iter()
            .map(|(flat_no, tasks)| FlatPlan {
                flat_no: flat_no.to_string(),
                flat_type: "2BHK".to_string(),
                tasks: tasks
                    .into_iter()
                    .map(|(id, p)| (id.to_string(), p))
                    .collect::<BTreeMap<_, _>>(),
            })
            .collect(),
    }
}

pub fn flat(floor: &str, flat_no: &str) -> Flat {
    Flat {
        project_name: PROJECT.to_string(),
        building_name: BUILDING.to_string(),
        floor_name: floor.to_string(),
        flat_no: flat_no.to_string(),
        flat_type: "2BHK".to_string(),
    }
}

pub fn bill(id: &str, day: u32, items: &[(&str, &str, &str)]) -> ContractorBill {
    ContractorBill {
        id: id.to_string(),
        date: date(day),
        contractor_name: "Volt & Sons".to_string(),
        billed_items: items
            .iter()
            .map(|(plan_id, flat_no, task_id)| BilledItem {
                plan_id: plan_id.to_string(),
                flat_no: flat_no.to_string(),
                task_id: task_id.to_string(),
                rate: Some(120.0),
                work_tile: "Electrical".to_string(),
            })
            .collect(),
    }
}

pub fn kit(id: &str, items: &[(&str, f64)]) -> MaterialKit {
    MaterialKit {
        id: id.to_string(),
        name: format!("Kit {id}"),
        items: items
            .iter()
            .map(|(name, quantity)| KitItem {
                material_name: name.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

pub fn stock(material: &str, current: f64) -> InventoryItem {
    InventoryItem {
        project: PROJECT.to_string(),
        material_name: material.to_string(),
        current_stock: current,
        unit: "bag".to_string(),
    }
}

/// Tower A with two tiles and two flats.
///
/// Electrical (t1 Wiring, t2 Switches, custom t3 Fixtures), Plumbing (p1 Piping).
/// Flat 101: t1 billed, t2 at 50%, p1 at 100% awaiting final check.
/// Flat 102: t1 planned at 0%, nothing else.
pub fn tower_snapshot() -> Snapshot {
    Snapshot {
        tiles: vec![
            tile("tile-el", "Electrical", &[("t1", "Wiring"), ("t2", "Switches")]),
            tile("tile-pl", "Plumbing", &[("p1", "Piping")]),
        ],
        assignments: vec![
            assignment("as-1", BUILDING, "tile-el", &[("t1", "Rewiring"), ("t3", "Fixtures")]),
            assignment("as-2", BUILDING, "tile-pl", &[]),
        ],
        work_plans: vec![
            plan(
                "plan-el",
                "Electrical",
                1,
                vec![
                    ("101", vec![("t1", billed(100)), ("t2", progress(50))]),
                    ("102", vec![("t1", progress(0))]),
                ],
            ),
            plan("plan-pl", "Plumbing", 2, vec![("101", vec![("p1", progress(100))])]),
        ],
        flats: vec![flat("Floor 1", "101"), flat("Floor 1", "102")],
        bills: vec![bill("bill-1", 10, &[("plan-el", "101", "t1")])],
        kits: vec![kit("k1", &[("cement", 2.0), ("sand", 1.0)])],
        inventory: vec![stock("cement", 7.0), stock("sand", 10.0)],
    }
}

/// Writes every record of a snapshot into the database.
pub fn seed(db: &Database, snapshot: &Snapshot) {
    db.with_conn(|conn| {
        for r in &snapshot.tiles {
            upsert(conn, Collection::Tiles, &r.id, r)?;
        }
        for r in &snapshot.assignments {
            upsert(conn, Collection::Assignments, &r.id, r)?;
        }
        for r in &snapshot.work_plans {
            upsert(conn, Collection::WorkPlans, &r.id, r)?;
        }
        for r in &snapshot.flats {
            upsert(conn, Collection::Flats, &r.record_id(), r)?;
        }
        for r in &snapshot.bills {
            upsert(conn, Collection::Bills, &r.id, r)?;
        }
        for r in &snapshot.kits {
            upsert(conn, Collection::Kits, &r.id, r)?;
        }
        for r in &snapshot.inventory {
            upsert(conn, Collection::Inventory, &r.record_id(), r)?;
        }
        Ok::<_, ServerError>(())
    })
    .expect("seed test database");
}
