// src/db/records.rs
use crate::domain::models::{
    Assignment, ContractorBill, Flat, InventoryItem, MaterialKit, WorkPlan, WorkTile,
};
use crate::domain::snapshot::Snapshot;
use crate::errors::ServerError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The named collections the back office keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Tiles,
    Assignments,
    WorkPlans,
    Flats,
    Bills,
    Kits,
    Inventory,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Tiles,
        Collection::Assignments,
        Collection::WorkPlans,
        Collection::Flats,
        Collection::Bills,
        Collection::Kits,
        Collection::Inventory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Tiles => "tiles",
            Collection::Assignments => "assignments",
            Collection::WorkPlans => "work_plans",
            Collection::Flats => "flats",
            Collection::Bills => "bills",
            Collection::Kits => "kits",
            Collection::Inventory => "inventory",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

pub fn upsert<T: Serialize>(
    conn: &Connection,
    collection: Collection,
    id: &str,
    record: &T,
) -> Result<(), ServerError> {
    let body = serde_json::to_string(record)?;
    conn.execute(
        r#"
        insert into records (collection, id, body, updated_at)
        values (?1, ?2, ?3, ?4)
        on conflict (collection, id) do update set
            body = excluded.body,
            updated_at = excluded.updated_at
        "#,
        params![collection.name(), id, body, Utc::now().timestamp()],
    )
    .map_err(|e| ServerError::DbError(format!("upsert into {} failed: {e}", collection.name())))?;
    Ok(())
}

pub fn get<T: DeserializeOwned>(
    conn: &Connection,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, ServerError> {
    let body: Option<String> = conn
        .query_row(
            "select body from records where collection = ?1 and id = ?2",
            params![collection.name(), id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("load {} '{id}' failed: {e}", collection.name())))?;

    body.map(|b| serde_json::from_str(&b).map_err(ServerError::from))
        .transpose()
}

/// All records of a collection in insertion order.
pub fn load_all<T: DeserializeOwned>(
    conn: &Connection,
    collection: Collection,
) -> Result<Vec<T>, ServerError> {
    let mut stmt = conn
        .prepare("select id, body from records where collection = ?1 order by rowid")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![collection.name()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut records = Vec::new();
    for r in rows {
        let (id, body) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        let record = serde_json::from_str(&body).map_err(|e| {
            ServerError::JsonError(format!("{} '{id}': {e}", collection.name()))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Reads every collection in one transaction so the snapshot is consistent.
pub fn load_snapshot(conn: &mut Connection) -> Result<Snapshot, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let snapshot = Snapshot {
        tiles: load_all(&tx, Collection::Tiles)?,
        assignments: load_all(&tx, Collection::Assignments)?,
        work_plans: load_all(&tx, Collection::WorkPlans)?,
        flats: load_all(&tx, Collection::Flats)?,
        bills: load_all(&tx, Collection::Bills)?,
        kits: load_all(&tx, Collection::Kits)?,
        inventory: load_all(&tx, Collection::Inventory)?,
    };

    tx.commit().map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(snapshot)
}

fn store<T: Serialize + DeserializeOwned>(
    conn: &Connection,
    collection: Collection,
    body: &[u8],
    id_of: impl Fn(&T) -> String,
) -> Result<String, ServerError> {
    let record: T = serde_json::from_slice(body)?;
    store_record(conn, collection, &record, id_of(&record))
}

fn store_record<T: Serialize>(
    conn: &Connection,
    collection: Collection,
    record: &T,
    id: String,
) -> Result<String, ServerError> {
    if id.is_empty() {
        return Err(ServerError::BadRequest(format!(
            "{} record has an empty id",
            collection.name()
        )));
    }
    upsert(conn, collection, &id, record)?;
    Ok(id)
}

/// Progress values must stay within 0..=100, as on the progress form.
fn check_plan_progress(plan: &WorkPlan) -> Result<(), ServerError> {
    for flat_plan in &plan.flat_plans {
        for (task_id, record) in &flat_plan.tasks {
            if record.progress > 100 {
                return Err(ServerError::BadRequest(format!(
                    "plan '{}' flat '{}' task '{task_id}': progress {} is above 100",
                    plan.id, flat_plan.flat_no, record.progress
                )));
            }
        }
    }
    Ok(())
}

/// Validates a JSON body against the collection's record shape and stores it.
/// Returns the record id.
pub fn import_record(
    conn: &Connection,
    collection: Collection,
    body: &[u8],
) -> Result<String, ServerError> {
    match collection {
        Collection::Tiles => store(conn, collection, body, |r: &WorkTile| r.id.clone()),
        Collection::Assignments => store(conn, collection, body, |r: &Assignment| r.id.clone()),
        Collection::WorkPlans => {
            let plan: WorkPlan = serde_json::from_slice(body)?;
            check_plan_progress(&plan)?;
            store_record(conn, collection, &plan, plan.id.clone())
        }
        Collection::Flats => store(conn, collection, body, Flat::record_id),
        Collection::Bills => store(conn, collection, body, |r: &ContractorBill| r.id.clone()),
        Collection::Kits => store(conn, collection, body, |r: &MaterialKit| r.id.clone()),
        Collection::Inventory => store(conn, collection, body, InventoryItem::record_id),
    }
}
