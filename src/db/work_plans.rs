// src/db/work_plans.rs
use crate::db::records::{self, Collection};
use crate::domain::models::{ContractorBill, TaskProgress, WorkPlan};
use crate::errors::ServerError;
use rusqlite::Connection;

/// Identifies one task instance inside a specific plan.
#[derive(Debug, Clone)]
pub struct TaskRef<'a> {
    pub plan_id: &'a str,
    pub flat_no: &'a str,
    pub task_id: &'a str,
}

/// Read-modify-write of one task instance inside a transaction.
///
/// `mutate` sees the current record and may refuse the change; nothing is
/// written in that case.
pub fn update_task<F>(
    conn: &mut Connection,
    task: &TaskRef<'_>,
    mutate: F,
) -> Result<TaskProgress, ServerError>
where
    F: FnOnce(&mut TaskProgress) -> Result<(), ServerError>,
{
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let updated = apply_to_plan(&tx, task, mutate)?;

    tx.commit().map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(updated)
}

fn apply_to_plan<F>(
    conn: &Connection,
    task: &TaskRef<'_>,
    mutate: F,
) -> Result<TaskProgress, ServerError>
where
    F: FnOnce(&mut TaskProgress) -> Result<(), ServerError>,
{
    let mut plan: WorkPlan =
        records::get(conn, Collection::WorkPlans, task.plan_id)?.ok_or(ServerError::NotFound)?;

    let record = plan
        .flat_plan_mut(task.flat_no)
        .and_then(|fp| fp.tasks.get_mut(task.task_id))
        .ok_or_else(|| {
            ServerError::BadRequest(format!(
                "task '{}' is not planned for flat '{}' in plan '{}'",
                task.task_id, task.flat_no, task.plan_id
            ))
        })?;

    mutate(record)?;
    let updated = record.clone();

    records::upsert(conn, Collection::WorkPlans, &plan.id, &plan)?;
    Ok(updated)
}

/// Flags the task instance billed and appends the bill in one transaction.
pub fn bill_task<F>(
    conn: &mut Connection,
    task: &TaskRef<'_>,
    bill: &ContractorBill,
    check: F,
) -> Result<TaskProgress, ServerError>
where
    F: FnOnce(&TaskProgress) -> Result<(), ServerError>,
{
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let updated = apply_to_plan(&tx, task, |record| {
        check(&*record)?;
        record.billed = true;
        Ok(())
    })?;
    records::upsert(&tx, Collection::Bills, &bill.id, bill)?;

    tx.commit().map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(updated)
}
