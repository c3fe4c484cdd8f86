use crate::domain::badges::{overall_badge, stage_badge};
use crate::domain::board::BuildingStatus;
use crate::errors::ServerError;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

fn write_headers(sheet: &mut Worksheet, headers: &[&str], bold: &Format) -> Result<(), ServerError> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }
    Ok(())
}

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Two sheets: one row per flat, and one row per (flat, task).
pub fn building_status_xlsx(status: &BuildingStatus<'_>) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let flats = workbook.add_worksheet();
    flats
        .set_name("Flats")
        .map_err(xlsx_err("sheet name"))?;
    write_headers(flats, &["Floor", "Flat", "Type", "Tasks", "Progress %", "Status"], &bold)?;

    for (i, flat) in status.flats.iter().enumerate() {
        let r = (i + 1) as u32;
        flats
            .write_string(r, 0, &flat.floor_name)
            .map_err(xlsx_err("floor"))?;
        flats
            .write_string(r, 1, &flat.flat_no)
            .map_err(xlsx_err("flat"))?;
        flats
            .write_string(r, 2, &flat.flat_type)
            .map_err(xlsx_err("type"))?;
        flats
            .write_number(r, 3, flat.summary.task_count as f64)
            .map_err(xlsx_err("task count"))?;
        flats
            .write_number(r, 4, f64::from(flat.summary.progress))
            .map_err(xlsx_err("progress"))?;
        flats
            .write_string(r, 5, overall_badge(flat.summary.stage).label)
            .map_err(xlsx_err("status"))?;
    }

    let tasks = workbook.add_worksheet();
    tasks
        .set_name("Tasks")
        .map_err(xlsx_err("sheet name"))?;
    write_headers(
        tasks,
        &["Flat", "Tile", "Task", "Progress %", "Stage", "Plan", "Billed on"],
        &bold,
    )?;

    let rows = status
        .flats
        .iter()
        .flat_map(|flat| flat.tasks.iter().map(move |row| (flat, row)));
    for (i, (flat, row)) in rows.enumerate() {
        let r = (i + 1) as u32;
        tasks
            .write_string(r, 0, &flat.flat_no)
            .map_err(xlsx_err("flat"))?;
        tasks
            .write_string(r, 1, &row.tile.name)
            .map_err(xlsx_err("tile"))?;
        tasks
            .write_string(r, 2, &row.task.label)
            .map_err(xlsx_err("task"))?;
        tasks
            .write_number(r, 3, f64::from(row.progress))
            .map_err(xlsx_err("progress"))?;
        tasks
            .write_string(r, 4, stage_badge(row.stage).label)
            .map_err(xlsx_err("stage"))?;
        tasks
            .write_string(r, 5, row.plan_id().unwrap_or(""))
            .map_err(xlsx_err("plan"))?;
        let billed = row
            .billed_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        tasks
            .write_string(r, 6, &billed)
            .map_err(xlsx_err("billed date"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}
