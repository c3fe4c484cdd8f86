// src/domain/board.rs
//
// Composes the catalog, locator, derivation and aggregation steps into the
// views the screens render. Every screen goes through these functions.

use crate::domain::aggregate::{summarize, Summary, TaskStatus};
use crate::domain::billing::find_billed_date;
use crate::domain::catalog::{registered_tasks, TileCatalog};
use crate::domain::locator::{PlanIndex, TaskInstance};
use crate::domain::logic::{stage_of, Stage};
use crate::domain::models::{TaskDefinition, WorkTile};
use crate::domain::snapshot::Snapshot;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// One registered task on one flat.
#[derive(Debug, Clone)]
pub struct TaskRow<'a> {
    pub tile: &'a WorkTile,
    pub task: TaskDefinition,
    pub stage: Stage,
    pub progress: u8,
    pub instance: Option<TaskInstance<'a>>,
    pub billed_date: Option<NaiveDate>,
}

impl TaskRow<'_> {
    pub fn status(&self) -> TaskStatus {
        TaskStatus::new(self.stage, self.progress)
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.instance.map(|i| i.plan.id.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FlatStatus<'a> {
    pub flat_no: String,
    pub floor_name: String,
    pub flat_type: String,
    pub tasks: Vec<TaskRow<'a>>,
    pub summary: Summary,
}

#[derive(Debug, Clone)]
pub struct TileSummary<'a> {
    pub tile: &'a WorkTile,
    pub summary: Summary,
}

#[derive(Debug, Clone)]
pub struct BuildingStatus<'a> {
    pub project_name: String,
    pub building_name: String,
    pub catalog: Vec<TileCatalog<'a>>,
    pub flats: Vec<FlatStatus<'a>>,
    pub tiles: Vec<TileSummary<'a>>,
    pub summary: Summary,
}

/// Stage of one task instance, with the record it was derived from.
pub fn task_stage<'a>(
    index: &PlanIndex<'a>,
    project_name: &str,
    building_name: &str,
    tile_id: &str,
    flat_no: &str,
    task_id: &str,
) -> (Stage, Option<TaskInstance<'a>>) {
    let instance = index.get(project_name, building_name, tile_id, flat_no, task_id);
    (stage_of(instance.map(|i| i.progress)), instance)
}

fn task_rows<'a>(
    snapshot: &'a Snapshot,
    index: &PlanIndex<'a>,
    catalog: &[TileCatalog<'a>],
    project_name: &str,
    building_name: &str,
    flat_no: &str,
) -> Vec<TaskRow<'a>> {
    let mut rows = Vec::new();
    for entry in catalog {
        for task in &entry.tasks {
            let (stage, instance) = task_stage(
                index,
                project_name,
                building_name,
                &entry.tile.id,
                flat_no,
                &task.id,
            );
            let billed_date = match instance {
                Some(i) if i.progress.billed => {
                    find_billed_date(&i.plan.id, flat_no, &task.id, &snapshot.bills)
                }
                _ => None,
            };
            rows.push(TaskRow {
                tile: entry.tile,
                task: task.clone(),
                stage,
                progress: instance.map(|i| i.progress.progress).unwrap_or(0),
                instance,
                billed_date,
            });
        }
    }
    rows
}

/// Flat numbers on a building: the flat master list first, then any flat that
/// only appears in work plans. Sorted by floor then flat number.
fn building_flats(
    snapshot: &Snapshot,
    project_name: &str,
    building_name: &str,
) -> Vec<(String, String, String)> {
    let mut flats: Vec<(String, String, String)> = snapshot
        .flats
        .iter()
        .filter(|f| f.project_name == project_name && f.building_name == building_name)
        .map(|f| (f.floor_name.clone(), f.flat_no.clone(), f.flat_type.clone()))
        .collect();

    let mut known: BTreeSet<String> = flats.iter().map(|(_, no, _)| no.clone()).collect();
    for plan in snapshot
        .work_plans
        .iter()
        .filter(|p| p.project_name == project_name && p.building_name == building_name)
    {
        for fp in &plan.flat_plans {
            if known.insert(fp.flat_no.clone()) {
                flats.push((String::new(), fp.flat_no.clone(), fp.flat_type.clone()));
            }
        }
    }

    flats.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    flats
}

pub fn flat_status<'a>(
    snapshot: &'a Snapshot,
    index: &PlanIndex<'a>,
    project_name: &str,
    building_name: &str,
    flat_no: &str,
) -> Option<FlatStatus<'a>> {
    let catalog = registered_tasks(
        project_name,
        building_name,
        &snapshot.tiles,
        &snapshot.assignments,
    );
    building_flats(snapshot, project_name, building_name)
        .into_iter()
        .find(|(_, no, _)| no == flat_no)
        .map(|(floor, no, flat_type)| {
            build_flat(snapshot, index, &catalog, project_name, building_name, floor, no, flat_type)
        })
}

#[allow(clippy::too_many_arguments)]
fn build_flat<'a>(
    snapshot: &'a Snapshot,
    index: &PlanIndex<'a>,
    catalog: &[TileCatalog<'a>],
    project_name: &str,
    building_name: &str,
    floor_name: String,
    flat_no: String,
    flat_type: String,
) -> FlatStatus<'a> {
    let tasks = task_rows(snapshot, index, catalog, project_name, building_name, &flat_no);
    let statuses: Vec<TaskStatus> = tasks.iter().map(TaskRow::status).collect();
    FlatStatus {
        flat_no,
        floor_name,
        flat_type,
        summary: summarize(&statuses),
        tasks,
    }
}

pub fn building_status<'a>(
    snapshot: &'a Snapshot,
    index: &PlanIndex<'a>,
    project_name: &str,
    building_name: &str,
) -> BuildingStatus<'a> {
    let catalog = registered_tasks(
        project_name,
        building_name,
        &snapshot.tiles,
        &snapshot.assignments,
    );

    let flats: Vec<FlatStatus<'a>> = building_flats(snapshot, project_name, building_name)
        .into_iter()
        .map(|(floor, no, flat_type)| {
            build_flat(snapshot, index, &catalog, project_name, building_name, floor, no, flat_type)
        })
        .collect();

    let tiles = catalog
        .iter()
        .map(|entry| {
            let statuses: Vec<TaskStatus> = flats
                .iter()
                .flat_map(|f| f.tasks.iter())
                .filter(|row| row.tile.id == entry.tile.id)
                .map(TaskRow::status)
                .collect();
            TileSummary {
                tile: entry.tile,
                summary: summarize(&statuses),
            }
        })
        .collect();

    let all: Vec<TaskStatus> = flats
        .iter()
        .flat_map(|f| f.tasks.iter().map(TaskRow::status))
        .collect();

    BuildingStatus {
        project_name: project_name.to_string(),
        building_name: building_name.to_string(),
        summary: summarize(&all),
        catalog,
        flats,
        tiles,
    }
}
