// src/domain/catalog.rs

use crate::domain::models::{Assignment, TaskDefinition, WorkTile};
use std::collections::HashSet;

/// Resolves the task catalog for a tile within a project.
///
/// Default tasks come first, in tile order. Custom tasks from every assignment
/// matching `(project_name, tile_id)` follow in assignment order. The first
/// definition seen for an id wins, so a custom task can never relabel a default
/// or an earlier custom task.
pub fn resolve_tasks<'a, I>(
    tile_id: &str,
    project_name: &str,
    assignments: I,
    tile_default_tasks: &[TaskDefinition],
) -> Vec<TaskDefinition>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolved = Vec::new();

    for task in tile_default_tasks {
        if seen.insert(task.id.as_str()) {
            resolved.push(task.clone());
        }
    }

    for assignment in assignments {
        if assignment.project_name != project_name || assignment.work_tile_id != tile_id {
            continue;
        }
        for task in &assignment.custom_tasks {
            if seen.insert(task.id.as_str()) {
                resolved.push(task.clone());
            }
        }
    }

    resolved
}

/// A tile together with the tasks registered for it on one building.
#[derive(Debug, Clone)]
pub struct TileCatalog<'a> {
    pub tile: &'a WorkTile,
    pub tasks: Vec<TaskDefinition>,
}

/// Every task registered for a building: one entry per tile assigned to it.
///
/// Tiles appear in the order of their first assignment. Custom tasks are only
/// taken from assignments on this building. Assignments naming an unknown tile
/// are skipped.
pub fn registered_tasks<'a>(
    project_name: &str,
    building_name: &str,
    tiles: &'a [WorkTile],
    assignments: &[Assignment],
) -> Vec<TileCatalog<'a>> {
    let on_building: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| a.project_name == project_name && a.building_name == building_name)
        .collect();

    let mut tile_order: Vec<&str> = Vec::new();
    for a in &on_building {
        if !tile_order.contains(&a.work_tile_id.as_str()) {
            tile_order.push(a.work_tile_id.as_str());
        }
    }

    tile_order
        .into_iter()
        .filter_map(|tile_id| tiles.iter().find(|t| t.id == tile_id))
        .map(|tile| TileCatalog {
            tile,
            tasks: resolve_tasks(
                &tile.id,
                project_name,
                on_building.iter().copied(),
                &tile.tasks,
            ),
        })
        .collect()
}
