// src/domain/locator.rs

use crate::domain::models::{TaskProgress, WorkPlan, WorkTile};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Total order over plans covering the same task instance.
///
/// The greater plan is authoritative: latest `created_at`, then the greatest
/// plan id. Every lookup in the crate goes through this ordering.
pub fn plan_precedence(a: &WorkPlan, b: &WorkPlan) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// A located task instance: the progress record and the plan that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TaskInstance<'a> {
    pub plan: &'a WorkPlan,
    pub progress: &'a TaskProgress,
}

/// Whether a plan is one of the candidates for a (project, building, tile).
///
/// Plans name their tile, so this is the one place the name is compared.
/// `PlanIndex` keys on the same three fields.
fn plan_in_scope(
    plan: &WorkPlan,
    project_name: &str,
    building_name: &str,
    tile_name: &str,
) -> bool {
    plan.project_name == project_name
        && plan.building_name == building_name
        && plan.work_tile == tile_name
}

/// Finds the authoritative task instance by tile *name*, as plans record it.
pub fn find_instance<'a>(
    project_name: &str,
    flat_no: &str,
    building_name: &str,
    tile_name: &str,
    task_id: &str,
    work_plans: &'a [WorkPlan],
) -> Option<TaskInstance<'a>> {
    work_plans
        .iter()
        .filter(|p| plan_in_scope(p, project_name, building_name, tile_name))
        .filter_map(|plan| {
            plan.flat_plan(flat_no)
                .and_then(|fp| fp.tasks.get(task_id))
                .map(|progress| TaskInstance { plan, progress })
        })
        .max_by(|a, b| plan_precedence(a.plan, b.plan))
}

/// Returns the progress record for a (flat, tile, task), if any plan covers it.
pub fn find_progress<'a>(
    project_name: &str,
    flat_no: &str,
    building_name: &str,
    tile_name: &str,
    task_id: &str,
    work_plans: &'a [WorkPlan],
) -> Option<&'a TaskProgress> {
    find_instance(project_name, flat_no, building_name, tile_name, task_id, work_plans)
        .map(|i| i.progress)
}

type InstanceKey = (String, String, String, String, String);

/// Pre-resolved lookup of every task instance in a set of plans.
///
/// Plans reference tiles by name; names are resolved to tile ids once here.
/// Keys are `(project, building, tile id, flat no, task id)`.
#[derive(Debug, Default)]
pub struct PlanIndex<'a> {
    entries: HashMap<InstanceKey, TaskInstance<'a>>,
}

impl<'a> PlanIndex<'a> {
    pub fn build(tiles: &[WorkTile], work_plans: &'a [WorkPlan]) -> Self {
        let mut tile_ids: HashMap<&str, &str> = HashMap::new();
        for tile in tiles {
            if let Some(existing) = tile_ids.get(tile.name.as_str()) {
                warn!(
                    tile_name = %tile.name,
                    kept = %existing,
                    ignored = %tile.id,
                    "duplicate work tile name"
                );
                continue;
            }
            tile_ids.insert(tile.name.as_str(), tile.id.as_str());
        }

        let mut entries: HashMap<InstanceKey, TaskInstance<'a>> = HashMap::new();

        for plan in work_plans {
            let Some(tile_id) = tile_ids.get(plan.work_tile.as_str()) else {
                warn!(plan_id = %plan.id, tile_name = %plan.work_tile, "work plan names unknown tile");
                continue;
            };

            for flat_plan in &plan.flat_plans {
                for (task_id, progress) in &flat_plan.tasks {
                    let key = (
                        plan.project_name.clone(),
                        plan.building_name.clone(),
                        tile_id.to_string(),
                        flat_plan.flat_no.clone(),
                        task_id.clone(),
                    );
                    let candidate = TaskInstance { plan, progress };

                    match entries.get(&key) {
                        Some(current) => {
                            debug!(
                                flat_no = %flat_plan.flat_no,
                                task_id = %task_id,
                                first = %current.plan.id,
                                second = %plan.id,
                                "task instance covered by more than one plan"
                            );
                            if plan_precedence(plan, current.plan) == Ordering::Greater {
                                entries.insert(key, candidate);
                            }
                        }
                        None => {
                            entries.insert(key, candidate);
                        }
                    }
                }
            }
        }

        Self { entries }
    }

    pub fn get(
        &self,
        project_name: &str,
        building_name: &str,
        tile_id: &str,
        flat_no: &str,
        task_id: &str,
    ) -> Option<TaskInstance<'a>> {
        let key = (
            project_name.to_string(),
            building_name.to_string(),
            tile_id.to_string(),
            flat_no.to_string(),
            task_id.to_string(),
        );
        self.entries.get(&key).copied()
    }
}
