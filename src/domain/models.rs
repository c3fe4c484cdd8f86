// src/domain/models.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit of work inside a tile. Identity is `id`; labels may collide across tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub label: String,
}

impl TaskDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A named category of work (e.g. "Electrical") with its default tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

/// Records that a tile applies to a building, optionally with extra tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub project_name: String,
    pub building_name: String,
    pub work_tile_id: String,
    #[serde(default)]
    pub custom_tasks: Vec<TaskDefinition>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalCheckStatus {
    #[default]
    Pending,
    Approved,
}

/// The task instance: the only mutable record the status engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub final_check_status: FinalCheckStatus,
    #[serde(default)]
    pub billed: bool,
}

impl TaskProgress {
    pub fn is_approved(&self) -> bool {
        self.final_check_status == FinalCheckStatus::Approved
    }
}

/// Per-flat slice of a work plan. A key in `tasks` means the task is planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPlan {
    pub flat_no: String,
    #[serde(rename = "type", default)]
    pub flat_type: String,
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskProgress>,
}

/// A contractor's scheduled execution of tasks across flats.
///
/// `work_tile` holds the tile *name*; it is resolved to a tile id when a
/// [`PlanIndex`](crate::domain::locator::PlanIndex) is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPlan {
    pub id: String,
    pub project_name: String,
    pub building_name: String,
    #[serde(default)]
    pub contractor_name: String,
    pub work_tile: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub flat_plans: Vec<FlatPlan>,
}

impl WorkPlan {
    pub fn flat_plan(&self, flat_no: &str) -> Option<&FlatPlan> {
        self.flat_plans.iter().find(|fp| fp.flat_no == flat_no)
    }

    pub fn flat_plan_mut(&mut self, flat_no: &str) -> Option<&mut FlatPlan> {
        self.flat_plans.iter_mut().find(|fp| fp.flat_no == flat_no)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilledItem {
    pub plan_id: String,
    pub flat_no: String,
    pub task_id: String,
    pub rate: Option<f64>,
    #[serde(default)]
    pub work_tile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorBill {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub contractor_name: String,
    #[serde(default)]
    pub billed_items: Vec<BilledItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flat {
    pub project_name: String,
    pub building_name: String,
    #[serde(default)]
    pub floor_name: String,
    pub flat_no: String,
    #[serde(rename = "type", default)]
    pub flat_type: String,
}

impl Flat {
    /// Storage key; flat numbers are only unique within a project.
    pub fn record_id(&self) -> String {
        format!("{}/{}", self.project_name, self.flat_no)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitItem {
    pub material_name: String,
    pub quantity: f64,
}

/// A bill-of-materials recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialKit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<KitItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub project: String,
    pub material_name: String,
    #[serde(default)]
    pub current_stock: f64,
    #[serde(default)]
    pub unit: String,
}

impl InventoryItem {
    pub fn record_id(&self) -> String {
        format!("{}/{}", self.project, self.material_name)
    }
}
