// src/domain/snapshot.rs

use crate::domain::kits::{compute_producibility, stock_by_material, Producibility};
use crate::domain::locator::PlanIndex;
use crate::domain::models::{
    Assignment, ContractorBill, Flat, InventoryItem, MaterialKit, WorkPlan, WorkTile,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Every collection the status engine reads, captured at one logical point in time.
///
/// Derivations only ever borrow a snapshot; writes go to storage and a fresh
/// snapshot is loaded for the next request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tiles: Vec<WorkTile>,
    pub assignments: Vec<Assignment>,
    pub work_plans: Vec<WorkPlan>,
    pub flats: Vec<Flat>,
    pub bills: Vec<ContractorBill>,
    pub kits: Vec<MaterialKit>,
    pub inventory: Vec<InventoryItem>,
}

impl Snapshot {
    pub fn plan_index(&self) -> PlanIndex<'_> {
        PlanIndex::build(&self.tiles, &self.work_plans)
    }

    pub fn tile(&self, tile_id: &str) -> Option<&WorkTile> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }

    pub fn work_plan(&self, plan_id: &str) -> Option<&WorkPlan> {
        self.work_plans.iter().find(|p| p.id == plan_id)
    }

    /// SHA-256 over the canonical JSON form. Two snapshots with equal digests
    /// derive identical views.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        // Serializing plain data into a Vec cannot fail.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hasher.update(&bytes);
        hasher.finalize().into()
    }

    /// Every (project, building) pair known from assignments or flats, sorted.
    pub fn buildings(&self) -> Vec<(String, String)> {
        let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
        for a in &self.assignments {
            seen.insert((a.project_name.clone(), a.building_name.clone()));
        }
        for f in &self.flats {
            seen.insert((f.project_name.clone(), f.building_name.clone()));
        }
        seen.into_iter().collect()
    }

    /// Producibility of every kit against the project's current stock.
    pub fn kit_report(&self, project: &str) -> Vec<(&MaterialKit, Producibility)> {
        let stock = stock_by_material(&self.inventory, project);
        self.kits
            .iter()
            .map(|kit| (kit, compute_producibility(kit, &stock)))
            .collect()
    }
}
