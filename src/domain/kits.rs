// src/domain/kits.rs

use crate::domain::models::{InventoryItem, MaterialKit};
use serde::Serialize;
use std::collections::HashMap;

/// A material that blocks assembling the next kit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    pub material_name: String,
    pub needed: f64,
    pub in_stock: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Producibility {
    pub producible_count: u64,
    pub pending_items: Vec<PendingItem>,
}

/// Current stock per material for one project. Several records for the same
/// material are added together.
pub fn stock_by_material(inventory: &[InventoryItem], project: &str) -> HashMap<String, f64> {
    let mut stock: HashMap<String, f64> = HashMap::new();
    for item in inventory.iter().filter(|i| i.project == project) {
        *stock.entry(item.material_name.clone()).or_insert(0.0) += item.current_stock.max(0.0);
    }
    stock
}

/// How many complete kits the stock covers, and what is short for one more.
///
/// Items with a non-positive quantity never constrain the count. A kit with no
/// constraining items yields 0.
pub fn compute_producibility(
    kit: &MaterialKit,
    inventory_by_material: &HashMap<String, f64>,
) -> Producibility {
    let stock_of = |name: &str| inventory_by_material.get(name).copied().unwrap_or(0.0);

    let producible_count = kit
        .items
        .iter()
        .filter(|item| item.quantity > 0.0)
        .map(|item| (stock_of(&item.material_name) / item.quantity).floor())
        .fold(None, |min: Option<f64>, ratio| {
            Some(min.map_or(ratio, |m| m.min(ratio)))
        })
        // `as` saturates at u64::MAX for very large ratios.
        .map(|ratio| ratio.max(0.0) as u64)
        .unwrap_or(0);

    let next = producible_count.saturating_add(1) as f64;
    let pending_items = kit
        .items
        .iter()
        .filter(|item| item.quantity > 0.0)
        .filter_map(|item| {
            let in_stock = stock_of(&item.material_name);
            let needed_for_next = next * item.quantity;
            (in_stock < needed_for_next).then(|| PendingItem {
                material_name: item.material_name.clone(),
                needed: needed_for_next - in_stock,
                in_stock,
            })
        })
        .collect();

    Producibility {
        producible_count,
        pending_items,
    }
}
