// src/domain/badges.rs

use crate::domain::aggregate::OverallStage;
use crate::domain::logic::Stage;

/// Display label and CSS class for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub class: &'static str,
}

const fn badge(label: &'static str, class: &'static str) -> Badge {
    Badge { label, class }
}

pub fn stage_badge(stage: Stage) -> Badge {
    match stage {
        Stage::Pending => badge("Pending", "badge badge-gray"),
        Stage::Planned => badge("Planned", "badge badge-blue"),
        Stage::WorkInProgress => badge("Work in progress", "badge badge-amber"),
        Stage::FinalCheck => badge("Final check", "badge badge-purple"),
        Stage::ForBilling => badge("For billing", "badge badge-teal"),
        Stage::Billed => badge("Billed", "badge badge-green"),
    }
}

pub fn overall_badge(stage: OverallStage) -> Badge {
    match stage {
        OverallStage::Pending => badge("Pending", "badge badge-gray"),
        OverallStage::Planned => badge("Planned", "badge badge-blue"),
        OverallStage::InProgress => badge("In progress", "badge badge-amber"),
        OverallStage::Completed => badge("Completed", "badge badge-green"),
    }
}
