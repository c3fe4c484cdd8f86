// src/domain/logic.rs

use crate::domain::models::TaskProgress;
use serde::Serialize;
use std::fmt;

/// Lifecycle stage of a single task instance, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    Pending,
    Planned,
    WorkInProgress,
    FinalCheck,
    ForBilling,
    Billed,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Pending,
        Stage::Planned,
        Stage::WorkInProgress,
        Stage::FinalCheck,
        Stage::ForBilling,
        Stage::Billed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::domain::badges::stage_badge(*self).label)
    }
}

/// Determines the lifecycle stage of a task instance.
/// The order of checks determines the precedence of the lifecycle: the most
/// advanced satisfied condition wins.
///
/// For example, a record flagged `billed` with only 80% progress is still
/// `Billed`; the flag is trusted over the other fields.
pub fn derive_status(record: Option<&TaskProgress>, is_planned: bool) -> Stage {
    let Some(record) = record else {
        return if is_planned {
            Stage::Planned
        } else {
            Stage::Pending
        };
    };

    if record.billed {
        return Stage::Billed;
    }
    if record.is_approved() {
        return Stage::ForBilling;
    }
    if record.progress >= 100 {
        return Stage::FinalCheck;
    }
    if record.progress > 0 {
        return Stage::WorkInProgress;
    }
    // A progress record only exists for a task keyed in a flat plan.
    Stage::Planned
}

/// Derives the stage of a located record. Presence of the record is what makes
/// the task planned.
pub fn stage_of(record: Option<&TaskProgress>) -> Stage {
    derive_status(record, record.is_some())
}

/// Billing is offered only for approved, not yet billed work.
pub fn is_billing_eligible(stage: Stage) -> bool {
    stage == Stage::ForBilling
}

/// Final check can be approved once work reports 100% and nothing later happened.
pub fn is_final_check_eligible(stage: Stage) -> bool {
    stage == Stage::FinalCheck
}
