// src/domain/aggregate.rs

use crate::domain::logic::Stage;
use serde::Serialize;

/// The per-task inputs every roll-up is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStatus {
    pub stage: Stage,
    /// 0 for unplanned tasks.
    pub progress: u8,
}

impl TaskStatus {
    pub fn new(stage: Stage, progress: u8) -> Self {
        Self { stage, progress }
    }
}

/// The coarse four-value view used on flat, tile and building summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OverallStage {
    Pending,
    Planned,
    InProgress,
    Completed,
}

fn progress_sum(tasks: &[TaskStatus]) -> u64 {
    tasks.iter().map(|t| u64::from(t.progress)).sum()
}

/// Average progress over every registered task, rounded half up. No tasks → 0.
pub fn aggregate_flat_progress(tasks: &[TaskStatus]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let count = tasks.len() as u64;
    let sum = progress_sum(tasks);
    // round(sum / count) with halves going up, in integers
    let rounded = (2 * sum + count) / (2 * count);
    rounded.min(100) as u8
}

/// Collapses per-task stages into the four-value view.
///
/// Uses the same inputs as [`aggregate_flat_progress`] so the percentage and
/// the stage shown next to it can never disagree.
pub fn aggregate_overall_stage(tasks: &[TaskStatus]) -> OverallStage {
    if !tasks.is_empty() && aggregate_flat_progress(tasks) == 100 {
        return OverallStage::Completed;
    }
    if progress_sum(tasks) > 0 {
        return OverallStage::InProgress;
    }
    if tasks.iter().any(|t| t.stage == Stage::Planned) {
        return OverallStage::Planned;
    }
    OverallStage::Pending
}

/// Number of tasks in each of the six stages, indexed by [`Stage::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts([usize; 6]);

impl StageCounts {
    pub fn from_tasks(tasks: &[TaskStatus]) -> Self {
        let mut counts = [0usize; 6];
        for t in tasks {
            counts[t.stage.index()] += 1;
        }
        Self(counts)
    }

    pub fn get(&self, stage: Stage) -> usize {
        self.0[stage.index()]
    }

    /// Non-zero counts in lifecycle order.
    pub fn non_zero(&self) -> impl Iterator<Item = (Stage, usize)> + '_ {
        Stage::ALL
            .iter()
            .map(|s| (*s, self.get(*s)))
            .filter(|(_, n)| *n > 0)
    }
}

/// Roll-up shared by flat, tile and building views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub progress: u8,
    pub stage: OverallStage,
    pub counts: StageCounts,
    pub task_count: usize,
}

pub fn summarize(tasks: &[TaskStatus]) -> Summary {
    Summary {
        progress: aggregate_flat_progress(tasks),
        stage: aggregate_overall_stage(tasks),
        counts: StageCounts::from_tasks(tasks),
        task_count: tasks.len(),
    }
}
