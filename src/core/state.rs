//! Execution state models

use crate::core::{error::ReleaseError, step::PipelineStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Run has not started
    Pending,
    /// Run is in progress
    Running,
    /// Every scheduled step completed
    Completed,
    /// A step failed and the run stopped
    Failed,
}

/// Final state of one executed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Completed,
    Failed,
}

/// Record of a step that was started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: PipelineStep,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl StepRecord {
    pub fn duration(&self) -> std::time::Duration {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// Terminal state of a release run
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Every scheduled step completed
    Succeeded { records: Vec<StepRecord> },
    /// `step` failed with `error`; later steps never ran
    Failed {
        records: Vec<StepRecord>,
        step: PipelineStep,
        error: ReleaseError,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Succeeded { .. })
    }

    pub fn status(&self) -> ExecutionStatus {
        match self {
            PipelineOutcome::Succeeded { .. } => ExecutionStatus::Completed,
            PipelineOutcome::Failed { .. } => ExecutionStatus::Failed,
        }
    }

    /// Records of every step that started, in execution order
    pub fn records(&self) -> &[StepRecord] {
        match self {
            PipelineOutcome::Succeeded { records } | PipelineOutcome::Failed { records, .. } => {
                records
            }
        }
    }

    /// Steps that ran, in execution order
    pub fn executed_steps(&self) -> Vec<PipelineStep> {
        self.records().iter().map(|r| r.step).collect()
    }

    /// The error that stopped the run, if any
    pub fn error(&self) -> Option<&ReleaseError> {
        match self {
            PipelineOutcome::Succeeded { .. } => None,
            PipelineOutcome::Failed { error, .. } => Some(error),
        }
    }

    /// Convert into a `Result`, dropping the step records
    pub fn into_result(self) -> Result<(), ReleaseError> {
        match self {
            PipelineOutcome::Succeeded { .. } => Ok(()),
            PipelineOutcome::Failed { error, .. } => Err(error),
        }
    }
}
