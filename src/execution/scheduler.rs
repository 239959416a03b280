//! Step scheduling - which steps a mode runs, and in what order

use crate::core::{PipelineStep, ReleaseMode};

/// Fixed, ordered list of steps for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    steps: Vec<PipelineStep>,
}

impl ExecutionPlan {
    /// Plan the steps for a mode
    pub fn for_mode(mode: ReleaseMode) -> Self {
        let steps = match mode {
            ReleaseMode::BuildOnly => vec![PipelineStep::CreatePackage],
            ReleaseMode::BuildAndPublish => vec![
                PipelineStep::VerifyClean,
                PipelineStep::SyncTrunk,
                PipelineStep::CreatePackage,
                PipelineStep::PublishToRegistry,
                PipelineStep::TagRelease,
            ],
        };
        Self { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
