//! Orchestrator - sequences the steps of a release run

use crate::{
    core::{
        ExecutionStatus, PipelineOutcome, PipelineStep, ReleaseConfig, ReleaseMode, StepRecord,
        StepStatus,
    },
    execution::{ExecutionPlan, StepExecutor},
    process::ProcessRunner,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Events that can occur during a release run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        mode: ReleaseMode,
        total_steps: usize,
    },
    StepStarted {
        step: PipelineStep,
        /// 1-based position in the plan
        position: usize,
        total_steps: usize,
    },
    StepCompleted {
        step: PipelineStep,
        elapsed: std::time::Duration,
    },
    StepFailed {
        step: PipelineStep,
        error: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Runs the planned steps of a release in order, stopping at the first failure
pub struct Orchestrator<R> {
    executor: StepExecutor<R>,
    event_handlers: Vec<EventHandler>,
}

impl<R: ProcessRunner> Orchestrator<R> {
    pub fn new(runner: R) -> Self {
        Self {
            executor: StepExecutor::new(runner),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    pub fn runner(&self) -> &R {
        self.executor.runner()
    }

    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Run every step the configuration's mode calls for
    ///
    /// The configuration was validated when it was built, so publish-mode
    /// preconditions already hold here.
    pub async fn run(&self, config: &ReleaseConfig) -> PipelineOutcome {
        let execution_id = Uuid::new_v4();
        let plan = ExecutionPlan::for_mode(config.mode());

        info!(
            "Starting release run {} ({}, version {}, {} steps)",
            execution_id,
            config.mode(),
            config.version(),
            plan.len()
        );
        self.emit_event(ExecutionEvent::PipelineStarted {
            execution_id,
            mode: config.mode(),
            total_steps: plan.len(),
        });

        let mut records = Vec::with_capacity(plan.len());

        for (index, &step) in plan.steps().iter().enumerate() {
            self.emit_event(ExecutionEvent::StepStarted {
                step,
                position: index + 1,
                total_steps: plan.len(),
            });

            let started_at = Utc::now();
            let result = self.executor.execute(step, config).await;
            let finished_at = Utc::now();

            match result {
                Ok(()) => {
                    let record = StepRecord {
                        step,
                        status: StepStatus::Completed,
                        started_at,
                        finished_at,
                    };
                    self.emit_event(ExecutionEvent::StepCompleted {
                        step,
                        elapsed: record.duration(),
                    });
                    records.push(record);
                }
                Err(err) => {
                    error!("Step {} failed: {}", step, err);
                    records.push(StepRecord {
                        step,
                        status: StepStatus::Failed,
                        started_at,
                        finished_at,
                    });
                    self.emit_event(ExecutionEvent::StepFailed {
                        step,
                        error: err.to_string(),
                    });
                    self.emit_event(ExecutionEvent::PipelineCompleted {
                        execution_id,
                        status: ExecutionStatus::Failed,
                    });
                    return PipelineOutcome::Failed {
                        records,
                        step,
                        error: err,
                    };
                }
            }
        }

        info!("Release run {} completed", execution_id);
        self.emit_event(ExecutionEvent::PipelineCompleted {
            execution_id,
            status: ExecutionStatus::Completed,
        });

        PipelineOutcome::Succeeded { records }
    }
}
