//! Release execution engine

pub mod engine;
pub mod executor;
pub mod scheduler;

pub use engine::{EventHandler, ExecutionEvent, Orchestrator};
pub use executor::StepExecutor;
pub use scheduler::ExecutionPlan;
