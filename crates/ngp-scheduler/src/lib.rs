//! Scheduling: one-time onboarding, task claiming, and the perpetual ping cycle.

pub mod orchestrator;
pub mod report;
pub mod task_runner;

pub use orchestrator::{CycleReport, OnboardingReport, Orchestrator, RunSummary, Schedule};
pub use report::{Phase, ProgressEvent, RecordingReporter, Reporter};
pub use task_runner::TaskRunner;
