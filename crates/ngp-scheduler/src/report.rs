//! Progress reporting boundary.
//!
//! The scheduler emits [`ProgressEvent`]s and never formats text itself, so
//! console rendering (and any translation of it) lives with the caller.

use std::sync::Mutex;
use std::time::Duration;

use ngp_core::{ActionReply, ApiError, NodeStatus, PingReply, TaskOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Onboarding,
    Ping,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Onboarding => f.write_str("onboarding"),
            Self::Ping => f.write_str("ping"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    OnboardingPhaseStarted {
        accounts: usize,
    },
    OnboardingStarted {
        account: String,
        username: String,
        email: String,
    },
    CheckIn {
        account: String,
        result: Result<ActionReply, ApiError>,
    },
    TasksStarted {
        account: String,
    },
    TaskSettled {
        account: String,
        outcome: TaskOutcome,
    },
    OnboardingFinished {
        account: String,
    },
    PingPhaseStarted,
    CycleStarted {
        cycle: u64,
    },
    PingStarted {
        account: String,
        username: String,
    },
    Pinged {
        account: String,
        reply: PingReply,
    },
    NodeStatus {
        account: String,
        nodes: Vec<NodeStatus>,
    },
    AccountFailed {
        account: String,
        phase: Phase,
        error: ApiError,
    },
    Waiting {
        delay: Duration,
    },
    ShutdownRequested,
}

pub trait Reporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Keeps every event in memory; used by tests and embedders that render later.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
