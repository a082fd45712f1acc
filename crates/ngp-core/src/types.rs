use serde::Serialize;
use std::collections::HashSet;

use crate::error::ApiError;

/// Projection of the `/user/me` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub total_points: f64,
    /// Codes of tasks the API already considers claimed.
    pub completed_task_codes: HashSet<String>,
    pub nodes: Vec<NodeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStatus {
    pub id: String,
    pub total_points: f64,
    pub today_points: f64,
    pub is_active: bool,
}

/// Reply to check-in and task claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    pub result_code: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReply {
    pub result_code: u16,
    pub message: String,
    pub remote_id: Option<String>,
}

/// One claimable reward in the fixed catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    pub code: &'static str,
    pub display_name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded result of one task during an onboarding pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub code: String,
    pub display_name: String,
    pub status: TaskStatus,
    pub result_code: u16,
    pub message: String,
}

pub const ALREADY_COMPLETED_MESSAGE: &str = "already completed";

impl TaskOutcome {
    pub fn skipped(task: &TaskDefinition) -> Self {
        Self {
            code: task.code.to_string(),
            display_name: task.display_name.to_string(),
            status: TaskStatus::Skipped,
            result_code: 200,
            message: ALREADY_COMPLETED_MESSAGE.to_string(),
        }
    }

    pub fn succeeded(task: &TaskDefinition, reply: ActionReply) -> Self {
        Self {
            code: task.code.to_string(),
            display_name: task.display_name.to_string(),
            status: TaskStatus::Succeeded,
            result_code: reply.result_code,
            message: reply.message,
        }
    }

    pub fn failed(task: &TaskDefinition, error: &ApiError) -> Self {
        Self {
            code: task.code.to_string(),
            display_name: task.display_name.to_string(),
            status: TaskStatus::Failed,
            result_code: error.result_code(),
            message: error.message(),
        }
    }
}
