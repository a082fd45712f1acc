//! Shared data model for the NodeGo pinger: accounts, routes, profiles, task outcomes and errors.

pub mod account;
pub mod catalogue;
pub mod error;
pub mod route;
pub mod types;

pub use account::{Account, Credential};
pub use catalogue::TASK_CATALOGUE;
pub use error::ApiError;
pub use route::{ProxyKind, ProxyRoute};
pub use types::{
    ActionReply, NodeStatus, PingReply, Profile, TaskDefinition, TaskOutcome, TaskStatus,
};
