use async_trait::async_trait;

use ngp_core::{Account, ActionReply, ApiError, PingReply, Profile};

/// Operations the scheduler needs from the rewards API for a single account.
#[async_trait]
pub trait RewardsApi: Send + Sync {
    /// Fetch a fresh profile snapshot. Never retried.
    async fn fetch_profile(&self) -> Result<Profile, ApiError>;

    /// Daily check-in.
    async fn check_in(&self) -> Result<ActionReply, ApiError>;

    /// Claim one catalogue task by code.
    async fn claim_task(&self, code: &str) -> Result<ActionReply, ApiError>;

    /// Mark the account's nodes active. Implementations must keep successive
    /// pings on the same client at least the configured spacing apart.
    async fn ping(&mut self) -> Result<PingReply, ApiError>;
}

/// Builds a fresh client for an account.
pub trait ClientFactory: Send + Sync {
    type Client: RewardsApi;

    fn connect(&self, account: &Account) -> Result<Self::Client, ApiError>;
}
