//! Authenticated access to the NodeGo rewards API, one client per account.

mod api;
mod envelope;
mod http;
pub mod pacing;

pub use api::{ClientFactory, RewardsApi};
pub use http::{ClientSettings, DEFAULT_BASE_URL, HttpApiClient, HttpClientFactory};
pub use pacing::MinIntervalGuard;
