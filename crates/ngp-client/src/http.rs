use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use tracing::warn;

use ngp_core::{Account, ActionReply, ApiError, Credential, PingReply, Profile};

use crate::api::{ClientFactory, RewardsApi};
use crate::envelope::{normalize_failure, parse_action, parse_ping, parse_profile};
use crate::pacing::MinIntervalGuard;

pub const DEFAULT_BASE_URL: &str = "https://nodego.ai/api";

const PROFILE_PATH: &str = "/user/me";
const CHECKIN_PATH: &str = "/user/checkin";
const TASK_PATH: &str = "/user/task";
const PING_PATH: &str = "/user/nodes/ping";

/// Transport-level settings shared by every account's client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Whole-request deadline, proxy hop included.
    pub request_timeout: Duration,
    /// Deadline for establishing the connection (to the proxy when routed).
    pub connect_timeout: Duration,
    /// Minimum spacing between two pings on the same client.
    pub ping_spacing: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            ping_spacing: Duration::from_millis(3000),
        }
    }
}

/// reqwest-backed client bound to one account and its optional route.
#[derive(Debug)]
pub struct HttpApiClient {
    base_url: String,
    credential: Credential,
    label: String,
    routed: bool,
    client: reqwest::Client,
    ping_guard: MinIntervalGuard,
}

impl HttpApiClient {
    pub fn new(account: &Account, settings: &ClientSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout);

        // Accounts without a route go direct, ignoring *_PROXY env vars.
        match &account.route {
            Some(route) => {
                let proxy = reqwest::Proxy::all(route.url().as_str()).map_err(|e| {
                    ApiError::Transport(format!("invalid proxy {}: {e}", route.endpoint()))
                })?;
                tracing::debug!(account = %account.label(), route = %route, "using proxy route");
                builder = builder.proxy(proxy);
            }
            None => builder = builder.no_proxy(),
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credential: account.credential.clone(),
            label: account.label(),
            routed: account.route.is_some(),
            client,
            ping_guard: MinIntervalGuard::new(settings.ping_spacing),
        })
    }

    /// Send one authenticated request; non-2xx responses become `Remote` errors.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(u16, String), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(self.credential.expose())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(&e))?;

        if status.is_success() {
            Ok((status.as_u16(), text))
        } else {
            Err(normalize_failure(status.as_u16(), &text))
        }
    }

    /// Only connect-phase failures on a routed client are blamed on the proxy;
    /// a request that times out after connecting is a slow upstream.
    fn transport_error(&self, error: &reqwest::Error) -> ApiError {
        let message = error_chain(error);
        if self.routed && error.is_connect() {
            ApiError::Proxy(message)
        } else {
            ApiError::Transport(message)
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl RewardsApi for HttpApiClient {
    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let result = match self.send(Method::GET, PROFILE_PATH, None).await {
            Ok((_, body)) => parse_profile(&body),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!(account = %self.label, "Failed to fetch user info: {e}");
        }
        result
    }

    async fn check_in(&self) -> Result<ActionReply, ApiError> {
        let (status, body) = self.send(Method::POST, CHECKIN_PATH, None).await?;
        parse_action(status, &body)
    }

    async fn claim_task(&self, code: &str) -> Result<ActionReply, ApiError> {
        let (status, body) = self
            .send(Method::POST, TASK_PATH, Some(json!({ "taskId": code })))
            .await?;
        parse_action(status, &body)
    }

    async fn ping(&mut self) -> Result<PingReply, ApiError> {
        self.ping_guard.wait().await;
        let sent = self
            .send(Method::POST, PING_PATH, Some(json!({ "type": "extension" })))
            .await;
        self.ping_guard.record();

        let result = sent.and_then(|(status, body)| parse_ping(status, &body));
        if let Err(e) = &result {
            warn!(account = %self.label, "Ping failed: {e}");
        }
        result
    }
}

/// Builds an [`HttpApiClient`] per account from shared settings.
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory {
    settings: ClientSettings,
}

impl HttpClientFactory {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = HttpApiClient;

    fn connect(&self, account: &Account) -> Result<HttpApiClient, ApiError> {
        HttpApiClient::new(account, &self.settings)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
