//! Betslip REST API client.

use std::time::Duration;

use async_trait::async_trait;
use betslip_core::UserAccessState;
use betslip_core::config::ApiConfig;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;
use super::types::{GenerateRequest, ProfileResponse};

/// Generation endpoint collaborator.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Request betslips for `target_odd` and return the raw 2xx body.
    async fn generate(&self, target_odd: f64) -> Result<Value, ApiError>;
}

/// Profile endpoint collaborator.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<UserAccessState, ApiError>;
}

/// Betslip backend client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    generate_url: String,
    profile_url: String,
    authenticated: bool,
}

impl ApiClient {
    /// Create a client, sending `token` as a bearer credential when present.
    pub fn new(config: &ApiConfig, token: Option<&str>) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }

        let mut headers = HeaderMap::new();
        let token = token.filter(|t| !t.is_empty());
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::Config("Invalid token format".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        // reqwest is built with rustls-no-provider; Err means already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            generate_url: config.generate_url(),
            profile_url: config.profile_url(),
            authenticated: token.is_some(),
        })
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    /// Read a JSON body, turning non-2xx statuses into [`ApiError::Status`].
    ///
    /// A failed status is a hard failure whatever the body says; its `error`
    /// field only supplies the message.
    async fn read_json(resp: reqwest::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .as_ref()
                .and_then(|v| v.get("error"))
                .and_then(Value::as_str)
                .map_or_else(
                    || format!("HTTP status {}", status.as_u16()),
                    ToString::to_string,
                );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        parsed.map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GenerationApi for ApiClient {
    async fn generate(&self, target_odd: f64) -> Result<Value, ApiError> {
        debug!(url = %self.generate_url, target_odd, "POST generate");
        let resp = self
            .http
            .post(&self.generate_url)
            .json(&GenerateRequest { target_odd })
            .send()
            .await?;
        Self::read_json(resp).await
    }
}

#[async_trait]
impl ProfileApi for ApiClient {
    async fn fetch_profile(&self) -> Result<UserAccessState, ApiError> {
        if !self.authenticated {
            return Err(ApiError::Config("not logged in".into()));
        }
        debug!(url = %self.profile_url, "GET profile");
        let resp = self.http.get(&self.profile_url).send().await?;
        let body = Self::read_json(resp).await?;
        let profile: ProfileResponse =
            serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;

        match (profile.success, profile.user) {
            (true, Some(user)) => Ok(user.into_state()),
            (true, None) => Err(ApiError::Decode("profile response has no user".into())),
            (false, _) => Err(ApiError::Server(
                profile
                    .error
                    .unwrap_or_else(|| "Could not load profile".to_string()),
            )),
        }
    }
}
