//! HTTP eligibility checker.
//!
//! Calls `GET {base_url}/users/{cpf}` on the eligibility service:
//!
//! - `200` with `{"status": "ABLE_TO_VOTE"}` → eligible
//! - `200` with `{"status": "UNABLE_TO_VOTE"}` or `404` → ineligible
//! - anything else, including network errors → transient failure
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpEligibilityConfig::new("https://eligibility.internal")
//!     .with_api_key("secret")
//!     .with_timeout(Duration::from_millis(1500));
//!
//! let checker = HttpEligibilityChecker::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::Cpf;
use crate::ports::{Eligibility, EligibilityChecker};

/// Configuration for the HTTP eligibility checker.
#[derive(Debug, Clone)]
pub struct HttpEligibilityConfig {
    /// Base URL of the service, without trailing slash.
    pub base_url: String,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpEligibilityConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(2),
        }
    }

    /// Sets the API key sent as a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn user_url(&self, cpf: &Cpf) -> String {
        format!("{}/users/{}", self.base_url, cpf.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct EligibilityResponse {
    status: String,
}

/// Interprets a successful response body.
fn eligibility_from_status(status: &str) -> Eligibility {
    match status {
        "ABLE_TO_VOTE" => Eligibility::Eligible,
        "UNABLE_TO_VOTE" => Eligibility::Ineligible,
        other => Eligibility::TransientFailure(format!("Unexpected status: {}", other)),
    }
}

/// Eligibility checker backed by the external HTTP service.
pub struct HttpEligibilityChecker {
    config: HttpEligibilityConfig,
    client: Client,
}

impl HttpEligibilityChecker {
    /// Creates a checker with its own HTTP client.
    pub fn new(config: HttpEligibilityConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl EligibilityChecker for HttpEligibilityChecker {
    async fn check(&self, cpf: &Cpf) -> Eligibility {
        let mut request = self.client.get(self.config.user_url(cpf));
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Eligibility::TransientFailure("Eligibility service timed out".to_string())
            }
            // The URL carries the cpf in clear.
            Err(e) => {
                return Eligibility::TransientFailure(format!("Request failed: {}", e.without_url()))
            }
        };

        match response.status() {
            StatusCode::OK => match response.json::<EligibilityResponse>().await {
                Ok(body) => eligibility_from_status(&body.status),
                Err(e) => Eligibility::TransientFailure(format!("Malformed response: {}", e.without_url())),
            },
            StatusCode::NOT_FOUND => Eligibility::Ineligible,
            status => Eligibility::TransientFailure(format!("Unexpected status {}", status)),
        }
    }
}
