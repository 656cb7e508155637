// SPDX-License-Identifier: MIT
//! URL reachability inspector.
//!
//! Performs exactly one GET per inspection — retry and backoff are the
//! caller's business, as is any timeout (configure it on the injected
//! `reqwest::Client`).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;

use crate::outcome::Outcome;
use crate::pipeline::Inspector;
use crate::sink::DiagnosticsSink;

#[derive(Debug, thiserror::Error)]
pub enum UrlInspectError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Checks that the subject, taken as a URL, answers a GET with `200 OK`.
///
/// A non-200 status or a transport failure is a finding about the subject
/// (an issue), not an inspector failure: the fetch was attempted and the
/// URL did not hold up.
pub struct UrlReachability {
    client: reqwest::Client,
}

impl UrlReachability {
    pub fn new() -> Result<Self, UrlInspectError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Use a preconfigured client (proxies, timeouts, TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Inspector<String> for UrlReachability {
    fn name(&self) -> &str {
        "url-reachability"
    }

    async fn inspect(
        &self,
        outcome: Outcome<String>,
        _sink: Option<&dyn DiagnosticsSink<String>>,
    ) -> Result<Outcome<String>> {
        let url = outcome.subject().clone();
        if url.is_empty() {
            return Ok(outcome);
        }
        match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => Ok(outcome),
            Ok(response) => Ok(outcome.issue(format!(
                "{url} did not return valid status: {}",
                response.status().canonical_reason().unwrap_or_default()
            ))),
            Err(err) => Ok(outcome.issue(format!(
                "Exception while trying to fetch {url}: {err}"
            ))),
        }
    }
}
