// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::AuditError;
use crate::models::settings::AuditSettings;
use crate::services::logging::redact_url;
use std::time::Duration;

/// HTTP client for the page fetch and the reachability probes.
///
/// Built per audit so no connection state is shared between requests.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    fetch_timeout: Duration,
    probe_timeout: Duration,
}

impl PageFetcher {
    pub fn new(settings: &AuditSettings) -> Result<Self, AuditError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| AuditError::Fetch(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            fetch_timeout: settings.fetch_timeout,
            probe_timeout: settings.probe_timeout,
        })
    }

    /// GET the page and return its body.
    /// Network errors, timeouts and non-success statuses are all failures.
    pub async fn fetch(&self, url: &str) -> Result<String, AuditError> {
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| AuditError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Fetch(format!("{url} returned HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| AuditError::Fetch(format!("Failed to read body: {e}")))
    }

    /// GET `url` and report whether it answered with a success status.
    /// Any failure is absorbed and reported as `false`.
    pub async fn probe(&self, url: &str) -> bool {
        match self
            .client
            .get(url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(url = %redact_url(url), status = %response.status(), "probe returned non-success status");
                false
            }
            Err(e) => {
                tracing::debug!(url = %redact_url(url), error = %e, "probe failed");
                false
            }
        }
    }
}
