// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Runtime configuration for audits.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    /// User agent sent on every outbound request
    pub user_agent: String,
    pub fetch_timeout: Duration,
    /// Deadline for each robots/sitemap/link probe
    pub probe_timeout: Duration,
    pub browser_audit_timeout: Duration,
    /// Browser audit tool executable
    pub lighthouse_path: String,
    pub chrome_flags: String,
    /// Keyword counted for keyword density
    pub target_keyword: String,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            user_agent: "SiteAuditBot/0.1".to_string(),
            fetch_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            browser_audit_timeout: Duration::from_secs(180),
            lighthouse_path: "lighthouse".to_string(),
            chrome_flags: "--headless=new --no-sandbox --disable-gpu".to_string(),
            target_keyword: "seo".to_string(),
        }
    }
}

impl AuditSettings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
            fetch_timeout: secs_from_env("FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            probe_timeout: secs_from_env("PROBE_TIMEOUT_SECS", defaults.probe_timeout)?,
            browser_audit_timeout: secs_from_env(
                "BROWSER_AUDIT_TIMEOUT_SECS",
                defaults.browser_audit_timeout,
            )?,
            lighthouse_path: env::var("LIGHTHOUSE_PATH").unwrap_or(defaults.lighthouse_path),
            chrome_flags: env::var("CHROME_FLAGS").unwrap_or(defaults.chrome_flags),
            target_keyword: env::var("TARGET_KEYWORD").unwrap_or(defaults.target_keyword),
        })
    }
}

fn secs_from_env(key: &str, default: Duration) -> Result<Duration> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a whole number of seconds")),
        Err(_) => Ok(default),
    }
}
