// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction of sensitive data in log fields.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("site_audit=info,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Redact a URL for logging.
/// Drops credentials, query string and fragment: "https://u:p@host/a?t=1" -> "https://host/a"
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            // Setting these only fails for cannot-be-a-base URLs, which carry no credentials
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        // Unparseable, keep only what precedes a query
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}
