// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::progress::Stage;
use thiserror::Error;

/// Failures that abort an audit.
///
/// Sub-check failures (robots/sitemap/link probes) never surface here; they
/// degrade a single signal to its default instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to fetch page: {0}")]
    Fetch(String),

    #[error("Quality audit failed: {0}")]
    BrowserAudit(String),

    #[error("Stage '{stage}' timed out after {after_secs}s")]
    TimedOut { stage: Stage, after_secs: u64 },

    #[error("Audit cancelled")]
    Cancelled,
}

impl AuditError {
    /// Whether a stage failed on its own, as opposed to the client going away
    pub fn is_stage_failure(&self) -> bool {
        matches!(
            self,
            AuditError::Fetch(_) | AuditError::BrowserAudit(_) | AuditError::TimedOut { .. }
        )
    }
}
