// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::audit::AuditResult;
use serde::{Deserialize, Serialize};

/// Audit pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    BrowserAuditing,
    Analyzing,
    Scoring,
    Done,
}

impl Stage {
    /// Human-readable label sent to the client when the stage begins
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Fetching => "Fetching HTML…",
            Stage::BrowserAuditing => "Running quality audit…",
            Stage::Analyzing => "Analyzing on-page SEO…",
            Stage::Scoring => "Calculating score…",
            Stage::Done => "Audit complete.",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Fetching => write!(f, "fetching"),
            Stage::BrowserAuditing => write!(f, "browser_auditing"),
            Stage::Analyzing => write!(f, "analyzing"),
            Stage::Scoring => write!(f, "scoring"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// One message on the progress stream.
///
/// Serialized as `{"progress": ...}`, `{"results": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEvent {
    Progress(String),
    Results(Box<AuditResult>),
    Error(String),
}

impl AuditEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuditEvent::Progress(_))
    }
}

impl From<Stage> for AuditEvent {
    fn from(stage: Stage) -> Self {
        AuditEvent::Progress(stage.label().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_event_shape() {
        let json = serde_json::to_string(&AuditEvent::from(Stage::Fetching)).unwrap();
        assert_eq!(json, r#"{"progress":"Fetching HTML…"}"#);
    }

    #[test]
    fn test_error_event_shape() {
        let json = serde_json::to_string(&AuditEvent::Error("boom".to_string())).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_only_results_and_error_are_terminal() {
        assert!(!AuditEvent::from(Stage::Done).is_terminal());
        assert!(AuditEvent::Error("x".to_string()).is_terminal());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::BrowserAuditing.to_string(), "browser_auditing");
        assert_eq!(Stage::Done.label(), "Audit complete.");
    }
}
