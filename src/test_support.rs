// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Shared fixtures for unit tests: an in-process website and a scripted auditor.

use crate::error::AuditError;
use crate::models::audit::CategoryScores;
use crate::services::browser_audit::QualityAuditor;
use async_trait::async_trait;
use axum::Router;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// A page that passes every on-page check
pub const COMPLETE_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Widgets</title>
        <meta name="description" content="Hand-made widgets">
        <link rel="canonical" href="https://example.com/">
    </head>
    <body>
        <h1>Widgets</h1>
        <img src="logo.png" alt="Widget logo">
        <p>seo for widgets</p>
    </body>
</html>"#;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_site(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// Auditor with a fixed outcome
pub enum StubAuditor {
    Scores(CategoryScores),
    Fails(String),
    Hangs,
    /// Hangs while holding the sender; the receiver resolves once the run is dropped
    HangsHolding(Mutex<Option<oneshot::Sender<()>>>),
}

impl StubAuditor {
    pub fn seo(score: f64) -> Self {
        let mut scores = CategoryScores::default();
        scores.set("seo", Some(score));
        StubAuditor::Scores(scores)
    }

    pub fn with_scores(scores: CategoryScores) -> Self {
        StubAuditor::Scores(scores)
    }

    pub fn failing(reason: &str) -> Self {
        StubAuditor::Fails(reason.to_string())
    }

    pub fn hanging() -> Self {
        StubAuditor::Hangs
    }

    /// A hanging auditor plus a receiver that completes when its run is abandoned
    pub fn hanging_observed() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (StubAuditor::HangsHolding(Mutex::new(Some(tx))), rx)
    }
}

#[async_trait]
impl QualityAuditor for StubAuditor {
    async fn run(&self, _url: &str) -> Result<CategoryScores, AuditError> {
        match self {
            StubAuditor::Scores(scores) => Ok(scores.clone()),
            StubAuditor::Fails(reason) => Err(AuditError::BrowserAudit(reason.clone())),
            StubAuditor::Hangs => std::future::pending().await,
            StubAuditor::HangsHolding(slot) => {
                let _held = slot.lock().unwrap().take();
                std::future::pending().await
            }
        }
    }
}
