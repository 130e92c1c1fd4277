// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::settings::AuditSettings;
use crate::models::version::VersionResponse;
use crate::routes::audit_handler;
use crate::services::browser_audit::QualityAuditor;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SITE_AUDIT_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SITE_AUDIT_VERSION");

/// Shared application state injected into every route handler via `State<AppState>`.
///
/// Holds only read-only configuration; each audit builds its own HTTP client
/// and browser session.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AuditSettings>,
    pub auditor: Arc<dyn QualityAuditor>,
}

impl AppState {
    pub fn new(settings: AuditSettings, auditor: Arc<dyn QualityAuditor>) -> Self {
        Self {
            settings: Arc::new(settings),
            auditor,
        }
    }
}

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "site-audit".to_string(),
        version: VERSION.to_string(),
    })
}

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/audit", get(audit_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
