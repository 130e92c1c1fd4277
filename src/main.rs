// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::Parser;
use site_audit::app::{create_router, AppState, VERSION};
use site_audit::models::settings::AuditSettings;
use site_audit::services::browser_audit::LighthouseAuditor;
use site_audit::services::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "site-audit", version = VERSION, about = "Single-page SEO and quality audit server")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "AUDIT_BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = AuditSettings::from_env()?;
    tracing::info!(
        lighthouse = %settings.lighthouse_path,
        browser_audit_timeout_secs = settings.browser_audit_timeout.as_secs(),
        "audit settings loaded"
    );

    let auditor = Arc::new(LighthouseAuditor::new(&settings));
    let app = create_router(AppState::new(settings, auditor));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;

    tracing::info!("site-audit v{} listening on {}", VERSION, cli.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
