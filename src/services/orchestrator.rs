// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::AuditError;
use crate::models::audit::AuditResult;
use crate::models::progress::Stage;
use crate::models::settings::AuditSettings;
use crate::services::analyzer::OnPageAnalyzer;
use crate::services::browser_audit::QualityAuditor;
use crate::services::fetcher::PageFetcher;
use crate::services::logging::redact_url;
use crate::services::progress::ProgressSender;
use crate::services::scoring::overall_score;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Runs one audit: fetch, browser audit, on-page analysis, scoring.
///
/// Built fresh for every request; nothing is shared with other audits.
/// Stages run strictly in order and a progress event is sent before each
/// one starts. A failed fetch or browser audit ends the run.
pub struct AuditOrchestrator {
    fetcher: PageFetcher,
    auditor: Arc<dyn QualityAuditor>,
    analyzer: OnPageAnalyzer,
    browser_audit_timeout: Duration,
}

impl AuditOrchestrator {
    pub fn new(
        settings: &AuditSettings,
        auditor: Arc<dyn QualityAuditor>,
    ) -> Result<Self, AuditError> {
        let fetcher = PageFetcher::new(settings)?;
        let analyzer = OnPageAnalyzer::new(fetcher.clone(), settings.target_keyword.clone());

        Ok(Self {
            fetcher,
            auditor,
            analyzer,
            browser_audit_timeout: settings.browser_audit_timeout,
        })
    }

    /// Audit `url`, reporting progress and exactly one terminal event on `progress`.
    pub async fn run(self, url: String, progress: ProgressSender, cancel: CancellationToken) {
        let audit_id = Uuid::now_v7();
        let span = tracing::info_span!("audit", %audit_id, url = %redact_url(&url));

        async move {
            let outcome = self.execute(audit_id, &url, &progress, &cancel).await;

            match &outcome {
                Ok(result) => tracing::info!(score = result.score, "audit finished"),
                Err(e) if e.is_stage_failure() => tracing::warn!(error = %e, "audit failed"),
                Err(e) => tracing::info!(error = %e, "audit stopped"),
            }

            progress.finish(outcome).await;
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        audit_id: Uuid,
        url: &str,
        progress: &ProgressSender,
        cancel: &CancellationToken,
    ) -> Result<AuditResult, AuditError> {
        enter(Stage::Fetching, progress, cancel).await?;
        let html = until_cancelled(cancel, self.fetcher.fetch(url)).await??;

        enter(Stage::BrowserAuditing, progress, cancel).await?;
        let categories = until_cancelled(
            cancel,
            tokio::time::timeout(self.browser_audit_timeout, self.auditor.run(url)),
        )
        .await?
        .map_err(|_| AuditError::TimedOut {
            stage: Stage::BrowserAuditing,
            after_secs: self.browser_audit_timeout.as_secs(),
        })??;

        enter(Stage::Analyzing, progress, cancel).await?;
        let seo = until_cancelled(cancel, self.analyzer.analyze(&html, url)).await?;

        enter(Stage::Scoring, progress, cancel).await?;
        let score = overall_score(categories.seo, &seo);

        enter(Stage::Done, progress, cancel).await?;
        Ok(AuditResult {
            audit_id,
            url: url.to_string(),
            categories,
            seo,
            score,
            audited_at: Utc::now(),
        })
    }
}

/// Announce a stage; a vanished reader counts as cancellation.
async fn enter(
    stage: Stage,
    progress: &ProgressSender,
    cancel: &CancellationToken,
) -> Result<(), AuditError> {
    if cancel.is_cancelled() || !progress.stage(stage).await {
        return Err(AuditError::Cancelled);
    }

    tracing::info!(%stage, "stage started");
    Ok(())
}

/// Drive `work` unless the token fires first; dropping `work` aborts it.
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    work: F,
) -> Result<F::Output, AuditError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(AuditError::Cancelled),
        output = work => Ok(output),
    }
}
