// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of `GET /audit`
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub site: Option<String>,
}

impl AuditQuery {
    /// The requested site, if present and non-empty
    pub fn site(&self) -> Option<&str> {
        self.site
            .as_deref()
            .map(str::trim)
            .filter(|site| !site.is_empty())
    }
}

/// Error body returned before any streaming begins
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Browser audit category scores in `[0, 1]`.
///
/// `None` means the audit tool returned no data for the category, which is
/// not the same as a zero score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub performance: Option<f64>,
    pub seo: Option<f64>,
    pub accessibility: Option<f64>,
    #[serde(rename = "best-practices")]
    pub best_practices: Option<f64>,
}

impl CategoryScores {
    /// Category identifiers as understood by the audit tool
    pub const CATEGORIES: [&'static str; 4] =
        ["performance", "seo", "accessibility", "best-practices"];

    /// Record the score for a named category; unknown names are ignored.
    pub fn set(&mut self, category: &str, score: Option<f64>) {
        let slot = match category {
            "performance" => &mut self.performance,
            "seo" => &mut self.seo,
            "accessibility" => &mut self.accessibility,
            "best-practices" => &mut self.best_practices,
            _ => return,
        };
        *slot = score.map(|s| s.clamp(0.0, 1.0));
    }
}

/// On-page SEO signals derived from the fetched HTML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSignals {
    pub title: String,
    /// Empty if the page has no meta description
    pub meta_description: String,
    pub h1_count: usize,
    pub h2_count: usize,
    /// One entry per `<img>`, in document order; `None` when `alt` is absent
    pub image_alt_tags: Vec<Option<String>>,
    /// Empty if the page has no canonical link
    pub canonical_link: String,
    pub robots_txt_present: bool,
    pub sitemap_present: bool,
    pub structured_data_present: bool,
    pub broken_link_count: usize,
    /// Percentage with two fractional digits, e.g. `"1.25"`
    pub keyword_density: String,
    /// Flesch reading ease with two fractional digits; empty when the page
    /// has no readable main content
    pub readability_score: String,
}

/// Outcome of one successful audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub audit_id: Uuid,
    pub url: String,
    pub categories: CategoryScores,
    pub seo: SeoSignals,
    /// Combined score, 0..=100
    pub score: u8,
    pub audited_at: DateTime<Utc>,
}
