// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::audit::SeoSignals;

/// Points awarded per satisfied on-page check
const POINTS_PER_CHECK: u32 = 20;

/// On-page checklist score, 0..=100 in steps of 20.
///
/// Checks: non-empty title, non-empty meta description, exactly one H1,
/// non-empty canonical link, and every image carrying non-empty alt text
/// (true when the page has no images).
pub fn on_page_score(signals: &SeoSignals) -> u32 {
    let all_images_described = signals
        .image_alt_tags
        .iter()
        .all(|alt| alt.as_deref().is_some_and(|alt| !alt.is_empty()));

    let checks = [
        !signals.title.is_empty(),
        !signals.meta_description.is_empty(),
        signals.h1_count == 1,
        !signals.canonical_link.is_empty(),
        all_images_described,
    ];

    checks.iter().filter(|passed| **passed).count() as u32 * POINTS_PER_CHECK
}

/// Average of the browser SEO score (scaled to 100) and the on-page score.
/// A missing browser score contributes 0 rather than being left out.
pub fn overall_score(browser_seo_score: Option<f64>, signals: &SeoSignals) -> u8 {
    let browser = browser_seo_score.unwrap_or(0.0).clamp(0.0, 1.0) * 100.0;
    let on_page = f64::from(on_page_score(signals));

    ((browser + on_page) / 2.0).round().clamp(0.0, 100.0) as u8
}
