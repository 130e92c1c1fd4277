// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::fetcher::PageFetcher;
use crate::services::logging::redact_url;

/// Probe every link and count the broken ones.
///
/// Links are checked one after another, in the order given. In-page fragment
/// links (`#...`) are skipped. Repeated links are probed and counted once per
/// occurrence. A link that cannot be resolved against `base_url` counts as
/// broken.
pub async fn count_broken_links(fetcher: &PageFetcher, links: &[String], base_url: &str) -> usize {
    let base = url::Url::parse(base_url).ok();
    let mut broken = 0;

    for href in links.iter().map(|l| l.trim()) {
        if href.starts_with('#') {
            continue;
        }

        let reachable = match resolve_link(base.as_ref(), href) {
            Some(absolute) => fetcher.probe(&absolute).await,
            None => {
                tracing::debug!(href = %redact_url(href), "link could not be resolved");
                false
            }
        };

        if !reachable {
            broken += 1;
        }
    }

    broken
}

/// Resolve an href against the page URL
fn resolve_link(base: Option<&url::Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => url::Url::parse(href).ok().map(|u| u.to_string()),
    }
}
