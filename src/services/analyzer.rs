// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! On-page SEO analysis of a fetched document.

use crate::models::audit::SeoSignals;
use crate::services::fetcher::PageFetcher;
use crate::services::link_checker::count_broken_links;
use crate::services::readability::main_content;
use crate::services::text_metrics::{flesch_reading_ease, format_score, keyword_density};
use scraper::{ElementRef, Html, Selector};

/// Everything read from the DOM in a single synchronous pass.
///
/// `Html` is not `Send`, so parsing is finished before any probe is awaited.
#[derive(Debug, Default, PartialEq)]
pub struct PageStructure {
    pub title: String,
    pub meta_description: String,
    pub h1_count: usize,
    pub h2_count: usize,
    pub image_alt_tags: Vec<Option<String>>,
    pub canonical_link: String,
    pub structured_data_present: bool,
    /// Raw `href` values of every anchor, in document order
    pub links: Vec<String>,
    pub body_text: String,
    /// `None` when the page has no readable main content
    pub main_content: Option<String>,
}

/// Derives [`SeoSignals`] from a page. Never fails as a whole: failed
/// sub-checks fall back to their default value.
pub struct OnPageAnalyzer {
    fetcher: PageFetcher,
    target_keyword: String,
}

impl OnPageAnalyzer {
    pub fn new(fetcher: PageFetcher, target_keyword: impl Into<String>) -> Self {
        Self {
            fetcher,
            target_keyword: target_keyword.into(),
        }
    }

    pub async fn analyze(&self, html: &str, base_url: &str) -> SeoSignals {
        let page = parse_page(html);

        let (robots_txt_present, sitemap_present) = self.probe_site_files(base_url).await;
        let broken_link_count = count_broken_links(&self.fetcher, &page.links, base_url).await;

        let readability_score = page
            .main_content
            .as_deref()
            .and_then(flesch_reading_ease)
            .map(format_score)
            .unwrap_or_default();

        SeoSignals {
            keyword_density: keyword_density(&page.body_text, &self.target_keyword),
            title: page.title,
            meta_description: page.meta_description,
            h1_count: page.h1_count,
            h2_count: page.h2_count,
            image_alt_tags: page.image_alt_tags,
            canonical_link: page.canonical_link,
            robots_txt_present,
            sitemap_present,
            structured_data_present: page.structured_data_present,
            broken_link_count,
            readability_score,
        }
    }

    /// Check `/robots.txt` and `/sitemap.xml` on the page's origin concurrently
    async fn probe_site_files(&self, base_url: &str) -> (bool, bool) {
        let Ok(base) = url::Url::parse(base_url) else {
            tracing::debug!("base URL is not absolute, skipping robots/sitemap probes");
            return (false, false);
        };

        let robots_url = base.join("/robots.txt").map(|u| u.to_string());
        let sitemap_url = base.join("/sitemap.xml").map(|u| u.to_string());

        let probe = |target: Result<String, url::ParseError>| async move {
            match target {
                Ok(target) => self.fetcher.probe(&target).await,
                Err(_) => false,
            }
        };

        tokio::join!(probe(robots_url), probe(sitemap_url))
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn first_attr(document: &Html, css: &str, attr: &str) -> String {
    document
        .select(&selector(css))
        .next()
        .and_then(|el| el.value().attr(attr))
        .unwrap_or_default()
        .to_string()
}

/// Read the structural SEO signals out of raw HTML
pub fn parse_page(html: &str) -> PageStructure {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title"))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let image_alt_tags = document
        .select(&selector("img"))
        .map(|img| img.value().attr("alt").map(str::to_string))
        .collect();

    let links = document
        .select(&selector("a[href]"))
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    PageStructure {
        title,
        meta_description: first_attr(&document, r#"meta[name="description"]"#, "content"),
        h1_count: document.select(&selector("h1")).count(),
        h2_count: document.select(&selector("h2")).count(),
        image_alt_tags,
        canonical_link: first_attr(&document, r#"link[rel="canonical"]"#, "href"),
        structured_data_present: has_structured_data(&document),
        links,
        body_text: visible_body_text(&document),
        main_content: main_content(&document),
    }
}

/// A non-empty JSON-LD block or any microdata `itemscope` counts
fn has_structured_data(document: &Html) -> bool {
    let json_ld = document
        .select(&selector(r#"script[type="application/ld+json"]"#))
        .any(|script| !script.text().collect::<String>().trim().is_empty());

    json_ld || document.select(&selector("[itemscope]")).next().is_some()
}

/// Text of `<body>`, without script, style and template contents
fn visible_body_text(document: &Html) -> String {
    let Some(body) = document.select(&selector("body")).next() else {
        return String::new();
    };

    let mut text = String::new();
    for node in body.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| matches!(el.value().name(), "script" | "style" | "noscript" | "template"));
        if hidden {
            continue;
        }

        text.push(' ');
        text.push_str(fragment);
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
