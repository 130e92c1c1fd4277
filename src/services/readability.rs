// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Reader-mode style main content extraction.
//!
//! A page is "readable" when it has enough article-like text: summing
//! `sqrt(len - 140)` over visible `p`, `pre` and `article` nodes with at
//! least 140 characters must exceed 20. Nodes whose class or id look like
//! page chrome (menus, footers, comments) are ignored.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const MIN_NODE_CONTENT_LENGTH: usize = 140;
const MIN_READABLE_SCORE: f64 = 20.0;

fn unlikely_candidates() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
        )
        .expect("valid regex")
    })
}

fn maybe_candidate() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)and|article|body|column|content|main|mathjax|shadow").expect("valid regex")
    })
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Main content text, or `None` if the document is not readable.
pub fn main_content(document: &Html) -> Option<String> {
    if !is_probably_readable(document) {
        return None;
    }

    let paragraphs: Vec<String> = document
        .select(&selector("p, pre"))
        .filter(|node| is_candidate(node))
        .map(node_text)
        .filter(|text| !text.is_empty())
        .collect();

    if !paragraphs.is_empty() {
        return Some(paragraphs.join("\n"));
    }

    let articles: Vec<String> = document
        .select(&selector("article"))
        .filter(|node| is_candidate(node))
        .map(node_text)
        .collect();

    Some(articles.join("\n"))
}

/// Whether the document has enough article-like text to score
pub fn is_probably_readable(document: &Html) -> bool {
    let mut score = 0.0;

    for node in document.select(&selector("p, pre, article")) {
        if !is_candidate(&node) {
            continue;
        }

        let length = node_text(node).chars().count();
        if length < MIN_NODE_CONTENT_LENGTH {
            continue;
        }

        score += ((length - MIN_NODE_CONTENT_LENGTH) as f64).sqrt();
        if score > MIN_READABLE_SCORE {
            return true;
        }
    }

    false
}

fn is_candidate(node: &ElementRef) -> bool {
    if !is_visible(node) || is_inside_list_item(node) {
        return false;
    }

    let element = node.value();
    let match_string = format!(
        "{} {}",
        element.attr("class").unwrap_or_default(),
        element.attr("id").unwrap_or_default()
    );

    !(unlikely_candidates().is_match(&match_string) && !maybe_candidate().is_match(&match_string))
}

fn is_visible(node: &ElementRef) -> bool {
    let element = node.value();
    let hidden_style = element
        .attr("style")
        .map(|style| style.replace(' ', "").to_lowercase().contains("display:none"))
        .unwrap_or(false);

    !hidden_style && element.attr("hidden").is_none() && element.attr("aria-hidden") != Some("true")
}

/// Paragraphs inside list items are navigation more often than prose
fn is_inside_list_item(node: &ElementRef) -> bool {
    node.value().name() == "p"
        && node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| ancestor.value().name() == "li")
}

fn node_text(node: ElementRef) -> String {
    node.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
