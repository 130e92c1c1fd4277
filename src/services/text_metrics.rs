// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Keyword density and reading-ease math over plain text.

use regex::Regex;
use std::sync::OnceLock;

/// Percentage of whitespace-delimited tokens equal to `keyword`, ignoring case.
/// Formatted with two decimals; text without tokens yields `"0.00"`.
pub fn keyword_density(text: &str, keyword: &str) -> String {
    let keyword = keyword.to_lowercase();
    let (total, hits) = text
        .split_whitespace()
        .fold((0usize, 0usize), |(total, hits), token| {
            let hit = token.to_lowercase() == keyword;
            (total + 1, hits + usize::from(hit))
        });

    if total == 0 {
        return format_score(0.0);
    }
    format_score(hits as f64 / total as f64 * 100.0)
}

/// Flesch reading ease:
/// `206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)`.
///
/// Syllables are approximated by the number of vowels (`aeiouy`). Returns
/// `None` for text without words; text with words but no sentence
/// terminators counts as one sentence.
pub fn flesch_reading_ease(text: &str) -> Option<f64> {
    let words = text.split_whitespace().count();
    if words == 0 {
        return None;
    }

    let sentences = count_sentences(text).max(1);
    let syllables = count_vowels(text);

    let words = words as f64;
    Some(206.835 - 1.015 * (words / sentences as f64) - 84.6 * (syllables as f64 / words))
}

/// Non-empty segments between runs of `.`, `!` and `?`
fn count_sentences(text: &str) -> usize {
    static TERMINATORS: OnceLock<Regex> = OnceLock::new();
    let terminators = TERMINATORS.get_or_init(|| Regex::new(r"[.!?]+").expect("valid regex"));

    terminators
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

fn count_vowels(text: &str) -> usize {
    text.chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
        .count()
}

/// Two fractional digits, as reported to clients
pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_density_case_insensitive() {
        let text = "SEO tips for seo beginners and Seo experts";
        // 3 of 8 tokens
        assert_eq!(keyword_density(text, "seo"), "37.50");
    }

    #[test]
    fn test_keyword_density_exact_token_match_only() {
        assert_eq!(keyword_density("seo, seo-friendly seo", "seo"), "33.33");
    }

    #[test]
    fn test_keyword_density_empty_text_is_zero() {
        assert_eq!(keyword_density("", "seo"), "0.00");
        assert_eq!(keyword_density(" \n\t ", "seo"), "0.00");
    }

    #[test]
    fn test_keyword_density_order_independent() {
        let a = keyword_density("seo is fun and seo pays", "seo");
        let b = keyword_density("pays fun seo and is seo", "seo");
        assert_eq!(a, b);
        assert_eq!(a, "33.33");
    }

    #[test]
    fn test_count_sentences_collapses_terminators() {
        assert_eq!(count_sentences("Hi there... Really?! Yes."), 3);
        assert_eq!(count_sentences("no terminator"), 1);
        assert_eq!(count_sentences("...!?"), 0);
    }

    #[test]
    fn test_count_vowels_includes_y() {
        assert_eq!(count_vowels("Rhythm AEIOU"), 6);
    }

    #[test]
    fn test_flesch_reading_ease_formula() {
        // 4 words, 1 sentence, 4 vowels
        let text = "The cat sat down.";
        let expected = 206.835 - 1.015 * 4.0 - 84.6 * (4.0 / 4.0);
        assert_eq!(flesch_reading_ease(text), Some(expected));
    }

    #[test]
    fn test_flesch_reading_ease_no_words() {
        assert_eq!(flesch_reading_ease("   "), None);
    }

    #[test]
    fn test_flesch_without_terminator_counts_one_sentence() {
        let with = flesch_reading_ease("Plain words here.").unwrap();
        let without = flesch_reading_ease("Plain words here").unwrap();
        assert_eq!(with, without);
    }
}
