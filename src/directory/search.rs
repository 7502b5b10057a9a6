// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use regex::RegexBuilder;

use super::Directory;
use crate::model::Streamer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Drop streamers whose latest status says offline. Unknown status is kept.
    pub hide_offline: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub streamer: &'a Streamer,
    pub score: i64,
}

/// Below this normalized ratio a token is not considered a fuzzy match.
const FUZZY_FLOOR: f64 = 0.6;

impl Directory {
    /// Conjunctive prefix search: every term must prefix at least one token of a streamer.
    pub fn search<S: AsRef<str>>(&self, terms: &[S], options: SearchOptions) -> Vec<&Streamer> {
        let terms = normalize_terms(terms);
        if terms.is_empty() {
            return Vec::new();
        }

        self.listing()
            .into_iter()
            .filter(|streamer| !(options.hide_offline && streamer.is_confirmed_offline()))
            .filter(|streamer| {
                terms.iter().all(|term| {
                    streamer.tokens().iter().any(|token| token.starts_with(term.as_str()))
                })
            })
            .collect()
    }

    /// Typo-tolerant search for the list overlay. Prefix hits rank above fuzzy hits; ties keep
    /// listing order.
    pub fn search_ranked(
        &self,
        query: &str,
        limit: usize,
        options: SearchOptions,
    ) -> Vec<Ranked<'_>> {
        let terms = normalize_terms(&query.split_whitespace().collect::<Vec<_>>());
        if terms.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked = self
            .listing()
            .into_iter()
            .filter(|streamer| !(options.hide_offline && streamer.is_confirmed_offline()))
            .filter_map(|streamer| {
                let mut total = 0i64;
                for term in &terms {
                    total += streamer
                        .tokens()
                        .iter()
                        .filter_map(|token| token_score(term, token))
                        .max()?;
                }
                Some(Ranked { streamer, score: total })
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(limit);
        ranked
    }

    /// Streamers whose name or an alias matches `pattern`.
    pub fn find_matching(
        &self,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Vec<&Streamer>, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(case_insensitive).build()?;
        Ok(self
            .listing()
            .into_iter()
            .filter(|streamer| {
                regex.is_match(streamer.name().as_str())
                    || streamer.aliases().iter().any(|alias| regex.is_match(alias))
            })
            .collect())
    }
}

fn normalize_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

fn token_score(term: &str, token: &str) -> Option<i64> {
    if token == term {
        return Some(3000);
    }
    if token.starts_with(term) {
        return Some(2000 - (token.len() - term.len()).min(999) as i64);
    }
    let ratio = rapidfuzz::fuzz::ratio(term.chars(), token.chars());
    (ratio >= FUZZY_FLOOR).then(|| (ratio * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::token_score;

    #[test]
    fn exact_beats_prefix_beats_fuzzy() {
        let exact = token_score("gura", "gura").expect("exact");
        let prefix = token_score("gur", "gura").expect("prefix");
        let fuzzy = token_score("gusa", "gura").expect("fuzzy");
        assert!(exact > prefix);
        assert!(prefix > fuzzy);
        assert_eq!(token_score("xyz", "gura"), None);
    }
}
