// SPDX-License-Identifier: MIT
//! Text inspectors and word tokenizing helpers.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;
use crate::pipeline::Inspector;
use crate::sink::DiagnosticsSink;

static WORDS_IN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("regex: words"));

/// Lowercased word tokens of `text`, in order of appearance. `None` when
/// the text holds no tokens at all.
pub fn words(text: &str) -> Option<Vec<String>> {
    let words: Vec<String> = WORDS_IN_TEXT
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words)
    }
}

/// Per-word occurrence counts over [`words`].
pub fn word_distribution(text: &str) -> Option<HashMap<String, usize>> {
    let words = words(text)?;
    let mut distribution = HashMap::new();
    for word in words {
        *distribution.entry(word).or_insert(0) += 1;
    }
    Some(distribution)
}

/// Checks that a text's word count falls inside an inclusive range.
///
/// Empty text passes through untouched — absence of text is not a word
/// count problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCountRange {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for WordCountRange {
    fn default() -> Self {
        Self {
            min_words: 10,
            max_words: 15,
        }
    }
}

#[async_trait]
impl Inspector<String> for WordCountRange {
    fn name(&self) -> &str {
        "word-count-range"
    }

    async fn inspect(
        &self,
        outcome: Outcome<String>,
        _sink: Option<&dyn DiagnosticsSink<String>>,
    ) -> Result<Outcome<String>> {
        let text = outcome.subject().clone();
        if text.is_empty() {
            return Ok(outcome);
        }
        let Some(words) = words(&text) else {
            return Ok(outcome.issue("Unable to count words"));
        };
        let count = words.len();
        if count > self.max_words || count < self.min_words {
            return Ok(outcome.issue(format!(
                "Word count should be between {}-{} (not {})",
                self.min_words, self.max_words, count
            )));
        }
        Ok(outcome)
    }
}
