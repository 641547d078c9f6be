//! Sentence polarity scoring.
//!
//! Scoring runs on translated (English) text. [`LexiconScorer`] is a
//! rule-based scorer over the compiled-in [`lexicon`](super::lexicon):
//!
//! 1. tokenize into lowercase alphabetic words (apostrophes kept, so
//!    `don't` survives as one token)
//! 2. look each token up; an intensifier directly before a hit scales it
//! 3. a negator within the three preceding tokens multiplies by `-0.5`
//! 4. average the hits and clamp to `[-1, 1]`; no hits scores `0.0`

use crate::error::ItemError;
use crate::pipeline::lexicon::{INTENSIFIERS, NEGATIONS, POLARITY};
use std::collections::{HashMap, HashSet};

const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

/// Scores the polarity of a piece of text.
pub trait SentimentScorer: Send + Sync {
    /// Polarity in `[-1, 1]`.
    fn polarity(&self, text: &str) -> Result<f64, ItemError>;

    fn name(&self) -> &str;
}

/// English lexicon scorer with intensifier and negation handling.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            polarity: POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Number of polarity entries.
    pub fn len(&self) -> usize {
        self.polarity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarity.is_empty()
    }

    fn score(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut hits = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.polarity.get(token.as_str()) else {
                continue;
            };
            let mut value = base;

            if i > 0 {
                if let Some(&factor) = self.intensifiers.get(tokens[i - 1].as_str()) {
                    value *= factor;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|t| self.negations.contains(t.as_str()))
            {
                value *= NEGATION_FACTOR;
            }

            total += value;
            hits += 1;
        }

        if hits == 0 {
            return 0.0;
        }
        (total / hits as f64).clamp(-1.0, 1.0)
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, ItemError> {
        let score = self.score(text);
        if score.is_finite() {
            Ok(score)
        } else {
            Err(ItemError::ScoringFailed {
                detail: format!("non-finite score for '{}'", text),
            })
        }
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Lowercase alphabetic tokens; apostrophes stay inside words.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphabetic() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
        .collect()
}
