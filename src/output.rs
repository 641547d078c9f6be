//! Result types produced by an analysis run.
//!
//! Everything here is plain data: created once by a pipeline stage, never
//! mutated afterwards, and serialisable so the CLI can dump a whole run as
//! JSON with `--json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sentiment class derived from a polarity score by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classify `score` against the two thresholds.
    ///
    /// Strict comparisons: a score sitting exactly on a threshold is Neutral.
    pub fn classify(score: f64, positive_threshold: f64, negative_threshold: f64) -> Self {
        if score > positive_threshold {
            SentimentLabel::Positive
        } else if score < negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// 1-indexed page the sentence came from.
    pub page: usize,
    /// Trimmed fragment in the document's original language.
    pub sentence: String,
    /// Polarity in `[-1, 1]`, computed on the translated text.
    pub score: f64,
    pub label: SentimentLabel,
}

/// A token and the number of times it occurs in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex notation, e.g. `#1f77b4`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Representative color of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageColor {
    /// 1-indexed, assigned from the page's position in the document.
    pub page: usize,
    pub color: Rgb,
}

/// Document-level metadata read during preflight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters and timings for one run.
///
/// The skip counters exist so the best-effort policy stays observable:
/// nothing is retried, but everything dropped is accounted for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_pages: usize,
    /// Pages that yielded non-empty text.
    pub pages_with_text: usize,
    /// Every `.`-delimited fragment seen, including empty ones.
    pub fragments_found: usize,
    /// Fragments dropped by the minimum-length filter.
    pub fragments_too_short: usize,
    pub sentences_scored: usize,
    /// Fragments dropped because translation or scoring failed.
    pub sentences_skipped: usize,
    /// Subset of `sentences_skipped` classified as transient.
    pub transient_failures: usize,
    /// Tokens left after stopword and length exclusion.
    pub meaningful_tokens: usize,
    /// Images that passed the area filter and were sampled.
    pub images_considered: usize,
    pub images_failed: usize,
    pub text_duration_ms: u64,
    pub words_duration_ms: u64,
    pub color_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The aggregate result of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub metadata: DocumentMetadata,
    pub sentences: Vec<SentenceRecord>,
    pub words: Vec<WordCount>,
    pub page_colors: Vec<PageColor>,
    pub stats: AnalysisStats,
}

/// Paths written by the report stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFiles {
    pub workbook: PathBuf,
    /// `None` when there were no sentences to plot.
    pub sentiment_chart: Option<PathBuf>,
    /// `None` when there were no pages to plot.
    pub color_chart: Option<PathBuf>,
}
