//! # edgequake-pdf2insight
//!
//! Turn a PDF report into a sentiment table, a word-frequency table and a
//! per-page color map.
//!
//! ## Why this crate?
//!
//! Annual and sustainability reports are long, formulaic and mostly read
//! diagonally. This crate gives a quick quantitative read of one: how the
//! tone moves through the document, which words it leans on, and what the
//! visual palette looks like page by page. Sentences are translated into a
//! pivot language (English by default) and scored with a lexicon, so the
//! source document can be in any language the translator understands.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Preflight  locate (or download) PDFium, read metadata
//!  ├─ 3. Sentiment  page text → sentences → translate → polarity → label
//!  ├─ 4. Words      normalise, drop stopwords, count, top N
//!  ├─ 5. Colors     largest image per page → mean RGB
//!  └─ 6. Report     Analiz_Raporu.xlsx + Duygu_Grafigi.png + Renk_Haritasi.png
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2insight::{analyze_to_dir, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::builder().output_dir("Çıktı").build()?;
//!     let (output, files) = analyze_to_dir("faaliyet_raporu.pdf", &config).await?;
//!     eprintln!(
//!         "{} sentences scored, {} skipped → {}",
//!         output.stats.sentences_scored,
//!         output.stats.sentences_skipped,
//!         files.workbook.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2insight` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdf2insight = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! PDF parsing uses PDFium through `pdfium-render`. The shared library is
//! located or downloaded once per run by [`PdfEngine::locate`]; set
//! `PDFIUM_LIB_PATH` to use an existing copy.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync, analyze_to_dir, inspect, inspect_with, ReportAnalyzer};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use engine::PdfEngine;
pub use error::{InsightError, ItemError};
pub use output::{
    AnalysisOutput, AnalysisStats, DocumentMetadata, PageColor, ReportFiles, Rgb,
    SentenceRecord, SentimentLabel, WordCount,
};
pub use pipeline::sentiment::{LexiconScorer, SentimentScorer};
pub use pipeline::translate::{GoogleTranslator, IdentityTranslator, Translator};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
