//! Progress-callback trait for stage and page events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to receive
//! events while the pipeline runs. Progress is advisory only: nothing in the
//! pipeline depends on what a callback does.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2insight::{AnalysisConfig, AnalysisProgressCallback, Stage};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl AnalysisProgressCallback for PageCounter {
//!     fn on_page_processed(&self, stage: Stage, page: usize, total_pages: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{stage}: page {page}/{total_pages}");
//!     }
//! }
//!
//! let config = AnalysisConfig::builder()
//!     .progress_callback(Arc::new(PageCounter { pages: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::AnalysisStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Text extraction, translation and sentiment scoring.
    Sentiment,
    /// Word frequency counting.
    Words,
    /// Per-page dominant color.
    Colors,
    /// Spreadsheet and chart output.
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Sentiment => "sentiment",
            Stage::Words => "words",
            Stage::Colors => "colors",
            Stage::Report => "report",
        })
    }
}

/// Called by the analysis pipeline as it moves through stages and pages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; translation
/// runs on a worker pool even though events are emitted from one task.
pub trait AnalysisProgressCallback: Send + Sync {
    /// Called once after preflight, when the page count is known.
    fn on_analysis_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a page has been fully handled by a page-wise stage.
    ///
    /// # Arguments
    /// * `page`        — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_processed(&self, stage: Stage, page: usize, total_pages: usize) {
        let _ = (stage, page, total_pages);
    }

    /// Called when a stage ends.
    fn on_stage_complete(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once after every stage ran.
    fn on_analysis_complete(&self, stats: &AnalysisStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
