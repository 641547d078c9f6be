//! Pipeline stages for PDF report analysis.
//!
//! Each submodule implements one step. Only [`extract`] touches PDFium and
//! only [`translate`] touches the network; everything else is pure and
//! tested without either.
//!
//! ## Data Flow
//!
//! ```text
//!                ┌─▶ sentences ──▶ translate ──▶ sentiment ─┐
//! input ──▶ extract ─▶ (page text)                          ├─▶ workbook
//! (URL/path) (pdfium) └─▶ wordfreq ◀── stopwords ───────────┤    chart
//!                  └───▶ color (largest image per page) ────┘    encode
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`]   — page text, embedded images and metadata; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`sentences`] — naive `.` segmentation with a minimum-length filter
//! 4. [`translate`] — translation into the scoring language, rate limited
//! 5. [`sentiment`] — lexicon polarity over the translated text ([`lexicon`])
//! 6. [`wordfreq`]  — normalised token counts minus [`stopwords`]
//! 7. [`color`]     — mean color of each page's largest image
//! 8. [`workbook`], [`chart`], [`encode`] — report files on disk

pub mod chart;
pub mod color;
pub mod encode;
pub mod extract;
pub mod input;
pub mod lexicon;
pub mod sentences;
pub mod sentiment;
pub mod stopwords;
pub mod translate;
pub mod wordfreq;
pub mod workbook;
