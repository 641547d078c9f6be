//! Analysis entry points and the stage-by-stage [`ReportAnalyzer`].
//!
//! The free functions ([`analyze`], [`analyze_to_dir`], [`analyze_sync`],
//! [`inspect`]) cover the common cases. [`ReportAnalyzer`] exposes the
//! stages individually for callers that want to run only part of the
//! pipeline, or that already hold page text from elsewhere.
//!
//! Stages run sequentially; only translation is concurrent. Every per-item
//! failure is counted in [`AnalysisStats`] and the run continues.

use crate::config::AnalysisConfig;
use crate::engine::PdfEngine;
use crate::error::InsightError;
use crate::output::{
    AnalysisOutput, AnalysisStats, DocumentMetadata, ReportFiles, SentenceRecord, SentimentLabel,
};
use crate::pipeline::extract::{self, ColorSettings};
use crate::pipeline::input::{self, ResolvedInput};
use crate::pipeline::sentences::{self, Candidate, SplitCounts};
use crate::pipeline::sentiment::{LexiconScorer, SentimentScorer};
use crate::pipeline::stopwords::StopwordSet;
use crate::pipeline::translate::{GoogleTranslator, RateLimiter, Translator};
use crate::pipeline::{chart, encode, wordfreq, workbook};
use crate::progress::{AnalysisProgressCallback, Stage};
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const WORKBOOK_FILE: &str = "Analiz_Raporu.xlsx";
pub const SENTIMENT_CHART_FILE: &str = "Duygu_Grafigi.png";
pub const COLOR_CHART_FILE: &str = "Renk_Haritasi.png";

/// A resolved PDF plus the engine that will open it.
struct PreparedSource {
    input: ResolvedInput,
    engine: PdfEngine,
}

/// Runs the analysis stages against one document and holds their results.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2insight::{AnalysisConfig, ReportAnalyzer};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut analyzer = ReportAnalyzer::new(AnalysisConfig::default())?;
/// analyzer.prepare("faaliyet_raporu.pdf").await?;
/// analyzer.analyze_text().await?;
/// analyzer.count_words();
/// for w in &analyzer.output().words[..5] {
///     println!("{} {}", w.word, w.count);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ReportAnalyzer {
    config: AnalysisConfig,
    translator: Arc<dyn Translator>,
    scorer: Arc<dyn SentimentScorer>,
    stopwords: StopwordSet,
    source: Option<PreparedSource>,
    output: AnalysisOutput,
    full_text: String,
    started: Instant,
}

impl ReportAnalyzer {
    /// Resolve collaborators and load the stopword set.
    ///
    /// Fails only when the stopword file cannot be read or the default
    /// translator's HTTP client cannot be built.
    pub fn new(config: AnalysisConfig) -> Result<Self, InsightError> {
        let translator: Arc<dyn Translator> = match &config.translator {
            Some(t) => Arc::clone(t),
            None => Arc::new(
                GoogleTranslator::new(Duration::from_secs(config.translate_timeout_secs))
                    .map_err(|e| InsightError::Internal(e.to_string()))?,
            ),
        };
        let scorer: Arc<dyn SentimentScorer> = match &config.scorer {
            Some(s) => Arc::clone(s),
            None => Arc::new(LexiconScorer::new()),
        };
        let stopwords = StopwordSet::load(&config)?;

        debug!(
            "Analyzer ready: translator={}, scorer={}, {} stopwords",
            translator.name(),
            scorer.name(),
            stopwords.len()
        );

        Ok(Self {
            config,
            translator,
            scorer,
            stopwords,
            source: None,
            output: AnalysisOutput::default(),
            full_text: String::new(),
            started: Instant::now(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Results gathered so far.
    pub fn output(&self) -> &AnalysisOutput {
        &self.output
    }

    pub fn into_output(self) -> AnalysisOutput {
        self.output
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.output.metadata
    }

    /// Non-empty page texts joined by a space, as fed to word counting.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Preflight: resolve the input, locate PDFium and read metadata.
    pub async fn prepare(&mut self, input_str: &str) -> Result<&DocumentMetadata, InsightError> {
        self.started = Instant::now();
        info!("Starting analysis: {}", input_str);

        let resolved = input::resolve_input(input_str, self.config.download_timeout_secs).await?;

        let explicit = self.config.pdfium_lib_path.clone();
        let engine = tokio::task::spawn_blocking(move || PdfEngine::locate(explicit.as_deref(), None))
            .await
            .map_err(|e| InsightError::Internal(format!("Engine lookup panicked: {}", e)))??;
        debug!("PDFium: {}", engine.lib_path().display());

        let metadata =
            extract::extract_metadata(&engine, resolved.path(), self.config.password.as_deref())
                .await?;
        info!("PDF has {} pages", metadata.page_count);

        self.output.stats.total_pages = metadata.page_count;
        self.output.metadata = metadata;
        self.source = Some(PreparedSource {
            input: resolved,
            engine,
        });

        self.emit(|cb| cb.on_analysis_start(self.output.stats.total_pages));
        Ok(&self.output.metadata)
    }

    fn source(&self) -> Result<&PreparedSource, InsightError> {
        self.source
            .as_ref()
            .ok_or_else(|| InsightError::Internal("prepare() must run before this stage".into()))
    }

    /// Extract page text from the prepared PDF and score its sentences.
    pub async fn analyze_text(&mut self) -> Result<&[SentenceRecord], InsightError> {
        let source = self.source()?;
        let texts = extract::extract_page_texts(
            &source.engine,
            source.input.path(),
            self.config.password.as_deref(),
        )
        .await?;
        Ok(self.analyze_page_texts(texts).await)
    }

    /// Segment, translate and score already-extracted page text.
    ///
    /// `pages[i]` is page `i + 1`; `None` and whitespace-only pages are
    /// skipped. Fragments whose translation or scoring fails are dropped
    /// and counted. Records come back in document order.
    pub async fn analyze_page_texts(&mut self, pages: Vec<Option<String>>) -> &[SentenceRecord] {
        let start = Instant::now();
        let total_pages = pages.len();
        if self.output.stats.total_pages == 0 {
            self.output.stats.total_pages = total_pages;
        }
        self.emit(|cb| cb.on_stage_start(Stage::Sentiment));

        let mut counts = SplitCounts::default();
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut pages_with_text = 0usize;
        for (idx, text) in pages.iter().enumerate() {
            let Some(text) = text.as_deref().filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            pages_with_text += 1;
            candidates.extend(sentences::split_page(
                idx + 1,
                text,
                self.config.min_sentence_chars,
                &mut counts,
            ));
        }
        self.full_text = sentences::join_pages(pages.iter().filter_map(|p| p.as_deref()));

        debug!(
            "{} candidate sentences from {} pages ({} fragments, {} too short)",
            candidates.len(),
            pages_with_text,
            counts.found,
            counts.too_short
        );

        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
            self.config.translate_delay_ms,
        )));
        let source_lang = self.config.source_lang.clone();
        let target_lang = self.config.target_lang.clone();
        let translator = Arc::clone(&self.translator);
        let scorer = Arc::clone(&self.scorer);

        let results = stream::iter(candidates.into_iter().map(|cand| {
            let limiter = Arc::clone(&limiter);
            let translator = Arc::clone(&translator);
            let scorer = Arc::clone(&scorer);
            let source_lang = source_lang.clone();
            let target_lang = target_lang.clone();
            async move {
                limiter.acquire().await;
                let score = match translator
                    .translate(&cand.text, &source_lang, &target_lang)
                    .await
                {
                    Ok(translated) => scorer.polarity(&translated),
                    Err(e) => Err(e),
                };
                (cand, score)
            }
        }))
        .buffered(self.config.concurrency.max(1));
        let mut results = std::pin::pin!(results);

        let mut records = Vec::new();
        let mut stats = AnalysisStats {
            pages_with_text,
            fragments_found: counts.found,
            fragments_too_short: counts.too_short,
            ..Default::default()
        };
        let mut next_page = 1usize;

        while let Some((cand, score)) = results.next().await {
            // Ordered results: every page before this one is finished.
            while next_page < cand.page {
                self.emit(|cb| cb.on_page_processed(Stage::Sentiment, next_page, total_pages));
                next_page += 1;
            }
            match score {
                Ok(score) => {
                    let label = SentimentLabel::classify(
                        score,
                        self.config.positive_threshold,
                        self.config.negative_threshold,
                    );
                    records.push(SentenceRecord {
                        page: cand.page,
                        sentence: cand.text,
                        score,
                        label,
                    });
                }
                Err(e) => {
                    debug!("Page {}: dropping sentence: {}", cand.page, e);
                    stats.sentences_skipped += 1;
                    if e.is_transient() {
                        stats.transient_failures += 1;
                    }
                }
            }
        }
        while next_page <= total_pages {
            self.emit(|cb| cb.on_page_processed(Stage::Sentiment, next_page, total_pages));
            next_page += 1;
        }

        if stats.sentences_skipped > 0 {
            warn!(
                "{} sentences skipped ({} transient failures)",
                stats.sentences_skipped, stats.transient_failures
            );
        }

        let s = &mut self.output.stats;
        s.pages_with_text = stats.pages_with_text;
        s.fragments_found = stats.fragments_found;
        s.fragments_too_short = stats.fragments_too_short;
        s.sentences_scored = records.len();
        s.sentences_skipped = stats.sentences_skipped;
        s.transient_failures = stats.transient_failures;
        s.text_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Scored {} sentences from {}/{} pages in {}ms",
            records.len(),
            pages_with_text,
            total_pages,
            s.text_duration_ms
        );

        self.output.sentences = records;
        self.emit(|cb| cb.on_stage_complete(Stage::Sentiment));
        &self.output.sentences
    }

    /// Count word frequencies over the text gathered by the sentiment stage.
    pub fn count_words(&mut self) -> &[crate::output::WordCount] {
        let start = Instant::now();
        self.emit(|cb| cb.on_stage_start(Stage::Words));

        let freq = wordfreq::count_words(
            &self.full_text,
            &self.stopwords,
            self.config.min_word_len,
            self.config.top_n,
        );
        self.output.stats.meaningful_tokens = freq.meaningful_tokens;
        self.output.stats.words_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "{} meaningful tokens, {} distinct words kept",
            freq.meaningful_tokens,
            freq.words.len()
        );
        self.output.words = freq.words;

        self.emit(|cb| cb.on_stage_complete(Stage::Words));
        &self.output.words
    }

    /// One representative color per page of the prepared PDF.
    pub async fn extract_colors(&mut self) -> Result<&[crate::output::PageColor], InsightError> {
        let start = Instant::now();
        self.emit(|cb| cb.on_stage_start(Stage::Colors));

        let source = self.source()?;
        let settings = ColorSettings {
            min_area: self.config.min_image_area,
            sample_size: self.config.sample_size,
        };
        let extraction = extract::extract_page_colors(
            &source.engine,
            source.input.path(),
            self.config.password.as_deref(),
            settings,
            self.config.progress_callback.clone(),
        )
        .await?;

        if extraction.images_failed > 0 {
            warn!("{} images could not be decoded", extraction.images_failed);
        }
        let s = &mut self.output.stats;
        s.images_considered = extraction.images_considered;
        s.images_failed = extraction.images_failed;
        s.color_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Colors for {} pages ({} images sampled) in {}ms",
            extraction.colors.len(),
            extraction.images_considered,
            s.color_duration_ms
        );
        self.output.page_colors = extraction.colors;

        self.emit(|cb| cb.on_stage_complete(Stage::Colors));
        Ok(&self.output.page_colors)
    }

    /// Write the spreadsheet and charts into the configured output directory.
    ///
    /// The spreadsheet is always written. Each chart is written only when
    /// it has data to plot.
    pub async fn write_reports(&self) -> Result<ReportFiles, InsightError> {
        self.emit(|cb| cb.on_stage_start(Stage::Report));
        let dir = &self.config.output_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| InsightError::OutputDirFailed {
                path: dir.clone(),
                source,
            })?;

        let workbook_path = dir.join(WORKBOOK_FILE);
        let bytes = workbook::build_workbook(&self.output.sentences, &self.output.words).map_err(
            |e| InsightError::WorkbookFailed {
                path: workbook_path.clone(),
                detail: e.to_string(),
            },
        )?;
        encode::write_atomic(&workbook_path, &bytes).await?;
        info!("Wrote {}", workbook_path.display());

        let sentiment_chart = if self.output.sentences.is_empty() {
            debug!("No sentences; skipping sentiment chart");
            None
        } else {
            let scores: Vec<f64> = self.output.sentences.iter().map(|r| r.score).collect();
            let img = chart::render_sentiment_chart(&scores, self.config.trend_window);
            Some(write_png(dir.join(SENTIMENT_CHART_FILE), img).await?)
        };

        let color_chart = if self.output.page_colors.is_empty() {
            debug!("No page colors; skipping color strip");
            None
        } else {
            let colors: Vec<_> = self.output.page_colors.iter().map(|p| p.color).collect();
            let img = chart::render_color_strip(&colors);
            Some(write_png(dir.join(COLOR_CHART_FILE), img).await?)
        };

        self.emit(|cb| cb.on_stage_complete(Stage::Report));
        Ok(ReportFiles {
            workbook: workbook_path,
            sentiment_chart,
            color_chart,
        })
    }

    /// Preflight plus every analysis stage, without writing files.
    pub async fn analyze(&mut self, input_str: &str) -> Result<&AnalysisOutput, InsightError> {
        self.run_stages(input_str).await?;
        self.finish();
        Ok(&self.output)
    }

    /// Every stage including the report files.
    pub async fn run(&mut self, input_str: &str) -> Result<ReportFiles, InsightError> {
        self.run_stages(input_str).await?;
        let files = self.write_reports().await?;
        self.finish();
        Ok(files)
    }

    async fn run_stages(&mut self, input_str: &str) -> Result<(), InsightError> {
        self.prepare(input_str).await?;
        self.analyze_text().await?;
        self.count_words();
        self.extract_colors().await?;
        Ok(())
    }

    fn finish(&mut self) {
        self.output.stats.total_duration_ms = self.started.elapsed().as_millis() as u64;
        info!(
            "Analysis complete: {} sentences, {} words, {} pages in {}ms",
            self.output.sentences.len(),
            self.output.words.len(),
            self.output.page_colors.len(),
            self.output.stats.total_duration_ms
        );
        self.emit(|cb| cb.on_analysis_complete(&self.output.stats));
    }

    fn emit(&self, f: impl FnOnce(&dyn AnalysisProgressCallback)) {
        if let Some(ref cb) = self.config.progress_callback {
            f(cb.as_ref());
        }
    }
}

async fn write_png(path: PathBuf, img: image::RgbImage) -> Result<PathBuf, InsightError> {
    let bytes = encode::encode_png(&DynamicImage::ImageRgb8(img)).map_err(|e| {
        InsightError::ChartFailed {
            path: path.clone(),
            detail: e.to_string(),
        }
    })?;
    encode::write_atomic(&path, &bytes).await?;
    info!("Wrote {}", path.display());
    Ok(path)
}

// ── Free functions ───────────────────────────────────────────────────────

/// Analyze a PDF file or URL and return the results without writing files.
///
/// # Errors
/// Returns `Err(InsightError)` only for fatal errors: unreadable input,
/// PDFium unavailable, corrupt or locked PDF, unreadable stopword file.
/// Per-sentence and per-image failures are counted in
/// [`AnalysisStats`] instead.
pub async fn analyze(
    input_str: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, InsightError> {
    let mut analyzer = ReportAnalyzer::new(config.clone())?;
    analyzer.analyze(input_str.as_ref()).await?;
    Ok(analyzer.into_output())
}

/// Analyze a PDF and write the spreadsheet and charts to `config.output_dir`.
pub async fn analyze_to_dir(
    input_str: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<(AnalysisOutput, ReportFiles), InsightError> {
    let mut analyzer = ReportAnalyzer::new(config.clone())?;
    let files = analyzer.run(input_str.as_ref()).await?;
    Ok((analyzer.into_output(), files))
}

/// Synchronous wrapper around [`analyze_to_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input_str: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<(AnalysisOutput, ReportFiles), InsightError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| InsightError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze_to_dir(input_str, config))
}

/// Read PDF metadata without analysing content. Makes no translation calls.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, InsightError> {
    inspect_with(input_str, &AnalysisConfig::default()).await
}

/// [`inspect`] honouring the password and PDFium path from `config`.
pub async fn inspect_with(
    input_str: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<DocumentMetadata, InsightError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    let explicit: Option<PathBuf> = config.pdfium_lib_path.clone();
    let engine = tokio::task::spawn_blocking(move || PdfEngine::locate(explicit.as_deref(), None))
        .await
        .map_err(|e| InsightError::Internal(format!("Engine lookup panicked: {}", e)))??;
    extract::extract_metadata(&engine, resolved.path(), config.password.as_deref()).await
}

/// Where [`ReportAnalyzer::write_reports`] puts its files under `output_dir`.
pub fn report_paths(output_dir: &Path) -> ReportFiles {
    ReportFiles {
        workbook: output_dir.join(WORKBOOK_FILE),
        sentiment_chart: Some(output_dir.join(SENTIMENT_CHART_FILE)),
        color_chart: Some(output_dir.join(COLOR_CHART_FILE)),
    }
}
