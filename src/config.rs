//! Configuration types for report analysis.
//!
//! All analysis behaviour is controlled through [`AnalysisConfig`], built
//! via its [`AnalysisConfigBuilder`]. Every constant the pipeline uses (the
//! 20-character sentence filter, the ±0.1 label thresholds, the 5000 pt²
//! image floor, the output folder name) lives here so a run can be tuned
//! without touching stage code.

use crate::error::InsightError;
use crate::pipeline::sentiment::SentimentScorer;
use crate::pipeline::translate::Translator;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default output folder, created next to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "Çıktı";

/// Configuration for one analysis run.
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2insight::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .output_dir("reports/2024")
///     .top_n(50)
///     .concurrency(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Directory receiving the spreadsheet and charts. Default: `Çıktı`.
    pub output_dir: PathBuf,

    /// Source language passed to the translator. Default: `auto`.
    pub source_lang: String,

    /// Pivot language sentiment is scored in. Default: `en`.
    pub target_lang: String,

    /// Fragments shorter than this many characters (after trimming) are
    /// treated as headings or noise and skipped. Default: 20.
    pub min_sentence_chars: usize,

    /// Scores strictly above this are Positive. Default: 0.1.
    pub positive_threshold: f64,

    /// Scores strictly below this are Negative. Default: -0.1.
    pub negative_threshold: f64,

    /// Number of words kept in the frequency table. Default: 100.
    pub top_n: usize,

    /// Tokens shorter than this are excluded from counting. Default: 3.
    pub min_word_len: usize,

    /// Extra stopwords added on top of the built-in Turkish list.
    pub extra_stopwords: Vec<String>,

    /// Optional file with one stopword per line (`#` starts a comment).
    pub stopword_file: Option<PathBuf>,

    /// Minimum bounding-box area (pt²) for an image to count. Default: 5000.
    ///
    /// Filters out bullets, logos and decorative icons.
    pub min_image_area: f32,

    /// Edge length of the square an image is resized to before averaging. Default: 50.
    pub sample_size: u32,

    /// Window of the moving average drawn over the sentiment line. Default: 5.
    pub trend_window: usize,

    /// Number of translation calls in flight at once. Default: 4.
    pub concurrency: usize,

    /// Minimum spacing between translation calls, shared by all workers. Default: 50 ms.
    pub translate_delay_ms: u64,

    /// Per-request timeout of the translation HTTP client. Default: 30 s.
    pub translate_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit PDFium library path. Skips lookup and download.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Pre-constructed translator. Default: Google Translate web endpoint.
    pub translator: Option<Arc<dyn Translator>>,

    /// Pre-constructed sentiment scorer. Default: built-in English lexicon.
    pub scorer: Option<Arc<dyn SentimentScorer>>,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            source_lang: "auto".to_string(),
            target_lang: "en".to_string(),
            min_sentence_chars: 20,
            positive_threshold: 0.1,
            negative_threshold: -0.1,
            top_n: 100,
            min_word_len: 3,
            extra_stopwords: Vec::new(),
            stopword_file: None,
            min_image_area: 5000.0,
            sample_size: 50,
            trend_window: 5,
            concurrency: 4,
            translate_delay_ms: 50,
            translate_timeout_secs: 30,
            download_timeout_secs: 120,
            password: None,
            pdfium_lib_path: None,
            translator: None,
            scorer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("output_dir", &self.output_dir)
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("min_sentence_chars", &self.min_sentence_chars)
            .field("positive_threshold", &self.positive_threshold)
            .field("negative_threshold", &self.negative_threshold)
            .field("top_n", &self.top_n)
            .field("min_word_len", &self.min_word_len)
            .field("extra_stopwords", &self.extra_stopwords)
            .field("stopword_file", &self.stopword_file)
            .field("min_image_area", &self.min_image_area)
            .field("sample_size", &self.sample_size)
            .field("trend_window", &self.trend_window)
            .field("concurrency", &self.concurrency)
            .field("translate_delay_ms", &self.translate_delay_ms)
            .field(
                "translator",
                &self.translator.as_ref().map(|t| t.name().to_string()),
            )
            .field("scorer", &self.scorer.as_ref().map(|s| s.name().to_string()))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.source_lang = lang.into();
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.target_lang = lang.into();
        self
    }

    pub fn min_sentence_chars(mut self, n: usize) -> Self {
        self.config.min_sentence_chars = n;
        self
    }

    pub fn thresholds(mut self, positive: f64, negative: f64) -> Self {
        self.config.positive_threshold = positive;
        self.config.negative_threshold = negative;
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.config.top_n = n;
        self
    }

    pub fn min_word_len(mut self, n: usize) -> Self {
        self.config.min_word_len = n;
        self
    }

    pub fn extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .extra_stopwords
            .extend(words.into_iter().map(Into::into));
        self
    }

    pub fn stopword_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.stopword_file = Some(path.into());
        self
    }

    pub fn min_image_area(mut self, area: f32) -> Self {
        self.config.min_image_area = area.max(0.0);
        self
    }

    pub fn sample_size(mut self, px: u32) -> Self {
        self.config.sample_size = px;
        self
    }

    pub fn trend_window(mut self, n: usize) -> Self {
        self.config.trend_window = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn translate_delay_ms(mut self, ms: u64) -> Self {
        self.config.translate_delay_ms = ms;
        self
    }

    pub fn translate_timeout_secs(mut self, secs: u64) -> Self {
        self.config.translate_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    pub fn scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.config.scorer = Some(scorer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, InsightError> {
        let c = &self.config;
        if c.target_lang.trim().is_empty() {
            return Err(InsightError::InvalidConfig(
                "Target language must not be empty".into(),
            ));
        }
        if c.top_n == 0 {
            return Err(InsightError::InvalidConfig("top_n must be ≥ 1".into()));
        }
        if c.trend_window == 0 {
            return Err(InsightError::InvalidConfig(
                "Trend window must be ≥ 1".into(),
            ));
        }
        if c.sample_size == 0 {
            return Err(InsightError::InvalidConfig(
                "Sample size must be ≥ 1 px".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(InsightError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.positive_threshold < c.negative_threshold {
            return Err(InsightError::InvalidConfig(format!(
                "Positive threshold {} is below negative threshold {}",
                c.positive_threshold, c.negative_threshold
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let c = AnalysisConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("Çıktı"));
        assert_eq!(c.target_lang, "en");
        assert_eq!(c.min_sentence_chars, 20);
        assert_eq!(c.top_n, 100);
        assert_eq!(c.min_image_area, 5000.0);
        assert_eq!(c.sample_size, 50);
        assert_eq!(c.trend_window, 5);
        assert_eq!(c.translate_delay_ms, 50);
    }

    #[test]
    fn builder_rejects_zero_top_n() {
        let err = AnalysisConfig::builder().top_n(0).build().unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn builder_rejects_inverted_thresholds() {
        assert!(AnalysisConfig::builder()
            .thresholds(-0.2, 0.2)
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_zero_concurrency() {
        assert!(AnalysisConfig::builder().concurrency(0).build().is_err());
    }

    #[test]
    fn builder_accumulates_stopwords() {
        let c = AnalysisConfig::builder()
            .extra_stopwords(["şirket"])
            .extra_stopwords(vec!["rapor".to_string()])
            .build()
            .unwrap();
        assert_eq!(c.extra_stopwords, vec!["şirket", "rapor"]);
    }

    #[test]
    fn debug_hides_trait_objects() {
        let dbg = format!("{:?}", AnalysisConfig::default());
        assert!(dbg.contains("AnalysisConfig"));
        assert!(dbg.contains("translator: None"));
    }
}
