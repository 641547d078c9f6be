//! CLI binary for edgequake-pdf2insight.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `AnalysisConfig` and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2insight::{
    analyze, analyze_to_dir, inspect_with, AnalysisConfig, AnalysisProgressCallback,
    AnalysisStats, IdentityTranslator, PdfEngine, ProgressCallback, Stage,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar reused across stages. Page-wise stages show a
/// counter; the others show a spinner.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(spinner_style());
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  \
         [{bar:42.green/238}] {pos:>3}/{len} pages  \
         ⏱ {elapsed_precise}  ETA {eta_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(TICKS)
}

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Sentiment => "Sentiment",
        Stage::Words => "Words",
        Stage::Colors => "Colors",
        Stage::Report => "Report",
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_analysis_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Analysing {total_pages} pages…"))
        ));
    }

    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_prefix(stage_title(stage));
        match stage {
            Stage::Sentiment | Stage::Colors => {
                self.bar.set_style(bar_style());
                self.bar.set_position(0);
                self.bar.reset_eta();
            }
            Stage::Words | Stage::Report => {
                self.bar.set_style(spinner_style());
                self.bar.set_message(match stage {
                    Stage::Words => "counting words…",
                    _ => "writing files…",
                });
            }
        }
    }

    fn on_page_processed(&self, _stage: Stage, page: usize, _total_pages: usize) {
        self.bar.set_position(page as u64);
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.bar
            .println(format!("  {} {}", green("✓"), stage_title(stage)));
    }

    fn on_analysis_complete(&self, _stats: &AnalysisStats) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse a report, writing into ./Çıktı
  pdf2insight faaliyet_raporu.pdf

  # Custom output folder and a longer trend window
  pdf2insight rapor.pdf -o analiz/2024 --trend-window 10

  # Analyse from URL
  pdf2insight https://example.com/sustainability-2023.pdf

  # Skip translation (text is already English)
  pdf2insight --no-translate --source-lang en annual_report.pdf

  # Extra stopwords, inline and from a file
  pdf2insight --extra-stopword şirket --extra-stopword holding --stopwords stop.txt rapor.pdf

  # JSON dump of all results
  pdf2insight --json rapor.pdf > analiz.json

  # Inspect PDF metadata only
  pdf2insight --inspect-only rapor.pdf

OUTPUT FILES:
  Analiz_Raporu.xlsx   sheets "Duygu Analizi" (Page|Sentence|Score|Label)
                       and "En Sık Geçen Kelimeler" (Word|Count)
  Duygu_Grafigi.png    sentence scores with a moving-average trend
  Renk_Haritasi.png    one color cell per page

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium — skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  RUST_LOG                Override log filtering (e.g. edgequake_pdf2insight=debug)

  PDFium (~30 MB) is downloaded automatically on first run and cached in
  ~/.cache/pdf2insight/pdfium-7690/.
"#;

/// Sentiment, word-frequency and color analysis of PDF reports.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2insight",
    version,
    about = "Sentiment, word-frequency and color analysis of PDF reports",
    long_about = "Analyse a PDF report (local file or URL): score every sentence's sentiment \
after translating it to a pivot language, count the most frequent meaningful words, and sample \
a representative color per page. Results are written as an Excel workbook and two PNG charts.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Directory receiving the workbook and charts.
    #[arg(short, long, env = "PDF2INSIGHT_OUTPUT_DIR", default_value = "Çıktı")]
    output_dir: PathBuf,

    /// Source language code, or `auto` to detect.
    #[arg(long, env = "PDF2INSIGHT_SOURCE_LANG", default_value = "auto")]
    source_lang: String,

    /// Language sentences are translated into before scoring.
    #[arg(long, env = "PDF2INSIGHT_TARGET_LANG", default_value = "en")]
    target_lang: String,

    /// Score the original text without translating it.
    #[arg(long, env = "PDF2INSIGHT_NO_TRANSLATE")]
    no_translate: bool,

    /// Number of translation calls in flight.
    #[arg(short, long, env = "PDF2INSIGHT_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Minimum spacing between translation calls, in milliseconds.
    #[arg(long, env = "PDF2INSIGHT_DELAY_MS", default_value_t = 50)]
    delay_ms: u64,

    /// Number of words in the frequency table.
    #[arg(long, env = "PDF2INSIGHT_TOP_N", default_value_t = 100)]
    top_n: usize,

    /// File with additional stopwords, one per line.
    #[arg(long = "stopwords", env = "PDF2INSIGHT_STOPWORDS")]
    stopword_file: Option<PathBuf>,

    /// Additional stopword (repeatable).
    #[arg(
        long = "extra-stopword",
        value_name = "WORD",
        env = "PDF2INSIGHT_EXTRA_STOPWORDS",
        value_delimiter = ','
    )]
    extra_stopwords: Vec<String>,

    /// Minimum image area in pt² for the page color.
    #[arg(long, env = "PDF2INSIGHT_MIN_IMAGE_AREA", default_value_t = 5000.0)]
    min_image_area: f32,

    /// Window of the moving average on the sentiment chart.
    #[arg(long, env = "PDF2INSIGHT_TREND_WINDOW", default_value_t = 5)]
    trend_window: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2INSIGHT_PASSWORD")]
    password: Option<String>,

    /// Path to an existing PDFium shared library.
    #[arg(long = "pdfium-lib", env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2INSIGHT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print results as JSON on stdout instead of writing files.
    #[arg(long, env = "PDF2INSIGHT_JSON")]
    json: bool,

    /// Print PDF metadata only, no analysis.
    #[arg(long, env = "PDF2INSIGHT_INSPECT_ONLY")]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2INSIGHT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2INSIGHT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2INSIGHT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless -v is given.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure PDFium engine is available ───────────────────────────────────
    // Done here rather than inside the library so the first-run download
    // gets a byte-level progress bar.
    let engine = if PdfEngine::is_available_offline(cli.pdfium_lib.as_deref()) || cli.quiet {
        tokio::task::block_in_place(|| PdfEngine::locate(cli.pdfium_lib.as_deref(), None))
            .context("Failed to locate PDFium engine")?
    } else {
        let dl_bar = ProgressBar::new(0);
        dl_bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        dl_bar.set_prefix("PDF engine");
        dl_bar.enable_steady_tick(Duration::from_millis(80));

        let bar = dl_bar.clone();
        let engine = tokio::task::block_in_place(|| {
            PdfEngine::locate(
                cli.pdfium_lib.as_deref(),
                Some(&|downloaded, total| {
                    if let Some(t) = total {
                        if bar.length().unwrap_or(0) != t {
                            bar.set_length(t);
                        }
                    }
                    bar.set_position(downloaded);
                }),
            )
        })
        .context("Failed to download PDFium engine")?;
        dl_bar.finish_with_message("ready ✓");
        engine
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress && !cli.inspect_only {
        Some(CliProgressCallback::new() as Arc<dyn AnalysisProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, engine.lib_path().to_path_buf(), progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect_with(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Run analysis ─────────────────────────────────────────────────────
    if cli.json {
        let output = analyze(&cli.input, &config)
            .await
            .context("Analysis failed")?;
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    let (output, files) = analyze_to_dir(&cli.input, &config)
        .await
        .context("Analysis failed")?;

    if !cli.quiet {
        let s = &output.stats;
        eprintln!(
            "{}  {} sentences  {} words  {} pages  {}ms",
            green("✔"),
            bold(&s.sentences_scored.to_string()),
            output.words.len(),
            output.page_colors.len(),
            s.total_duration_ms,
        );
        if s.sentences_skipped > 0 || s.images_failed > 0 {
            eprintln!(
                "   {}",
                dim(&format!(
                    "{} sentences skipped ({} transient), {} images failed",
                    s.sentences_skipped, s.transient_failures, s.images_failed
                ))
            );
        }
        eprintln!("   →  {}", bold(&files.workbook.display().to_string()));
        for chart in [&files.sentiment_chart, &files.color_chart].into_iter().flatten() {
            eprintln!("   →  {}", bold(&chart.display().to_string()));
        }
    }

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(
    cli: &Cli,
    pdfium_lib: PathBuf,
    progress: Option<ProgressCallback>,
) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .output_dir(&cli.output_dir)
        .source_lang(&cli.source_lang)
        .target_lang(&cli.target_lang)
        .concurrency(cli.concurrency)
        .translate_delay_ms(cli.delay_ms)
        .top_n(cli.top_n)
        .extra_stopwords(cli.extra_stopwords.iter().cloned())
        .min_image_area(cli.min_image_area)
        .trend_window(cli.trend_window)
        .download_timeout_secs(cli.download_timeout)
        .pdfium_lib_path(pdfium_lib);

    if let Some(ref path) = cli.stopword_file {
        builder = builder.stopword_file(path);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if cli.no_translate {
        builder = builder.translator(Arc::new(IdentityTranslator));
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
