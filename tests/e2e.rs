//! End-to-end integration tests for edgequake-pdf2insight.
//!
//! Two groups:
//!
//! * **Generated fixture**: a small PDF is written with PDFium itself, so
//!   these run wherever PDFium can be located or downloaded and skip
//!   otherwise.
//! * **Real report**: gated behind `E2E_ENABLED` plus a fixture path, for
//!   checking against a real-world document.
//!
//! Translation is replaced by [`IdentityTranslator`] so no network calls are
//! made beyond the one-off PDFium download.
//!
//! Run the real-report group with:
//!   E2E_ENABLED=1 PDF2INSIGHT_E2E_PDF=./test_cases/report.pdf \
//!     cargo test --test e2e -- --nocapture

use edgequake_pdf2insight::{
    analyze, analyze_to_dir, inspect, AnalysisConfig, AnalysisOutput, IdentityTranslator,
    InsightError, PdfEngine, Rgb,
};
use image::{DynamicImage, Rgba, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Fixture PDF: `PDF2INSIGHT_E2E_PDF`, else `test_cases/report.pdf`.
fn fixture_pdf() -> PathBuf {
    std::env::var("PDF2INSIGHT_E2E_PDF")
        .map(PathBuf::from)
        .unwrap_or_else(|_| test_cases_dir().join("report.pdf"))
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            println!("       Set PDF2INSIGHT_E2E_PDF=/path/to/report.pdf");
            return;
        }
        p
    }};
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn offline_config(out: &std::path::Path) -> AnalysisConfig {
    AnalysisConfig::builder()
        .output_dir(out)
        .translator(Arc::new(IdentityTranslator))
        .translate_delay_ms(0)
        .build()
        .unwrap()
}

// ── Generated fixture ────────────────────────────────────────────────────────

const FIXTURE_TEXT: &str = "This report opens with a long and meaningful sentence. Short.";

/// PDFium located (or downloaded) for this machine, `None` to skip.
async fn available_engine() -> Option<PdfEngine> {
    let located = tokio::task::spawn_blocking(|| PdfEngine::locate(None, None))
        .await
        .expect("locate task");
    match located {
        Ok(engine) => Some(engine),
        Err(e) => {
            println!("SKIP — PDFium unavailable: {}", e);
            None
        }
    }
}

fn solid(rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba(rgba)))
}

/// Left half opaque red, right half fully transparent over black.
fn half_transparent() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 16, |x, _| {
        if x < 8 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    }))
}

/// Four A4 pages:
/// 1. one long and one short sentence, a 200×200 pt red image, a small blue icon
/// 2. blank
/// 3. a 200×200 pt image whose right half is transparent
/// 4. a 200×200 pt blue image wrapped in a form XObject
fn write_fixture(engine: &PdfEngine, path: &Path) -> Result<(), PdfiumError> {
    let pdfium = engine.bind().expect("PDFium binds");
    let mut document = pdfium.create_new_pdf()?;
    let font = document.fonts_mut().helvetica();
    let photo = Some(PdfPoints::new(200.0));
    let icon = Some(PdfPoints::new(30.0));

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())?;
    page.objects_mut().create_text_object(
        PdfPoints::new(40.0),
        PdfPoints::new(780.0),
        FIXTURE_TEXT,
        font,
        PdfPoints::new(10.0),
    )?;
    page.objects_mut().create_image_object(
        PdfPoints::new(100.0),
        PdfPoints::new(300.0),
        &solid([255, 0, 0, 255]),
        photo,
        photo,
    )?;
    page.objects_mut().create_image_object(
        PdfPoints::new(20.0),
        PdfPoints::new(20.0),
        &solid([0, 0, 255, 255]),
        icon,
        icon,
    )?;

    document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())?;

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())?;
    page.objects_mut().create_image_object(
        PdfPoints::new(100.0),
        PdfPoints::new(300.0),
        &half_transparent(),
        photo,
        photo,
    )?;

    let mut source = pdfium.create_new_pdf()?;
    let mut source_page = source
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())?;
    source_page.objects_mut().create_image_object(
        PdfPoints::new(100.0),
        PdfPoints::new(300.0),
        &solid([0, 0, 255, 255]),
        photo,
        photo,
    )?;
    let form = source_page
        .objects()
        .copy_into_x_object_form_object(&mut document)?;
    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())?;
    page.objects_mut().add_object(form)?;

    document.save_to_file(path)
}

/// Write the fixture and analyze it offline; `None` when PDFium is missing.
async fn analyze_fixture() -> Option<(tempfile::TempDir, AnalysisOutput)> {
    let engine = available_engine().await?;
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("fixture.pdf");

    let (e, p) = (engine.clone(), pdf.clone());
    tokio::task::spawn_blocking(move || write_fixture(&e, &p))
        .await
        .expect("fixture task")
        .expect("fixture written");

    let config = AnalysisConfig::builder()
        .output_dir(dir.path().join("out"))
        .translator(Arc::new(IdentityTranslator))
        .translate_delay_ms(0)
        .pdfium_lib_path(engine.lib_path())
        .build()
        .unwrap();
    let output = analyze(pdf.to_str().unwrap(), &config)
        .await
        .expect("analyze() on the generated fixture");
    Some((dir, output))
}

#[tokio::test(flavor = "multi_thread")]
async fn fixture_has_one_color_per_page_and_blank_page_is_white() {
    let Some((_dir, output)) = analyze_fixture().await else {
        return;
    };

    assert_eq!(output.metadata.page_count, 4);
    assert_eq!(output.page_colors.len(), 4);
    let pages: Vec<usize> = output.page_colors.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![1, 2, 3, 4]);
    assert_eq!(output.page_colors[1].color, Rgb::WHITE);
}

#[tokio::test(flavor = "multi_thread")]
async fn fixture_largest_image_wins_over_icon() {
    let Some((_dir, output)) = analyze_fixture().await else {
        return;
    };

    let c = output.page_colors[0].color;
    assert!(c.r >= 240 && c.g <= 15 && c.b <= 15, "page 1 color {:?}", c);
}

#[tokio::test(flavor = "multi_thread")]
async fn fixture_transparent_area_reads_as_page_white() {
    let Some((_dir, output)) = analyze_fixture().await else {
        return;
    };

    // Opaque red half plus white: about (255, 127, 127). The hidden black
    // pixels must not darken it.
    let c = output.page_colors[2].color;
    assert!(c.r >= 240, "page 3 color {:?}", c);
    assert!(c.g >= 100 && c.b >= 100, "page 3 color {:?}", c);
}

#[tokio::test(flavor = "multi_thread")]
async fn fixture_image_inside_form_xobject_is_found() {
    let Some((_dir, output)) = analyze_fixture().await else {
        return;
    };

    let c = output.page_colors[3].color;
    assert!(c.b >= 240 && c.r <= 15 && c.g <= 15, "page 4 color {:?}", c);
    assert!(output.stats.images_considered >= 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn fixture_keeps_only_the_long_sentence() {
    let Some((_dir, output)) = analyze_fixture().await else {
        return;
    };

    assert_eq!(output.sentences.len(), 1, "{:?}", output.sentences);
    let rec = &output.sentences[0];
    assert_eq!(rec.page, 1);
    assert!(rec.sentence.contains("long and meaningful sentence"), "{}", rec.sentence);
    assert_eq!(output.stats.pages_with_text, 1);
}

// ── Inspect ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_inspect_fixture() {
    let path = e2e_skip_unless_ready!(fixture_pdf());

    let meta = inspect(path.to_str().unwrap())
        .await
        .expect("inspect() should succeed");

    assert!(meta.page_count > 0);
    assert!(!meta.pdf_version.is_empty());
    println!("Metadata: {:?}", meta);
}

#[tokio::test]
async fn test_inspect_nonexistent() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }
    let err = inspect("/definitely/not/here.pdf").await.unwrap_err();
    assert!(matches!(err, InsightError::FileNotFound { .. }));
}

// ── Full analysis (real report) ────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_colors_cover_every_page() {
    let path = e2e_skip_unless_ready!(fixture_pdf());
    init_tracing();
    let out = tempfile::tempdir().unwrap();

    let output = analyze(path.to_str().unwrap(), &offline_config(out.path()))
        .await
        .expect("analyze() should succeed");

    assert_eq!(output.page_colors.len(), output.metadata.page_count);
    for (i, pc) in output.page_colors.iter().enumerate() {
        assert_eq!(pc.page, i + 1);
    }
    let white = output
        .page_colors
        .iter()
        .filter(|p| p.color == Rgb::WHITE)
        .count();
    println!(
        "{} pages, {} without a qualifying image, {} images sampled",
        output.page_colors.len(),
        white,
        output.stats.images_considered
    );

    for rec in &output.sentences {
        assert!(rec.sentence.chars().count() >= 20);
        assert!((-1.0..=1.0).contains(&rec.score));
    }
    assert!(output.words.len() <= 100);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analyze_to_dir_writes_reports() {
    let path = e2e_skip_unless_ready!(fixture_pdf());
    init_tracing();
    let out = tempfile::tempdir().unwrap();
    let out_dir = out.path().join("Çıktı");

    let (output, files) = analyze_to_dir(path.to_str().unwrap(), &offline_config(&out_dir))
        .await
        .expect("analyze_to_dir() should succeed");

    assert!(files.workbook.is_file());
    assert_eq!(files.sentiment_chart.is_some(), !output.sentences.is_empty());
    assert!(files.color_chart.is_some());
    println!("Stats: {:#?}", output.stats);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_runs_are_deterministic() {
    let path = e2e_skip_unless_ready!(fixture_pdf());
    init_tracing();
    let out = tempfile::tempdir().unwrap();
    let config = offline_config(out.path());

    let a = analyze(path.to_str().unwrap(), &config).await.unwrap();
    let b = analyze(path.to_str().unwrap(), &config).await.unwrap();
    assert_eq!(a.sentences, b.sentences);
    assert_eq!(a.words, b.words);
    assert_eq!(a.page_colors, b.page_colors);
}
