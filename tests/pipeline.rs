//! Integration tests for the PDF-free part of the pipeline.
//!
//! Page text is fed straight into [`ReportAnalyzer::analyze_page_texts`]
//! with deterministic stub translators and scorers, so these tests need
//! neither PDFium nor network access.

use async_trait::async_trait;
use edgequake_pdf2insight::pipeline::stopwords::StopwordSet;
use edgequake_pdf2insight::pipeline::wordfreq::count_words;
use edgequake_pdf2insight::{
    AnalysisConfig, AnalysisProgressCallback, IdentityTranslator, ItemError, ReportAnalyzer,
    SentimentLabel, SentimentScorer, Stage, Translator,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Stubs ────────────────────────────────────────────────────────────────────

/// Scores by looking up the whole text; unknown text scores 0.
struct TableScorer(Vec<(&'static str, f64)>);

impl SentimentScorer for TableScorer {
    fn polarity(&self, text: &str) -> Result<f64, ItemError> {
        Ok(self
            .0
            .iter()
            .find(|(k, _)| text.contains(k))
            .map(|(_, v)| *v)
            .unwrap_or(0.0))
    }

    fn name(&self) -> &str {
        "table"
    }
}

/// Uppercases, fails on anything containing `FAIL`, and sleeps a
/// text-dependent time so completions arrive out of order.
struct ShoutingTranslator {
    calls: AtomicUsize,
}

#[async_trait]
impl Translator for ShoutingTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, ItemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis((text.len() % 7) as u64 * 3)).await;
        if text.contains("FAIL") {
            return Err(ItemError::TranslationTransient {
                detail: "HTTP 503".into(),
            });
        }
        if text.contains("BROKEN") {
            return Err(ItemError::TranslationFailed {
                detail: "empty translation".into(),
            });
        }
        Ok(text.to_uppercase())
    }

    fn name(&self) -> &str {
        "shouting"
    }
}

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<(Stage, usize)>>,
    stages: Mutex<Vec<Stage>>,
}

impl AnalysisProgressCallback for RecordingCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn on_page_processed(&self, stage: Stage, page: usize, _total_pages: usize) {
        self.events.lock().unwrap().push((stage, page));
    }
}

fn config(dir: &Path) -> edgequake_pdf2insight::AnalysisConfigBuilder {
    AnalysisConfig::builder()
        .output_dir(dir)
        .translator(Arc::new(IdentityTranslator))
        .translate_delay_ms(0)
}

fn page(text: &str) -> Option<String> {
    Some(text.to_string())
}

// ── Sentiment stage ──────────────────────────────────────────────────────────

#[tokio::test]
async fn short_fragment_is_dropped_and_long_one_kept() {
    let dir = tempfile::tempdir().unwrap();
    let mut analyzer = ReportAnalyzer::new(config(dir.path()).build().unwrap()).unwrap();

    let records = analyzer
        .analyze_page_texts(vec![page(
            "Bu raporun birinci cümlesi oldukça uzun ve anlamlıdır. Kısa.",
        )])
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page, 1);
    assert_eq!(
        records[0].sentence,
        "Bu raporun birinci cümlesi oldukça uzun ve anlamlıdır"
    );
    let stats = &analyzer.output().stats;
    assert_eq!(stats.fragments_found, 3);
    assert_eq!(stats.fragments_too_short, 2);
    assert_eq!(stats.sentences_scored, 1);
}

#[tokio::test]
async fn labels_follow_thresholds_with_neutral_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let scorer = TableScorer(vec![
        ("alpha", 0.1),
        ("bravo", -0.1),
        ("charlie", 0.35),
        ("delta", -0.6),
    ]);
    let cfg = config(dir.path()).scorer(Arc::new(scorer)).build().unwrap();
    let mut analyzer = ReportAnalyzer::new(cfg).unwrap();

    let records = analyzer
        .analyze_page_texts(vec![page(
            "alpha sentence long enough to count. bravo sentence long enough to count. \
             charlie sentence long enough to count. delta sentence long enough to count.",
        )])
        .await;

    let labels: Vec<_> = records.iter().map(|r| r.label).collect();
    assert_eq!(
        labels,
        vec![
            SentimentLabel::Neutral,
            SentimentLabel::Neutral,
            SentimentLabel::Positive,
            SentimentLabel::Negative
        ]
    );
}

#[tokio::test]
async fn failures_are_dropped_counted_and_order_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let translator = Arc::new(ShoutingTranslator {
        calls: AtomicUsize::new(0),
    });
    let cb = Arc::new(RecordingCallback::default());
    let cfg = config(dir.path())
        .translator(translator.clone())
        .scorer(Arc::new(TableScorer(vec![("GOOD", 0.5)])))
        .concurrency(3)
        .progress_callback(cb.clone())
        .build()
        .unwrap();
    let mut analyzer = ReportAnalyzer::new(cfg).unwrap();

    let pages = vec![
        page("first page has a good sentence here. this one will FAIL in transit"),
        None,
        page("third page sentence is fine and long. BROKEN translation sentence here"),
        page("   "),
        page("fifth page closes with a good ending"),
    ];
    let records = analyzer.analyze_page_texts(pages).await.to_vec();

    let got: Vec<(usize, &str)> = records.iter().map(|r| (r.page, r.sentence.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (1, "first page has a good sentence here"),
            (3, "third page sentence is fine and long"),
            (5, "fifth page closes with a good ending"),
        ]
    );
    assert_eq!(records[0].score, 0.5);
    assert_eq!(records[1].score, 0.0);

    let stats = &analyzer.output().stats;
    assert_eq!(translator.calls.load(Ordering::SeqCst), 5);
    assert_eq!(stats.sentences_skipped, 2);
    assert_eq!(stats.transient_failures, 1);
    assert_eq!(stats.pages_with_text, 3);

    // One event per page, in page order, including pages without text.
    let events = cb.events.lock().unwrap().clone();
    assert_eq!(
        events,
        (1..=5).map(|p| (Stage::Sentiment, p)).collect::<Vec<_>>()
    );
    assert_eq!(*cb.stages.lock().unwrap(), vec![Stage::Sentiment]);
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let run = || async {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path())
            .scorer(Arc::new(TableScorer(vec![("büyüme", 0.4), ("zarar", -0.4)])))
            .concurrency(4)
            .build()
            .unwrap();
        let mut analyzer = ReportAnalyzer::new(cfg).unwrap();
        analyzer
            .analyze_page_texts(vec![
                page("Şirketimiz bu yıl güçlü bir büyüme gösterdi. Kur farkı nedeniyle zarar oluştu"),
                page("Yeni yatırımlar üçüncü çeyrekte devreye alındı. Enerji tüketimi azaltıldı"),
            ])
            .await;
        analyzer.count_words();
        let out = analyzer.into_output();
        (out.sentences, out.words)
    };

    let first = run().await;
    let second = run().await;
    assert_eq!(first, second);
    assert_eq!(first.0.len(), 4);
}

// ── Word stage ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn word_table_excludes_stopwords_and_short_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path()).extra_stopwords(["şirket"]).build().unwrap();
    let mut analyzer = ReportAnalyzer::new(cfg).unwrap();
    analyzer
        .analyze_page_texts(vec![
            page("Şirket ve enerji. Bu yıl enerji ve su için yatırım"),
            page("İstanbul'da enerji, su ve yatırım"),
        ])
        .await;
    let words = analyzer.count_words().to_vec();

    let stop = StopwordSet::builtin();
    for w in &words {
        assert!(w.word.chars().count() > 2, "short token {}", w.word);
        assert!(!stop.contains(&w.word), "stopword {}", w.word);
        assert_ne!(w.word, "şirket");
    }
    assert_eq!(words[0].word, "enerji");
    assert_eq!(words[0].count, 3);
    assert_eq!(words[1].word, "yatırım");
    assert!(words.iter().any(|w| w.word == "istanbulda"));
    assert!(words.windows(2).all(|p| p[0].count >= p[1].count));
}

#[test]
fn word_table_is_capped() {
    let text: String = (0..300).map(|i| format!("terim{} ", i % 150)).collect();
    let out = count_words(&text, &StopwordSet::builtin(), 3, 100);
    assert_eq!(out.words.len(), 100);
    assert!(out.words.iter().all(|w| w.count == 2));
    assert_eq!(out.words[0].word, "terim0");
    assert_eq!(out.words[99].word, "terim99");
}

// ── Report stage ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn no_sentences_means_no_sentiment_chart() {
    let dir = tempfile::tempdir().unwrap();
    let mut analyzer = ReportAnalyzer::new(config(dir.path()).build().unwrap()).unwrap();
    analyzer.analyze_page_texts(vec![page("Kısa. Çok kısa."), None]).await;
    analyzer.count_words();

    let files = analyzer.write_reports().await.unwrap();
    assert!(files.workbook.is_file());
    assert!(files.sentiment_chart.is_none());
    assert!(!dir.path().join("Duygu_Grafigi.png").exists());
}

#[tokio::test]
async fn sentences_produce_a_nonempty_chart() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("Çıktı");
    let mut analyzer = ReportAnalyzer::new(config(&out_dir).build().unwrap()).unwrap();
    analyzer
        .analyze_page_texts(vec![page(
            "The results were excellent this year. Costs declined but risks remained high",
        )])
        .await;
    analyzer.count_words();

    let files = analyzer.write_reports().await.unwrap();
    let chart = files.sentiment_chart.expect("chart written");
    assert_eq!(chart, out_dir.join("Duygu_Grafigi.png"));
    let bytes = std::fs::read(&chart).unwrap();
    assert!(!bytes.is_empty());
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 600));

    assert!(std::fs::metadata(&files.workbook).unwrap().len() > 0);
    // No PDF was prepared, so there are no page colors to draw.
    assert!(files.color_chart.is_none());
}
