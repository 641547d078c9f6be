//! Machine translation into the pivot language sentiment is scored in.
//!
//! The [`Translator`] trait is the seam: the pipeline only ever sees
//! `Arc<dyn Translator>`, so tests inject deterministic stubs and
//! `--no-translate` swaps in [`IdentityTranslator`].
//!
//! ## Rate limiting
//!
//! The public endpoint throttles aggressively. All workers share one
//! [`RateLimiter`] that spaces call *starts* by a fixed interval, so the
//! collective request rate stays at `1000 / delay_ms` per second no matter
//! how many workers are in flight.

use crate::error::ItemError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translates one piece of text between two languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` (`"auto"` to detect) into `target`.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ItemError>;

    /// Short name used in logs and `Debug` output.
    fn name(&self) -> &str;
}

/// Google Translate's keyless web endpoint (`client=gtx`).
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(timeout: Duration) -> Result<Self, ItemError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pdf2insight/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ItemError::TranslationFailed {
                detail: format!("cannot build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: GOOGLE_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different base URL, e.g. a local test server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ItemError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(ItemError::TranslationTransient {
                detail: format!("HTTP {}", status),
            });
        }
        if !status.is_success() {
            return Err(ItemError::TranslationFailed {
                detail: format!("HTTP {}", status),
            });
        }

        let body: Value = response.json().await.map_err(|e| ItemError::TranslationFailed {
            detail: format!("unparseable response: {}", e),
        })?;
        parse_google_response(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}

fn classify_request_error(e: reqwest::Error) -> ItemError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        ItemError::TranslationTransient {
            detail: e.to_string(),
        }
    } else {
        ItemError::TranslationFailed {
            detail: e.to_string(),
        }
    }
}

/// Join the translated segments of a `translate_a/single` answer.
///
/// The body looks like `[[["Hello","Merhaba",…],["world","dünya",…]],…]`;
/// each inner array's first element is one translated segment.
pub fn parse_google_response(body: &Value) -> Result<String, ItemError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ItemError::TranslationFailed {
            detail: "response has no segment list".into(),
        })?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(ItemError::TranslationFailed {
            detail: "empty translation".into(),
        });
    }
    Ok(translated)
}

/// Returns the input unchanged. Used with `--no-translate` and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, ItemError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Spaces the start of successive calls by at least `interval`.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until this caller's slot comes up.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        let wait_until = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let start = match *slot {
                Some(t) if t > now => t,
                _ => now,
            };
            *slot = Some(start + self.interval);
            start
        };
        if wait_until > Instant::now() {
            debug!("rate limiter: waiting {:?}", wait_until - Instant::now());
            tokio::time::sleep_until(wait_until).await;
        }
    }
}
