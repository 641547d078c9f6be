//! PDFium access: page text, embedded-image colors and document metadata.
//!
//! pdfium wraps a C++ library with thread-local state, so every function
//! here is a thin async shell around a blocking body run in
//! `spawn_blocking`. Each body binds its own [`Pdfium`] handle from the
//! located [`PdfEngine`] and opens the document independently.

use crate::engine::PdfEngine;
use crate::error::{InsightError, ItemError};
use crate::output::{DocumentMetadata, PageColor};
use crate::pipeline::color::ColorPicker;
use crate::progress::{ProgressCallback, Stage};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image-selection settings handed to the color extractor.
#[derive(Debug, Clone, Copy)]
pub struct ColorSettings {
    pub min_area: f32,
    pub sample_size: u32,
}

/// Per-page colors plus the image tallies behind them.
#[derive(Debug, Clone, Default)]
pub struct ColorExtraction {
    pub colors: Vec<PageColor>,
    pub images_considered: usize,
    pub images_failed: usize,
}

/// Raw text of every page, in page order. `None` for pages without text.
pub async fn extract_page_texts(
    engine: &PdfEngine,
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<Option<String>>, InsightError> {
    let engine = engine.clone();
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || page_texts_blocking(&engine, &path, password.as_deref()))
        .await
        .map_err(|e| InsightError::Internal(format!("Text extraction task panicked: {}", e)))?
}

fn page_texts_blocking(
    engine: &PdfEngine,
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<Option<String>>, InsightError> {
    let pdfium = engine.bind()?;
    let document = open_document(&pdfium, pdf_path, password)?;

    let mut texts = Vec::with_capacity(document.pages().len() as usize);
    for (idx, page) in document.pages().iter().enumerate() {
        // A page whose text layer cannot be read is treated like an empty page.
        let text = match page.text() {
            Ok(t) => t.all(),
            Err(e) => {
                debug!("Page {}: no text layer ({:?})", idx + 1, e);
                String::new()
            }
        };
        texts.push(if text.trim().is_empty() { None } else { Some(text) });
    }

    info!(
        "Extracted text from {}/{} pages",
        texts.iter().filter(|t| t.is_some()).count(),
        texts.len()
    );
    Ok(texts)
}

/// One representative color per page, in page order.
///
/// `progress` receives a [`Stage::Colors`] event as each page finishes.
pub async fn extract_page_colors(
    engine: &PdfEngine,
    pdf_path: &Path,
    password: Option<&str>,
    settings: ColorSettings,
    progress: Option<ProgressCallback>,
) -> Result<ColorExtraction, InsightError> {
    let engine = engine.clone();
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        page_colors_blocking(&engine, &path, password.as_deref(), settings, progress)
    })
    .await
    .map_err(|e| InsightError::Internal(format!("Color extraction task panicked: {}", e)))?
}

fn page_colors_blocking(
    engine: &PdfEngine,
    pdf_path: &Path,
    password: Option<&str>,
    settings: ColorSettings,
    progress: Option<ProgressCallback>,
) -> Result<ColorExtraction, InsightError> {
    let pdfium = engine.bind()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    let total_pages = document.pages().len() as usize;

    let mut out = ColorExtraction::default();
    for (idx, page) in document.pages().iter().enumerate() {
        let page_num = idx + 1;
        let mut picker = ColorPicker::new(page_num, settings.min_area, settings.sample_size);

        for object in page.objects().iter() {
            offer_object(&object, &document, &mut picker, page_num, 0);
        }

        let sample = picker.finish();
        out.images_considered += sample.considered;
        out.images_failed += sample.failed;
        out.colors.push(PageColor {
            page: page_num,
            color: sample.color,
        });
        if let Some(ref cb) = progress {
            cb.on_page_processed(Stage::Colors, page_num, total_pages);
        }
    }

    Ok(out)
}

/// Form XObjects nest deeper than this are not searched.
const MAX_FORM_DEPTH: usize = 8;

/// Offer `object` to the picker, descending into form XObjects so images
/// wrapped in a reusable group still count. Each image is measured by its
/// own bounds.
fn offer_object(
    object: &PdfPageObject,
    document: &PdfDocument,
    picker: &mut ColorPicker,
    page_num: usize,
    depth: usize,
) {
    if let Some(form) = object.as_x_object_form_object() {
        if depth >= MAX_FORM_DEPTH {
            debug!("Page {}: form nesting deeper than {}", page_num, MAX_FORM_DEPTH);
            return;
        }
        for child in form.iter() {
            offer_object(&child, document, picker, page_num, depth + 1);
        }
        return;
    }

    let Some(image) = object.as_image_object() else {
        return;
    };

    let area = match (object.width(), object.height()) {
        (Ok(w), Ok(h)) => w.value * h.value,
        (Err(e), _) | (_, Err(e)) => {
            picker.record_failure(ItemError::ImageFailed {
                page: page_num,
                detail: format!("bounds unavailable: {:?}", e),
            });
            return;
        }
    };

    picker.offer(area, || visible_image(image, document, page_num));
}

/// The image as drawn: filters and masks applied. Falls back to the raw
/// bitmap when PDFium cannot render the object on its own.
fn visible_image(
    image: &PdfPageImageObject,
    document: &PdfDocument,
    page_num: usize,
) -> Result<DynamicImage, ItemError> {
    match image.get_processed_image(document) {
        Ok(img) => Ok(img),
        Err(e) => {
            debug!("Page {}: processed image unavailable ({:?}), using raw bitmap", page_num, e);
            image.get_raw_image().map_err(|e| ItemError::ImageFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })
        }
    }
}

/// Extract document metadata without touching page content.
pub async fn extract_metadata(
    engine: &PdfEngine,
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, InsightError> {
    let engine = engine.clone();
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || metadata_blocking(&engine, &path, password.as_deref()))
        .await
        .map_err(|e| InsightError::Internal(format!("Metadata task panicked: {}", e)))?
}

fn metadata_blocking(
    engine: &PdfEngine,
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, InsightError> {
    let pdfium = engine.bind()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    let metadata = document.metadata();

    let tag = |kind: PdfDocumentMetadataTagType| -> Option<String> {
        metadata
            .get(kind)
            .map(|t| t.value().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(DocumentMetadata {
        title: tag(PdfDocumentMetadataTagType::Title),
        author: tag(PdfDocumentMetadataTagType::Author),
        subject: tag(PdfDocumentMetadataTagType::Subject),
        creator: tag(PdfDocumentMetadataTagType::Creator),
        producer: tag(PdfDocumentMetadataTagType::Producer),
        creation_date: tag(PdfDocumentMetadataTagType::CreationDate),
        modification_date: tag(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

/// Open `pdf_path`, mapping pdfium's load error onto the fatal error kinds.
fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, InsightError> {
    pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path.to_path_buf(), format!("{:?}", e), password.is_some()))
}

fn classify_load_error(path: PathBuf, detail: String, had_password: bool) -> InsightError {
    if detail.to_lowercase().contains("password") {
        if had_password {
            InsightError::WrongPassword { path }
        } else {
            InsightError::PasswordRequired { path }
        }
    } else {
        InsightError::CorruptPdf { path, detail }
    }
}
