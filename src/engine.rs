//! PDFium engine preflight: locate, download if needed, and bind the library.
//!
//! The pipeline never binds PDFium implicitly. [`PdfEngine::locate`] runs once
//! from the orchestrator (or from the CLI, which wants to show a download
//! bar) and either returns a usable library path or fails with
//! [`InsightError::EngineUnavailable`].
//!
//! Lookup order, first match wins:
//!
//! 1. explicit path from [`crate::AnalysisConfig::pdfium_lib_path`]
//! 2. `PDFIUM_LIB_PATH`
//! 3. cached copy in `<cache>/pdf2insight/pdfium-{VERSION}/`
//!    (`PDFIUM_AUTO_CACHE_DIR` overrides `<cache>`)
//! 4. download from bblanchon/pdfium-binaries into that cache

use crate::error::InsightError;
use pdfium_render::prelude::Pdfium;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, warn};

/// pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

const BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Download progress: `(bytes_so_far, total_if_known)`.
pub type DownloadProgress<'a> = &'a dyn Fn(u64, Option<u64>);

static DOWNLOADED: OnceLock<PathBuf> = OnceLock::new();

/// One download at a time per process; later callers find the cached copy.
static DOWNLOAD_LOCK: Mutex<()> = Mutex::new(());

/// A located PDFium shared library.
///
/// Cheap to clone and `Send`, so it can be moved into `spawn_blocking`
/// closures; each closure binds its own [`Pdfium`] handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEngine {
    lib_path: PathBuf,
}

impl PdfEngine {
    /// Use the library at `path` without any lookup.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, InsightError> {
        let lib_path = path.into();
        if !lib_path.is_file() {
            return Err(InsightError::EngineUnavailable(format!(
                "'{}' does not exist",
                lib_path.display()
            )));
        }
        Ok(Self { lib_path })
    }

    /// Run the lookup chain, downloading the library when nothing is found.
    ///
    /// Blocking: call from `spawn_blocking` or `block_in_place`.
    pub fn locate(
        explicit: Option<&Path>,
        on_progress: Option<DownloadProgress<'_>>,
    ) -> Result<Self, InsightError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
            let p = PathBuf::from(env_path);
            if p.is_file() {
                debug!("Using PDFium from PDFIUM_LIB_PATH: {}", p.display());
                return Ok(Self { lib_path: p });
            }
            warn!("PDFIUM_LIB_PATH '{}' not found; falling back to cache", p.display());
        }

        if let Some(p) = DOWNLOADED.get() {
            return Ok(Self { lib_path: p.clone() });
        }

        let platform = Platform::detect()?;
        let cached = cache_dir().join(platform.lib_name);
        if cached.is_file() {
            debug!("Using cached PDFium: {}", cached.display());
            return Ok(Self { lib_path: cached });
        }

        let _guard = DOWNLOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        if cached.is_file() {
            return Ok(Self { lib_path: cached });
        }
        let path = download_library(&platform, &cached, on_progress)?;
        let _ = DOWNLOADED.set(path.clone());
        Ok(Self { lib_path: path })
    }

    /// `true` when [`PdfEngine::locate`] would not need the network.
    pub fn is_available_offline(explicit: Option<&Path>) -> bool {
        if let Some(p) = explicit {
            return p.is_file();
        }
        if std::env::var("PDFIUM_LIB_PATH")
            .map(|p| Path::new(&p).is_file())
            .unwrap_or(false)
        {
            return true;
        }
        Platform::detect()
            .map(|p| cache_dir().join(p.lib_name).is_file())
            .unwrap_or(false)
    }

    pub fn lib_path(&self) -> &Path {
        &self.lib_path
    }

    /// Load the library and return a fresh [`Pdfium`] handle.
    pub fn bind(&self) -> Result<Pdfium, InsightError> {
        Pdfium::bind_to_library(&self.lib_path)
            .map(Pdfium::new)
            .map_err(|e| {
                InsightError::EngineUnavailable(format!(
                    "failed to load '{}': {:?}",
                    self.lib_path.display(),
                    e
                ))
            })
    }
}

/// Per-version cache directory for the downloaded library.
pub fn cache_dir() -> PathBuf {
    let base = std::env::var("PDFIUM_AUTO_CACHE_DIR")
        .map(PathBuf::from)
        .ok()
        .or_else(|| dirs::cache_dir().map(|d| d.join("pdf2insight")))
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache").join("pdf2insight")))
        .unwrap_or_else(|| std::env::temp_dir().join("pdf2insight"));
    base.join(format!("pdfium-{PDFIUM_VERSION}"))
}

// ── Platform table ───────────────────────────────────────────────────────────

struct Platform {
    archive: &'static str,
    member: &'static str,
    lib_name: &'static str,
}

impl Platform {
    fn detect() -> Result<Self, InsightError> {
        let (archive, member, lib_name) = match (std::env::consts::OS, std::env::consts::ARCH) {
            ("macos", "aarch64") => ("pdfium-mac-arm64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib"),
            ("macos", "x86_64") => ("pdfium-mac-x64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib"),
            ("linux", "x86_64") => ("pdfium-linux-x64.tgz", "lib/libpdfium.so", "libpdfium.so"),
            ("linux", "aarch64") => ("pdfium-linux-arm64.tgz", "lib/libpdfium.so", "libpdfium.so"),
            ("windows", "x86_64") => ("pdfium-win-x64.tgz", "bin/pdfium.dll", "pdfium.dll"),
            ("windows", "aarch64") => ("pdfium-win-arm64.tgz", "bin/pdfium.dll", "pdfium.dll"),
            (os, arch) => {
                return Err(InsightError::EngineUnavailable(format!(
                    "no prebuilt PDFium for {os}/{arch}"
                )))
            }
        };
        Ok(Self {
            archive,
            member,
            lib_name,
        })
    }
}

// ── Download ─────────────────────────────────────────────────────────────────

fn download_library(
    platform: &Platform,
    dest: &Path,
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<PathBuf, InsightError> {
    let url = format!("{BASE_URL}/chromium%2F{PDFIUM_VERSION}/{}", platform.archive);
    info!("Downloading PDFium from {}", url);

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            InsightError::EngineUnavailable(format!("cannot create {}: {e}", parent.display()))
        })?;
    }

    let archive = fetch(&url, on_progress)?;
    unpack_member(&archive, platform.member, dest)?;
    info!("PDFium cached at {}", dest.display());
    Ok(dest.to_path_buf())
}

fn fetch(url: &str, on_progress: Option<DownloadProgress<'_>>) -> Result<Vec<u8>, InsightError> {
    let unavailable = |msg: String| InsightError::EngineUnavailable(msg);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdf2insight/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| unavailable(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| unavailable(format!("GET {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(unavailable(format!("HTTP {} for {url}", response.status())));
    }

    let total = response.content_length();
    let mut buf = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; 64 * 1024];
    loop {
        match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(cb) = on_progress {
                    cb(buf.len() as u64, total);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(unavailable(format!("read error: {e}"))),
        }
    }
    Ok(buf)
}

/// Extract the single file `member` from a `.tgz` archive into `dest`.
///
/// The file is written next to `dest` and renamed into place, so a
/// concurrent reader never sees a partial library.
fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), InsightError> {
    let broken = |e: std::io::Error| InsightError::EngineUnavailable(format!("bad archive: {e}"));
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));

    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(archive));
    for entry in tar.entries().map_err(broken)? {
        let mut entry = entry.map_err(broken)?;
        let is_member = entry.path().map_err(broken)?.to_string_lossy() == member;
        if is_member {
            let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(broken)?;
            std::io::copy(&mut entry, &mut tmp).map_err(broken)?;
            tmp.persist(dest).map_err(|e| broken(e.error))?;
            return Ok(());
        }
    }
    Err(InsightError::EngineUnavailable(format!(
        "'{member}' not found in archive"
    )))
}
