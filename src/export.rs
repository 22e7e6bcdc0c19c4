//! Getting wallpapers out of the app: download, share, inspect.
//!
//! Structure:
//! - Pure functions: data URI parsing, filenames, PNG header inspection
//! - Effect functions: writing files, launching the platform opener

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::types::GeneratedImageRecord;

/// Name given to the file handed to the share target.
const SHARE_FILENAME: &str = "wallpaper.png";

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported image reference (expected a data URI or http(s) URL)")]
    InvalidReference,

    #[error("image data is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("could not fetch image: {0}")]
    Fetch(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no program available to open files on this platform")]
    NoOpener,
}

/// What the preview knows about an image without drawing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub mime: String,
    pub bytes: u64,
    /// Pixel size, when the header is a PNG we can read.
    pub dimensions: Option<(u32, u32)>,
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Returns the default download directory.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::picture_dir)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `wallpaper-<millis>.png`
pub fn download_filename(millis: i64) -> String {
    format!("wallpaper-{}.png", millis)
}

/// Split a base64 data URI into (mime, payload).
pub fn parse_data_uri(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

/// Width and height from a PNG IHDR chunk.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 || !bytes.starts_with(PNG_SIGNATURE) || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

/// Decode an inline image. Plain URLs have nothing to decode.
pub fn decode_inline(url: &str) -> Result<Option<Vec<u8>>, ExportError> {
    match parse_data_uri(url) {
        Some((_, payload)) => Ok(Some(BASE64.decode(payload.trim())?)),
        None if is_remote(url) => Ok(None),
        None => Err(ExportError::InvalidReference),
    }
}

/// Describe an inline image. Remote URLs yield None.
pub fn inspect(url: &str) -> Option<ImageInfo> {
    let (mime, _) = parse_data_uri(url)?;
    let bytes = decode_inline(url).ok()??;
    Some(ImageInfo {
        mime: mime.to_string(),
        bytes: bytes.len() as u64,
        dimensions: png_dimensions(&bytes),
    })
}

fn is_remote(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Image bytes for any supported reference, fetching remote ones.
pub fn load_bytes(url: &str) -> Result<Vec<u8>, ExportError> {
    if let Some(bytes) = decode_inline(url)? {
        return Ok(bytes);
    }
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ExportError::Fetch(e.to_string()))?;
    let bytes = response
        .bytes()
        .map_err(|e| ExportError::Fetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Save a wallpaper into `dir`, named after the current time.
pub fn download(record: &GeneratedImageRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    download_at(record, dir, chrono::Utc::now().timestamp_millis())
}

/// Save a wallpaper into `dir` as `wallpaper-<millis>.png`.
pub fn download_at(
    record: &GeneratedImageRecord,
    dir: &Path,
    millis: i64,
) -> Result<PathBuf, ExportError> {
    let bytes = load_bytes(&record.url)?;
    let path = dir.join(download_filename(millis));
    write_file(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wallpaper saved");
    Ok(path)
}

/// Offer a wallpaper to the platform's default handler.
///
/// The image is written to a temporary file first.
pub fn share(record: &GeneratedImageRecord) -> Result<PathBuf, ExportError> {
    let bytes = load_bytes(&record.url)?;
    let path = std::env::temp_dir()
        .join(format!("wallcraft-{}", record.id))
        .join(SHARE_FILENAME);
    write_file(&path, &bytes)?;

    let mut command = opener_command(&path).ok_or(ExportError::NoOpener)?;
    command.spawn().map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)
}

fn opener_command(path: &Path) -> Option<Command> {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        Some(cmd)
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        Some(cmd)
    } else if cfg!(unix) {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        Some(cmd)
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    /// A PNG header claiming 1080x1920, enough for `png_dimensions`.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&1080u32.to_be_bytes());
        bytes.extend_from_slice(&1920u32.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    pub(crate) fn tiny_png_uri() -> String {
        format!("data:image/png;base64,{}", BASE64.encode(tiny_png()))
    }

    fn record_with(url: String) -> GeneratedImageRecord {
        GeneratedImageRecord::new(url, "a lake", Utc.timestamp_millis_opt(5).unwrap())
    }

    #[test]
    fn parse_data_uri_splits_mime_and_payload() {
        assert_eq!(
            parse_data_uri("data:image/png;base64,AAAA"),
            Some(("image/png", "AAAA"))
        );
        assert_eq!(parse_data_uri("data:image/png,AAAA"), None);
        assert_eq!(parse_data_uri("https://example.com/a.png"), None);
    }

    #[test]
    fn png_dimensions_reads_ihdr() {
        assert_eq!(png_dimensions(&tiny_png()), Some((1080, 1920)));
        assert_eq!(png_dimensions(b"GIF89a"), None);
    }

    #[test]
    fn inspect_reports_size_and_dimensions() {
        let info = inspect(&tiny_png_uri()).unwrap();
        assert_eq!(info.mime, "image/png");
        assert_eq!(info.bytes, tiny_png().len() as u64);
        assert_eq!(info.dimensions, Some((1080, 1920)));
        assert!(inspect("https://example.com/a.png").is_none());
    }

    #[test]
    fn download_writes_timestamped_png() {
        let temp = TempDir::new().unwrap();
        let record = record_with(tiny_png_uri());
        let path = download_at(&record, temp.path(), 1234).unwrap();

        assert_eq!(path, temp.path().join("wallpaper-1234.png"));
        assert_eq!(fs::read(&path).unwrap(), tiny_png());
    }

    #[test]
    fn bad_base64_is_a_decode_error() {
        let temp = TempDir::new().unwrap();
        let record = record_with("data:image/png;base64,@@@".to_string());
        assert!(matches!(
            download_at(&record, temp.path(), 1),
            Err(ExportError::Decode(_))
        ));
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(matches!(
            decode_inline("ftp://example.com/a.png"),
            Err(ExportError::InvalidReference)
        ));
        assert!(matches!(decode_inline("https://example.com/a.png"), Ok(None)));
    }

    #[test]
    fn download_filename_format() {
        assert_eq!(download_filename(1700000000000), "wallpaper-1700000000000.png");
    }
}
