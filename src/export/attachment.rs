//! Save attachments to disk and hand them to the system viewer.

use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use tempfile::TempDir;

use crate::error::{EmlError, Result};
use crate::viewer::actions::{DownloadRequest, FileHost};
use crate::viewer::MessageViewer;

/// Longest filename kept when sanitizing attachment names.
const MAX_NAME_LEN: usize = 150;

/// Base64 engine for attachment payloads: padding optional, stray trailing bits accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Launches the system viewer for a file on disk.
pub type Launcher = fn(&Path) -> Result<()>;

/// [`FileHost`] writing downloads into a directory.
///
/// Files opened for viewing go to a temporary directory that lives as long as
/// the host.
#[derive(Debug)]
pub struct DiskHost {
    download_dir: PathBuf,
    view_dir: Option<TempDir>,
    launch: Launcher,
}

impl DiskHost {
    /// Host saving into `download_dir` and opening files with the default browser.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self::with_launcher(download_dir, open_in_browser)
    }

    pub fn with_launcher(download_dir: impl Into<PathBuf>, launch: Launcher) -> Self {
        Self {
            download_dir: download_dir.into(),
            view_dir: None,
            launch,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Directory viewed attachments are materialized in, created on first use.
    fn view_dir(&mut self) -> Result<&Path> {
        let dir = match self.view_dir.take() {
            Some(dir) => dir,
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("emlshell-")
                    .tempdir()
                    .map_err(|e| EmlError::io(std::env::temp_dir(), e))?;
                tracing::debug!(path = %dir.path().display(), "Created view directory");
                dir
            }
        };
        Ok(self.view_dir.insert(dir).path())
    }
}

impl FileHost for DiskHost {
    fn download(&mut self, request: DownloadRequest) -> Result<PathBuf> {
        let (file_name, bytes) = match request {
            DownloadRequest::Blob {
                file_name, bytes, ..
            } => (file_name, bytes),
            DownloadRequest::DataUri { file_name, uri } => {
                let bytes = decode_data_uri(&uri)?;
                (file_name, bytes)
            }
        };
        std::fs::create_dir_all(&self.download_dir)
            .map_err(|e| EmlError::io(&self.download_dir, e))?;
        write_unique(&self.download_dir, &file_name, &bytes)
    }

    fn open_external(&mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.view_dir()?.to_path_buf();
        let path = write_unique(&dir, file_name, bytes)?;
        tracing::info!(path = %path.display(), content_type, "Opening with system viewer");
        (self.launch)(&path)
    }
}

/// Write `bytes` under a sanitized, non-clashing version of `file_name`.
pub fn write_unique(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = unique_path(&dir.join(sanitize_filename_part(file_name, MAX_NAME_LEN)));
    std::fs::write(&path, bytes).map_err(|e| EmlError::io(&path, e))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved attachment");
    Ok(path)
}

/// Decode the payload of a base64 `data:` URI.
///
/// A payload that is not valid base64 even for the lenient engine is saved
/// as its text. Only a URI that is not a base64 `data:` URI is an error.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EmlError::InvalidDataUri("missing data: scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EmlError::InvalidDataUri("missing ',' separator".into()))?;
    if !meta.ends_with(";base64") {
        return Err(EmlError::InvalidDataUri("not base64 encoded".into()));
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    match LENIENT.decode(&compact) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Payload is not valid base64, saving it as text");
            Ok(compact.into_bytes())
        }
    }
}

/// Download every attachment of the loaded message.
///
/// Failures are logged and skipped. `progress` receives `(done, total)`.
pub fn download_all(
    viewer: &MessageViewer,
    host: &mut dyn FileHost,
    progress: &dyn Fn(usize, usize),
) -> Vec<PathBuf> {
    let total = viewer
        .loaded()
        .map_or(0, |loaded| loaded.message.attachments.len());
    let mut paths = Vec::new();
    for index in 0..total {
        progress(index, total);
        match viewer.download_attachment(index, host) {
            Ok(path) => paths.push(path),
            Err(e) => tracing::warn!(index, error = %e, "Failed to download attachment"),
        }
    }
    progress(total, total);
    paths
}

fn open_in_browser(path: &Path) -> Result<()> {
    let target = url::Url::from_file_path(path)
        .map(String::from)
        .unwrap_or_else(|()| path.to_string_lossy().into_owned());
    webbrowser::open(&target).map_err(|e| EmlError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Replace characters that are unsafe in filenames.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '@' | ' ' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();
    let sanitized = sanitized.trim().trim_start_matches('.');

    if sanitized.is_empty() {
        "attachment".to_string()
    } else {
        sanitized.to_string()
    }
}

/// If `path` already exists, append a counter to make it unique.
fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut i = 1u32;
    loop {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_launch(_: &Path) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename_part("report.pdf", 150), "report.pdf");
        assert_eq!(sanitize_filename_part("../../etc/passwd", 150), "_.._etc_passwd");
        assert_eq!(sanitize_filename_part("a/b:c", 150), "a_b_c");
        assert_eq!(sanitize_filename_part("", 150), "attachment");
        assert_eq!(sanitize_filename_part("...", 150), "attachment");
    }

    #[test]
    fn test_decode_data_uri() {
        assert_eq!(
            decode_data_uri("data:application/octet-stream;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert_eq!(
            decode_data_uri("data:application/octet-stream;base64,aGVs\r\nbG8=").unwrap(),
            b"hello"
        );
        assert!(decode_data_uri("http://example.com").is_err());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert_eq!(
            decode_data_uri("data:application/octet-stream;base64,aGVsbG8").unwrap(),
            b"hello"
        );
        assert_eq!(
            decode_data_uri("data:application/octet-stream;base64,AQID***").unwrap(),
            b"AQID***"
        );
    }

    #[test]
    fn test_download_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = DiskHost::with_launcher(dir.path(), no_launch);
        let blob = DownloadRequest::Blob {
            file_name: "a.txt".into(),
            content_type: "text/plain".into(),
            bytes: b"one".to_vec(),
        };
        let first = host.download(blob.clone()).unwrap();
        let second = host.download(blob).unwrap();
        assert_eq!(first, dir.path().join("a.txt"));
        assert_eq!(second, dir.path().join("a_1.txt"));
        assert_eq!(std::fs::read(&second).unwrap(), b"one");
    }

    #[test]
    fn test_download_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = DiskHost::with_launcher(dir.path(), no_launch);
        let path = host
            .download(DownloadRequest::DataUri {
                file_name: "b.bin".into(),
                uri: "data:application/octet-stream;base64,AQID".into(),
            })
            .unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_open_external_writes_to_view_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = DiskHost::with_launcher(dir.path(), no_launch);
        host.open_external("pic.png", "image/png", b"png").unwrap();
        // Nothing lands in the download directory.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
