//! The message page: a drop zone feeding a [`MessageViewer`].
//!
//! Dropped paths are filtered by the zone's accept rules, read on worker
//! threads and handed to the viewer as they complete. The viewer only exists
//! once a read has succeeded.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{EmlError, Result};
use crate::model::mail::MessageSource;
use crate::parser::{EmlParser, MailParser};
use crate::viewer::{MessageViewer, ViewerOptions};

/// Why a dropped file was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Extension not in the accept list.
    InvalidType,
    /// More files than the zone takes at once.
    TooMany,
}

/// Files a drop was split into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropReport {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<(PathBuf, RejectReason)>,
}

/// Accept configuration for dropped files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    /// Media type advertised for accepted files.
    pub media_type: String,
    /// Accepted extensions, with the leading dot.
    pub extensions: Vec<String>,
    pub max_files: usize,
}

impl DropZone {
    /// Zone taking a single `message/rfc822` file with the `.eml` extension.
    pub fn eml() -> Self {
        Self {
            media_type: "message/rfc822".into(),
            extensions: vec![".eml".into()],
            max_files: 1,
        }
    }

    /// Whether `path` passes the type filter.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let dotted = format!(".{}", ext.to_ascii_lowercase());
        self.extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&dotted))
    }

    /// Split a drop into accepted and rejected files.
    ///
    /// A drop carrying more acceptable files than `max_files` is rejected as
    /// a whole.
    pub fn filter(&self, paths: Vec<PathBuf>) -> DropReport {
        let mut report = DropReport::default();
        for path in paths {
            if self.accepts(&path) {
                report.accepted.push(path);
            } else {
                report.rejected.push((path, RejectReason::InvalidType));
            }
        }
        if self.max_files > 0 && report.accepted.len() > self.max_files {
            let too_many = std::mem::take(&mut report.accepted);
            report
                .rejected
                .extend(too_many.into_iter().map(|p| (p, RejectReason::TooMany)));
        }
        report
    }
}

impl Default for DropZone {
    fn default() -> Self {
        Self::eml()
    }
}

/// Split terminal drop text into paths.
///
/// Terminals paste dropped files as shell-quoted paths or `file://` URIs,
/// separated by whitespace or newlines.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    // Unbalanced quotes still yield the whitespace-separated words
    shlex::split(text)
        .unwrap_or_else(|| text.split_whitespace().map(String::from).collect())
        .into_iter()
        .map(|word| {
            url::Url::parse(&word)
                .ok()
                .filter(|u| u.scheme() == "file")
                .and_then(|u| u.to_file_path().ok())
                .unwrap_or_else(|| PathBuf::from(word))
        })
        .collect()
}

/// Something that happened while draining finished reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A file was read and is now the viewer's source.
    Loaded(PathBuf),
    /// A read failed; the current source is unchanged.
    ReadFailed { path: PathBuf, error: String },
}

struct ReadOutcome {
    path: PathBuf,
    result: Result<MessageSource>,
}

/// Drop zone plus the viewer for the most recently read file.
pub struct MessagePage {
    zone: DropZone,
    options: ViewerOptions,
    parser: Arc<dyn EmlParser>,
    viewer: Option<MessageViewer>,
    read_tx: Sender<ReadOutcome>,
    read_rx: Receiver<ReadOutcome>,
    pending: usize,
}

impl std::fmt::Debug for MessagePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePage")
            .field("zone", &self.zone)
            .field("viewer", &self.viewer)
            .field("pending", &self.pending)
            .finish()
    }
}

impl MessagePage {
    pub fn new(options: ViewerOptions) -> Self {
        Self::with_parser(DropZone::eml(), Arc::new(MailParser), options)
    }

    pub fn with_parser(zone: DropZone, parser: Arc<dyn EmlParser>, options: ViewerOptions) -> Self {
        let (read_tx, read_rx) = channel();
        Self {
            zone,
            options,
            parser,
            viewer: None,
            read_tx,
            read_rx,
            pending: 0,
        }
    }

    pub fn zone(&self) -> &DropZone {
        &self.zone
    }

    /// The viewer, once a file has been read.
    pub fn viewer(&self) -> Option<&MessageViewer> {
        self.viewer.as_ref()
    }

    pub fn viewer_mut(&mut self) -> Option<&mut MessageViewer> {
        self.viewer.as_mut()
    }

    /// Source of the current message.
    pub fn current(&self) -> Option<&MessageSource> {
        self.viewer.as_ref().map(MessageViewer::source)
    }

    /// `true` while dropped files are still being read.
    pub fn is_reading(&self) -> bool {
        self.pending > 0
    }

    /// Filter a drop and start reading every accepted file.
    pub fn drop_paths(&mut self, paths: Vec<PathBuf>) -> DropReport {
        let report = self.zone.filter(paths);
        for (path, reason) in &report.rejected {
            info!(path = %path.display(), ?reason, "Dropped file rejected");
        }
        for path in &report.accepted {
            self.start_read(path.clone());
        }
        report
    }

    /// Drop a single path, failing if the zone rejects it.
    pub fn open_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let report = self.drop_paths(vec![path.clone()]);
        if report.accepted.is_empty() {
            return Err(EmlError::Rejected(path));
        }
        Ok(())
    }

    /// Show `source` directly, bypassing the drop zone.
    pub fn set_source(&mut self, source: MessageSource) {
        match &mut self.viewer {
            Some(viewer) => viewer.set_source(source),
            None => {
                self.viewer = Some(MessageViewer::with_parser(
                    source,
                    Arc::clone(&self.parser),
                    self.options.clone(),
                ));
            }
        }
    }

    /// Apply finished reads and parses.
    pub fn poll(&mut self) -> Vec<PageEvent> {
        let mut events = Vec::new();
        while let Ok(outcome) = self.read_rx.try_recv() {
            events.push(self.apply(outcome));
        }
        if let Some(viewer) = &mut self.viewer {
            viewer.poll();
        }
        events
    }

    /// Block until pending reads finish and the viewer settles, or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<PageEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.read_rx.recv_timeout(remaining) {
                Ok(outcome) => events.push(self.apply(outcome)),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        if let Some(viewer) = &mut self.viewer {
            viewer.wait(deadline.saturating_duration_since(Instant::now()));
        }
        events
    }

    fn apply(&mut self, outcome: ReadOutcome) -> PageEvent {
        self.pending = self.pending.saturating_sub(1);
        match outcome.result {
            Ok(source) => {
                info!(path = %outcome.path.display(), bytes = source.len(), "Message file read");
                self.set_source(source);
                PageEvent::Loaded(outcome.path)
            }
            Err(e) => {
                warn!(path = %outcome.path.display(), error = %e, "Could not read dropped file");
                PageEvent::ReadFailed {
                    path: outcome.path,
                    error: e.to_string(),
                }
            }
        }
    }

    fn start_read(&mut self, path: PathBuf) {
        self.pending += 1;
        debug!(path = %path.display(), "Reading dropped file");
        let tx = self.read_tx.clone();
        let job_path = path.clone();
        let job = move || {
            let result = read_source(&job_path);
            let _ = tx.send(ReadOutcome {
                path: job_path,
                result,
            });
        };
        if let Err(e) = std::thread::Builder::new()
            .name("eml-read".into())
            .spawn(job)
        {
            warn!(error = %e, "Could not spawn reader thread, reading inline");
            let result = read_source(&path);
            let event = self.apply(ReadOutcome { path, result });
            debug!(?event, "Inline read finished");
        }
    }
}

/// Read a file as text, replacing invalid UTF-8.
pub fn read_source(path: &Path) -> Result<MessageSource> {
    let bytes = std::fs::read(path).map_err(|e| EmlError::io(path, e))?;
    Ok(MessageSource::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_eml_case_insensitive() {
        let zone = DropZone::eml();
        assert!(zone.accepts(Path::new("/tmp/a.eml")));
        assert!(zone.accepts(Path::new("/tmp/A.EML")));
        assert!(!zone.accepts(Path::new("/tmp/a.txt")));
        assert!(!zone.accepts(Path::new("/tmp/eml")));
    }

    #[test]
    fn test_filter_rejects_wrong_type() {
        let report = DropZone::eml().filter(vec!["a.eml".into(), "b.pdf".into()]);
        assert_eq!(report.accepted, vec![PathBuf::from("a.eml")]);
        assert_eq!(
            report.rejected,
            vec![(PathBuf::from("b.pdf"), RejectReason::InvalidType)]
        );
    }

    #[test]
    fn test_filter_too_many() {
        let report = DropZone::eml().filter(vec!["a.eml".into(), "b.eml".into()]);
        assert!(report.accepted.is_empty());
        assert!(report
            .rejected
            .iter()
            .all(|(_, reason)| *reason == RejectReason::TooMany));
    }

    #[test]
    fn test_parse_dropped_paths() {
        assert_eq!(
            parse_dropped_paths("'/tmp/my mail.eml' /tmp/other\\ file.eml\n"),
            vec![
                PathBuf::from("/tmp/my mail.eml"),
                PathBuf::from("/tmp/other file.eml")
            ]
        );
        assert_eq!(
            parse_dropped_paths("file:///tmp/with%20space.eml"),
            vec![PathBuf::from("/tmp/with space.eml")]
        );
        assert!(parse_dropped_paths("   ").is_empty());
    }

    #[test]
    fn test_parse_dropped_paths_double_quotes() {
        assert_eq!(
            parse_dropped_paths("\"/tmp/a \\\"b\\\".eml\" /tmp/c.eml"),
            vec![
                PathBuf::from("/tmp/a \"b\".eml"),
                PathBuf::from("/tmp/c.eml")
            ]
        );
    }

    #[test]
    fn test_parse_dropped_paths_unbalanced_quote() {
        assert_eq!(
            parse_dropped_paths("'/tmp/open.eml /tmp/next.eml"),
            vec![
                PathBuf::from("'/tmp/open.eml"),
                PathBuf::from("/tmp/next.eml")
            ]
        );
    }
}
