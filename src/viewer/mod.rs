//! The message viewer: parses a source off the UI thread and holds the result.
//!
//! A viewer owns exactly one [`MessageSource`] at a time. Setting a new source
//! bumps a generation counter and spawns a parse on a worker thread; outcomes
//! come back over a channel and are applied by [`MessageViewer::poll`] only if
//! they still belong to the current generation, so a slow parse of an old
//! source can never overwrite a newer one.

pub mod actions;
pub mod icon;
pub mod present;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::attachment::Attachment;
use crate::model::mail::{MessageSource, ParsedMessage};
use crate::parser::html::RenderedHtml;
use crate::parser::{EmlParser, MailParser};

/// Rendering knobs shared by a viewer and every viewer nested in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Column width the HTML body is rendered at.
    pub text_width: usize,
    /// `strftime` pattern overriding the localized date format.
    pub date_format: Option<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            text_width: 100,
            date_format: None,
        }
    }
}

/// A parsed message together with its sanitized, rendered HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMessage {
    pub message: ParsedMessage,
    /// `None` when the message has no HTML part.
    pub rendered_html: Option<RenderedHtml>,
}

impl LoadedMessage {
    /// Derive the rendered body from a freshly parsed message.
    pub fn new(message: ParsedMessage, options: &ViewerOptions) -> Self {
        let rendered_html = message
            .html
            .as_deref()
            .map(|html| RenderedHtml::new(html, options.text_width));
        Self {
            message,
            rendered_html,
        }
    }
}

/// What the viewer currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// A parse is in flight.
    Loading,
    /// The source could not be parsed.
    Error,
    /// The source parsed successfully.
    Loaded(Box<LoadedMessage>),
}

/// Result of a background parse, tagged with the generation it belongs to.
struct ParseOutcome {
    generation: u64,
    result: Result<LoadedMessage>,
}

/// Viewer for a single message source.
pub struct MessageViewer {
    source: MessageSource,
    state: ViewState,
    generation: u64,
    parser: Arc<dyn EmlParser>,
    options: ViewerOptions,
    outcome_tx: Sender<ParseOutcome>,
    outcome_rx: Receiver<ParseOutcome>,
}

impl std::fmt::Debug for MessageViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageViewer")
            .field("source_len", &self.source.len())
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish()
    }
}

impl MessageViewer {
    /// Create a viewer with the default `mail-parser` backend and start parsing.
    pub fn new(source: MessageSource, options: ViewerOptions) -> Self {
        Self::with_parser(source, Arc::new(MailParser), options)
    }

    /// Create a viewer with a custom parser and start parsing.
    pub fn with_parser(
        source: MessageSource,
        parser: Arc<dyn EmlParser>,
        options: ViewerOptions,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        let mut viewer = Self {
            source,
            state: ViewState::Loading,
            generation: 0,
            parser,
            options,
            outcome_tx,
            outcome_rx,
        };
        viewer.start_parse();
        viewer
    }

    /// Build a viewer for a message embedded in this one.
    ///
    /// The child shares the parser and options but none of the state.
    pub fn nested(&self, source: MessageSource) -> Self {
        Self::with_parser(source, Arc::clone(&self.parser), self.options.clone())
    }

    /// Replace the source. Identical sources are ignored.
    pub fn set_source(&mut self, source: MessageSource) {
        if source == self.source {
            return;
        }
        self.source = source;
        self.start_parse();
    }

    /// The raw source currently shown.
    pub fn source(&self) -> &MessageSource {
        &self.source
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Options this viewer renders with.
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// The loaded message, if parsing succeeded.
    pub fn loaded(&self) -> Option<&LoadedMessage> {
        match &self.state {
            ViewState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    /// Attachment at `index` of the loaded message.
    pub fn attachment(&self, index: usize) -> Option<&Attachment> {
        self.loaded()?.message.attachments.get(index)
    }

    /// `true` while the current source is still being parsed.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Apply every finished parse. Returns `true` if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Block until the current source is parsed or `timeout` elapses.
    ///
    /// Returns `true` if the viewer settled.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.outcome_rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn apply(&mut self, outcome: ParseOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "Discarding stale parse result"
            );
            return false;
        }
        self.state = match outcome.result {
            Ok(loaded) => ViewState::Loaded(Box::new(loaded)),
            Err(e) => {
                warn!(error = %e, "Message could not be parsed, showing raw source");
                ViewState::Error
            }
        };
        true
    }

    fn start_parse(&mut self) {
        self.generation += 1;
        self.state = ViewState::Loading;

        let generation = self.generation;
        let source = self.source.clone();
        let parser = Arc::clone(&self.parser);
        let options = self.options.clone();
        let tx = self.outcome_tx.clone();

        debug!(generation, bytes = source.len(), "Parsing message");

        let job = move || {
            let result = parser
                .parse(source.as_bytes())
                .map(|message| LoadedMessage::new(message, &options));
            // The viewer may already be gone; nothing left to notify then.
            let _ = tx.send(ParseOutcome { generation, result });
        };

        if let Err(e) = std::thread::Builder::new()
            .name("eml-parse".into())
            .spawn(job)
        {
            warn!(error = %e, "Could not spawn parser thread, parsing inline");
            let result = self
                .parser
                .parse(self.source.as_bytes())
                .map(|message| LoadedMessage::new(message, &self.options));
            self.apply(ParseOutcome { generation, result });
        }
    }
}
