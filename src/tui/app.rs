//! Global application state for the TUI (the "Model" in Elm architecture).

use std::path::PathBuf;
use std::time::Instant;

use crate::config::{self, Config};
use crate::export::attachment::DiskHost;
use crate::i18n;
use crate::page::{DropReport, MessagePage, PageEvent, RejectReason};
use crate::viewer::actions::{ModalBody, ModalRequest, Overlay, ViewOutcome};
use crate::viewer::present::AttachmentAction;
use crate::viewer::MessageViewer;

use super::theme::Theme;

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 5;

/// Navigation state of one rendered viewer.
#[derive(Debug, Clone, Default)]
pub struct ViewerPane {
    /// Scroll offset of the message view.
    pub scroll: usize,
    /// Highlighted attachment.
    pub attachment_selected: usize,
    /// Selected entry of the open action menu, `None` when closed.
    pub menu: Option<usize>,
    /// Viewport height (set during render).
    pub view_height: usize,
}

impl ViewerPane {
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }

    pub fn page_size(&self) -> usize {
        self.view_height.saturating_sub(2).max(1)
    }
}

/// What a modal shows.
pub enum ModalContent {
    Source { text: String, scroll: usize },
    Message { viewer: Box<MessageViewer>, pane: ViewerPane },
}

/// A dismissible overlay on top of the page.
pub struct Modal {
    pub title: String,
    pub content: ModalContent,
}

impl From<ModalRequest> for Modal {
    fn from(request: ModalRequest) -> Self {
        let content = match request.body {
            ModalBody::Source(text) => ModalContent::Source { text, scroll: 0 },
            ModalBody::Message(viewer) => ModalContent::Message {
                viewer,
                pane: ViewerPane::default(),
            },
        };
        Self {
            title: request.title,
            content,
        }
    }
}

/// Stack of open modals, topmost last.
#[derive(Default)]
pub struct ModalStack(pub Vec<Modal>);

impl Overlay for ModalStack {
    fn open(&mut self, request: ModalRequest) {
        tracing::debug!(title = %request.title, depth = self.0.len() + 1, "Opening modal");
        self.0.push(request.into());
    }
}

/// Complete TUI state.
pub struct App {
    // ── Data ──────────────────────────────────
    /// Drop zone and the root viewer.
    pub page: MessagePage,
    /// Path of the file currently shown.
    pub current_path: Option<PathBuf>,
    /// Files refused by the last drop.
    pub last_rejected: Vec<(PathBuf, RejectReason)>,
    /// Saves downloads and opens attachments externally.
    pub host: DiskHost,

    // ── UI state ──────────────────────────────
    /// Navigation of the root viewer.
    pub root_pane: ViewerPane,
    /// Open modals.
    pub modals: ModalStack,
    /// Help popup visible?
    pub show_help: bool,
    /// Path prompt input, `Some` while the prompt is open.
    pub prompt: Option<String>,
    pub theme: Theme,

    // ── Lifecycle ─────────────────────────────
    pub should_quit: bool,
    /// Transient status message and the instant it was set.
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app for a terminal `width` columns wide.
    pub fn new(config: &Config, width: usize) -> Self {
        Self {
            page: MessagePage::new(config.viewer_options(width.saturating_sub(4))),
            current_path: None,
            last_rejected: Vec::new(),
            host: DiskHost::new(config::download_dir(config)),
            root_pane: ViewerPane::default(),
            modals: ModalStack::default(),
            show_help: false,
            prompt: None,
            theme: Theme::from_name(&config.display.theme),
            should_quit: false,
            status_message: None,
        }
    }

    /// Hand dropped paths to the drop zone.
    pub fn drop_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let DropReport { accepted, rejected } = self.page.drop_paths(paths);
        if let Some((path, reason)) = rejected.first() {
            let why = match reason {
                RejectReason::InvalidType => i18n::err_not_eml(),
                RejectReason::TooMany => i18n::err_too_many_files(),
            };
            self.set_status(&format!(
                "{}: {} ({why})",
                i18n::drop_rejected(),
                path.display()
            ));
        } else if let Some(path) = accepted.first() {
            self.set_status(&format!("{} {}", i18n::tui_loading_file(), path.display()));
        }
        self.last_rejected = rejected;
    }

    /// The viewer keys currently act on: the topmost message modal, or the page.
    pub fn active_viewer(&self) -> Option<&MessageViewer> {
        match self.modals.0.last() {
            Some(Modal {
                content: ModalContent::Message { viewer, .. },
                ..
            }) => Some(&**viewer),
            Some(_) => None,
            None => self.page.viewer(),
        }
    }

    /// Navigation state matching [`App::active_viewer`].
    pub fn active_pane_mut(&mut self) -> Option<&mut ViewerPane> {
        match self.modals.0.last_mut() {
            Some(Modal {
                content: ModalContent::Message { pane, .. },
                ..
            }) => Some(pane),
            Some(_) => None,
            None => self.page.viewer().is_some().then_some(&mut self.root_pane),
        }
    }

    fn active_pane(&self) -> Option<&ViewerPane> {
        match self.modals.0.last() {
            Some(Modal {
                content: ModalContent::Message { pane, .. },
                ..
            }) => Some(pane),
            Some(_) => None,
            None => self.page.viewer().map(|_| &self.root_pane),
        }
    }

    /// Number of attachments of the active viewer's message.
    pub fn attachment_count(&self) -> usize {
        self.active_viewer()
            .and_then(MessageViewer::loaded)
            .map_or(0, |l| l.message.attachments.len())
    }

    /// Move the attachment highlight, wrapping around.
    pub fn select_attachment(&mut self, forward: bool) {
        let count = self.attachment_count();
        if count == 0 {
            return;
        }
        if let Some(pane) = self.active_pane_mut() {
            pane.menu = None;
            pane.attachment_selected = if forward {
                (pane.attachment_selected + 1) % count
            } else {
                (pane.attachment_selected + count - 1) % count
            };
        }
    }

    fn selected_attachment(&self) -> Option<usize> {
        let index = self.active_pane()?.attachment_selected;
        (index < self.attachment_count()).then_some(index)
    }

    /// Actions offered on the highlighted attachment.
    pub fn menu_actions(&self) -> Vec<AttachmentAction> {
        let Some(att) = self
            .selected_attachment()
            .and_then(|i| self.active_viewer()?.attachment(i))
        else {
            return Vec::new();
        };
        let mut actions = vec![AttachmentAction::Download];
        if att.is_viewable() {
            actions.push(AttachmentAction::View);
        }
        actions
    }

    /// Open the action menu of the highlighted attachment.
    pub fn open_menu(&mut self) {
        if self.selected_attachment().is_some() {
            if let Some(pane) = self.active_pane_mut() {
                pane.menu = Some(0);
            }
        }
    }

    /// Run the menu entry under the cursor.
    pub fn activate_menu(&mut self) {
        let actions = self.menu_actions();
        let choice = self
            .active_pane_mut()
            .and_then(|pane| pane.menu.take())
            .and_then(|i| actions.get(i).copied());
        match choice {
            Some(AttachmentAction::Download) => self.download_selected(),
            Some(AttachmentAction::View) => self.view_selected(),
            None => {}
        }
    }

    /// Download the highlighted attachment.
    pub fn download_selected(&mut self) {
        let Some(index) = self.selected_attachment() else {
            return;
        };
        // Matched field by field so the host can be borrowed mutably.
        let result = match self.modals.0.last() {
            Some(Modal {
                content: ModalContent::Message { viewer, .. },
                ..
            }) => viewer.download_attachment(index, &mut self.host),
            _ => match self.page.viewer() {
                Some(viewer) => viewer.download_attachment(index, &mut self.host),
                None => return,
            },
        };
        match result {
            Ok(path) => self.set_status(&format!("{}: {}", i18n::tui_saved(), path.display())),
            Err(e) => self.report_error(&e),
        }
    }

    /// View the highlighted attachment.
    pub fn view_selected(&mut self) {
        let Some(index) = self.selected_attachment() else {
            return;
        };
        let mut requests: Vec<ModalRequest> = Vec::new();
        let result = match self.modals.0.last() {
            Some(Modal {
                content: ModalContent::Message { viewer, .. },
                ..
            }) => viewer.view_attachment(index, &mut requests, &mut self.host),
            _ => match self.page.viewer() {
                Some(viewer) => viewer.view_attachment(index, &mut requests, &mut self.host),
                None => return,
            },
        };
        for request in requests {
            self.modals.open(request);
        }
        match result {
            Ok(ViewOutcome::Nested) => {}
            Ok(ViewOutcome::External) => {
                self.set_status(i18n::tui_opened());
            }
            Ok(ViewOutcome::Downloaded(path)) => {
                self.set_status(&format!("{}: {}", i18n::tui_saved(), path.display()));
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// Open the source of the active viewer in a modal.
    pub fn view_source(&mut self) {
        let mut requests: Vec<ModalRequest> = Vec::new();
        if let Some(viewer) = self.active_viewer() {
            viewer.view_source(&mut requests);
        }
        for request in requests {
            self.modals.open(request);
        }
    }

    /// Close the topmost modal.
    pub fn close_modal(&mut self) -> bool {
        self.modals.0.pop().is_some()
    }

    /// Open the path prompt.
    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    /// Submit the path prompt.
    pub fn submit_prompt(&mut self) {
        if let Some(text) = self.prompt.take() {
            self.drop_paths(crate::page::parse_dropped_paths(&text));
        }
    }

    fn report_error(&mut self, error: &crate::error::EmlError) {
        tracing::warn!(error = %error, "Attachment action failed");
        self.set_status(&format!("{}: {error}", i18n::tui_error()));
    }

    /// Set a transient status message that auto-clears after a few seconds.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
    }

    /// Called every tick: applies finished reads and parses, clears expired status.
    pub fn tick(&mut self) {
        for event in self.page.poll() {
            match event {
                PageEvent::Loaded(path) => {
                    self.root_pane = ViewerPane::default();
                    self.modals.0.clear();
                    self.status_message = None;
                    self.current_path = Some(path);
                }
                PageEvent::ReadFailed { path, error } => {
                    self.set_status(&format!("{}: {} ({error})", i18n::tui_error(), path.display()));
                }
            }
        }
        for modal in &mut self.modals.0 {
            if let ModalContent::Message { viewer, .. } = &mut modal.content {
                viewer.poll();
            }
        }

        if let Some((_, when)) = &self.status_message {
            if when.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }
}
