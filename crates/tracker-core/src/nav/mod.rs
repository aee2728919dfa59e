//! Navigation state machine.
//!
//! [`NavState`] is the single mutable root of the UI. The event loop feeds it
//! [`Event`]s one at a time through [`NavState::update`] and runs the
//! [`Command`]s it returns; `update` itself performs no I/O.
//!
//! Drill-down: `Start` → `LinkInput` | `CatalogList` → `GroupTable` →
//! `DetailTable`, with `Player(..)` replacing the table modes once a
//! session is live. `esc` walks back up; `ctrl+c` quits from anywhere.

mod event;
mod mode;


use std::time::Duration;

use tracing::{debug, info, warn};
use tui_input::{Input, InputRequest};

use crate::catalog::{Catalog, CatalogEntry};
use crate::era::{normalize, project_detail, project_eras, Era, EraDetail};
use crate::playback::SampleFormat;
use crate::retrieval::{
    convert_sheet_url, media_fallback_name, source_host, MediaRequest, TargetKind, Ticket,
};

pub use event::{Command, Event, Key, Notice, Severity};
pub use mode::{ControlButton, Focus, Mode, StartChoice, TableView};

/// Longest sheet link the input accepts.
pub const LINK_LIMIT: usize = 200;

/// Rows moved by page up/down.
const PAGE: usize = 10;

/// What the player panel shows about the live session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub session: Ticket,
    pub title: String,
    pub catalog: String,
    /// `https://<host>` the file came from.
    pub source: Option<String>,
    pub format: SampleFormat,
    pub total: Option<Duration>,
    pub playing: bool,
    pub finished: bool,
    pub progress: f64,
}

/// The media request whose result we are waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingMedia {
    ticket: Ticket,
    title: String,
    catalog: String,
    source: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Back,
    Forward,
}

#[derive(Debug, Default)]
pub struct NavState {
    pub mode: Mode,
    pub start_choice: StartChoice,
    pub link: Input,
    pub catalogs: Vec<CatalogEntry>,
    pub catalog_cursor: usize,
    pub catalog: Option<Catalog>,
    pub eras: Vec<Era>,
    pub era_cursor: usize,
    pub detail: Option<EraDetail>,
    pub detail_cursor: usize,
    pub focus: Focus,
    pub control: ControlButton,
    pub player: Option<PlayerView>,
    /// Last reported terminal size, columns × rows.
    pub size: (u16, u16),
    last_ticket: Ticket,
    pending_catalog: Option<Ticket>,
    pending_media: Option<PendingMedia>,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to run once at start-up. Starts the tick train.
    pub fn init(&self) -> Vec<Command> {
        vec![Command::ScheduleTick]
    }

    /// Which kind of retrieval is outstanding, media first.
    pub fn retrieving(&self) -> Option<TargetKind> {
        if self.pending_media.is_some() {
            Some(TargetKind::Media)
        } else if self.pending_catalog.is_some() {
            Some(TargetKind::Catalog)
        } else {
            None
        }
    }

    /// Whether the transport controls currently do anything.
    pub fn controls_active(&self) -> bool {
        self.player.is_some()
    }

    pub fn update(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(Key::CtrlC) => vec![Command::Quit],
            Event::Key(key) => self.on_key(key),
            Event::Resize { width, height } => {
                self.size = (width, height);
                Vec::new()
            }
            Event::Tick => self.on_tick(),
            Event::CatalogsListed(result) => match result {
                Ok(entries) => {
                    self.catalogs = entries;
                    self.catalog_cursor = self
                        .catalog_cursor
                        .min(self.catalogs.len().saturating_sub(1));
                    Vec::new()
                }
                Err(e) => {
                    warn!("catalog listing failed: {}", e);
                    if self.mode == Mode::CatalogList {
                        self.mode = Mode::Start;
                    }
                    vec![notify(Severity::Error, e.to_string())]
                }
            },
            Event::CatalogRetrieved { ticket, result } => {
                if self.pending_catalog != Some(ticket) {
                    debug!("dropping stale catalog download {}", ticket);
                    return Vec::new();
                }
                match result {
                    Ok(path) => vec![Command::LoadCatalog { ticket, path }],
                    Err(e) => {
                        warn!("catalog download {} failed: {}", ticket, e);
                        self.pending_catalog = None;
                        vec![notify(Severity::Error, e.to_string())]
                    }
                }
            }
            Event::CatalogLoaded { ticket, result } => {
                if self.pending_catalog != Some(ticket) {
                    debug!("dropping stale catalog load {}", ticket);
                    return Vec::new();
                }
                self.pending_catalog = None;
                match result {
                    Ok(catalog) => self.install_catalog(catalog),
                    Err(e) => {
                        warn!("catalog load {} failed: {}", ticket, e);
                        vec![notify(Severity::Error, e.to_string())]
                    }
                }
            }
            Event::MediaReady { ticket, result } => {
                if self.pending_media.as_ref().map(|p| p.ticket) != Some(ticket) {
                    debug!("dropping stale media result {}", ticket);
                    return Vec::new();
                }
                match result {
                    Ok(stream) => vec![Command::StartSession { ticket, stream }],
                    Err(e) => {
                        warn!("media retrieval {} failed: {}", ticket, e);
                        self.pending_media = None;
                        vec![notify(Severity::Error, e.to_string())]
                    }
                }
            }
            Event::SessionStarted {
                session,
                format,
                total,
            } => {
                if self.pending_media.as_ref().map(|p| p.ticket) != Some(session) {
                    return Vec::new();
                }
                let Some(pending) = self.pending_media.take() else {
                    return Vec::new();
                };
                info!("session {} started: {}", session, pending.title);
                self.player = Some(PlayerView {
                    session,
                    title: pending.title,
                    catalog: pending.catalog,
                    source: pending.source,
                    format,
                    total,
                    playing: true,
                    finished: false,
                    progress: 0.0,
                });
                self.refresh_table_mode();
                Vec::new()
            }
            Event::SessionFailed { session, reason } => {
                if self.pending_media.as_ref().map(|p| p.ticket) != Some(session) {
                    return Vec::new();
                }
                self.pending_media = None;
                // The previous output was already stopped.
                self.player = None;
                self.refresh_table_mode();
                vec![notify(Severity::Error, reason)]
            }
            Event::Position { session, fraction } => {
                if let Some(player) = self.player.as_mut().filter(|p| p.session == session) {
                    player.progress = fraction.clamp(0.0, 1.0);
                }
                Vec::new()
            }
            Event::PlaybackFinished { session } => {
                if let Some(player) = self.player.as_mut().filter(|p| p.session == session) {
                    debug!("session {} finished", session);
                    player.playing = false;
                    player.finished = true;
                    player.progress = 1.0;
                }
                Vec::new()
            }
        }
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    fn on_key(&mut self, key: Key) -> Vec<Command> {
        match self.mode {
            Mode::Start => self.on_start_key(key),
            Mode::LinkInput => self.on_link_key(key),
            Mode::CatalogList => self.on_list_key(key),
            Mode::GroupTable | Mode::Player(TableView::Group) => {
                self.on_table_key(TableView::Group, key)
            }
            Mode::DetailTable | Mode::Player(TableView::Detail) => {
                self.on_table_key(TableView::Detail, key)
            }
        }
    }

    fn on_start_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Left | Key::Char('h') => {
                self.start_choice = StartChoice::AddLink;
                Vec::new()
            }
            Key::Right | Key::Char('l') => {
                self.start_choice = StartChoice::Browse;
                Vec::new()
            }
            Key::Tab | Key::BackTab => {
                self.start_choice = self.start_choice.toggle();
                Vec::new()
            }
            Key::Enter => match self.start_choice {
                StartChoice::AddLink => {
                    self.link.reset();
                    self.mode = Mode::LinkInput;
                    Vec::new()
                }
                StartChoice::Browse => self.open_catalog_list(),
            },
            Key::Esc => vec![Command::Quit],
            _ => Vec::new(),
        }
    }

    fn on_link_key(&mut self, key: Key) -> Vec<Command> {
        let request = match key {
            Key::Esc => {
                self.pending_catalog = None;
                self.link.reset();
                self.mode = Mode::Start;
                return Vec::new();
            }
            Key::Enter => return self.submit_link(),
            Key::Char(c) => {
                if self.link.value().chars().count() >= LINK_LIMIT {
                    return Vec::new();
                }
                InputRequest::InsertChar(c)
            }
            Key::Backspace => InputRequest::DeletePrevChar,
            Key::Delete => InputRequest::DeleteNextChar,
            Key::Left => InputRequest::GoToPrevChar,
            Key::Right => InputRequest::GoToNextChar,
            Key::Home => InputRequest::GoToStart,
            Key::End => InputRequest::GoToEnd,
            _ => return Vec::new(),
        };
        self.link.handle(request);
        Vec::new()
    }

    fn submit_link(&mut self) -> Vec<Command> {
        let value = self.link.value().trim().to_string();
        if value.chars().count() <= 1 {
            return Vec::new();
        }
        match convert_sheet_url(&value) {
            Ok(export_url) => {
                let ticket = self.issue_ticket();
                self.pending_catalog = Some(ticket);
                info!("retrieving catalog {} from {}", ticket, export_url);
                vec![Command::RetrieveCatalog { ticket, export_url }]
            }
            Err(e) => {
                self.link.reset();
                vec![notify(Severity::Warning, e.to_string())]
            }
        }
    }

    fn on_list_key(&mut self, key: Key) -> Vec<Command> {
        if let Some(cursor) = moved(self.catalog_cursor, self.catalogs.len(), key) {
            self.catalog_cursor = cursor;
            return Vec::new();
        }
        match key {
            Key::Enter => {
                let Some(entry) = self.catalogs.get(self.catalog_cursor) else {
                    return Vec::new();
                };
                let path = entry.path.clone();
                let ticket = self.issue_ticket();
                self.pending_catalog = Some(ticket);
                vec![Command::LoadCatalog { ticket, path }]
            }
            Key::Esc => {
                self.pending_catalog = None;
                self.mode = Mode::Start;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn on_table_key(&mut self, view: TableView, key: Key) -> Vec<Command> {
        match key {
            Key::Tab | Key::BackTab => {
                self.focus = self.focus.toggle();
                return Vec::new();
            }
            Key::Esc => return self.leave_table(view),
            _ => {}
        }

        if self.focus == Focus::Controls {
            return self.on_control_key(key);
        }

        let (cursor, len) = match view {
            TableView::Group => (&mut self.era_cursor, self.eras.len()),
            TableView::Detail => (
                &mut self.detail_cursor,
                self.detail.as_ref().map_or(0, |d| d.rows.len()),
            ),
        };
        if let Some(next) = moved(*cursor, len, key) {
            *cursor = next;
            return Vec::new();
        }

        match (view, key) {
            (TableView::Group, Key::Enter) => self.open_era(),
            (TableView::Detail, Key::Enter | Key::Char(' ')) => {
                self.request_media(self.detail_cursor)
            }
            _ => Vec::new(),
        }
    }

    fn on_control_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Left | Key::Char('h') => {
                self.control = self.control.left();
                Vec::new()
            }
            Key::Right | Key::Char('l') => {
                self.control = self.control.right();
                Vec::new()
            }
            Key::Enter | Key::Char(' ') => self.press_control(),
            _ => Vec::new(),
        }
    }

    fn press_control(&mut self) -> Vec<Command> {
        if !self.controls_active() {
            return Vec::new();
        }
        match self.control {
            ControlButton::PlayPause => {
                let Some(player) = self.player.as_mut().filter(|p| !p.finished) else {
                    return Vec::new();
                };
                player.playing = !player.playing;
                if player.playing {
                    vec![Command::Resume]
                } else {
                    vec![Command::Pause]
                }
            }
            ControlButton::Prev => self.step_entry(Step::Back),
            ControlButton::Skip => self.step_entry(Step::Forward),
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    fn open_catalog_list(&mut self) -> Vec<Command> {
        self.mode = Mode::CatalogList;
        self.focus = Focus::Table;
        vec![Command::ListCatalogs]
    }

    fn leave_table(&mut self, view: TableView) -> Vec<Command> {
        self.focus = Focus::Table;
        match view {
            TableView::Detail => {
                self.mode = self.table_mode(TableView::Group);
                Vec::new()
            }
            TableView::Group => self.open_catalog_list(),
        }
    }

    fn install_catalog(&mut self, catalog: Catalog) -> Vec<Command> {
        self.eras = project_eras(&catalog);
        info!(
            "catalog {:?}: {} rows, {} eras",
            catalog.name,
            catalog.rows.len(),
            self.eras.len()
        );
        let message = format!("loaded {} ({} eras)", catalog.name, self.eras.len());
        // Rows of the previous catalog are gone; so is any entry still downloading.
        if let Some(stale) = self.pending_media.take() {
            debug!("media request {} dropped with its catalog", stale.ticket);
        }
        self.catalog = Some(catalog);
        self.era_cursor = 0;
        self.detail = None;
        self.detail_cursor = 0;
        self.focus = Focus::Table;
        self.link.reset();
        self.mode = self.table_mode(TableView::Group);
        vec![notify(Severity::Success, message)]
    }

    fn open_era(&mut self) -> Vec<Command> {
        let (Some(catalog), Some(era)) = (&self.catalog, self.eras.get(self.era_cursor)) else {
            return Vec::new();
        };
        let detail = project_detail(catalog, &era.label);
        debug!("era {:?}: {} entries", detail.label, detail.rows.len());
        self.detail = Some(detail);
        self.detail_cursor = 0;
        self.mode = self.table_mode(TableView::Detail);
        Vec::new()
    }

    fn step_entry(&mut self, step: Step) -> Vec<Command> {
        let len = self.detail.as_ref().map_or(0, |d| d.rows.len());
        let target = match step {
            Step::Back => self.detail_cursor.checked_sub(1),
            Step::Forward => Some(self.detail_cursor + 1).filter(|&t| t < len),
        };
        let Some(target) = target else {
            return Vec::new();
        };
        self.detail_cursor = target;
        self.request_media(target)
    }

    /// Start retrieving the entry at `row` of the detail table. Supersedes
    /// any media request still outstanding.
    fn request_media(&mut self, row: usize) -> Vec<Command> {
        let Some(record) = self.detail.as_ref().and_then(|d| d.rows.get(row)) else {
            return Vec::new();
        };
        let title = record
            .first()
            .map(|t| normalize(t).to_string())
            .unwrap_or_default();
        let reference = record
            .last()
            .map(|r| r.trim().to_string())
            .unwrap_or_default();
        if reference.is_empty() {
            return vec![notify(
                Severity::Warning,
                format!("no link for {}", title),
            )];
        }

        let ticket = self.issue_ticket();
        let request = MediaRequest {
            fallback_name: media_fallback_name(&title),
            reference,
        };
        let pending = PendingMedia {
            ticket,
            catalog: self
                .catalog
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            source: source_host(&request.reference),
            title,
        };
        if let Some(previous) = self.pending_media.replace(pending) {
            debug!("media request {} superseded by {}", previous.ticket, ticket);
        }
        info!("retrieving media {} from {}", ticket, request.reference);
        vec![Command::RetrieveMedia { ticket, request }]
    }

    fn on_tick(&mut self) -> Vec<Command> {
        if self.player.as_ref().is_some_and(|p| p.playing) {
            vec![Command::SamplePosition, Command::ScheduleTick]
        } else {
            vec![Command::ScheduleTick]
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn issue_ticket(&mut self) -> Ticket {
        self.last_ticket = self.last_ticket.next();
        self.last_ticket
    }

    fn table_mode(&self, view: TableView) -> Mode {
        match (self.player.is_some(), view) {
            (true, view) => Mode::Player(view),
            (false, TableView::Group) => Mode::GroupTable,
            (false, TableView::Detail) => Mode::DetailTable,
        }
    }

    /// Re-derive the table mode after the player appeared or went away.
    fn refresh_table_mode(&mut self) {
        if let Some(view) = self.mode.table_view() {
            self.mode = self.table_mode(view);
        }
    }
}

fn notify(severity: Severity, message: impl Into<String>) -> Command {
    Command::Notify(Notice::new(severity, message))
}

/// New cursor for a movement key over `len` rows, `None` for other keys.
fn moved(cursor: usize, len: usize, key: Key) -> Option<usize> {
    let last = len.saturating_sub(1);
    let next = match key {
        Key::Up | Key::Char('k') => cursor.saturating_sub(1),
        Key::Down | Key::Char('j') => cursor + 1,
        Key::Home | Key::Char('g') => 0,
        Key::End | Key::Char('G') => last,
        Key::PageUp => cursor.saturating_sub(PAGE),
        Key::PageDown => cursor + PAGE,
        _ => return None,
    };
    Some(next.min(last))
}
