//! Inputs and outputs of the navigation state machine.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogEntry, CatalogError};
use crate::playback::{DecodedStream, SampleFormat};
use crate::retrieval::{MediaRequest, RetrievalError, Ticket};

/// Keys the state machine understands, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    CtrlC,
}

#[derive(Debug)]
pub enum Event {
    Key(Key),
    Resize {
        width: u16,
        height: u16,
    },
    /// Periodic tick; see [`Command::ScheduleTick`].
    Tick,
    CatalogsListed(Result<Vec<CatalogEntry>, CatalogError>),
    CatalogRetrieved {
        ticket: Ticket,
        result: Result<PathBuf, RetrievalError>,
    },
    CatalogLoaded {
        ticket: Ticket,
        result: Result<Catalog, CatalogError>,
    },
    MediaReady {
        ticket: Ticket,
        result: Result<DecodedStream, RetrievalError>,
    },
    SessionStarted {
        session: Ticket,
        format: SampleFormat,
        total: Option<Duration>,
    },
    SessionFailed {
        session: Ticket,
        reason: String,
    },
    Position {
        session: Ticket,
        fraction: f64,
    },
    PlaybackFinished {
        session: Ticket,
    },
}

/// Side effects requested by a transition, run by the event loop.
#[derive(Debug)]
pub enum Command {
    Quit,
    /// List the catalog directory; answers with [`Event::CatalogsListed`].
    ListCatalogs,
    /// Download a catalog export; answers with [`Event::CatalogRetrieved`].
    RetrieveCatalog { ticket: Ticket, export_url: String },
    /// Parse a catalog file; answers with [`Event::CatalogLoaded`].
    LoadCatalog { ticket: Ticket, path: PathBuf },
    /// Fetch and decode media; answers with [`Event::MediaReady`].
    RetrieveMedia {
        ticket: Ticket,
        request: MediaRequest,
    },
    /// Replace the live session; answers with [`Event::SessionStarted`] or
    /// [`Event::SessionFailed`].
    StartSession {
        ticket: Ticket,
        stream: DecodedStream,
    },
    Pause,
    Resume,
    /// Answers with [`Event::Position`] when a session is live.
    SamplePosition,
    /// Deliver one [`Event::Tick`] after the tick interval.
    ScheduleTick,
    Notify(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}
