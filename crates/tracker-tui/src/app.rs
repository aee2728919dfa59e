//! App: the event loop around the navigation state machine.
//!
//! Architecture:
//! - `NavState` owns everything the UI shows and decides every transition.
//! - A `tokio::mpsc` channel carries `Event`s in from the key reader, timers
//!   and background retrieval tasks.
//! - Each event goes through `NavState::update`; the returned `Command`s are
//!   executed here. Commands that finish on the spot (session start, position
//!   samples) queue their answer in a local inbox that is drained before the
//!   next channel receive.
//! - Components only draw.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use tracker_core::catalog::{list_catalogs, Catalog};
use tracker_core::config::Config;
use tracker_core::nav::{Command, Event, Mode, NavState, Notice, Severity};
use tracker_core::playback::{FinishCallback, Player, RodioOutput};
use tracker_core::retrieval::{Retriever, Ticket};

use crate::{
    component::Component,
    components::{
        catalog_list::CatalogList, link_input::LinkInput, player_panel::PlayerPanel,
        start_screen::StartScreen, table_view::CatalogTable,
    },
    keys,
    theme::{Theme, C_TOO_SMALL},
    widgets::toast::ToastManager,
};

/// Narrowest terminal the table layout is drawn in.
pub const MIN_WIDTH: u16 = 140;

/// How long the key reader waits before checking whether the loop is gone.
const KEY_POLL: Duration = Duration::from_millis(250);

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub struct App {
    state: NavState,
    theme: Theme,
    toast: ToastManager,
    retriever: Retriever,
    player: Player<RodioOutput>,
    catalog_dir: PathBuf,
    tick_interval: Duration,

    catalog_task: Option<JoinHandle<()>>,
    media_task: Option<JoinHandle<()>>,

    start_screen: StartScreen,
    link_input: LinkInput,
    catalog_list: CatalogList,
    table: CatalogTable,
    player_panel: PlayerPanel,

    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, retriever: Retriever) -> Self {
        let catalog_dir = retriever.settings().catalog_dir.clone();
        Self {
            state: NavState::new(),
            theme: Theme::from_config(&config.theme),
            toast: ToastManager::new(),
            retriever,
            player: Player::new(RodioOutput::new()),
            catalog_list: CatalogList::new(catalog_dir.display().to_string()),
            catalog_dir,
            tick_interval: config.playback.tick_interval(),
            catalog_task: None,
            media_task: None,
            start_screen: StartScreen,
            link_input: LinkInput,
            table: CatalogTable::default(),
            player_panel: PlayerPanel,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        self.player.stop();
        let restored = restore(&mut terminal);
        result.and(restored)
    }

    async fn event_loop(&mut self, terminal: &mut Term) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);
        let mut inbox: VecDeque<Event> = VecDeque::new();

        // ── Background task: keyboard/resize events ──────────────────────────
        let key_tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            while !key_tx.is_closed() {
                match event::poll(KEY_POLL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        error!("terminal poll failed: {}", e);
                        break;
                    }
                }
                match event::read() {
                    Ok(ev) => {
                        let Some(ev) = keys::translate(ev) else {
                            continue;
                        };
                        if key_tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("terminal read failed: {}", e);
                        break;
                    }
                }
            }
        });

        let size = terminal.size()?;
        inbox.push_back(Event::Resize {
            width: size.width,
            height: size.height,
        });
        for command in self.state.init() {
            self.execute(command, &tx, &mut inbox);
        }

        // Toast expiry + spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            while let Some(ev) = inbox.pop_front() {
                self.dispatch(ev, &tx, &mut inbox);
                needs_redraw = true;
            }
            if self.should_quit {
                break;
            }
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            tokio::select! {
                msg = rx.recv() => {
                    let Some(ev) = msg else {
                        warn!("event channel closed");
                        break;
                    };
                    self.dispatch(ev, &tx, &mut inbox);
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        info!("event loop finished");
        Ok(())
    }

    fn dispatch(&mut self, ev: Event, tx: &mpsc::Sender<Event>, inbox: &mut VecDeque<Event>) {
        for command in self.state.update(ev) {
            self.execute(command, tx, inbox);
        }
        self.sync_spinner();
    }

    fn sync_spinner(&mut self) {
        if self.state.retrieving().is_some() {
            self.toast.spinner("Downloading");
        } else if self.toast.has_spinner() {
            self.toast.dismiss_spinner();
        }
    }

    // ── Command execution ─────────────────────────────────────────────────────

    fn execute(&mut self, command: Command, tx: &mpsc::Sender<Event>, inbox: &mut VecDeque<Event>) {
        match command {
            Command::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }

            Command::ListCatalogs => {
                let dir = self.catalog_dir.clone();
                let tx = tx.clone();
                tokio::task::spawn_blocking(move || {
                    let _ = tx.blocking_send(Event::CatalogsListed(list_catalogs(&dir)));
                });
            }

            Command::LoadCatalog { ticket, path } => {
                let tx = tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result = Catalog::load(&path);
                    let _ = tx.blocking_send(Event::CatalogLoaded { ticket, result });
                });
            }

            Command::RetrieveCatalog { ticket, export_url } => {
                let retriever = self.retriever.clone();
                let tx = tx.clone();
                let handle = tokio::spawn(async move {
                    let result = retriever.resolve_catalog(&export_url).await;
                    let _ = tx.send(Event::CatalogRetrieved { ticket, result }).await;
                });
                if let Some(previous) = self.catalog_task.replace(handle) {
                    previous.abort();
                }
            }

            Command::RetrieveMedia { ticket, request } => {
                let retriever = self.retriever.clone();
                let tx = tx.clone();
                let handle = tokio::spawn(async move {
                    let result = retriever.retrieve_media(&request).await;
                    let _ = tx.send(Event::MediaReady { ticket, result }).await;
                });
                // The older request can no longer win; stop its download.
                if let Some(previous) = self.media_task.replace(handle) {
                    previous.abort();
                }
            }

            Command::StartSession { ticket, stream } => {
                let format = stream.format();
                let total = stream.total_duration();
                let on_finish = finish_notifier(tx.clone(), ticket);
                let answer = match self.player.start(ticket, stream, on_finish) {
                    Ok(_) => Event::SessionStarted {
                        session: ticket,
                        format,
                        total,
                    },
                    Err(e) => {
                        error!("session {} failed to start: {}", ticket, e);
                        Event::SessionFailed {
                            session: ticket,
                            reason: e.to_string(),
                        }
                    }
                };
                inbox.push_back(answer);
            }

            Command::Pause => self.player.pause(),
            Command::Resume => self.player.resume(),

            Command::SamplePosition => {
                if let Some((session, fraction)) = self.player.position() {
                    inbox.push_back(Event::Position { session, fraction });
                }
            }

            Command::ScheduleTick => {
                let tx = tx.clone();
                let interval = self.tick_interval;
                tokio::spawn(async move {
                    tokio::time::sleep(interval).await;
                    let _ = tx.send(Event::Tick).await;
                });
            }

            Command::Notify(notice) => self.notify(notice),
        }
    }

    fn notify(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Error | Severity::Warning => warn!("notice: {}", notice.message),
            Severity::Info | Severity::Success => info!("notice: {}", notice.message),
        }
        self.toast.notify(notice);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.style_base()), area);

        if area.width < MIN_WIDTH {
            draw_too_small(frame, area, &self.theme);
            return;
        }

        if self.state.mode == Mode::Start {
            self.start_screen.draw(frame, area, &self.state, &self.theme);
        } else {
            let [header_area, _, body] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);
            frame.render_widget(
                Paragraph::new("tracker-tui")
                    .alignment(Alignment::Center)
                    .style(self.theme.style_header()),
                header_area,
            );

            match self.state.mode {
                Mode::LinkInput => {
                    let inner = body.inner(Margin::new(2, 0));
                    self.link_input.draw(frame, inner, &self.state, &self.theme);
                }
                Mode::CatalogList => {
                    let inner = body.inner(Margin::new(2, 1));
                    self.catalog_list.draw(frame, inner, &self.state, &self.theme);
                }
                _ => self.draw_tables(frame, body),
            }
        }

        // Toast notifications (topmost layer)
        self.toast.draw(frame, area);
    }

    fn draw_tables(&mut self, frame: &mut Frame, area: Rect) {
        let table_w = CatalogTable::wanted_width(&self.state).min(area.width * 2 / 3);
        let [table_area, player_area] =
            Layout::horizontal([Constraint::Length(table_w), Constraint::Fill(1)]).areas(area);
        self.table.draw(frame, table_area, &self.state, &self.theme);
        self.player_panel.draw(frame, player_area, &self.state, &self.theme);
    }
}

/// Callback the audio thread runs when a session's stream runs dry. It waits
/// for room in the channel rather than dropping the event.
fn finish_notifier(tx: mpsc::Sender<Event>, session: Ticket) -> FinishCallback {
    Box::new(move || {
        if tx.blocking_send(Event::PlaybackFinished { session }).is_err() {
            warn!("session {} finished after the event loop closed", session);
        }
    })
}

fn restore(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn draw_too_small(frame: &mut Frame, area: Rect, theme: &Theme) {
    let highlight = Style::default().fg(C_TOO_SMALL);
    let text = Text::from(vec![
        Line::from(Span::styled("Terminal size too small:", theme.style_text())),
        Line::from(vec![
            Span::styled("  Width = ", theme.style_text()),
            Span::styled(area.width.to_string(), highlight),
        ]),
        Line::default(),
        Line::from(Span::styled("Needed for current config:", theme.style_text())),
        Line::from(Span::styled(
            format!("  Width = {}", MIN_WIDTH),
            theme.style_text(),
        )),
    ]);
    let height = text.height() as u16;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finish_waits_for_a_full_channel() {
        let (tx, mut rx) = mpsc::channel::<Event>(1);
        tx.send(Event::Tick).await.unwrap();

        let on_finish = finish_notifier(tx, Ticket(7));
        let audio = std::thread::spawn(move || on_finish());

        assert!(matches!(rx.recv().await, Some(Event::Tick)));
        assert!(matches!(
            rx.recv().await,
            Some(Event::PlaybackFinished { session }) if session == Ticket(7)
        ));
        audio.join().unwrap();
    }
}
