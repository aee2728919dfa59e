//! Toast notifications: transient notices plus one persistent spinner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tracker_core::nav::{Notice, Severity};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

/// Animates until dismissed.
struct SpinnerToast {
    message: String,
    frame: usize,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    spinner: Option<SpinnerToast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            spinner: None,
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    /// Show a notice for as long as its severity warrants.
    pub fn notify(&mut self, notice: Notice) {
        let secs = match notice.severity {
            Severity::Info | Severity::Success => 3,
            Severity::Warning => 4,
            Severity::Error => 5,
        };
        self.push(notice.message, notice.severity, Duration::from_secs(secs));
    }

    /// Start the spinner unless one is already running.
    pub fn spinner(&mut self, message: impl Into<String>) {
        if self.spinner.is_none() {
            self.spinner = Some(SpinnerToast {
                message: message.into(),
                frame: 0,
            });
        }
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner = None;
    }

    pub fn has_spinner(&self) -> bool {
        self.spinner.is_some()
    }

    /// Drop expired toasts and advance the spinner. Call every UI tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if let Some(ref mut s) = self.spinner {
            s.frame = (s.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner.is_none()
    }

    /// Render in the top-right corner of `area`, spinner first.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60);
        let mut y = area.y + 1;

        if let Some(ref s) = self.spinner {
            let icon = SPINNER_FRAMES[s.frame % SPINNER_FRAMES.len()];
            let style = Style::default()
                .fg(C_TOAST_INFO)
                .add_modifier(Modifier::BOLD);
            draw_line(frame, area, y, max_width, icon, &s.message, style);
            y += 1;
            if y >= area.y + area.height {
                return;
            }
        }

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            let (color, icon) = match toast.severity {
                Severity::Info => (C_TOAST_INFO, "·"),
                Severity::Success => (C_TOAST_SUCCESS, "✓"),
                Severity::Warning => (C_TOAST_WARNING, "!"),
                Severity::Error => (C_TOAST_ERROR, "✗"),
            };
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            draw_line(frame, area, y, max_width, icon, &toast.message, style);

            y += 1;
            if y >= area.y + area.height {
                break;
            }
        }
    }
}

fn draw_line(
    frame: &mut Frame,
    area: Rect,
    y: u16,
    max_width: u16,
    icon: &str,
    message: &str,
    style: Style,
) {
    let w = (message.width() as u16 + 4).min(max_width).min(area.width);
    let x = area.x + area.width.saturating_sub(w + 1);
    let toast_area = Rect {
        x,
        y,
        width: w,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} {} ", icon, message),
            style,
        ))),
        toast_area,
    );
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
