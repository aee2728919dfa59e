//! Row of padded push buttons.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Text},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{ButtonState, Theme};

/// Rows a button occupies: the label plus one row of padding above and below.
pub const BUTTON_HEIGHT: u16 = 3;
const GAP: u16 = 1;

/// Width of the whole row for `labels`.
pub fn row_width(labels: &[&str]) -> u16 {
    let buttons: u16 = labels.iter().map(|l| button_width(l)).sum();
    buttons + GAP * labels.len().saturating_sub(1) as u16
}

fn button_width(label: &str) -> u16 {
    label.width() as u16 + 2
}

/// Draw `buttons` side by side, centered in `area`.
pub fn draw_buttons(frame: &mut Frame, area: Rect, buttons: &[(&str, ButtonState)], theme: &Theme) {
    if area.height == 0 {
        return;
    }
    let labels: Vec<&str> = buttons.iter().map(|(label, _)| *label).collect();
    let total = row_width(&labels).min(area.width);
    let mut x = area.x + (area.width - total) / 2;
    let right = area.x + area.width;

    for (label, state) in buttons {
        let width = button_width(label).min(right.saturating_sub(x));
        if width == 0 {
            break;
        }
        let cell = Rect {
            x,
            y: area.y,
            width,
            height: BUTTON_HEIGHT.min(area.height),
        };
        let text = Text::from(vec![
            Line::default(),
            Line::from(*label),
            Line::default(),
        ]);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(theme.style_button(*state)),
            cell,
        );
        x = x.saturating_add(width + GAP);
    }
}
