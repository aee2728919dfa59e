//! PlayerPanel: what is playing, its progress and the transport controls.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
    Frame,
};
use tracker_core::nav::{ControlButton, Focus, NavState};
use tracker_core::retrieval::TargetKind;

use crate::{
    component::Component,
    theme::{ButtonState, Theme},
    widgets::{
        button::{draw_buttons, row_width, BUTTON_HEIGHT},
        progress_bar::draw_progress,
    },
};

const NOTHING_SELECTED: &str = "No Song Currently Selected";
const NO_SOURCE: &str = "Not Selected yet";
const BAR_WIDTH: u16 = 50;

#[derive(Default)]
pub struct PlayerPanel;

impl PlayerPanel {
    fn button_state(state: &NavState, button: ControlButton) -> ButtonState {
        if state.control != button {
            ButtonState::Unselected
        } else if state.focus == Focus::Controls {
            ButtonState::Selected
        } else {
            ButtonState::SelectedIdle
        }
    }
}

impl Component for PlayerPanel {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &NavState, theme: &Theme) {
        // Vertically centered stack; the fills take the slack above and below.
        let rows = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);
        let title_area = rows[1];
        let catalog_area = rows[3];
        let format_area = rows[5];
        let bar_area = rows[6];
        let buttons_area = rows[8];
        let source_area = rows[10];
        let status_area = rows[11];

        let centered = |text: String, style: Style| {
            Paragraph::new(Span::styled(text, style)).alignment(Alignment::Center)
        };

        let player = state.player.as_ref();
        let title = player
            .map(|p| p.title.clone())
            .unwrap_or_else(|| NOTHING_SELECTED.to_string());
        frame.render_widget(centered(title, theme.style_title()), title_area);

        let catalog = player
            .map(|p| p.catalog.clone())
            .or_else(|| state.catalog.as_ref().map(|c| c.name.clone()))
            .unwrap_or_default();
        frame.render_widget(centered(catalog, theme.style_text()), catalog_area);

        if let Some(player) = player {
            let status = if player.finished {
                "finished"
            } else if player.playing {
                "playing"
            } else {
                "paused"
            };
            frame.render_widget(
                centered(format!("{} · {}", player.format, status), theme.style_secondary()),
                format_area,
            );
        }

        let bar_w = BAR_WIDTH.min(bar_area.width);
        let bar_rect = Rect {
            x: bar_area.x + (bar_area.width - bar_w) / 2,
            width: bar_w,
            ..bar_area
        };
        draw_progress(
            frame,
            bar_rect,
            player.map_or(0.0, |p| p.progress),
            player.and_then(|p| p.total).map(|t| t.as_secs_f64()),
            theme.style_progress(),
            theme.style_secondary(),
        );

        let buttons: Vec<(&str, ButtonState)> = ControlButton::ALL
            .iter()
            .map(|&b| (b.label(), Self::button_state(state, b)))
            .collect();
        if row_width(&ControlButton::ALL.map(ControlButton::label)) <= buttons_area.width {
            draw_buttons(frame, buttons_area, &buttons, theme);
        }

        let source = match player.and_then(|p| p.source.as_deref()) {
            Some(host) => format!("file from: {}", host),
            None => NO_SOURCE.to_string(),
        };
        frame.render_widget(centered(source, theme.style_secondary()), source_area);

        if state.retrieving() == Some(TargetKind::Media) {
            frame.render_widget(
                centered("Downloading".to_string(), theme.style_progress()),
                status_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_button_follows_focus() {
        let mut state = NavState::new();
        state.control = ControlButton::Skip;
        assert_eq!(
            PlayerPanel::button_state(&state, ControlButton::Skip),
            ButtonState::SelectedIdle
        );
        state.focus = Focus::Controls;
        assert_eq!(
            PlayerPanel::button_state(&state, ControlButton::Skip),
            ButtonState::Selected
        );
        assert_eq!(
            PlayerPanel::button_state(&state, ControlButton::Prev),
            ButtonState::Unselected
        );
    }
}
