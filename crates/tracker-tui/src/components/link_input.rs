//! LinkInput: single-line entry for a sheet link.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tracker_core::nav::NavState;

use crate::{component::Component, theme::Theme};

const PROMPT: &str = "Enter the link to the Google Sheet Tracker:";
const PLACEHOLDER: &str = "https://docs.google.com/spreadsheets/d/…/edit#gid=…";

#[derive(Default)]
pub struct LinkInput;

impl Component for LinkInput {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &NavState, theme: &Theme) {
        let [_, prompt_area, _, input_area, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(PROMPT, theme.style_text())),
            prompt_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.style_dialog_border());
        let inner = block.inner(input_area);
        frame.render_widget(block, input_area);

        let input = &state.link;
        let scroll = input.visual_scroll(inner.width.saturating_sub(1) as usize);
        let line = if input.value().is_empty() {
            Line::from(Span::styled(PLACEHOLDER, theme.style_secondary()))
        } else {
            Line::from(Span::styled(input.value(), theme.style_text()))
        };
        frame.render_widget(Paragraph::new(line).scroll((0, scroll as u16)), inner);

        let cursor_x = inner.x + input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));

        frame.render_widget(
            Paragraph::new(Span::styled(
                "enter: load · esc: back",
                theme.style_secondary(),
            )),
            hint_area,
        );
    }
}
