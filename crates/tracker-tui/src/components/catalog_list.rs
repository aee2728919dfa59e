//! CatalogList: previously downloaded catalogs with their dates.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracker_core::nav::NavState;

use crate::{component::Component, theme::Theme};

pub struct CatalogList {
    title: String,
    list_state: ListState,
}

impl CatalogList {
    pub fn new(dir_label: impl Into<String>) -> Self {
        Self {
            title: format!(" Browsing {} ", dir_label.into()),
            list_state: ListState::default(),
        }
    }
}

impl Component for CatalogList {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &NavState, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme.style_table_border())
            .title(Span::styled(self.title.as_str(), theme.style_list_title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.catalogs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no catalogs downloaded yet",
                    theme.style_secondary(),
                )),
                inner,
            );
            return;
        }

        let items: Vec<ListItem> = state
            .catalogs
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let selected = i == state.catalog_cursor;
                let (marker, name_style) = if selected {
                    ("│ ", theme.style_list_selected())
                } else {
                    ("  ", theme.style_text())
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, name_style),
                        Span::styled(entry.name.clone(), name_style),
                    ]),
                    Line::from(vec![
                        Span::styled(marker, name_style),
                        Span::styled(entry.date_label(), theme.style_secondary()),
                    ]),
                    Line::default(),
                ])
            })
            .collect();

        self.list_state.select(Some(state.catalog_cursor));
        frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
    }
}
