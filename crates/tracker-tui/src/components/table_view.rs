//! CatalogTable: the era table and the entries of one era.

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracker_core::era::normalize;
use tracker_core::nav::{Focus, NavState, TableView};
use unicode_width::UnicodeWidthStr;

use crate::{component::Component, theme::Theme};

const KEY_WIDTH: u16 = 25;
const LABEL_WIDTH: u16 = 35;
/// Width of the first entry column, the title.
const TITLE_WIDTH: u16 = 27;
const MIN_COLUMN: u16 = 4;

/// Column widths of the entry table: a fixed title column, then each header
/// cut at its first parenthesis.
pub fn detail_widths(columns: &[String]) -> Vec<u16> {
    columns
        .iter()
        .enumerate()
        .map(|(i, title)| {
            if i == 0 {
                TITLE_WIDTH
            } else {
                u16::try_from(normalize(title).width())
                    .unwrap_or(u16::MAX)
                    .max(MIN_COLUMN)
            }
        })
        .collect()
}

/// Width the table needs, borders included.
pub fn table_width(widths: &[u16]) -> u16 {
    let gaps = u16::try_from(widths.len().saturating_sub(1)).unwrap_or(u16::MAX);
    widths
        .iter()
        .fold(gaps, |total, w| total.saturating_add(*w))
        .saturating_add(2)
}

#[derive(Default)]
pub struct CatalogTable {
    table_state: TableState,
}

impl CatalogTable {
    /// Width the current table wants, for laying out the player beside it.
    pub fn wanted_width(state: &NavState) -> u16 {
        match state.mode.table_view() {
            Some(TableView::Detail) => state
                .detail
                .as_ref()
                .map(|d| table_width(&detail_widths(&d.columns)))
                .unwrap_or(0),
            _ => table_width(&[KEY_WIDTH, LABEL_WIDTH]),
        }
    }
}

impl Component for CatalogTable {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &NavState, theme: &Theme) {
        let focused = state.focus == Focus::Table;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.style_table_border());

        let (header, widths, rows, cursor) = match state.mode.table_view() {
            Some(TableView::Group) => {
                let rows: Vec<Row> = state
                    .eras
                    .iter()
                    .map(|era| {
                        Row::new(vec![
                            Cell::from(era.key.as_str()),
                            Cell::from(era.label.as_str()),
                        ])
                    })
                    .collect();
                (
                    vec!["Files in Era".to_string(), "Name of Era".to_string()],
                    vec![KEY_WIDTH, LABEL_WIDTH],
                    rows,
                    state.era_cursor,
                )
            }
            Some(TableView::Detail) => {
                let Some(detail) = state.detail.as_ref() else {
                    return;
                };
                let rows: Vec<Row> = detail
                    .rows
                    .iter()
                    .map(|record| Row::new(record.iter().map(|f| Cell::from(f.as_str()))))
                    .collect();
                (
                    detail.columns.clone(),
                    detail_widths(&detail.columns),
                    rows,
                    state.detail_cursor,
                )
            }
            None => return,
        };

        if rows.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Span::styled("  nothing here", theme.style_secondary())),
                inner,
            );
            return;
        }

        let header = Row::new(header.into_iter().map(Cell::from))
            .style(theme.style_table_header())
            .bottom_margin(1);
        let table = Table::new(rows, widths.into_iter().map(Constraint::Length))
            .header(header)
            .block(block)
            .style(theme.style_text())
            .row_highlight_style(theme.style_row_selected(focused));

        self.table_state.select(Some(cursor));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_widths() {
        let columns = vec![
            "Name".to_string(),
            "Notes (optional)".to_string(),
            "#".to_string(),
        ];
        assert_eq!(detail_widths(&columns), vec![27, 5, 4]);
    }

    #[test]
    fn test_table_width_counts_separators_and_border() {
        assert_eq!(table_width(&[25, 35]), 25 + 35 + 1 + 2);
    }

    #[test]
    fn test_huge_headers_saturate() {
        let columns = vec!["Name".to_string(), "x".repeat(70_000)];
        let widths = detail_widths(&columns);
        assert_eq!(widths, vec![27, u16::MAX]);
        assert_eq!(table_width(&widths), u16::MAX);
        assert_eq!(table_width(&[u16::MAX, u16::MAX]), u16::MAX);
    }
}
