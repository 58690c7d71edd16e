//! Dynamic table rendering for the qself TUI.
//!
//! Unlike a fixed-schema view, the tables here carry whatever columns the
//! upload produced, so the header row and column widths are computed from
//! the [`Table`] itself.  Cells absent from a row render as blanks.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use qself_core::formatting::{format_cell, format_count};
use qself_core::{CellValue, Table};

use crate::themes::Theme;

/// Hard cap on a single column's width so one long title cannot push every
/// other column off screen.
const MAX_COLUMN_WIDTH: u16 = 32;

/// Minimum column width; keeps short numeric columns readable.
const MIN_COLUMN_WIDTH: u16 = 4;

/// Render `table` into `area`, starting at data row `row_offset`.
///
/// The block title shows the view name and total row count; columns are
/// the first-seen-order key union computed by [`Table::columns`].
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    table: &Table,
    row_offset: usize,
    theme: &Theme,
) {
    let columns = table.columns();

    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(c.clone()).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = table
        .rows()
        .iter()
        .enumerate()
        .skip(row_offset)
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(
                columns
                    .iter()
                    .map(|c| Cell::from(format_cell(row.get(c).unwrap_or(&CellValue::Null)))),
            )
            .style(style)
        })
        .collect();

    let widths: Vec<Constraint> = column_widths(table, &columns)
        .into_iter()
        .map(Constraint::Length)
        .collect();

    let block_title = format!(" {} ({} rows) ", title, format_count(table.len()));
    let widget = TableWidget::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(block_title),
        )
        .style(theme.text);

    frame.render_widget(widget, area);
}

/// Render an error banner for a failed pipeline.
pub fn render_error_banner(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.banner_error)),
    ];
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.error)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

/// Render a placeholder when no upload produced any block.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Pass --activity-log <FILE> and/or --wellness-archive <FILE>.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" qself ")),
        area,
    );
}

/// Per-column display widths: the widest of header and cells, clamped to
/// `[MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]`.
pub fn column_widths(table: &Table, columns: &[String]) -> Vec<u16> {
    columns
        .iter()
        .map(|column| {
            let mut width = UnicodeWidthStr::width(column.as_str());
            for row in table.rows() {
                if let Some(cell) = row.get(column) {
                    width = width.max(UnicodeWidthStr::width(format_cell(cell).as_str()));
                }
            }
            (width as u16).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
