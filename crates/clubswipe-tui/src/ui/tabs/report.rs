//! Live view of the spreadsheet that gets exported on quit.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use clubswipe_core::report;

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate;

/// Widest a status or event-name column is allowed to get.
const MAX_COLUMN_WIDTH: usize = 14;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let report = report::build_report(&app.dataset);

    let block = Block::default()
        .title(format!(" Report ({} members) ", report.rows.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if report.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Nothing to report yet. Press [x] to export anyway.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let name_width = report
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 24);

    let header = Row::new(
        report
            .header
            .iter()
            .map(|title| Cell::from(truncate(title, MAX_COLUMN_WIDTH))),
    )
    .style(styles::header_style());

    let rows: Vec<Row> = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(truncate(&row.name, name_width)),
                Cell::from(row.section.to_string()),
            ];
            cells.extend(
                row.payments
                    .iter()
                    .map(|s| Cell::from(s.to_string()).style(styles::payment_style(*s))),
            );
            cells.extend(
                row.attendance
                    .iter()
                    .map(|s| Cell::from(s.to_string()).style(styles::attendance_style(*s))),
            );
            cells.push(Cell::from(row.absences.to_string()));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(name_width as u16), Constraint::Length(7)];
    widths.extend(
        report.header[2..report.header.len() - 1]
            .iter()
            .map(|title| Constraint::Length(title.chars().count().clamp(9, MAX_COLUMN_WIDTH) as u16)),
    );
    widths.push(Constraint::Length(14));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.report_selection));
    frame.render_stateful_widget(table, area, &mut state);
}
