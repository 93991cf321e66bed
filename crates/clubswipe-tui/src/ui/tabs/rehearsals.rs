use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use clubswipe_core::{AttendanceStatus, Rehearsal, Section};

use crate::app::App;
use crate::ui::styles;
use crate::utils::pad_to;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_rehearsal_list(frame, app, chunks[0]);
    render_rehearsal_detail(frame, app, chunks[1]);
}

fn render_rehearsal_list(frame: &mut Frame, app: &App, area: Rect) {
    let rehearsals = app.dataset.rehearsals();

    let block = Block::default()
        .title(format!(" Rehearsals ({}) ", rehearsals.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if rehearsals.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No rehearsals yet. Press [n] to start one.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = rehearsals
        .iter()
        .enumerate()
        .map(|(i, rehearsal)| {
            let line = Line::from(format!(
                "{} {:>3} in",
                pad_to(&rehearsal.name, 22),
                rehearsal.attendance_count()
            ));
            let style = if i == app.rehearsal_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.rehearsal_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_rehearsal_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_rehearsal() {
        Some(rehearsal) => (format!(" {} ", rehearsal.name), detail_lines(app, rehearsal)),
        None => (
            " No Rehearsal Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a rehearsal from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn detail_lines<'a>(app: &'a App, rehearsal: &'a Rehearsal) -> Vec<Line<'a>> {
    let registry = app.dataset.registry();
    let mut absent = 0;
    let mut lines = vec![
        Line::from(Span::styled(
            "[s] swipe in  [l] log by name  [e] excuse",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    for section in Section::ALL {
        let mut members = registry.members_in(section).peekable();
        if members.peek().is_none() {
            continue;
        }
        lines.push(Line::from(Span::styled(section.long_name(), styles::title_style())));
        for member in members {
            let status = rehearsal.status_of(&member.name);
            if status == AttendanceStatus::Absent {
                absent += 1;
            }
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", pad_to(&member.name, 24))),
                Span::styled(status.to_string(), styles::attendance_style(status)),
            ]));
        }
    }

    if registry.is_empty() {
        lines.push(Line::from(Span::styled(
            "No members registered",
            styles::muted_style(),
        )));
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} absent of {}", absent, registry.len()),
            styles::highlight_style(),
        )));
    }

    lines
}
