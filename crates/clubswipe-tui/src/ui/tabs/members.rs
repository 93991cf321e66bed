use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use clubswipe_core::{AttendanceStatus, Member};

use crate::app::App;
use crate::ui::styles;
use crate::utils::pad_to;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_member_list(frame, app, chunks[0]);
    render_member_detail(frame, app, chunks[1]);
}

fn render_member_list(frame: &mut Frame, app: &App, area: Rect) {
    let members = app.members();

    let items: Vec<ListItem> = members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let line = Line::from(format!("{} {}", pad_to(&member.name, 24), member.section));
            let style = if i == app.member_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Members ({}) ", members.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No members yet. Press [a] to add one.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.member_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_member_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_member() {
        Some(member) => (format!(" {} ", member.name), detail_lines(app, member)),
        None => (
            " No Member Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a member from the list",
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

fn detail_lines<'a>(app: &'a App, member: &'a Member) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Section: ", styles::highlight_style()),
            Span::raw(member.section.long_name()),
        ]),
        Line::from(vec![
            Span::styled("Card:    ", styles::highlight_style()),
            Span::raw(member.card_id.as_str()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Rehearsals", styles::title_style())),
    ];

    let rehearsals = app.dataset.rehearsals();
    if rehearsals.is_empty() {
        lines.push(Line::from(Span::styled("  None yet", styles::muted_style())));
    }
    let mut absences = 0;
    for rehearsal in rehearsals {
        let status = rehearsal.status_of(&member.name);
        if status == AttendanceStatus::Absent {
            absences += 1;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", pad_to(&rehearsal.name, 20))),
            Span::styled(status.to_string(), styles::attendance_style(status)),
        ]));
    }
    if !rehearsals.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  Total absences: {}", absences),
            styles::muted_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Payments", styles::title_style())));
    let payments = app.dataset.payments();
    if payments.is_empty() {
        lines.push(Line::from(Span::styled("  None yet", styles::muted_style())));
    }
    for payment in payments {
        let status = payment.status_of(&member.name);
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", pad_to(&payment.name, 20))),
            Span::styled(status.to_string(), styles::payment_style(status)),
            Span::styled(format!(" of {}", payment.total), styles::muted_style()),
        ]));
    }

    lines
}
