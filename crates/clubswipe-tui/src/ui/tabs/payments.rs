use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use clubswipe_core::{PaymentEvent, Section};

use crate::app::App;
use crate::ui::styles;
use crate::utils::pad_to;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_payment_list(frame, app, chunks[0]);
    render_payment_detail(frame, app, chunks[1]);
}

fn render_payment_list(frame: &mut Frame, app: &App, area: Rect) {
    let payments = app.dataset.payments();

    let block = Block::default()
        .title(format!(" Payments ({}) ", payments.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if payments.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No payments yet. Press [n] to create one.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = payments
        .iter()
        .enumerate()
        .map(|(i, payment)| {
            let line = Line::from(format!(
                "{} {:>8}",
                pad_to(&payment.name, 20),
                payment.total.to_string()
            ));
            let style = if i == app.payment_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.payment_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_payment_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_payment() {
        Some(payment) => (
            format!(" {} ({}) ", payment.name, payment.total),
            detail_lines(app, payment),
        ),
        None => (
            " No Payment Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a payment from the list",
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

fn detail_lines<'a>(app: &'a App, payment: &'a PaymentEvent) -> Vec<Line<'a>> {
    let registry = app.dataset.registry();
    let mut lines = vec![
        Line::from(Span::styled(
            "[s] swipe full  [f] full by name  [p] partial  [e] exempt",
            styles::muted_style(),
        )),
        Line::from(vec![
            Span::styled("Collected: ", styles::highlight_style()),
            Span::raw(payment.collected().to_string()),
            Span::styled(
                format!("   Paid in full: {} of {}", payment.paid_count(), registry.len()),
                styles::muted_style(),
            ),
        ]),
        Line::from(""),
    ];

    for section in Section::ALL {
        let mut members = registry.members_in(section).peekable();
        if members.peek().is_none() {
            continue;
        }
        lines.push(Line::from(Span::styled(section.long_name(), styles::title_style())));
        for member in members {
            let status = payment.status_of(&member.name);
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", pad_to(&member.name, 24))),
                Span::styled(status.to_string(), styles::payment_style(status)),
            ]));
        }
    }

    if registry.is_empty() {
        lines.push(Line::from(Span::styled(
            "No members registered",
            styles::muted_style(),
        )));
    }

    lines
}
