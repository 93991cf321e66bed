use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, Prompt, Tab};

use super::styles;
use super::tabs::{members, payments, rehearsals, report};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Prompting => {
            if let Some(ref prompt) = app.prompt {
                render_prompt_overlay(frame, prompt);
            }
        }
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  {}", app.config.club_name());
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Members, Tab::Rehearsals, Tab::Payments, Tab::Report];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style()));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Members => members::render(frame, app, area),
        Tab::Rehearsals => rehearsals::render(frame, app, area),
        Tab::Payments => payments::render(frame, app, area),
        Tab::Report => report::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::Members => "[a]dd | e[x]port | [q]uit",
        Tab::Rehearsals => "[n]ew | [s]wipe | [l]og | [e]xcuse | [q]uit",
        Tab::Payments => "[n]ew | [s]wipe | [f]ull | [p]artial | [e]xempt | [q]uit",
        Tab::Report => "e[x]port | [q]uit",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.saved_age()),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 28, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  ClubSwipe  version {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-4", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("↑/↓", "Navigate list"),
        help_line("PgUp/PgDn", "Scroll a page"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("a", "Add members (Members tab)"),
        help_line("n", "New rehearsal or payment"),
        help_line("s", "Swipe cards into the selected one"),
        help_line("l", "Log attendance by name"),
        help_line("f / p", "Pay in full / partial by name"),
        help_line("e", "Excuse or exempt by name"),
        help_line("x", "Export spreadsheet now"),
        help_line("q", "Save, export and quit"),
        Line::from(""),
        Line::from(Span::styled(" At a prompt", styles::highlight_style())),
        help_line("Enter", "Submit the line"),
        help_line("done/Esc", "Back to the menu"),
        help_line("late", "Switch swipe category (also"),
        help_line("", "present, very-late)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_prompt_overlay(frame: &mut Frame, prompt: &Prompt) {
    let area = centered_rect_fixed(64, 16, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for entry in &prompt.log {
        lines.push(Line::from(Span::styled(
            format!(" {}", entry),
            styles::success_style(),
        )));
    }
    if !prompt.log.is_empty() {
        lines.push(Line::from(""));
    }
    if let Some(hint) = prompt.kind.hint() {
        lines.push(Line::from(Span::styled(format!(" {}", hint), styles::muted_style())));
    }
    if let Some(ref error) = prompt.error {
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }
    lines.push(Line::from(Span::styled(
        format!(" {}:", prompt.kind.label()),
        styles::highlight_style(),
    )));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{}▌", prompt.input), styles::input_style()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Type ", styles::muted_style()),
        Span::styled("done", styles::help_key_style()),
        Span::styled(" or press ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" when finished", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(format!(" {} ", prompt.kind.title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Save, export the spreadsheet and quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{enter_line, test_app};
    use crate::app::PromptKind;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_centered_rect_fixed_clamps_to_area() {
        let outer = Rect::new(0, 0, 40, 10);
        let r = centered_rect_fixed(20, 4, outer);
        assert_eq!(r, Rect::new(10, 3, 20, 4));
        let r = centered_rect_fixed(80, 20, outer);
        assert_eq!(r, Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn test_render_every_tab() {
        let (_dir, mut app) = test_app();
        app.start_prompt(PromptKind::MemberName);
        enter_line(&mut app, "Alice");
        enter_line(&mut app, "T1");
        enter_line(&mut app, "C1");
        app.finish_prompt();

        for tab in [Tab::Members, Tab::Rehearsals, Tab::Payments, Tab::Report] {
            app.current_tab = tab;
            let screen = draw(&app);
            assert!(screen.contains("[1] Members"));
        }
        app.current_tab = Tab::Members;
        assert!(draw(&app).contains("Alice"));
    }

    #[test]
    fn test_render_prompt_shows_error() {
        let (_dir, mut app) = test_app();
        app.start_prompt(PromptKind::MemberName);
        enter_line(&mut app, "Alice");
        enter_line(&mut app, "Alto");
        let screen = draw(&app);
        assert!(screen.contains("Add New Members"));
        assert!(screen.contains("Not a valid section"));
    }
}
