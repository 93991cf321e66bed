//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, PromptKind, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl-C quits without the confirmation dialog, but still saves
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if !app.persist() {
            return Ok(false);
        }
        app.state = AppState::Quitting;
        return Ok(true);
    }

    // Handle prompt overlay
    if matches!(app.state, AppState::Prompting) {
        handle_prompt_input(app, key);
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                return Ok(app.save_and_quit());
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.current_tab = Tab::Members,
        KeyCode::Char('2') => app.current_tab = Tab::Rehearsals,
        KeyCode::Char('3') => app.current_tab = Tab::Payments,
        KeyCode::Char('4') => app.current_tab = Tab::Report,
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right | KeyCode::Tab => app.current_tab = app.current_tab.next(),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Char('x') => {
            app.export_with_status();
        }
        KeyCode::Esc => {
            app.status_message = None;
        }
        _ => {
            // Tab-specific input
            match app.current_tab {
                Tab::Members => handle_members_input(app, key),
                Tab::Rehearsals => handle_rehearsals_input(app, key),
                Tab::Payments => handle_payments_input(app, key),
                Tab::Report => {}
            }
        }
    }

    Ok(false)
}

fn handle_prompt_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.finish_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Char(c) => app.push_input_char(c),
        _ => {}
    }
}

fn handle_members_input(app: &mut App, key: KeyEvent) {
    if let KeyCode::Char('a') = key.code {
        app.start_prompt(PromptKind::MemberName);
    }
}

fn handle_rehearsals_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') => app.start_prompt(PromptKind::RehearsalName),
        KeyCode::Char('s') => app.start_rehearsal_prompt(|rehearsal| {
            PromptKind::SwipeAttendance {
                rehearsal,
                category: clubswipe_core::AttendanceCategory::Present,
            }
        }),
        KeyCode::Char('l') => {
            app.start_rehearsal_prompt(|rehearsal| PromptKind::LogAttendance { rehearsal })
        }
        KeyCode::Char('e') => {
            app.start_rehearsal_prompt(|rehearsal| PromptKind::ExcuseRehearsal { rehearsal })
        }
        _ => {}
    }
}

fn handle_payments_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') => app.start_prompt(PromptKind::PaymentName),
        KeyCode::Char('s') => {
            app.start_payment_prompt(|payment| PromptKind::SwipePayFull { payment })
        }
        KeyCode::Char('f') => {
            app.start_payment_prompt(|payment| PromptKind::PayFullByName { payment })
        }
        KeyCode::Char('p') => {
            app.start_payment_prompt(|payment| PromptKind::PartialName { payment })
        }
        KeyCode::Char('e') => {
            app.start_payment_prompt(|payment| PromptKind::ExemptPayment { payment })
        }
        _ => {}
    }
}
