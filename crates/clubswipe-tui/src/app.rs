//! Application state management for ClubSwipe.
//!
//! `App` owns the dataset and moves through an explicit state machine: the
//! menu (`Normal`) opens a prompt, each Enter at the prompt runs one dataset
//! operation and either advances, repeats, or shows the error for a retry,
//! and quitting goes through a confirmation that saves and exports.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use clubswipe_core::store::manager::age_display;
use clubswipe_core::{
    report, AttendanceCategory, ClubError, DataStore, Dataset, Member, MemberKey, Money,
    PaymentEvent, Rehearsal, Section,
};

use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Typing this at a prompt closes it, same as Esc.
pub const DONE_KEYWORD: &str = "done";

/// Maximum length for prompt input.
/// Card swipes are well under this; names and amounts even more so.
const MAX_INPUT_LENGTH: usize = 64;

/// Number of recent confirmations kept in the prompt window.
const PROMPT_LOG_SIZE: usize = 6;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Members,
    Rehearsals,
    Payments,
    Report,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Members => "Members",
            Tab::Rehearsals => "Rehearsals",
            Tab::Payments => "Payments",
            Tab::Report => "Report",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Members => Tab::Rehearsals,
            Tab::Rehearsals => Tab::Payments,
            Tab::Payments => Tab::Report,
            Tab::Report => Tab::Members,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Members => Tab::Report,
            Tab::Rehearsals => Tab::Members,
            Tab::Payments => Tab::Rehearsals,
            Tab::Report => Tab::Payments,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Prompting,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// What the open prompt is collecting. Multi-step flows carry the values
/// gathered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    MemberName,
    MemberSection { name: String },
    MemberCard { name: String, section: Section },
    RehearsalName,
    SwipeAttendance { rehearsal: String, category: AttendanceCategory },
    LogAttendance { rehearsal: String },
    ExcuseRehearsal { rehearsal: String },
    PaymentName,
    PaymentTotal { name: String },
    SwipePayFull { payment: String },
    PayFullByName { payment: String },
    ExemptPayment { payment: String },
    PartialName { payment: String },
    PartialAmount { payment: String, member: String },
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            PromptKind::MemberName
            | PromptKind::MemberSection { .. }
            | PromptKind::MemberCard { .. } => "Add New Members".to_string(),
            PromptKind::RehearsalName => "New Rehearsal".to_string(),
            PromptKind::SwipeAttendance { rehearsal, .. } => format!("Swipe into {}", rehearsal),
            PromptKind::LogAttendance { rehearsal } => format!("Attendance by name: {}", rehearsal),
            PromptKind::ExcuseRehearsal { rehearsal } => format!("Excuse from {}", rehearsal),
            PromptKind::PaymentName | PromptKind::PaymentTotal { .. } => "New Payment".to_string(),
            PromptKind::SwipePayFull { payment } => format!("Swipe to pay in full: {}", payment),
            PromptKind::PayFullByName { payment } => format!("Pay in full by name: {}", payment),
            PromptKind::ExemptPayment { payment } => format!("Exempt from {}", payment),
            PromptKind::PartialName { payment } | PromptKind::PartialAmount { payment, .. } => {
                format!("Partial payment: {}", payment)
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            PromptKind::MemberName => "Name".to_string(),
            PromptKind::MemberSection { name } => format!("Section for {} (T1, T2, Bari, or Bass)", name),
            PromptKind::MemberCard { name, .. } => format!("Swipe card for {}", name),
            PromptKind::RehearsalName => "Name for the new rehearsal".to_string(),
            PromptKind::SwipeAttendance { .. } | PromptKind::SwipePayFull { .. } => "Card".to_string(),
            PromptKind::LogAttendance { .. }
            | PromptKind::ExcuseRehearsal { .. }
            | PromptKind::PayFullByName { .. }
            | PromptKind::ExemptPayment { .. }
            | PromptKind::PartialName { .. } => "Name".to_string(),
            PromptKind::PaymentName => "Name for the new payment".to_string(),
            PromptKind::PaymentTotal { .. } => "How much will it cost?".to_string(),
            PromptKind::PartialAmount { member, .. } => format!("Payment amount from {}", member),
        }
    }

    /// Extra guidance shown above the input line.
    pub fn hint(&self) -> Option<String> {
        match self {
            PromptKind::SwipeAttendance { category, .. } => {
                let others: Vec<&str> = [
                    AttendanceCategory::Present,
                    AttendanceCategory::Late,
                    AttendanceCategory::VeryLate,
                ]
                .iter()
                .filter(|c| *c != category)
                .map(|c| c.keyword())
                .collect();
                Some(format!(
                    "Recording {} attendees. Type {} to switch.",
                    category,
                    others.join(" or ")
                ))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    pub error: Option<String>,
    /// Recent confirmations, oldest first.
    pub log: Vec<String>,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            error: None,
            log: Vec::new(),
        }
    }

    fn push_log(&mut self, message: String) {
        self.log.push(message);
        if self.log.len() > PROMPT_LOG_SIZE {
            self.log.remove(0);
        }
    }
}

/// Result of one accepted prompt line.
struct Step {
    next: PromptKind,
    message: Option<String>,
    changed: bool,
}

impl Step {
    fn advance(next: PromptKind) -> Self {
        Self {
            next,
            message: None,
            changed: false,
        }
    }

    fn note(next: PromptKind, message: String) -> Self {
        Self {
            next,
            message: Some(message),
            changed: false,
        }
    }

    fn saved(next: PromptKind, message: String) -> Self {
        Self {
            next,
            message: Some(message),
            changed: true,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub store: DataStore,
    pub dataset: Dataset,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub prompt: Option<Prompt>,

    // Selection indices
    pub member_selection: usize,
    pub rehearsal_selection: usize,
    pub payment_selection: usize,
    pub report_selection: usize,

    // Status message
    pub status_message: Option<String>,

    pub last_saved: Option<DateTime<Utc>>,
    /// Set while the most recent save attempt has failed.
    pub save_error: Option<String>,
    pub last_export: Option<PathBuf>,
}

impl App {
    /// Create the application from the user's config and data file.
    pub fn new(config: Config) -> Result<Self> {
        let data_path = config.data_path()?;
        debug!(?data_path, "Data file configured");
        Self::with_store(config, DataStore::new(data_path))
    }

    pub fn with_store(config: Config, store: DataStore) -> Result<Self> {
        let (dataset, last_saved) = match store.load_stored()? {
            Some(stored) => {
                let saved_at = stored.saved_at;
                let dataset = stored.into_dataset();
                info!(
                    members = dataset.registry().len(),
                    rehearsals = dataset.rehearsals().len(),
                    payments = dataset.payments().len(),
                    "Loaded from file"
                );
                (dataset, Some(saved_at))
            }
            None => {
                info!("Instantiated new database");
                (Dataset::new(), None)
            }
        };

        Ok(Self {
            config,
            store,
            dataset,
            state: AppState::Normal,
            current_tab: Tab::Members,
            prompt: None,
            member_selection: 0,
            rehearsal_selection: 0,
            payment_selection: 0,
            report_selection: 0,
            status_message: None,
            last_saved,
            save_error: None,
            last_export: None,
        })
    }

    // =========================================================================
    // Prompts
    // =========================================================================

    pub fn start_prompt(&mut self, kind: PromptKind) {
        debug!(?kind, "Opening prompt");
        self.prompt = Some(Prompt::new(kind));
        self.state = AppState::Prompting;
        self.status_message = None;
    }

    /// Open a prompt against the selected rehearsal.
    pub fn start_rehearsal_prompt(&mut self, make: impl FnOnce(String) -> PromptKind) {
        match self.selected_rehearsal().map(|r| r.name.clone()) {
            Some(rehearsal) => self.start_prompt(make(rehearsal)),
            None => {
                self.status_message = Some("No rehearsals yet. Press n to create one.".to_string());
            }
        }
    }

    /// Open a prompt against the selected payment.
    pub fn start_payment_prompt(&mut self, make: impl FnOnce(String) -> PromptKind) {
        match self.selected_payment().map(|p| p.name.clone()) {
            Some(payment) => self.start_prompt(make(payment)),
            None => {
                self.status_message = Some("No payments yet. Press n to create one.".to_string());
            }
        }
    }

    /// Close the prompt and return to the menu.
    pub fn finish_prompt(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            // An unsaved dataset outranks the last confirmation
            self.status_message = self
                .save_error
                .clone()
                .or_else(|| prompt.log.last().cloned());
        }
        self.state = AppState::Normal;
    }

    pub fn push_input_char(&mut self, c: char) {
        if let Some(prompt) = self.prompt.as_mut() {
            if can_add_input_char(prompt.input.len(), c) {
                prompt.input.push(c);
            }
        }
    }

    pub fn pop_input_char(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.input.pop();
        }
    }

    /// Run the current prompt line against the dataset.
    ///
    /// Rejected input keeps the prompt open with the error shown; the
    /// dataset is unchanged in that case.
    pub fn submit_prompt(&mut self) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };

        let input = prompt.input.trim().to_string();
        prompt.input.clear();

        if input.is_empty() {
            self.prompt = Some(prompt);
            return;
        }
        if input.eq_ignore_ascii_case(DONE_KEYWORD) {
            self.prompt = Some(prompt);
            self.finish_prompt();
            return;
        }

        match self.apply(&prompt.kind, &input) {
            Ok(step) => {
                prompt.error = None;
                if step.changed && !self.persist() {
                    prompt.error = self.save_error.clone();
                }
                if let Some(message) = step.message {
                    prompt.push_log(message);
                }
                prompt.kind = step.next;
            }
            Err(e) => {
                debug!(error = %e, "Prompt input rejected");
                prompt.error = Some(e.to_string());
            }
        }
        self.prompt = Some(prompt);
    }

    fn apply(&mut self, kind: &PromptKind, input: &str) -> std::result::Result<Step, ClubError> {
        match kind {
            PromptKind::MemberName => Ok(Step::advance(PromptKind::MemberSection {
                name: input.to_string(),
            })),
            PromptKind::MemberSection { name } => {
                let section: Section = input.parse()?;
                Ok(Step::advance(PromptKind::MemberCard {
                    name: name.clone(),
                    section,
                }))
            }
            PromptKind::MemberCard { name, section } => {
                let member = self.dataset.register_member(input, name, section.label())?;
                Ok(Step::saved(
                    PromptKind::MemberName,
                    format!("Added {} ({})", member.name, member.section),
                ))
            }
            PromptKind::RehearsalName => {
                self.rehearsal_selection = self.dataset.create_rehearsal(input)?;
                Ok(Step::saved(
                    PromptKind::SwipeAttendance {
                        rehearsal: input.to_string(),
                        category: AttendanceCategory::Present,
                    },
                    format!("Added rehearsal {}", input),
                ))
            }
            PromptKind::SwipeAttendance { rehearsal, category } => {
                if let Ok(switched) = input.parse::<AttendanceCategory>() {
                    return Ok(Step::note(
                        PromptKind::SwipeAttendance {
                            rehearsal: rehearsal.clone(),
                            category: switched,
                        },
                        format!("Swipe in {} attendees", switched),
                    ));
                }
                let member = self
                    .dataset
                    .mark_attendance(rehearsal, MemberKey::Card(input), *category)?;
                Ok(Step::saved(
                    kind.clone(),
                    format!("{} was {} at {}", member.name, category, rehearsal),
                ))
            }
            PromptKind::LogAttendance { rehearsal } => {
                let member = self.dataset.mark_attendance(
                    rehearsal,
                    MemberKey::Name(input),
                    AttendanceCategory::Present,
                )?;
                Ok(Step::saved(
                    kind.clone(),
                    format!("{} was present at {}", member.name, rehearsal),
                ))
            }
            PromptKind::ExcuseRehearsal { rehearsal } => {
                let member = self.dataset.mark_exempt(rehearsal, MemberKey::Name(input))?;
                Ok(Step::saved(
                    kind.clone(),
                    format!("{} is now excused from {}", member.name, rehearsal),
                ))
            }
            PromptKind::PaymentName => {
                if self.dataset.payment_index(input).is_some() {
                    return Err(ClubError::DuplicateName(input.to_string()));
                }
                Ok(Step::advance(PromptKind::PaymentTotal {
                    name: input.to_string(),
                }))
            }
            PromptKind::PaymentTotal { name } => {
                let total: Money = input.parse()?;
                self.payment_selection = self.dataset.create_payment(name, total)?;
                Ok(Step::saved(
                    PromptKind::SwipePayFull {
                        payment: name.clone(),
                    },
                    format!("Added payment {} ({})", name, total),
                ))
            }
            PromptKind::SwipePayFull { payment } => {
                let member = self.dataset.pay_full(payment, MemberKey::Card(input))?;
                Ok(Step::saved(
                    kind.clone(),
                    format!("{} has paid in full for {}", member.name, payment),
                ))
            }
            PromptKind::PayFullByName { payment } => {
                let member = self.dataset.pay_full(payment, MemberKey::Name(input))?;
                Ok(Step::saved(
                    kind.clone(),
                    format!("{} has paid in full for {}", member.name, payment),
                ))
            }
            PromptKind::ExemptPayment { payment } => {
                let member = self.dataset.exempt_payment(payment, MemberKey::Name(input))?;
                Ok(Step::saved(
                    kind.clone(),
                    format!("{} is exempt for {}", member.name, payment),
                ))
            }
            PromptKind::PartialName { payment } => {
                let member = self.dataset.resolve(MemberKey::Name(input))?;
                Ok(Step::advance(PromptKind::PartialAmount {
                    payment: payment.clone(),
                    member: member.name.clone(),
                }))
            }
            PromptKind::PartialAmount { payment, member } => {
                let amount: Money = input.parse()?;
                let (member, running) =
                    self.dataset
                        .pay_partial(payment, MemberKey::Name(member), amount)?;
                Ok(Step::saved(
                    PromptKind::PartialName {
                        payment: payment.clone(),
                    },
                    format!("{} paid {}, totaling {}", member.name, amount, running),
                ))
            }
        }
    }

    // =========================================================================
    // Saving and Export
    // =========================================================================

    /// Save the dataset. Failures are reported in the status bar, never fatal.
    pub fn persist(&mut self) -> bool {
        match self.store.save(&self.dataset) {
            Ok(()) => {
                self.last_saved = Some(Utc::now());
                self.save_error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to save data");
                let message = format!("Save failed: {:#}", e);
                self.status_message = Some(message.clone());
                self.save_error = Some(message);
                false
            }
        }
    }

    /// Write the spreadsheet into the configured export directory.
    pub fn export(&mut self) -> Result<PathBuf> {
        let report = report::build_report(&self.dataset);
        let path = report::export_csv_to_dir(
            &report,
            &self.config.export_directory(),
            &Local::now(),
        )?;
        self.last_export = Some(path.clone());
        Ok(path)
    }

    pub fn export_with_status(&mut self) -> bool {
        match self.export() {
            Ok(path) => {
                self.status_message = Some(format!("Output to {}", path.display()));
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to export spreadsheet");
                self.status_message = Some(format!("Export failed: {:#}", e));
                false
            }
        }
    }

    /// Save, export, and move to `Quitting`. Stays put if either step fails.
    pub fn save_and_quit(&mut self) -> bool {
        if !self.persist() || !self.export_with_status() {
            self.state = AppState::Normal;
            return false;
        }
        self.state = AppState::Quitting;
        true
    }

    pub fn saved_age(&self) -> String {
        match self.last_saved {
            Some(saved_at) => format!("Saved {}", age_display((Utc::now() - saved_at).num_minutes())),
            None => "Not saved yet".to_string(),
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Members in report order.
    pub fn members(&self) -> Vec<&Member> {
        self.dataset.registry().iter().collect()
    }

    pub fn selected_member(&self) -> Option<&Member> {
        self.dataset.registry().iter().nth(self.member_selection)
    }

    pub fn selected_rehearsal(&self) -> Option<&Rehearsal> {
        self.dataset.rehearsals().get(self.rehearsal_selection)
    }

    pub fn selected_payment(&self) -> Option<&PaymentEvent> {
        self.dataset.payments().get(self.payment_selection)
    }

    fn current_list_len(&self) -> usize {
        match self.current_tab {
            Tab::Members | Tab::Report => self.dataset.registry().len(),
            Tab::Rehearsals => self.dataset.rehearsals().len(),
            Tab::Payments => self.dataset.payments().len(),
        }
    }

    fn current_selection_mut(&mut self) -> &mut usize {
        match self.current_tab {
            Tab::Members => &mut self.member_selection,
            Tab::Rehearsals => &mut self.rehearsal_selection,
            Tab::Payments => &mut self.payment_selection,
            Tab::Report => &mut self.report_selection,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_list_len();
        let selection = self.current_selection_mut();
        if len == 0 {
            *selection = 0;
            return;
        }
        let moved = if delta < 0 {
            selection.saturating_sub(delta.unsigned_abs())
        } else {
            selection.saturating_add(delta as usize)
        };
        *selection = moved.min(len - 1);
    }

    pub fn select_first(&mut self) {
        *self.current_selection_mut() = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.current_list_len();
        *self.current_selection_mut() = len.saturating_sub(1);
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character should be accepted into the prompt
pub fn can_add_input_char(current_len: usize, c: char) -> bool {
    current_len < MAX_INPUT_LENGTH && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::test_support::{enter_line, test_app};
    use super::*;
    use clubswipe_core::{AttendanceStatus, PaymentStatus};

    fn prompt_kind(app: &App) -> PromptKind {
        app.prompt.as_ref().expect("prompt open").kind.clone()
    }

    fn prompt_error(app: &App) -> Option<String> {
        app.prompt.as_ref().and_then(|p| p.error.clone())
    }

    fn add_member(app: &mut App, name: &str, section: &str, card: &str) {
        app.start_prompt(PromptKind::MemberName);
        enter_line(app, name);
        enter_line(app, section);
        enter_line(app, card);
        app.finish_prompt();
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next_and_prev_wrap() {
        assert_eq!(Tab::Members.next(), Tab::Rehearsals);
        assert_eq!(Tab::Report.next(), Tab::Members);
        assert_eq!(Tab::Members.prev(), Tab::Report);
        assert_eq!(Tab::Payments.prev(), Tab::Rehearsals);
    }

    // -------------------------------------------------------------------------
    // Prompt Flow Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_member_flow_repeats() {
        let (_dir, mut app) = test_app();
        app.start_prompt(PromptKind::MemberName);
        enter_line(&mut app, "Alice");
        assert_eq!(prompt_kind(&app), PromptKind::MemberSection { name: "Alice".to_string() });

        enter_line(&mut app, "Alto");
        assert!(prompt_error(&app).unwrap().contains("Not a valid section"));
        assert_eq!(prompt_kind(&app), PromptKind::MemberSection { name: "Alice".to_string() });

        enter_line(&mut app, "T1");
        enter_line(&mut app, "C1");
        assert_eq!(prompt_kind(&app), PromptKind::MemberName);
        assert_eq!(app.dataset.registry().resolve_by_card("C1").unwrap().name, "Alice");
        assert!(app.last_saved.is_some());
        assert!(app.store.path().exists());

        enter_line(&mut app, "done");
        assert!(app.prompt.is_none());
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Added Alice (T1)"));
    }

    #[test]
    fn test_new_rehearsal_switches_categories_while_swiping() {
        let (_dir, mut app) = test_app();
        add_member(&mut app, "Alice", "T1", "C1");
        add_member(&mut app, "Bob", "Bass", "C2");

        app.start_prompt(PromptKind::RehearsalName);
        enter_line(&mut app, "R1");
        enter_line(&mut app, "C1");
        enter_line(&mut app, "late");
        assert_eq!(
            prompt_kind(&app),
            PromptKind::SwipeAttendance {
                rehearsal: "R1".to_string(),
                category: AttendanceCategory::Late
            }
        );
        enter_line(&mut app, "C2");
        enter_line(&mut app, "unknown-card");
        assert!(prompt_error(&app).unwrap().contains("Not in registry"));

        let r = app.dataset.rehearsal("R1").unwrap();
        assert_eq!(r.status_of("Alice"), AttendanceStatus::Present);
        assert_eq!(r.status_of("Bob"), AttendanceStatus::Late);
    }

    #[test]
    fn test_duplicate_rehearsal_name_reprompts() {
        let (_dir, mut app) = test_app();
        app.start_prompt(PromptKind::RehearsalName);
        enter_line(&mut app, "R1");
        app.finish_prompt();

        app.start_prompt(PromptKind::RehearsalName);
        enter_line(&mut app, "R1");
        assert_eq!(prompt_kind(&app), PromptKind::RehearsalName);
        assert!(prompt_error(&app).unwrap().contains("already taken"));
        assert_eq!(app.dataset.rehearsals().len(), 1);
    }

    #[test]
    fn test_new_payment_flow_and_partial_payments() {
        let (_dir, mut app) = test_app();
        add_member(&mut app, "Alice", "T1", "C1");

        app.start_prompt(PromptKind::PaymentName);
        enter_line(&mut app, "Dues");
        enter_line(&mut app, "fifty");
        assert!(prompt_error(&app).unwrap().contains("Invalid amount"));
        enter_line(&mut app, "50");
        assert_eq!(
            prompt_kind(&app),
            PromptKind::SwipePayFull { payment: "Dues".to_string() }
        );
        app.finish_prompt();

        app.start_payment_prompt(|payment| PromptKind::PartialName { payment });
        enter_line(&mut app, "Alice");
        enter_line(&mut app, "20");
        assert_eq!(
            app.prompt.as_ref().unwrap().log.last().unwrap(),
            "Alice paid 20, totaling 20"
        );
        enter_line(&mut app, "Alice");
        enter_line(&mut app, "30");

        let dues = app.dataset.payment("Dues").unwrap();
        assert_eq!(dues.status_of("Alice"), PaymentStatus::Paid);
    }

    #[test]
    fn test_partial_payment_on_exempt_member_is_reported() {
        let (_dir, mut app) = test_app();
        add_member(&mut app, "Alice", "T1", "C1");
        app.dataset.create_payment("Dues", Money::from_dollars(50)).unwrap();

        app.start_payment_prompt(|payment| PromptKind::ExemptPayment { payment });
        enter_line(&mut app, "Alice");
        app.finish_prompt();

        app.start_payment_prompt(|payment| PromptKind::PartialName { payment });
        enter_line(&mut app, "Alice");
        enter_line(&mut app, "10");
        assert!(prompt_error(&app).unwrap().contains("exempt"));
        assert_eq!(
            app.dataset.payment("Dues").unwrap().status_of("Alice"),
            PaymentStatus::Exempt
        );
    }

    #[test]
    fn test_rehearsal_prompt_requires_a_rehearsal() {
        let (_dir, mut app) = test_app();
        app.start_rehearsal_prompt(|rehearsal| PromptKind::LogAttendance { rehearsal });
        assert!(app.prompt.is_none());
        assert_eq!(app.state, AppState::Normal);
        assert!(app.status_message.unwrap().contains("No rehearsals"));
    }

    #[test]
    fn test_failed_autosave_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let data_file = blocker.join("glee_data.json");
        let config = Config {
            data_file: Some(data_file.clone()),
            export_dir: Some(dir.path().to_path_buf()),
            club_name: None,
        };
        let mut app = App::with_store(config, DataStore::new(data_file.clone())).unwrap();

        app.start_prompt(PromptKind::MemberName);
        enter_line(&mut app, "Alice");
        enter_line(&mut app, "T1");
        enter_line(&mut app, "C1");
        assert!(prompt_error(&app).unwrap().starts_with("Save failed"));
        assert!(app.last_saved.is_none());

        app.finish_prompt();
        assert!(app.status_message.unwrap().starts_with("Save failed"));
        assert!(!data_file.exists());
    }

    #[test]
    fn test_successful_save_clears_save_error() {
        let (_dir, mut app) = test_app();
        app.save_error = Some("Save failed: earlier".to_string());
        add_member(&mut app, "Alice", "T1", "C1");
        assert!(app.save_error.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Added Alice (T1)"));
    }

    #[test]
    fn test_swipe_hint_names_other_categories() {
        let kind = PromptKind::SwipeAttendance {
            rehearsal: "R1".to_string(),
            category: AttendanceCategory::Late,
        };
        assert_eq!(
            kind.hint().unwrap(),
            "Recording late attendees. Type present or very-late to switch."
        );
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let (_dir, mut app) = test_app();
        app.start_prompt(PromptKind::MemberName);
        enter_line(&mut app, "   ");
        assert_eq!(prompt_kind(&app), PromptKind::MemberName);
        assert!(prompt_error(&app).is_none());
    }

    #[test]
    fn test_reload_from_store() {
        let (dir, mut app) = test_app();
        add_member(&mut app, "Alice", "T1", "C1");
        let config = app.config.clone();

        let reloaded = App::with_store(config, DataStore::new(dir.path().join("glee_data.json"))).unwrap();
        assert_eq!(reloaded.dataset, app.dataset);
        assert!(reloaded.last_saved.is_some());
    }

    #[test]
    fn test_save_and_quit_exports_spreadsheet() {
        let (dir, mut app) = test_app();
        add_member(&mut app, "Alice", "T1", "C1");

        assert!(app.save_and_quit());
        assert_eq!(app.state, AppState::Quitting);
        let path = app.last_export.clone().unwrap();
        assert!(path.starts_with(dir.path()));
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Name,Section,Total Absences"));
    }

    // -------------------------------------------------------------------------
    // Selection Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_move_selection_clamps() {
        let (_dir, mut app) = test_app();
        add_member(&mut app, "A", "T1", "1");
        add_member(&mut app, "B", "T1", "2");
        add_member(&mut app, "C", "T1", "3");

        app.move_selection(1);
        assert_eq!(app.member_selection, 1);
        app.move_selection(PAGE_SCROLL_SIZE as isize);
        assert_eq!(app.member_selection, 2);
        app.move_selection(-5);
        assert_eq!(app.member_selection, 0);
        app.select_last();
        assert_eq!(app.selected_member().unwrap().name, "C");
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_input_char() {
        assert!(can_add_input_char(0, 'a'));
        assert!(can_add_input_char(63, '7'));
        assert!(!can_add_input_char(64, 'a'));
        assert!(!can_add_input_char(0, '\n'));
        assert!(!can_add_input_char(0, '\x00'));
    }
}
