//! Roster report: one row per member joining registry, payments and
//! rehearsals, plus spreadsheet export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use tracing::info;

use crate::dataset::Dataset;
use crate::models::{AttendanceStatus, PaymentStatus, Section};

/// Prefix of exported spreadsheet file names.
const EXPORT_PREFIX: &str = "GleeSpreadsheet_";

/// Timestamp layout in exported file names.
const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub section: Section,
    /// One cell per payment event, in creation order.
    pub payments: Vec<PaymentStatus>,
    /// One cell per rehearsal, in creation order.
    pub attendance: Vec<AttendanceStatus>,
    pub absences: usize,
}

impl ReportRow {
    /// Spreadsheet cells in column order.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(3 + self.payments.len() + self.attendance.len());
        cells.push(self.name.clone());
        cells.push(self.section.to_string());
        cells.extend(self.payments.iter().map(|p| p.to_string()));
        cells.extend(self.attendance.iter().map(|a| a.to_string()));
        cells.push(self.absences.to_string());
        cells
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column titles: name, section, payments, rehearsals, absence total.
pub fn header(dataset: &Dataset) -> Vec<String> {
    let mut header = vec!["Name".to_string(), "Section".to_string()];
    header.extend(dataset.payments().iter().map(|p| p.name.clone()));
    header.extend(dataset.rehearsals().iter().map(|r| r.name.clone()));
    header.push("Total Absences".to_string());
    header
}

/// Lazily produce report rows in section order, then registration order.
///
/// Borrowing the dataset keeps this a pure view: calling it again yields the
/// same rows until the dataset is mutated.
pub fn rows(dataset: &Dataset) -> impl Iterator<Item = ReportRow> + '_ {
    dataset.registry().iter().map(move |member| {
        let payments = dataset
            .payments()
            .iter()
            .map(|p| p.status_of(&member.name))
            .collect();

        let attendance: Vec<AttendanceStatus> = dataset
            .rehearsals()
            .iter()
            .map(|r| r.status_of(&member.name))
            .collect();

        let absences = attendance
            .iter()
            .filter(|s| **s == AttendanceStatus::Absent)
            .count();

        ReportRow {
            name: member.name.clone(),
            section: member.section,
            payments,
            attendance,
            absences,
        }
    })
}

pub fn build_report(dataset: &Dataset) -> Report {
    Report {
        header: header(dataset),
        rows: rows(dataset).collect(),
    }
}

/// File name for a spreadsheet exported at `now`.
pub fn default_export_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}.csv", EXPORT_PREFIX, now.format(EXPORT_TIMESTAMP_FORMAT))
}

/// Write the report as CSV to `path`.
pub fn export_csv(report: &Report, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create spreadsheet: {}", path.display()))?;
    write_csv(report, &mut writer)?;
    writer.flush().context("Failed to flush spreadsheet")?;

    info!(path = %path.display(), rows = report.rows.len(), "Exported spreadsheet");
    Ok(())
}

/// Export into `dir` under a timestamped name; returns the written path.
pub fn export_csv_to_dir<Tz>(report: &Report, dir: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let path = dir.join(default_export_name(now));
    export_csv(report, &path)?;
    Ok(path)
}

/// Write the report as CSV into any writer (stdout for `--report`).
pub fn write_csv<W: std::io::Write>(report: &Report, writer: &mut csv::Writer<W>) -> Result<()> {
    writer
        .write_record(&report.header)
        .context("Failed to write spreadsheet header")?;
    for row in &report.rows {
        writer
            .write_record(row.cells())
            .with_context(|| format!("Failed to write row for {}", row.name))?;
    }
    Ok(())
}
