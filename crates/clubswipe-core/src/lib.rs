//! Core library for clubswipe.
//!
//! Record keeping for a glee club: who is registered under which swipe card,
//! who came to which rehearsal, who has paid what toward each collection, and
//! the consolidated spreadsheet built from all three.
//!
//! - `registry`: card ID and name lookup, section lists
//! - `models`: members, rehearsals, payment events, money
//! - `dataset`: the owned aggregate and all mutations
//! - `report`: report rows and CSV export
//! - `store`: JSON persistence

pub mod dataset;
pub mod error;
pub mod models;
pub mod registry;
pub mod report;
pub mod store;

pub use dataset::{Dataset, MemberKey};
pub use error::{ClubError, Result};
pub use models::{
    AttendanceCategory, AttendanceStatus, Member, Money, PaymentEntry, PaymentEvent,
    PaymentStatus, Rehearsal, Section,
};
pub use registry::MemberRegistry;
pub use report::{build_report, Report, ReportRow};
pub use store::DataStore;
