//! Data models for club records.
//!
//! - `Member`, `Section`: who is in the club and which voice part they sing
//! - `Rehearsal`: attendance lists and status resolution
//! - `PaymentEvent`: per-member payment ledger for one collection
//! - `Money`: non-negative amounts in whole cents

pub mod member;
pub mod money;
pub mod payment;
pub mod rehearsal;

pub use member::{Member, Section};
pub use money::Money;
pub use payment::{PaymentEntry, PaymentEvent, PaymentStatus};
pub use rehearsal::{AttendanceCategory, AttendanceStatus, Rehearsal};
