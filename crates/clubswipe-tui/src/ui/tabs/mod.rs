//! Per-tab content rendering.

pub mod members;
pub mod payments;
pub mod rehearsals;
pub mod report;
