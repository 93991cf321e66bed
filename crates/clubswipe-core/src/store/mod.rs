//! Persistence for the club dataset.
//!
//! `DataStore` reads and writes the whole dataset as one JSON document with
//! top-level `members`, `sections`, `payments` and `rehearsals` keys and a
//! `saved_at` timestamp. Saves go through a temporary file and a rename.

pub mod manager;

pub use manager::{DataStore, StoredData};
