//! Activity derivation and ranking.
//!
//! # Responsibility
//! - Turn raw entity records into semantic activity events.
//! - Merge per-kind event sequences into one feed ordered newest first.
//!
//! # Invariants
//! - Everything here is pure: no I/O, no clock, no logging.
//! - Derivation never fails for a record that passed `validate()`.

pub mod derive;
pub mod rank;
