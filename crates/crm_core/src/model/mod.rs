//! Domain model for CRM entities and the read-side projections built on them.
//!
//! # Responsibility
//! - Define the four entity records returned by the data sources.
//! - Define derived, request-scoped shapes (activity events, snapshots).
//!
//! # Invariants
//! - Timestamps are Unix epoch milliseconds.
//! - `updated_at` is never earlier than `created_at` for a stored record.
//! - Derived shapes are computed on read and never persisted.

pub mod activity;
pub mod entity;
pub mod snapshot;
