//! Aggregation use-case services.
//!
//! # Responsibility
//! - `ActivityService`: unified recent-activity feed (fail-fast).
//! - `StatisticsService`: per-owner counters (degrade-to-zero).
//! - `DashboardService`: composite snapshot over both plus recent panels.
//!
//! # Invariants
//! - Services are read-only and request-scoped; nothing is cached.
//! - Services depend on store traits only, never on SQLite directly.
//! - Source queries run sequentially; only the final assembly depends on
//!   all of them.

pub mod activity_service;
pub mod dashboard_service;
pub mod statistics_service;
