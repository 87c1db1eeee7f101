//! Observability capability injected into the aggregation services.
//!
//! # Responsibility
//! - Report degraded counters/panels and failed sources without the engine
//!   reaching a process-wide logger on its own.
//! - Provide the default `log`-backed implementation.
//!
//! # Invariants
//! - Reporting never fails and never alters engine results.
//! - Error text is sanitized and length-capped before it is logged.

use crate::logging::sanitize_message;
use crate::model::entity::{OwnerId, SourceKind};
use crate::model::snapshot::StatCounter;
use crate::repo::source::RepoError;
use log::{debug, error, warn};

const MAX_ERROR_CHARS: usize = 200;

/// Sink for engine policy events.
pub trait Diagnostics {
    /// A statistics counter fell back to zero.
    fn counter_degraded(&self, owner_id: OwnerId, counter: StatCounter, err: &RepoError);
    /// A dashboard recent-items panel fell back to empty.
    fn recent_items_degraded(&self, owner_id: OwnerId, kind: SourceKind, err: &RepoError);
    /// A source failed on a fail-fast path.
    fn source_failed(&self, owner_id: OwnerId, kind: SourceKind, err: &RepoError);
    fn feed_built(&self, owner_id: OwnerId, events: usize, duration_ms: u128);
    fn statistics_built(&self, owner_id: OwnerId, degraded: usize, duration_ms: u128);
    fn dashboard_built(&self, owner_id: OwnerId, degraded_panels: usize, duration_ms: u128);
}

/// Forwards engine events to the `log` facade as `key=value` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn counter_degraded(&self, owner_id: OwnerId, counter: StatCounter, err: &RepoError) {
        warn!(
            "event=stat_counter module=statistics status=degraded owner_id={} counter={} source={} error={}",
            owner_id,
            counter,
            counter.source_kind(),
            sanitize_message(&err.to_string(), MAX_ERROR_CHARS)
        );
    }

    fn recent_items_degraded(&self, owner_id: OwnerId, kind: SourceKind, err: &RepoError) {
        warn!(
            "event=recent_items module=dashboard status=degraded owner_id={} source={} error={}",
            owner_id,
            kind,
            sanitize_message(&err.to_string(), MAX_ERROR_CHARS)
        );
    }

    fn source_failed(&self, owner_id: OwnerId, kind: SourceKind, err: &RepoError) {
        error!(
            "event=activity_source module=activity status=error owner_id={} source={} error={}",
            owner_id,
            kind,
            sanitize_message(&err.to_string(), MAX_ERROR_CHARS)
        );
    }

    fn feed_built(&self, owner_id: OwnerId, events: usize, duration_ms: u128) {
        debug!(
            "event=activity_feed module=activity status=ok owner_id={} events={} duration_ms={}",
            owner_id, events, duration_ms
        );
    }

    fn statistics_built(&self, owner_id: OwnerId, degraded: usize, duration_ms: u128) {
        debug!(
            "event=statistics module=statistics status={} owner_id={} degraded={} duration_ms={}",
            if degraded == 0 { "ok" } else { "degraded" },
            owner_id,
            degraded,
            duration_ms
        );
    }

    fn dashboard_built(&self, owner_id: OwnerId, degraded_panels: usize, duration_ms: u128) {
        debug!(
            "event=dashboard module=dashboard status={} owner_id={} degraded_panels={} duration_ms={}",
            if degraded_panels == 0 { "ok" } else { "degraded" },
            owner_id,
            degraded_panels,
            duration_ms
        );
    }
}
