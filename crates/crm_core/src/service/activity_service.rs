//! Recent-activity feed.
//!
//! # Responsibility
//! - Fetch recently touched records from all four sources.
//! - Derive, merge and rank their events into one bounded feed.
//!
//! # Invariants
//! - Any single source failure fails the whole call; a feed missing a kind
//!   would silently break ordering completeness.
//! - `feed.count == feed.events.len() <= applied limit`.

use crate::activity::derive::derive_all;
use crate::activity::rank::merge_and_rank;
use crate::diagnostics::Diagnostics;
use crate::model::activity::{ActivityEvent, ActivityFeed};
use crate::model::entity::{OwnerId, RawRecord, SourceKind};
use crate::repo::source::{RepoError, RepoResult, SourceSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Applied when the caller passes a non-positive limit.
pub const DEFAULT_FEED_LIMIT: usize = 20;
pub const FEED_LIMIT_MAX: usize = 100;
/// Per-source fetch multiple; records can yield several events each.
pub const FEED_OVERFETCH_FACTOR: usize = 2;

/// Fail-fast error of the activity feed.
#[derive(Debug)]
pub enum ActivityError {
    Source { kind: SourceKind, source: RepoError },
}

impl ActivityError {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Source { kind, .. } => *kind,
        }
    }
}

impl Display for ActivityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source { kind, source } => {
                write!(f, "failed to load {kind} activity: {source}")
            }
        }
    }
}

impl Error for ActivityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source { source, .. } => Some(source),
        }
    }
}

/// Maps a caller-supplied limit to the applied one.
///
/// Non-positive values select `DEFAULT_FEED_LIMIT`; larger values are capped
/// at `FEED_LIMIT_MAX`.
pub fn normalize_feed_limit(limit: i64) -> usize {
    if limit <= 0 {
        return DEFAULT_FEED_LIMIT;
    }
    usize::try_from(limit).map_or(FEED_LIMIT_MAX, |value| value.min(FEED_LIMIT_MAX))
}

/// Activity feed service over the four entity sources.
pub struct ActivityService<'a> {
    sources: SourceSet<'a>,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ActivityService<'a> {
    pub fn new(sources: SourceSet<'a>, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            sources,
            diagnostics,
        }
    }

    /// Returns the owner's most recent activity, newest first.
    ///
    /// # Errors
    /// - `ActivityError::Source` naming the first source kind that failed.
    pub fn recent_activity(
        &self,
        owner_id: OwnerId,
        limit: i64,
    ) -> Result<ActivityFeed, ActivityError> {
        let started_at = Instant::now();
        let applied_limit = normalize_feed_limit(limit);
        let fetch_limit = applied_limit.saturating_mul(FEED_OVERFETCH_FACTOR);

        let mut sequences = Vec::with_capacity(SourceKind::ALL.len());
        for kind in SourceKind::ALL {
            sequences.push(self.kind_events(owner_id, kind, fetch_limit)?);
        }

        let feed = ActivityFeed::new(merge_and_rank(sequences, applied_limit));
        self.diagnostics
            .feed_built(owner_id, feed.count, started_at.elapsed().as_millis());
        Ok(feed)
    }

    fn kind_events(
        &self,
        owner_id: OwnerId,
        kind: SourceKind,
        fetch_limit: usize,
    ) -> Result<Vec<ActivityEvent>, ActivityError> {
        let records = self
            .fetch_records(owner_id, kind, fetch_limit)
            .map_err(|source| {
                self.diagnostics.source_failed(owner_id, kind, &source);
                ActivityError::Source { kind, source }
            })?;

        let mut events = derive_all(records);
        events.truncate(fetch_limit);
        Ok(events)
    }

    fn fetch_records(
        &self,
        owner_id: OwnerId,
        kind: SourceKind,
        fetch_limit: usize,
    ) -> RepoResult<Vec<RawRecord>> {
        let limit = u32::try_from(fetch_limit).unwrap_or(u32::MAX);
        let records = match kind {
            SourceKind::Communication => into_raw(
                self.sources
                    .communications
                    .list_recent(owner_id, None, limit)?,
            ),
            SourceKind::WorkItem => {
                into_raw(self.sources.work_items.list_recent(owner_id, None, limit)?)
            }
            SourceKind::Initiative => {
                into_raw(self.sources.initiatives.list_recent(owner_id, None, limit)?)
            }
            SourceKind::Relationship => into_raw(
                self.sources
                    .relationships
                    .list_recent(owner_id, None, limit)?,
            ),
        };
        Ok(records)
    }
}

fn into_raw<T: Into<RawRecord>>(records: Vec<T>) -> Vec<RawRecord> {
    records.into_iter().map(Into::into).collect()
}
