//! Per-kind event derivation.
//!
//! # Rules
//! - Every record yields one creation-slot event at `created_at`.
//! - A completed work item folds its terminal state into that slot:
//!   the slot event is `Completed` instead of `Created`.
//! - A secondary event at `updated_at` is emitted only when
//!   `updated_at > created_at + UPDATE_GUARD_MS`.
//!   - communication, relationship: `Updated`
//!   - work item: `Updated`, plus `Completed` when the item is completed
//!   - initiative: exactly one of `Started`/`Completed`/`Cancelled` keyed by
//!     status
//! - A work item links its relationship first, else its initiative.

use crate::model::activity::{ActivityAction, ActivityEvent};
use crate::model::entity::{
    Communication, Initiative, InitiativeStatus, RawRecord, RecordId, RelatedRef, Relationship,
    SourceKind, WorkItem,
};

/// Minimum gap between creation and modification to count as an update.
pub const UPDATE_GUARD_MS: i64 = 60_000;
/// Maximum detail length, in characters, including the ellipsis.
pub const DETAIL_MAX_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Derives all events for one record.
pub fn derive_events(record: &RawRecord) -> Vec<ActivityEvent> {
    match record {
        RawRecord::Communication(record) => derive_communication(record),
        RawRecord::WorkItem(record) => derive_work_item(record),
        RawRecord::Initiative(record) => derive_initiative(record),
        RawRecord::Relationship(record) => derive_relationship(record),
    }
}

/// Derives events for a sequence of records, preserving input order.
pub fn derive_all<I>(records: I) -> Vec<ActivityEvent>
where
    I: IntoIterator<Item = RawRecord>,
{
    records
        .into_iter()
        .flat_map(|record| derive_events(&record))
        .collect()
}

pub fn derive_communication(record: &Communication) -> Vec<ActivityEvent> {
    let seed = EventSeed {
        source_id: record.id,
        kind: SourceKind::Communication,
        title: &record.subject,
        detail: &record.description,
        related: record.relationship.as_ref().and_then(RelatedRef::named),
    };

    let mut events = vec![seed.event(ActivityAction::Created, record.created_at)];
    if was_modified(record.created_at, record.updated_at) {
        events.push(seed.event(ActivityAction::Updated, record.updated_at));
    }
    events
}

pub fn derive_work_item(record: &WorkItem) -> Vec<ActivityEvent> {
    let related = record
        .relationship
        .as_ref()
        .and_then(RelatedRef::named)
        .or_else(|| record.initiative.as_ref().and_then(RelatedRef::named));
    let seed = EventSeed {
        source_id: record.id,
        kind: SourceKind::WorkItem,
        title: &record.title,
        detail: &record.description,
        related,
    };

    let slot_action = if record.is_completed() {
        ActivityAction::Completed
    } else {
        ActivityAction::Created
    };
    let mut events = vec![seed.event(slot_action, record.created_at)];
    if was_modified(record.created_at, record.updated_at) {
        events.push(seed.event(ActivityAction::Updated, record.updated_at));
        if record.is_completed() {
            events.push(seed.event(ActivityAction::Completed, record.updated_at));
        }
    }
    events
}

pub fn derive_initiative(record: &Initiative) -> Vec<ActivityEvent> {
    let seed = EventSeed {
        source_id: record.id,
        kind: SourceKind::Initiative,
        title: &record.name,
        detail: &record.description,
        related: record.client.as_ref().and_then(RelatedRef::named),
    };

    let mut events = vec![seed.event(ActivityAction::Created, record.created_at)];
    if was_modified(record.created_at, record.updated_at) {
        let action = match record.status {
            InitiativeStatus::InProgress => ActivityAction::Started,
            InitiativeStatus::Completed => ActivityAction::Completed,
            InitiativeStatus::Cancelled => ActivityAction::Cancelled,
        };
        events.push(seed.event(action, record.updated_at));
    }
    events
}

pub fn derive_relationship(record: &Relationship) -> Vec<ActivityEvent> {
    let seed = EventSeed {
        source_id: record.id,
        kind: SourceKind::Relationship,
        title: &record.name,
        detail: &record.notes,
        related: None,
    };

    let mut events = vec![seed.event(ActivityAction::Created, record.created_at)];
    if was_modified(record.created_at, record.updated_at) {
        events.push(seed.event(ActivityAction::Updated, record.updated_at));
    }
    events
}

/// Cuts `value` to `DETAIL_MAX_CHARS` characters, ending in `...` when cut.
pub fn truncate_detail(value: &str) -> String {
    if value.chars().count() <= DETAIL_MAX_CHARS {
        return value.to_string();
    }
    let mut truncated: String = value
        .chars()
        .take(DETAIL_MAX_CHARS - ELLIPSIS.len())
        .collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Label used when a record has a blank title.
pub fn placeholder_title(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Communication => "Untitled communication",
        SourceKind::WorkItem => "Untitled work item",
        SourceKind::Initiative => "Untitled initiative",
        SourceKind::Relationship => "Unnamed relationship",
    }
}

/// Returns `title`, or the kind placeholder when it is blank.
pub fn display_title(kind: SourceKind, title: &str) -> String {
    if title.trim().is_empty() {
        placeholder_title(kind).to_string()
    } else {
        title.to_string()
    }
}

fn was_modified(created_at: i64, updated_at: i64) -> bool {
    updated_at > created_at.saturating_add(UPDATE_GUARD_MS)
}

struct EventSeed<'a> {
    source_id: RecordId,
    kind: SourceKind,
    title: &'a str,
    detail: &'a str,
    related: Option<&'a RelatedRef>,
}

impl EventSeed<'_> {
    fn event(&self, action: ActivityAction, occurred_at: i64) -> ActivityEvent {
        ActivityEvent {
            source_id: self.source_id,
            source_kind: self.kind,
            action,
            title: display_title(self.kind, self.title),
            detail: if self.detail.is_empty() {
                None
            } else {
                Some(truncate_detail(self.detail))
            },
            occurred_at,
            related_id: self.related.map(|related| related.id),
            related_name: self.related.map(|related| related.name.clone()),
        }
    }
}
