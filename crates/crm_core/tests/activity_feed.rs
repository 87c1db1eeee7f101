mod support;

use crm_core::db::open_db_in_memory;
use crm_core::repo::source::SourceSet;
use crm_core::repo::SqliteStores;
use crm_core::{
    ActivityAction, ActivityError, ActivityService, Communication, CommunicationType,
    Initiative, InitiativeStatus, LogDiagnostics, RelatedRef, Relationship, RelationshipType,
    RepoError, SourceKind, WorkItem, WorkItemStatus,
};
use support::{FailingStore, MemoryStore, RecordingDiagnostics, DAY};

const OWNER: i64 = 1;

fn memory_sources(store: &MemoryStore) -> SourceSet<'_> {
    SourceSet {
        communications: store,
        work_items: store,
        initiatives: store,
        relationships: store,
    }
}

#[test]
fn communication_and_completed_work_item_feed_is_exact() {
    let mut communication = Communication::new(10, CommunicationType::Call, "Kickoff", DAY);
    communication.id = 1;
    communication.owner_id = OWNER;

    let mut work_item = WorkItem::new(OWNER, "Send proposal", 2 * DAY);
    work_item.id = 2;
    work_item.status = WorkItemStatus::Completed;
    work_item.updated_at = 3 * DAY;

    let store = MemoryStore {
        communications: vec![communication],
        work_items: vec![work_item],
        ..MemoryStore::default()
    };
    let diagnostics = RecordingDiagnostics::default();

    let feed = ActivityService::new(memory_sources(&store), &diagnostics)
        .recent_activity(OWNER, 10)
        .unwrap();

    let shape: Vec<(SourceKind, i64, ActivityAction, i64)> = feed
        .events
        .iter()
        .map(|event| {
            (
                event.source_kind,
                event.source_id,
                event.action,
                event.occurred_at,
            )
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            (SourceKind::WorkItem, 2, ActivityAction::Updated, 3 * DAY),
            (SourceKind::WorkItem, 2, ActivityAction::Completed, 3 * DAY),
            (SourceKind::WorkItem, 2, ActivityAction::Completed, 2 * DAY),
            (SourceKind::Communication, 1, ActivityAction::Created, DAY),
        ]
    );
    assert_eq!(feed.count, 4);
}

#[test]
fn feed_over_sqlite_orders_newest_first_with_related_names() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let client = stores
        .relationships
        .insert(&Relationship::new(OWNER, "Acme", RelationshipType::Client, 0))
        .unwrap();
    let mut initiative = Initiative::new(OWNER, "Migration", DAY);
    initiative.client = Some(RelatedRef::new(client, ""));
    initiative.status = InitiativeStatus::Cancelled;
    initiative.updated_at = 4 * DAY;
    let initiative_id = stores.initiatives.insert(&initiative).unwrap();
    stores
        .communications
        .insert(&Communication::new(client, CommunicationType::Email, "", 2 * DAY))
        .unwrap();

    let diagnostics = LogDiagnostics;
    let feed = ActivityService::new(stores.sources(), &diagnostics)
        .recent_activity(OWNER, 10)
        .unwrap();

    assert_eq!(feed.count, 4);
    let first = &feed.events[0];
    assert_eq!(first.source_kind, SourceKind::Initiative);
    assert_eq!(first.source_id, initiative_id);
    assert_eq!(first.action, ActivityAction::Cancelled);
    assert_eq!(first.related_id, Some(client));
    assert_eq!(first.related_name.as_deref(), Some("Acme"));

    let communication = &feed.events[1];
    assert_eq!(communication.source_kind, SourceKind::Communication);
    assert_eq!(communication.title, "Untitled communication");
    assert_eq!(communication.related_name.as_deref(), Some("Acme"));

    assert_eq!(feed.events[2].action, ActivityAction::Created);
    assert_eq!(feed.events[2].source_kind, SourceKind::Initiative);
    assert_eq!(feed.events[3].source_kind, SourceKind::Relationship);

    for pair in feed.events.windows(2) {
        assert!(pair[0].occurred_at >= pair[1].occurred_at);
    }
}

#[test]
fn feed_is_capped_at_requested_limit() {
    let store = MemoryStore {
        relationships: (0..30)
            .rev()
            .map(|day| {
                let mut record =
                    Relationship::new(OWNER, format!("r{day}"), RelationshipType::Lead, day * DAY);
                record.id = day + 1;
                record
            })
            .collect(),
        ..MemoryStore::default()
    };
    let diagnostics = RecordingDiagnostics::default();
    let service = ActivityService::new(memory_sources(&store), &diagnostics);

    let feed = service.recent_activity(OWNER, 5).unwrap();
    assert_eq!(feed.count, 5);
    assert_eq!(feed.events[0].occurred_at, 29 * DAY);

    let one = service.recent_activity(OWNER, 1).unwrap();
    assert_eq!(one.count, 1);
}

#[test]
fn non_positive_limit_selects_default_and_over_fetches() {
    let store = MemoryStore {
        work_items: (0..60)
            .rev()
            .map(|n| {
                let mut record = WorkItem::new(OWNER, format!("w{n}"), n * DAY);
                record.id = n + 1;
                record
            })
            .collect(),
        ..MemoryStore::default()
    };
    let diagnostics = RecordingDiagnostics::default();

    let feed = ActivityService::new(memory_sources(&store), &diagnostics)
        .recent_activity(OWNER, 0)
        .unwrap();

    assert_eq!(feed.count, 20);
    assert_eq!(*store.max_requested.borrow(), 40);
}

#[test]
fn oversized_limit_is_capped() {
    let store = MemoryStore::default();
    let diagnostics = RecordingDiagnostics::default();

    let feed = ActivityService::new(memory_sources(&store), &diagnostics)
        .recent_activity(OWNER, 5_000)
        .unwrap();

    assert!(feed.is_empty());
    assert_eq!(*store.max_requested.borrow(), 200);
}

#[test]
fn owner_without_records_gets_empty_feed() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);
    stores
        .work_items
        .insert(&WorkItem::new(OWNER + 1, "someone else", DAY))
        .unwrap();
    let diagnostics = LogDiagnostics;

    let feed = ActivityService::new(stores.sources(), &diagnostics)
        .recent_activity(OWNER, 10)
        .unwrap();

    assert!(feed.is_empty());
    assert_eq!(feed.count, 0);
}

#[test]
fn failing_source_fails_the_feed_and_names_the_kind() {
    let store = MemoryStore::default();
    let failing = FailingStore;
    let diagnostics = RecordingDiagnostics::default();
    let sources = SourceSet {
        initiatives: &failing,
        ..memory_sources(&store)
    };

    let err = ActivityService::new(sources, &diagnostics)
        .recent_activity(OWNER, 10)
        .unwrap_err();

    assert_eq!(err.kind(), SourceKind::Initiative);
    assert!(matches!(
        err,
        ActivityError::Source {
            source: RepoError::Unavailable(_),
            ..
        }
    ));
    assert!(err.to_string().contains("initiative"));
    assert_eq!(*diagnostics.failed_sources.borrow(), vec![SourceKind::Initiative]);
}
