use crm_core::db::open_db_in_memory;
use crm_core::repo::source::{
    CommunicationCount, CommunicationFilter, CommunicationStore, InitiativeCount,
    InitiativeFilter, InitiativeStore, RelationshipCount, RelationshipFilter, RelationshipOrder,
    RelationshipStore, RepoError, WorkItemCount, WorkItemFilter, WorkItemStore,
};
use crm_core::repo::SqliteStores;
use crm_core::{
    Communication, CommunicationType, Initiative, InitiativeStatus, Priority, RelatedRef,
    Relationship, RelationshipType, WorkItem, WorkItemStatus,
};
use rusqlite::Connection;

const OWNER: i64 = 7;
const OTHER_OWNER: i64 = 8;
const DAY: i64 = 86_400_000;

#[test]
fn communications_are_scoped_through_relationship_owner() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let mine = stores
        .relationships
        .insert(&Relationship::new(OWNER, "Ada", RelationshipType::Client, DAY))
        .unwrap();
    let theirs = stores
        .relationships
        .insert(&Relationship::new(OTHER_OWNER, "Bob", RelationshipType::Lead, DAY))
        .unwrap();
    stores
        .communications
        .insert(&Communication::new(mine, CommunicationType::Call, "Intro", DAY))
        .unwrap();
    stores
        .communications
        .insert(&Communication::new(theirs, CommunicationType::Email, "Hi", DAY))
        .unwrap();

    let listed = stores.communications.list_recent(OWNER, None, 10).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner_id, OWNER);
    assert_eq!(listed[0].relationship, Some(RelatedRef::new(mine, "Ada")));
    assert_eq!(
        stores
            .communications
            .count(OWNER, &CommunicationCount::All)
            .unwrap(),
        1
    );
}

#[test]
fn communication_filters_and_ordering() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);
    let relationship = stores
        .relationships
        .insert(&Relationship::new(OWNER, "Ada", RelationshipType::Client, 0))
        .unwrap();

    for (day, kind, subject) in [
        (1, CommunicationType::Email, "first"),
        (3, CommunicationType::Call, "third"),
        (2, CommunicationType::Email, "second"),
    ] {
        let mut record = Communication::new(relationship, kind, subject, day * DAY);
        record.occurred_on = day * DAY;
        stores.communications.insert(&record).unwrap();
    }

    let all = stores
        .communications
        .list_by_owner(OWNER, &CommunicationFilter::default(), 10, 0)
        .unwrap();
    let subjects: Vec<&str> = all.iter().map(|item| item.subject.as_str()).collect();
    assert_eq!(subjects, vec!["third", "second", "first"]);

    let emails = stores
        .communications
        .list_by_owner(
            OWNER,
            &CommunicationFilter {
                kind: Some(CommunicationType::Email),
                occurred_from: Some(2 * DAY),
                ..CommunicationFilter::default()
            },
            10,
            0,
        )
        .unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "second");

    let second_page = stores
        .communications
        .list_by_owner(OWNER, &CommunicationFilter::default(), 1, 1)
        .unwrap();
    assert_eq!(second_page[0].subject, "second");

    assert_eq!(
        stores
            .communications
            .count(OWNER, &CommunicationCount::OccurredSince(2 * DAY))
            .unwrap(),
        2
    );
    assert_eq!(
        stores
            .communications
            .count(OWNER, &CommunicationCount::OfType(CommunicationType::Call))
            .unwrap(),
        1
    );
}

#[test]
fn work_items_list_by_priority_then_due_date() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let mut low = WorkItem::new(OWNER, "low", 0);
    low.priority = Priority::Low;
    low.due_at = Some(DAY);
    let mut high_late = WorkItem::new(OWNER, "high late", 0);
    high_late.priority = Priority::High;
    high_late.due_at = Some(5 * DAY);
    let mut high_undated = WorkItem::new(OWNER, "high undated", 0);
    high_undated.priority = Priority::High;
    let mut high_early = WorkItem::new(OWNER, "high early", 0);
    high_early.priority = Priority::High;
    high_early.due_at = Some(2 * DAY);

    for record in [&low, &high_late, &high_undated, &high_early] {
        stores.work_items.insert(record).unwrap();
    }

    let listed = stores
        .work_items
        .list_by_owner(OWNER, &WorkItemFilter::default(), 10, 0)
        .unwrap();
    let titles: Vec<&str> = listed.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["high early", "high late", "high undated", "low"]
    );

    let high_only = stores
        .work_items
        .list_by_owner(
            OWNER,
            &WorkItemFilter {
                priority: Some(Priority::High),
                due_before: Some(3 * DAY),
                ..WorkItemFilter::default()
            },
            10,
            0,
        )
        .unwrap();
    assert_eq!(high_only.len(), 1);
    assert_eq!(high_only[0].title, "high early");
}

#[test]
fn work_item_counts_cover_status_overdue_and_window() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);
    let now = 10 * DAY;

    let mut overdue = WorkItem::new(OWNER, "overdue", DAY);
    overdue.due_at = Some(now - 1);
    let mut due_later = WorkItem::new(OWNER, "later", 9 * DAY);
    due_later.due_at = Some(now + DAY);
    let mut done_late = WorkItem::new(OWNER, "done", DAY);
    done_late.due_at = Some(DAY);
    done_late.status = WorkItemStatus::Completed;

    for record in [&overdue, &due_later, &done_late] {
        stores.work_items.insert(record).unwrap();
    }
    stores
        .work_items
        .insert(&WorkItem::new(OTHER_OWNER, "foreign", DAY))
        .unwrap();

    let count = |predicate: WorkItemCount| stores.work_items.count(OWNER, &predicate).unwrap();
    assert_eq!(count(WorkItemCount::All), 3);
    assert_eq!(count(WorkItemCount::WithStatus(WorkItemStatus::Pending)), 2);
    assert_eq!(count(WorkItemCount::WithStatus(WorkItemStatus::Completed)), 1);
    assert_eq!(count(WorkItemCount::OverdueAt(now)), 1);
    assert_eq!(count(WorkItemCount::CreatedSince(3 * DAY)), 1);
}

#[test]
fn work_item_associations_resolve_names_and_drop_tombstones() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let client = stores
        .relationships
        .insert(&Relationship::new(OWNER, "Acme", RelationshipType::Client, 0))
        .unwrap();
    let initiative = stores
        .initiatives
        .insert(&Initiative::new(OWNER, "Rollout", 0))
        .unwrap();
    let mut record = WorkItem::new(OWNER, "linked", 0);
    record.relationship = Some(RelatedRef::new(client, ""));
    record.initiative = Some(RelatedRef::new(initiative, ""));
    stores.work_items.insert(&record).unwrap();

    let listed = stores.work_items.list_recent(OWNER, None, 10).unwrap();
    assert_eq!(listed[0].relationship, Some(RelatedRef::new(client, "Acme")));
    assert_eq!(
        listed[0].initiative,
        Some(RelatedRef::new(initiative, "Rollout"))
    );

    tombstone(&conn, "relationships", client);
    let listed = stores.work_items.list_recent(OWNER, None, 10).unwrap();
    assert_eq!(listed[0].relationship, None);
    assert!(listed[0].initiative.is_some());
}

#[test]
fn initiatives_filter_by_status_and_client() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);
    let client = stores
        .relationships
        .insert(&Relationship::new(OWNER, "Acme", RelationshipType::Client, 0))
        .unwrap();

    let mut active = Initiative::new(OWNER, "active", DAY);
    active.client = Some(RelatedRef::new(client, ""));
    let mut cancelled = Initiative::new(OWNER, "cancelled", 2 * DAY);
    cancelled.status = InitiativeStatus::Cancelled;
    stores.initiatives.insert(&active).unwrap();
    stores.initiatives.insert(&cancelled).unwrap();

    let newest_first = stores
        .initiatives
        .list_by_owner(OWNER, &InitiativeFilter::default(), 10, 0)
        .unwrap();
    assert_eq!(newest_first[0].name, "cancelled");

    let for_client = stores
        .initiatives
        .list_by_owner(
            OWNER,
            &InitiativeFilter {
                client_id: Some(client),
                ..InitiativeFilter::default()
            },
            10,
            0,
        )
        .unwrap();
    assert_eq!(for_client.len(), 1);
    assert_eq!(for_client[0].client, Some(RelatedRef::new(client, "Acme")));

    assert_eq!(
        stores
            .initiatives
            .count(
                OWNER,
                &InitiativeCount::WithStatus(InitiativeStatus::Cancelled)
            )
            .unwrap(),
        1
    );
}

#[test]
fn relationships_search_and_order() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let mut bravo = Relationship::new(OWNER, "bravo", RelationshipType::Lead, DAY);
    bravo.company = "Globex".to_string();
    let mut alpha = Relationship::new(OWNER, "Alpha", RelationshipType::Client, DAY);
    alpha.updated_at = 3 * DAY;
    stores.relationships.insert(&bravo).unwrap();
    stores.relationships.insert(&alpha).unwrap();

    let by_name = stores
        .relationships
        .list_by_owner(OWNER, &RelationshipFilter::default(), 10, 0)
        .unwrap();
    assert_eq!(by_name[0].name, "Alpha");

    let by_update = stores
        .relationships
        .list_by_owner(
            OWNER,
            &RelationshipFilter {
                order: RelationshipOrder::RecentlyUpdated,
                ..RelationshipFilter::default()
            },
            10,
            0,
        )
        .unwrap();
    assert_eq!(by_update[0].name, "Alpha");

    let searched = stores
        .relationships
        .list_by_owner(
            OWNER,
            &RelationshipFilter {
                search: Some("GLOB".to_string()),
                ..RelationshipFilter::default()
            },
            10,
            0,
        )
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].name, "bravo");

    assert_eq!(
        stores
            .relationships
            .count(OWNER, &RelationshipCount::OfType(RelationshipType::Lead))
            .unwrap(),
        1
    );
}

#[test]
fn tombstoned_rows_are_invisible_to_lists_and_counts() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let relationship = stores
        .relationships
        .insert(&Relationship::new(OWNER, "Ada", RelationshipType::Client, 0))
        .unwrap();
    stores
        .communications
        .insert(&Communication::new(relationship, CommunicationType::Meeting, "Sync", 0))
        .unwrap();
    let work_item = stores
        .work_items
        .insert(&WorkItem::new(OWNER, "gone", 0))
        .unwrap();

    tombstone(&conn, "work_items", work_item);
    tombstone(&conn, "relationships", relationship);

    assert!(stores.work_items.list_recent(OWNER, None, 10).unwrap().is_empty());
    assert!(stores.relationships.list_recent(OWNER, None, 10).unwrap().is_empty());
    assert!(stores.communications.list_recent(OWNER, None, 10).unwrap().is_empty());
    assert_eq!(stores.work_items.count(OWNER, &WorkItemCount::All).unwrap(), 0);
    assert_eq!(
        stores
            .communications
            .count(OWNER, &CommunicationCount::All)
            .unwrap(),
        0
    );
}

#[test]
fn list_recent_honors_since_cutoff_and_limit() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    for day in 1..=4 {
        stores
            .initiatives
            .insert(&Initiative::new(OWNER, format!("day {day}"), day * DAY))
            .unwrap();
    }

    let recent = stores
        .initiatives
        .list_recent(OWNER, Some(3 * DAY), 10)
        .unwrap();
    let names: Vec<&str> = recent.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["day 4", "day 3"]);

    assert_eq!(stores.initiatives.list_recent(OWNER, None, 1).unwrap().len(), 1);
}

#[test]
fn insert_rejects_inverted_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let stores = SqliteStores::new(&conn);

    let mut record = WorkItem::new(OWNER, "bad", 2 * DAY);
    record.updated_at = DAY;

    let err = stores.work_items.insert(&record).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

fn tombstone(conn: &Connection, table: &str, id: i64) {
    conn.execute(
        &format!("UPDATE {table} SET is_deleted = 1 WHERE id = ?1;"),
        [id],
    )
    .unwrap();
}
