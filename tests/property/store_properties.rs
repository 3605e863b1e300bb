//! Property tests for the task table's lifecycle rules.
//!
//! Uses proptest to verify:
//! 1. `list()` is ordered by `createdAt` descending whatever the insertion order.
//! 2. Toggling twice restores `completed`.
//! 3. Create followed by get returns the submitted title and priority.
//! 4. Delete followed by get is always `NotFound`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, Utc};
use mytasks_proto::api::NewTask;
use mytasks_proto::{Priority, TaskId};
use mytasks_server::error::StoreError;
use mytasks_server::store::TaskTable;
use proptest::prelude::*;

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low)
    ]
}

fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,40}"
}

fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_filter_map("out of range", |(secs, nanos)| {
            DateTime::from_timestamp(secs, nanos)
        })
}

fn new_task(title: &str, priority: Priority) -> NewTask {
    NewTask::new(title, priority).unwrap()
}

proptest! {
    #[test]
    fn list_is_newest_first_for_any_insertion_order(
        stamps in prop::collection::vec(arb_timestamp(), 0..32)
    ) {
        let mut table = TaskTable::new();
        for (i, at) in stamps.iter().enumerate() {
            table.insert(new_task(&format!("task {i}"), Priority::Medium), *at).unwrap();
        }

        let listed = table.list();
        prop_assert_eq!(listed.len(), stamps.len());
        for pair in listed.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn toggle_twice_is_identity_on_completed(
        title in arb_title(),
        priority in arb_priority(),
        start_completed in any::<bool>(),
        at in arb_timestamp(),
    ) {
        let mut table = TaskTable::new();
        let task = table.insert(new_task(&title, priority), at).unwrap();
        if start_completed {
            table.toggle(task.id, at).unwrap();
        }
        let before = table.get(task.id).unwrap();

        table.toggle(task.id, at).unwrap();
        let after = table.toggle(task.id, at).unwrap();

        prop_assert_eq!(after.completed, before.completed);
        prop_assert_eq!(after.title, before.title);
        prop_assert_eq!(after.priority, before.priority);
    }

    #[test]
    fn create_then_get_matches_input(
        title in arb_title(),
        priority in arb_priority(),
        at in arb_timestamp(),
    ) {
        let mut table = TaskTable::new();
        let created = table.insert(new_task(&title, priority), at).unwrap();
        let fetched = table.get(created.id).unwrap();

        prop_assert_eq!(&fetched.title, &title);
        prop_assert_eq!(fetched.priority, priority);
        prop_assert!(!fetched.completed);
        prop_assert_eq!(fetched.created_at, at);
    }

    #[test]
    fn delete_then_get_is_not_found(
        titles in prop::collection::vec(arb_title(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut table = TaskTable::new();
        let ids: Vec<TaskId> = titles
            .iter()
            .map(|t| table.insert(new_task(t, Priority::Low), Utc::now()).unwrap().id)
            .collect();
        let victim = ids[pick.index(ids.len())];

        table.remove(victim).unwrap();
        prop_assert!(matches!(table.get(victim), Err(StoreError::NotFound(id)) if id == victim));
        prop_assert_eq!(table.len(), ids.len() - 1);
    }
}
