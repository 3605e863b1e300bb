//! Property tests for the task snapshot codec.
//!
//! Uses proptest to verify:
//! 1. Any task list survives encode → decode with identical contents and
//!    re-encodes to the same bytes.
//! 2. Random text never causes a panic in `decode_snapshot`.

use chrono::{DateTime, Utc};
use mytasks_proto::codec::{decode_snapshot, encode_snapshot};
use mytasks_proto::{Priority, Task, TaskId};
use proptest::prelude::*;
use uuid::Uuid;

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low)
    ]
}

/// Timestamps with sub-second precision, so nanosecond round-tripping is
/// exercised too.
fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_filter_map("out of range", |(secs, nanos)| {
            DateTime::from_timestamp(secs, nanos)
        })
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<u128>(),
        "[^\\s\\x00][^\\x00]{0,80}",
        arb_priority(),
        any::<bool>(),
        arb_timestamp(),
        arb_timestamp(),
    )
        .prop_map(|(id, title, priority, completed, created_at, updated_at)| Task {
            id: TaskId::from_uuid(Uuid::from_u128(id)),
            title,
            priority,
            completed,
            created_at,
            updated_at,
        })
}

proptest! {
    #[test]
    fn snapshot_round_trip_is_byte_exact(tasks in prop::collection::vec(arb_task(), 0..16)) {
        let written = encode_snapshot(&tasks).unwrap();
        let read = decode_snapshot(&written).unwrap();
        prop_assert_eq!(&read, &tasks);
        prop_assert_eq!(encode_snapshot(&read).unwrap(), written);
    }

    #[test]
    fn decode_never_panics(text in ".{0,256}") {
        let _ = decode_snapshot(&text);
    }
}
