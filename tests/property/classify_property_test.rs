//! Property-based tests for the state classifier.
//!
//! For any raw record, `classify` is total and returns exactly the state
//! the condition table prescribes: errored records resolve through the
//! canceled/resumable branches, clean complete records to Complete, and
//! everything else to InProgress.

use proptest::prelude::*;

use downbar::classify::classify;
use downbar::types::download::{DownloadRecord, DownloadState};
use downbar::types::item::ItemState;

fn arb_error() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("USER_CANCELED".to_string())),
        Just(Some("NETWORK_FAILED".to_string())),
        Just(Some("SERVER_BAD_CONTENT".to_string())),
        Just(Some("FILE_NO_SPACE".to_string())),
        // Outside the known vocabulary on purpose.
        Just(Some("SOME_FUTURE_CODE".to_string())),
    ]
}

fn arb_lifecycle() -> impl Strategy<Value = DownloadState> {
    prop_oneof![
        Just(DownloadState::InProgress),
        Just(DownloadState::Interrupted),
        Just(DownloadState::Complete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn classify_matches_condition_table(
        error in arb_error(),
        lifecycle in arb_lifecycle(),
        paused: bool,
        can_resume: bool,
        bytes_received in 0u64..10_000_000,
        total_bytes in -1i64..10_000_000,
    ) {
        let record = DownloadRecord {
            id: 1,
            url: "https://example.com/f.bin".to_string(),
            filename: "/tmp/f.bin".to_string(),
            state: lifecycle,
            error: error.clone(),
            paused,
            can_resume,
            bytes_received,
            total_bytes,
            start_time: 0,
            estimated_end_time: None,
        };

        let errored = error.as_deref().is_some_and(|code| !code.is_empty());
        let canceled = error.as_deref() == Some("USER_CANCELED");
        let resumable = paused && can_resume;

        let expected = if errored {
            if canceled {
                if resumable {
                    ItemState::Paused
                } else {
                    ItemState::Canceled
                }
            } else {
                ItemState::Failed
            }
        } else if lifecycle == DownloadState::Complete {
            ItemState::Complete
        } else {
            ItemState::InProgress
        };

        prop_assert_eq!(classify(&record), expected);
    }

    // Progress counters never influence the semantic state.
    #[test]
    fn classify_ignores_progress_fields(
        a in 0u64..10_000_000,
        b in 0u64..10_000_000,
        total in -1i64..10_000_000,
    ) {
        let mut record = DownloadRecord {
            id: 1,
            url: "https://example.com/f.bin".to_string(),
            filename: "/tmp/f.bin".to_string(),
            state: DownloadState::InProgress,
            error: None,
            paused: false,
            can_resume: false,
            bytes_received: a,
            total_bytes: total,
            start_time: 0,
            estimated_end_time: None,
        };
        let first = classify(&record);
        record.bytes_received = b;
        prop_assert_eq!(classify(&record), first);
    }
}
