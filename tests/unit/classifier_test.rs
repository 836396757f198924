//! Unit tests for the state classifier.
//!
//! Each raw record maps to exactly one of the five semantic states:
//! errored + canceled + resumable  -> Paused
//! errored + canceled + !resumable -> Canceled
//! errored + !canceled             -> Failed
//! !errored + complete tag         -> Complete
//! anything else                   -> InProgress

use rstest::rstest;

use downbar::classify::classify;
use downbar::types::download::{DownloadRecord, DownloadState};
use downbar::types::item::ItemState;

fn record(
    state: DownloadState,
    error: Option<&str>,
    paused: bool,
    can_resume: bool,
) -> DownloadRecord {
    DownloadRecord {
        id: 7,
        url: "https://example.com/archive.zip".to_string(),
        filename: "/home/user/Downloads/archive.zip".to_string(),
        state,
        error: error.map(str::to_string),
        paused,
        can_resume,
        bytes_received: 0,
        total_bytes: -1,
        start_time: 0,
        estimated_end_time: None,
    }
}

#[test]
fn test_canceled_and_resumable_is_paused() {
    let rec = record(DownloadState::Interrupted, Some("USER_CANCELED"), true, true);
    assert_eq!(classify(&rec), ItemState::Paused);
}

#[rstest]
#[case(false, false)]
#[case(true, false)]
#[case(false, true)]
fn test_canceled_without_resume_is_canceled(#[case] paused: bool, #[case] can_resume: bool) {
    let rec = record(
        DownloadState::Interrupted,
        Some("USER_CANCELED"),
        paused,
        can_resume,
    );
    assert_eq!(classify(&rec), ItemState::Canceled);
}

#[rstest]
#[case("NETWORK_FAILED")]
#[case("SERVER_BAD_CONTENT")]
#[case("FILE_NO_SPACE")]
#[case("CRASH")]
fn test_non_cancel_errors_are_failed(#[case] code: &str) {
    let rec = record(DownloadState::Interrupted, Some(code), false, false);
    assert_eq!(classify(&rec), ItemState::Failed);
}

#[test]
fn test_unrecognized_error_code_is_failed() {
    // A code outside the known vocabulary must never be treated as
    // progressing.
    let rec = record(DownloadState::InProgress, Some("SOME_NEW_CODE"), false, false);
    assert_eq!(classify(&rec), ItemState::Failed);
}

#[test]
fn test_error_wins_over_complete_tag() {
    let rec = record(DownloadState::Complete, Some("FILE_FAILED"), false, false);
    assert_eq!(classify(&rec), ItemState::Failed);
}

#[test]
fn test_complete_tag_without_error_is_complete() {
    let rec = record(DownloadState::Complete, None, false, false);
    assert_eq!(classify(&rec), ItemState::Complete);
}

#[test]
fn test_clean_record_is_in_progress() {
    let rec = record(DownloadState::InProgress, None, false, false);
    assert_eq!(classify(&rec), ItemState::InProgress);
}

#[test]
fn test_interrupted_tag_without_error_is_in_progress() {
    // The lifecycle tag alone does not mark an error; only the interrupt
    // code does.
    let rec = record(DownloadState::Interrupted, None, false, false);
    assert_eq!(classify(&rec), ItemState::InProgress);
}

#[test]
fn test_empty_error_string_is_not_errored() {
    let rec = record(DownloadState::InProgress, Some(""), false, false);
    assert_eq!(classify(&rec), ItemState::InProgress);
}

#[test]
fn test_paused_flag_alone_is_still_in_progress() {
    // A paused-but-uncanceled record keeps classifying as InProgress; the
    // Paused display state is reserved for the canceled + resumable shape.
    let rec = record(DownloadState::InProgress, None, true, true);
    assert_eq!(classify(&rec), ItemState::InProgress);
}
