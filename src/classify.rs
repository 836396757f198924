//! State classifier: maps a raw host record to a semantic panel state.

use crate::types::download::{DownloadRecord, DownloadState, InterruptReason};
use crate::types::item::ItemState;

/// Classifies a host record into exactly one semantic state.
///
/// Pure and total. An error code the vocabulary does not recognize still
/// counts as errored and resolves to `Failed`; a download is never silently
/// treated as progressing because its interrupt code is unknown.
pub fn classify(record: &DownloadRecord) -> ItemState {
    let errored = record.error.as_deref().is_some_and(|code| !code.is_empty());
    let canceled = record
        .error
        .as_deref()
        .and_then(InterruptReason::from_code)
        == Some(InterruptReason::UserCanceled);
    let resumable = record.paused && record.can_resume;

    if errored {
        if canceled {
            if resumable {
                return ItemState::Paused;
            }
            return ItemState::Canceled;
        }
        return ItemState::Failed;
    }

    if record.state == DownloadState::Complete {
        return ItemState::Complete;
    }

    ItemState::InProgress
}
