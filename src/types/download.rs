use serde::{Deserialize, Serialize};

/// Host-assigned download identifier, stable for the download's lifetime.
pub type DownloadId = u32;

/// Lifecycle tag reported by the host download subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    InProgress,
    Interrupted,
    Complete,
}

/// The host's interrupt vocabulary. Codes outside this set can still appear
/// on a record; the classifier treats any non-empty code as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    FileFailed,
    FileAccessDenied,
    FileNoSpace,
    FileNameTooLong,
    FileTooLarge,
    FileBlocked,
    NetworkFailed,
    NetworkTimeout,
    NetworkDisconnected,
    NetworkServerDown,
    ServerFailed,
    ServerBadContent,
    ServerUnauthorized,
    UserCanceled,
    UserShutdown,
    Crash,
}

impl InterruptReason {
    /// Parses a host interrupt code. Returns None for codes outside the
    /// known vocabulary.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FILE_FAILED" => Some(Self::FileFailed),
            "FILE_ACCESS_DENIED" => Some(Self::FileAccessDenied),
            "FILE_NO_SPACE" => Some(Self::FileNoSpace),
            "FILE_NAME_TOO_LONG" => Some(Self::FileNameTooLong),
            "FILE_TOO_LARGE" => Some(Self::FileTooLarge),
            "FILE_BLOCKED" => Some(Self::FileBlocked),
            "NETWORK_FAILED" => Some(Self::NetworkFailed),
            "NETWORK_TIMEOUT" => Some(Self::NetworkTimeout),
            "NETWORK_DISCONNECTED" => Some(Self::NetworkDisconnected),
            "NETWORK_SERVER_DOWN" => Some(Self::NetworkServerDown),
            "SERVER_FAILED" => Some(Self::ServerFailed),
            "SERVER_BAD_CONTENT" => Some(Self::ServerBadContent),
            "SERVER_UNAUTHORIZED" => Some(Self::ServerUnauthorized),
            "USER_CANCELED" => Some(Self::UserCanceled),
            "USER_SHUTDOWN" => Some(Self::UserShutdown),
            "CRASH" => Some(Self::Crash),
            _ => None,
        }
    }
}

/// A snapshot of one download as reported by the host subsystem.
/// Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub url: String,
    /// Destination file path as reported by the host.
    pub filename: String,
    pub state: DownloadState,
    /// Interrupt/error code from the host vocabulary, if any.
    pub error: Option<String>,
    pub paused: bool,
    pub can_resume: bool,
    pub bytes_received: u64,
    /// Total size in bytes; negative when the host does not know it.
    pub total_bytes: i64,
    /// Start timestamp in epoch milliseconds; 0 when unknown.
    pub start_time: i64,
    /// Estimated completion timestamp in epoch milliseconds, if the host
    /// can estimate one.
    pub estimated_end_time: Option<i64>,
}

/// Filter for host `search` and `erase` calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadQuery {
    pub id: Option<DownloadId>,
    /// Ordering key, e.g. "-start_time" for newest first.
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

impl DownloadQuery {
    pub fn by_id(id: DownloadId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// The most recently started downloads, newest first.
    pub fn latest(limit: usize) -> Self {
        Self {
            id: None,
            order_by: Some("-start_time".to_string()),
            limit: Some(limit),
        }
    }
}

/// Request passed to the host to start a new download (used by retry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub url: String,
    pub filename: String,
}
