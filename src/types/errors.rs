use std::fmt;

use super::download::DownloadId;

// === HostError ===

/// Errors returned by the host download subsystem.
///
/// Every failure is scoped to the single item or action that triggered it;
/// the engine reports it and leaves local state unchanged so the user can
/// retry the action.
#[derive(Debug)]
pub enum HostError {
    /// The host has no download with the given ID.
    NotFound(DownloadId),
    /// The host rejected a control operation (pause/resume/cancel/erase/download).
    Rejected(String),
    /// The host could not provide a file icon.
    IconUnavailable(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NotFound(id) => write!(f, "Download not found: {}", id),
            HostError::Rejected(msg) => write!(f, "Host rejected operation: {}", msg),
            HostError::IconUnavailable(msg) => write!(f, "File icon unavailable: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

// === ConfigError ===

/// Errors related to panel configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse the configuration document.
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
