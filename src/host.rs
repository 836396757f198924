//! Boundary to the host download subsystem.
//!
//! The engine never transfers files itself; everything it knows about a
//! download comes through this trait, and every control action goes back
//! out through it.

use async_trait::async_trait;

use crate::types::download::{DownloadDescriptor, DownloadId, DownloadQuery, DownloadRecord};
use crate::types::errors::HostError;

/// Asynchronous interface to the host download subsystem.
///
/// `search` with a by-id query returning an empty list is not an error: it
/// means the host no longer knows the download (a lookup miss).
#[async_trait]
pub trait DownloadHost: Send + Sync {
    async fn search(&self, query: &DownloadQuery) -> Result<Vec<DownloadRecord>, HostError>;
    async fn pause(&self, id: DownloadId) -> Result<(), HostError>;
    async fn resume(&self, id: DownloadId) -> Result<(), HostError>;
    async fn cancel(&self, id: DownloadId) -> Result<(), HostError>;
    async fn erase(&self, query: &DownloadQuery) -> Result<(), HostError>;
    /// Opens the downloaded file with the platform handler.
    async fn open(&self, id: DownloadId) -> Result<(), HostError>;
    /// Reveals the downloaded file in the platform file manager.
    async fn show(&self, id: DownloadId) -> Result<(), HostError>;
    /// Starts a new download and returns its host-assigned ID.
    async fn download(&self, descriptor: &DownloadDescriptor) -> Result<DownloadId, HostError>;
    async fn get_file_icon(&self, id: DownloadId) -> Result<String, HostError>;
}

/// Push notification from the host download subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Created(DownloadRecord),
    /// The change payload is partial by contract, so only the id is
    /// carried; the engine refetches the full record before merging.
    Changed { id: DownloadId },
    Erased { id: DownloadId },
}
