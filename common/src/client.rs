//! The coordination-service operations the replicator relies on
//!
//! [`Coordinator`] is implemented by the ZooKeeper client in [`crate::zookeeper`] and by an
//! in-memory tree in the unit tests.

/// Failure of a single coordination-service request.
///
/// The variants the replicator reacts to are split out; everything else is carried as
/// [`ClientError::Other`] with the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("node does not exist")]
    NoNode,
    #[error("node already exists")]
    NodeExists,
    #[error("node has children")]
    NotEmpty,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Snapshot of a single node: its payload and how many children it reported at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRecord {
    pub data: Vec<u8>,
    pub num_children: usize,
}

/// Handle to one connected cluster.
///
/// Handles are only ever invoked, never mutated, so the replicator borrows them for the whole
/// run. Every call completes (or fails) before the next one is issued.
#[allow(async_fn_in_trait)]
pub trait Coordinator {
    async fn exists(&self, path: &str) -> Result<bool, ClientError>;

    async fn get(&self, path: &str) -> Result<NodeRecord, ClientError>;

    /// Names (not paths) of the direct children, in whatever order the service returns them.
    async fn children(&self, path: &str) -> Result<Vec<String>, ClientError>;

    /// Creates a persistent node with an open ACL. The parent must exist.
    async fn create(&self, path: &str, data: &[u8]) -> Result<(), ClientError>;

    /// Replaces the payload regardless of the node's current version.
    async fn set(&self, path: &str, data: &[u8]) -> Result<(), ClientError>;

    /// Deletes a single node regardless of its current version.
    async fn delete(&self, path: &str) -> Result<(), ClientError>;
}
