use tracing::instrument;

use crate::client::Coordinator;
use crate::error::ErrorKind;
use crate::materialize;
use crate::znode;

/// Error type for tree operations that preserves the summary of work done before the failure.
///
/// The Display implementation shows the failing step, path and cause, so it can be logged with
/// any format specifier.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct Error {
    #[source]
    pub source: crate::Error,
    pub summary: Summary,
}

impl Error {
    #[must_use]
    pub fn new(source: crate::Error, summary: Summary) -> Self {
        Error { source, summary }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct Settings {
    /// Don't print a "Copying ..." line for every node.
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub nodes_copied: usize,
    pub bytes_copied: u64,
    pub nodes_created: usize,
    pub nodes_deleted: usize,
}

impl std::ops::Add for Summary {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            nodes_copied: self.nodes_copied + other.nodes_copied,
            bytes_copied: self.bytes_copied + other.bytes_copied,
            nodes_created: self.nodes_created + other.nodes_created,
            nodes_deleted: self.nodes_deleted + other.nodes_deleted,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "nodes copied: {}\n\
            bytes copied: {}\n\
            nodes created: {}\n\
            nodes deleted: {}",
            self.nodes_copied,
            bytesize::ByteSize(self.bytes_copied),
            self.nodes_created,
            self.nodes_deleted,
        )
    }
}

/// Copies the node at `src` and its whole subtree to `dst`.
///
/// Nodes are visited depth-first in pre-order: a node's ancestors exist on the destination
/// before its data is written, and its data is written before any of its children are read.
/// Children are taken in the order the source lists them. A node whose read reported zero
/// children is not listed at all, even if children appeared since.
///
/// The walk keeps its own stack instead of recursing, so deep trees don't grow the call stack.
#[instrument(skip(src_client, dst_client))]
pub async fn copy<S: Coordinator, D: Coordinator>(
    src_client: &S,
    dst_client: &D,
    src: &str,
    dst: &str,
    settings: &Settings,
) -> Result<Summary, Error> {
    let mut summary = Summary::default();
    let mut pending = vec![(src.to_string(), dst.to_string())];
    while let Some((src_path, dst_path)) = pending.pop() {
        throttle::get_ops_token().await;
        tracing::debug!("reading {src_path}");
        let record = src_client.get(&src_path).await.map_err(|err| {
            Error::new(
                crate::Error::new(ErrorKind::SourceRead, &src_path, err),
                summary,
            )
        })?;
        if !settings.quiet {
            println!("Copying {dst_path} ...");
        }
        let created = materialize::ensure_path(dst_client, &dst_path)
            .await
            .map_err(|err| Error::new(err, summary))?;
        summary.nodes_created += created;
        dst_client
            .set(&dst_path, &record.data)
            .await
            .map_err(|err| {
                Error::new(
                    crate::Error::new(ErrorKind::DestinationWrite, &dst_path, err),
                    summary,
                )
            })?;
        summary.nodes_copied += 1;
        summary.bytes_copied += record.data.len() as u64;
        if record.num_children == 0 {
            continue;
        }
        tracing::debug!("listing {} children of {src_path}", record.num_children);
        let children = src_client.children(&src_path).await.map_err(|err| {
            Error::new(
                crate::Error::new(ErrorKind::SourceList, &src_path, err),
                summary,
            )
        })?;
        // reversed so that the first listed child is popped first
        for child in children.iter().rev() {
            pending.push((znode::join(&src_path, child), znode::join(&dst_path, child)));
        }
    }
    Ok(summary)
}
