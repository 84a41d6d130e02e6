use tracing::instrument;

use crate::client::{ClientError, Coordinator};
use crate::copy::{Error, Summary};
use crate::error::ErrorKind;

#[derive(Debug, Copy, Clone, Default)]
pub struct Settings {
    /// Don't print the "Deleting ..." line.
    pub quiet: bool,
}

/// Deletes the destination root before a copy.
///
/// Only the node at `path` itself is deleted: if it still has children the service refuses
/// and the run aborts. A node that does not exist counts as already reset.
#[instrument(skip(client))]
pub async fn reset<C: Coordinator>(
    client: &C,
    path: &str,
    settings: &Settings,
) -> Result<Summary, Error> {
    throttle::get_ops_token().await;
    if !settings.quiet {
        println!("Deleting {path} ...");
    }
    match client.delete(path).await {
        Ok(()) => {
            tracing::info!("deleted {path}");
            Ok(Summary {
                nodes_deleted: 1,
                ..Default::default()
            })
        }
        Err(ClientError::NoNode) => {
            tracing::debug!("{path} does not exist, nothing to delete");
            Ok(Summary::default())
        }
        Err(err) => Err(Error::new(
            crate::Error::new(ErrorKind::DestinationDelete, path, err),
            Default::default(),
        )),
    }
}
