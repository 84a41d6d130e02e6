use tracing::instrument;

use crate::client::Coordinator;
use crate::error::{Error, ErrorKind};
use crate::znode;

/// Makes sure `path` and every one of its ancestors exist on `client`.
///
/// Missing segments are created as empty persistent nodes with an open ACL; existing ones are
/// left untouched. Returns the number of nodes created. The first failing check or create
/// aborts, leaving whatever was created so far in place.
#[instrument(skip(client))]
pub async fn ensure_path<C: Coordinator>(client: &C, path: &str) -> Result<usize, Error> {
    let mut created = 0;
    for current in znode::ancestry(path) {
        let exists = client
            .exists(&current)
            .await
            .map_err(|err| Error::new(ErrorKind::DestinationExists, &current, err))?;
        if exists {
            continue;
        }
        client
            .create(&current, &[])
            .await
            .map_err(|err| Error::new(ErrorKind::DestinationCreate, &current, err))?;
        tracing::info!("created {current}");
        created += 1;
    }
    Ok(created)
}
