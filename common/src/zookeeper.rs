//! [`Coordinator`] backed by a ZooKeeper ensemble

use anyhow::Context;
use tracing::instrument;
use zookeeper_client as zk;

use crate::client::{ClientError, Coordinator, NodeRecord};

impl From<zk::Error> for ClientError {
    fn from(error: zk::Error) -> Self {
        match error {
            zk::Error::NoNode => ClientError::NoNode,
            zk::Error::NodeExists => ClientError::NodeExists,
            zk::Error::NotEmpty => ClientError::NotEmpty,
            other => ClientError::Other(other.into()),
        }
    }
}

/// Converts the child count of a node's stat, which the service reports as a signed number.
fn child_count(path: &str, num_children: i32) -> Result<usize, ClientError> {
    usize::try_from(num_children).map_err(|_| {
        ClientError::Other(anyhow::anyhow!(
            "{path} reported a negative number of children ({num_children})"
        ))
    })
}

pub struct ZooKeeper {
    client: zk::Client,
}

/// Connects to the ensemble listed in `endpoints` ("host:port" entries).
///
/// `timeout` bounds establishing the session only; individual requests are not timed out.
#[instrument(skip(timeout))]
pub async fn connect(
    endpoints: &[String],
    timeout: std::time::Duration,
) -> anyhow::Result<ZooKeeper> {
    let cluster = endpoints.join(",");
    tracing::debug!("connecting to {cluster}");
    let client = tokio::time::timeout(timeout, zk::Client::connect(&cluster))
        .await
        .with_context(|| {
            format!(
                "timed out after {} connecting to {cluster}",
                humantime::format_duration(timeout)
            )
        })?
        .with_context(|| format!("failed connecting to {cluster}"))?;
    tracing::info!("connected to {cluster}");
    Ok(ZooKeeper { client })
}

impl Coordinator for ZooKeeper {
    async fn exists(&self, path: &str) -> Result<bool, ClientError> {
        Ok(self.client.check_stat(path).await?.is_some())
    }

    async fn get(&self, path: &str) -> Result<NodeRecord, ClientError> {
        let (data, stat) = self.client.get_data(path).await?;
        Ok(NodeRecord {
            data,
            num_children: child_count(path, stat.num_children)?,
        })
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, ClientError> {
        Ok(self.client.list_children(path).await?)
    }

    async fn create(&self, path: &str, data: &[u8]) -> Result<(), ClientError> {
        let options = zk::CreateMode::Persistent.with_acls(zk::Acls::anyone_all());
        self.client.create(path, data, &options).await?;
        Ok(())
    }

    async fn set(&self, path: &str, data: &[u8]) -> Result<(), ClientError> {
        self.client.set_data(path, data, None).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.client.delete(path, None).await?;
        Ok(())
    }
}
