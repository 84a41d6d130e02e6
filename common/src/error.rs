use crate::client::ClientError;

/// Which step of the replication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceMissing,
    SourceRead,
    SourceList,
    DestinationExists,
    DestinationCreate,
    DestinationWrite,
    DestinationDelete,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let description = match self {
            ErrorKind::SourceMissing => "source path does not exist",
            ErrorKind::SourceRead => "failed to get data from source path",
            ErrorKind::SourceList => "failed to get children of source path",
            ErrorKind::DestinationExists => "failed to check existence of destination path",
            ErrorKind::DestinationCreate => "failed to create destination path",
            ErrorKind::DestinationWrite => "failed to set data for destination path",
            ErrorKind::DestinationDelete => "failed to delete destination path",
        };
        write!(f, "{description}")
    }
}

/// A failed coordination request together with the path it was issued for.
///
/// Every such failure aborts the run; the message names the step, the path and the cause.
#[derive(Debug, thiserror::Error)]
#[error("{kind} {path}: {source:#}")]
pub struct Error {
    pub kind: ErrorKind,
    pub path: String,
    #[source]
    pub source: ClientError,
}

impl Error {
    #[must_use]
    pub fn new(kind: ErrorKind, path: &str, source: ClientError) -> Self {
        Self {
            kind,
            path: path.to_string(),
            source,
        }
    }
}
