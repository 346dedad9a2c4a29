use thiserror::Error;

/// Discriminated outcome of a remote call.
///
/// Stages pattern-match on this to decide sentinel-vs-value; no variant is ever
/// allowed to abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("host unreachable")]
    Unreachable,
    #[error("remote call timed out")]
    Timeout,
    #[error("access denied")]
    Denied,
    #[error("{0}")]
    Failed(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;
