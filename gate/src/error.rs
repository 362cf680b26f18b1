use thiserror::Error;

/// Failure of the durable key/value medium (quota, disabled storage…).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Surfaced by `login` / `logout`; the in-memory session is left untouched.
    #[error("could not persist session: {0}")]
    StoragePersistFailed(#[source] StorageError),
    /// Only ever logged: `restore` turns it into an empty session.
    #[error("persisted session is corrupt: {0}")]
    SessionRestoreCorrupt(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);
