use thiserror::Error;

/// Requests that cannot be honoured in the current state. These are
/// recoverable and never stop the event loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum StateChangeError {
    #[error("no client is active")]
    NoActiveClient,
    #[error("workspace is not attached to a screen")]
    NotAttached,
    #[error("no workspace exists at index {0}")]
    InvalidWorkspace(usize),
    #[error("state already as requested")]
    StateUnchanged,
    #[error("operation unsupported by the active layout")]
    Unsupported,
}
