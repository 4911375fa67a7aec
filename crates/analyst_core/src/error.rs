use thiserror::Error;

/// Input rejected before any network call; shown inline to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("please enter a question first")]
    EmptyInput,
    #[error("please finish the current metric selection first")]
    SelectionPending,
    #[error("please select at least one metric")]
    NoCandidateApproved,
    #[error("please choose a chart first")]
    NoScopeSelected,
}

/// A remote call that failed in transport or returned a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
