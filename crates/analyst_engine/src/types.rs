use std::fmt;

use analyst_core::{Discovery, SessionContext, Ticket, TransportFailure};

/// Completion of one backend call, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SessionLoaded {
        ticket: Ticket,
        result: Result<SessionContext, BackendError>,
    },
    Discovered {
        ticket: Ticket,
        result: Result<Discovery, BackendError>,
    },
    Synthesized {
        ticket: Ticket,
        result: Result<serde_json::Value, BackendError>,
    },
    Delivered {
        ticket: Ticket,
        result: Result<String, BackendError>,
    },
    ReportReady {
        ticket: Ticket,
        result: Result<Vec<u8>, BackendError>,
    },
}

impl EngineEvent {
    pub fn ticket(&self) -> Ticket {
        match self {
            EngineEvent::SessionLoaded { ticket, .. }
            | EngineEvent::Discovered { ticket, .. }
            | EngineEvent::Synthesized { ticket, .. }
            | EngineEvent::Delivered { ticket, .. }
            | EngineEvent::ReportReady { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for TransportFailure {
    fn from(err: BackendError) -> Self {
        TransportFailure::new(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
