use crate::{ScopeId, SessionContext, SessionId, Ticket, TransportFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Host opened the panel for a dashboard session.
    PanelOpened { session_id: SessionId },
    /// Host closed the panel.
    PanelClosed,
    /// User edited the question input.
    InputChanged(String),
    /// User sent the current input as a question.
    PromptSubmitted,
    /// User asked for a table built straight from the current input.
    QuickTableSubmitted,
    CandidateToggled { index: usize, approved: bool },
    SelectAllToggled(bool),
    SelectionConfirmed,
    /// User picked a chart from the session's scope list.
    ScopeSelected(ScopeId),
    ReportRequested,
    /// User activated the link of a transcript entry.
    ArtifactActivated { entry_index: usize },
    SessionLoaded {
        ticket: Ticket,
        result: Result<SessionContext, TransportFailure>,
    },
    DiscoveryCompleted {
        ticket: Ticket,
        result: Result<Discovery, TransportFailure>,
    },
    SynthesisCompleted {
        ticket: Ticket,
        result: Result<serde_json::Value, TransportFailure>,
    },
    DeliveryCompleted {
        ticket: Ticket,
        result: Result<String, TransportFailure>,
    },
    ReportCompleted {
        ticket: Ticket,
        result: Result<Vec<u8>, TransportFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Successful discovery response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Candidates(Vec<String>),
    Analysis { text: String },
}
