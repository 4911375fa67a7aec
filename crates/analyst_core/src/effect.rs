use crate::{
    Candidate, ConversationEntry, HistoryTurn, SessionId, Ticket, ValidationFailure,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the session summary and scope items.
    LoadSession { ticket: Ticket, session_id: SessionId },
    Discover { ticket: Ticket, request: DiscoverRequest },
    Synthesize { ticket: Ticket, request: SynthesisRequest },
    /// Forward an opaque synthesis payload to the renderer.
    Deliver { ticket: Ticket, payload: serde_json::Value },
    GenerateReport {
        ticket: Ticket,
        session_id: SessionId,
        extra: Vec<HistoryTurn>,
    },
    SaveArtifact { filename: String, bytes: Vec<u8> },
    OpenArtifact { url: String },
    /// The panel closed; work tagged with this generation is abandoned.
    CloseSession { generation: u64 },
    TurnAppended(ConversationEntry),
    CandidatesChanged(Vec<Candidate>),
    BusyChanged(bool),
    ShowValidation(ValidationFailure),
    ScrollToBottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscoverRequest {
    /// Suggest metrics related to the prompt.
    Candidates {
        prompt: String,
        history: Vec<HistoryTurn>,
    },
    /// Answer the prompt about one chart's data.
    Analysis {
        prompt: String,
        history: Vec<HistoryTurn>,
        scope: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisRequest {
    Selection { labels: Vec<String> },
    Prompt { prompt: String },
}
