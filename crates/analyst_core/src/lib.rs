//! Analyst core: pure conversation state machine and view-model helpers.
mod candidate;
mod effect;
mod entry;
mod error;
mod gate;
mod msg;
mod session;
mod state;
mod transcript;
mod update;
mod view_model;

pub use candidate::{Candidate, CandidateSet};
pub use effect::{DiscoverRequest, Effect, SynthesisRequest};
pub use entry::ConversationEntry;
pub use error::{TransportFailure, ValidationFailure};
pub use gate::BusyGate;
pub use msg::{Discovery, Msg};
pub use session::{ScopeId, ScopeItem, SessionContext, SessionId};
pub use state::{PanelState, PanelVariant, Stage, Ticket, REPORT_FILENAME};
pub use transcript::{HistoryTurn, Transcript, USER_ROLE};
pub use update::update;
pub use view_model::{PanelViewModel, ScopeRowView};
