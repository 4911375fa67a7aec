use crate::{Candidate, ConversationEntry, PanelVariant, ScopeId, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub variant: PanelVariant,
    pub open: bool,
    pub session_id: Option<String>,
    pub summary_text: String,
    pub scope_items: Vec<ScopeRowView>,
    pub selected_scope: Option<ScopeId>,
    pub selected_scope_title: Option<String>,
    pub input: String,
    pub entries: Vec<ConversationEntry>,
    pub candidates: Vec<Candidate>,
    /// Drives the "select all" checkbox.
    pub all_selected: bool,
    pub busy: bool,
    pub stage: Stage,
    pub loading_context: bool,
    pub can_request_report: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRowView {
    pub id: ScopeId,
    pub title: String,
}
