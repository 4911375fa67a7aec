use crate::view_model::{PanelViewModel, ScopeRowView};
use crate::{
    BusyGate, CandidateSet, ConversationEntry, ScopeId, ScopeItem, SessionContext, SessionId,
    Transcript,
};

/// Name given to every saved report document.
pub const REPORT_FILENAME: &str = "ai-analysis-report.doc";

/// Which discovery flow the panel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelVariant {
    /// Discovery suggests metrics; the user approves a subset to chart.
    #[default]
    MetricDiscovery,
    /// Discovery answers a question about the selected chart.
    ScopedAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Discovering,
    AwaitingSelection,
    Synthesizing,
    Delivering,
    GeneratingReport,
}

/// Liveness token carried by every outbound call and its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Bumped whenever the panel closes.
    pub generation: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    variant: PanelVariant,
    open: bool,
    session_id: Option<SessionId>,
    context: SessionContext,
    context_loaded_for: Option<SessionId>,
    selected_scope: Option<ScopeId>,
    input: String,
    transcript: Transcript,
    candidates: CandidateSet,
    gate: BusyGate,
    stage: Stage,
    generation: u64,
    next_seq: u64,
    in_flight: Option<Ticket>,
    bootstrap: Option<Ticket>,
    dirty: bool,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variant(variant: PanelVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn view(&self) -> PanelViewModel {
        let selected = self.selected_scope_item();
        PanelViewModel {
            variant: self.variant,
            open: self.open,
            session_id: self.session_id.clone(),
            summary_text: self.context.summary_text.clone(),
            scope_items: self
                .context
                .scope_items
                .iter()
                .map(|item| ScopeRowView {
                    id: item.id,
                    title: item.title.clone(),
                })
                .collect(),
            selected_scope: selected.map(|item| item.id),
            selected_scope_title: selected.map(|item| item.title.clone()),
            input: self.input.clone(),
            entries: self.transcript.entries().to_vec(),
            candidates: self.candidates.items().to_vec(),
            all_selected: self.candidates.all_approved(),
            busy: self.gate.is_busy(),
            stage: self.stage,
            loading_context: self.bootstrap.is_some(),
            can_request_report: self.open && selected.is_some() && !self.gate.is_busy(),
            dirty: self.dirty,
        }
    }

    pub fn variant(&self) -> PanelVariant {
        self.variant
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn selected_scope_item(&self) -> Option<&ScopeItem> {
        self.selected_scope
            .and_then(|id| self.context.scope_item(id))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn open_session(&mut self, session_id: SessionId) {
        self.open = true;
        self.session_id = Some(session_id);
        self.mark_dirty();
    }

    /// Drops everything owned by the conversation and invalidates its tickets.
    /// The loaded context survives so reopening the same session skips the read.
    pub(crate) fn close_session(&mut self) -> u64 {
        let closed_generation = self.generation;
        self.open = false;
        self.selected_scope = None;
        self.input.clear();
        self.transcript = Transcript::new();
        self.candidates = CandidateSet::new();
        self.gate.exit();
        self.stage = Stage::Idle;
        self.in_flight = None;
        self.bootstrap = None;
        self.generation += 1;
        self.mark_dirty();
        closed_generation
    }

    pub(crate) fn needs_context_for(&self, session_id: &str) -> bool {
        self.context_loaded_for.as_deref() != Some(session_id)
    }

    pub(crate) fn begin_bootstrap(&mut self) -> Ticket {
        self.context = SessionContext::default();
        let ticket = self.issue_ticket();
        self.bootstrap = Some(ticket);
        self.mark_dirty();
        ticket
    }

    pub(crate) fn accepts_bootstrap(&self, ticket: Ticket) -> bool {
        self.open && self.bootstrap == Some(ticket)
    }

    pub(crate) fn finish_bootstrap(&mut self, context: Option<SessionContext>) {
        self.bootstrap = None;
        match context {
            Some(context) => {
                self.context = context;
                self.context_loaded_for = self.session_id.clone();
            }
            None => {
                self.context = SessionContext::default();
                self.context_loaded_for = None;
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn select_scope(&mut self, id: ScopeId) -> bool {
        if self.context.scope_item(id).is_none() {
            return false;
        }
        self.selected_scope = Some(id);
        self.mark_dirty();
        true
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    pub(crate) fn append_entry(&mut self, entry: ConversationEntry) {
        let transcript = std::mem::take(&mut self.transcript);
        self.transcript = transcript.append(entry);
        self.mark_dirty();
    }

    pub(crate) fn drop_pending_entries(&mut self) {
        let transcript = std::mem::take(&mut self.transcript);
        self.transcript = transcript.drop_pending();
        self.mark_dirty();
    }

    pub(crate) fn replace_candidates(&mut self, candidates: CandidateSet) {
        self.candidates = candidates;
        self.mark_dirty();
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut CandidateSet {
        self.mark_dirty();
        &mut self.candidates
    }

    /// Takes the gate for a new call; `None` when one is already outstanding.
    pub(crate) fn try_begin_call(&mut self, stage: Stage) -> Option<Ticket> {
        if !self.gate.try_enter() {
            return None;
        }
        let ticket = self.issue_ticket();
        self.in_flight = Some(ticket);
        self.stage = stage;
        self.mark_dirty();
        Some(ticket)
    }

    /// Hands the held gate to the follow-up call of the same pipeline run.
    pub(crate) fn continue_call(&mut self, stage: Stage) -> Ticket {
        let ticket = self.issue_ticket();
        self.in_flight = Some(ticket);
        self.stage = stage;
        self.mark_dirty();
        ticket
    }

    pub(crate) fn accepts_completion(&self, ticket: Ticket) -> bool {
        self.open && self.in_flight == Some(ticket)
    }

    /// Releases the gate; an unresolved checklist keeps the panel awaiting selection.
    pub(crate) fn finish_call(&mut self) {
        self.gate.exit();
        self.in_flight = None;
        self.stage = if self.transcript.has_pending_selection() {
            Stage::AwaitingSelection
        } else {
            Stage::Idle
        };
        self.mark_dirty();
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = Ticket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        ticket
    }
}
