use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{
    CandidateSet, ConversationEntry, DiscoverRequest, Discovery, Effect, Msg, PanelState,
    PanelVariant, SessionId, Stage, SynthesisRequest, Ticket, TransportFailure,
    ValidationFailure, REPORT_FILENAME,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every outbound call takes the busy gate first and every completion is
/// matched against the ticket of the call in flight, so transcript order
/// always follows the order calls were issued in.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::PanelOpened { session_id } => open_panel(&mut state, session_id, &mut effects),
        Msg::PanelClosed => close_panel(&mut state, &mut effects),
        Msg::InputChanged(text) => {
            if state.is_open() {
                state.set_input(text);
            }
        }
        Msg::PromptSubmitted => submit_prompt(&mut state, &mut effects),
        Msg::QuickTableSubmitted => submit_quick_table(&mut state, &mut effects),
        Msg::CandidateToggled { index, approved } => {
            if state.stage() == Stage::AwaitingSelection {
                if state.candidates_mut().toggle(index, approved) {
                    effects.push(Effect::CandidatesChanged(state.candidates().items().to_vec()));
                } else {
                    engine_debug!("toggle ignored: no candidate at index {}", index);
                }
            }
        }
        Msg::SelectAllToggled(approved) => {
            if state.stage() == Stage::AwaitingSelection {
                state.candidates_mut().set_all(approved);
                effects.push(Effect::CandidatesChanged(state.candidates().items().to_vec()));
            }
        }
        Msg::SelectionConfirmed => confirm_selection(&mut state, &mut effects),
        Msg::ScopeSelected(id) => {
            if state.is_open() && !state.select_scope(id) {
                engine_debug!("scope selection ignored: unknown chart {}", id);
            }
        }
        Msg::ReportRequested => request_report(&mut state, &mut effects),
        Msg::ArtifactActivated { entry_index } => {
            if let Some(url) = state
                .transcript()
                .get(entry_index)
                .and_then(ConversationEntry::link_url)
            {
                effects.push(Effect::OpenArtifact {
                    url: url.to_string(),
                });
            }
        }
        Msg::SessionLoaded { ticket, result } => {
            if !state.accepts_bootstrap(ticket) {
                engine_debug!("stale session context dropped (ticket {:?})", ticket);
                return (state, effects);
            }
            match result {
                Ok(context) => {
                    engine_info!(
                        "session context loaded: {} chart(s)",
                        context.scope_items.len()
                    );
                    state.finish_bootstrap(Some(context));
                }
                Err(err) => {
                    engine_warn!("session context unavailable, continuing without it: {}", err);
                    state.finish_bootstrap(None);
                }
            }
        }
        Msg::DiscoveryCompleted { ticket, result } => {
            if accept_completion(&state, ticket, "discovery") {
                complete_discovery(&mut state, result, &mut effects);
            }
        }
        Msg::SynthesisCompleted { ticket, result } => {
            if accept_completion(&state, ticket, "synthesis") {
                match result {
                    Ok(payload) => {
                        let ticket = state.continue_call(Stage::Delivering);
                        effects.push(Effect::Deliver { ticket, payload });
                    }
                    Err(err) => fail_call(&mut state, "synthesis", &err, &mut effects),
                }
            }
        }
        Msg::DeliveryCompleted { ticket, result } => {
            if accept_completion(&state, ticket, "delivery") {
                complete_delivery(&mut state, result, &mut effects);
            }
        }
        Msg::ReportCompleted { ticket, result } => {
            if accept_completion(&state, ticket, "report") {
                match result {
                    Ok(bytes) => {
                        engine_info!("report generated: {} byte(s)", bytes.len());
                        effects.push(Effect::SaveArtifact {
                            filename: REPORT_FILENAME.to_string(),
                            bytes,
                        });
                        release_gate(&mut state, &mut effects);
                    }
                    Err(err) => fail_call(&mut state, "report", &err, &mut effects),
                }
            }
        }
        Msg::Tick | Msg::NoOp => {}
    }

    (state, effects)
}

fn open_panel(state: &mut PanelState, session_id: SessionId, effects: &mut Vec<Effect>) {
    if state.is_open() {
        if state.session_id() == Some(session_id.as_str()) {
            return;
        }
        close_panel(state, effects);
    }
    let needs_context = state.needs_context_for(&session_id);
    state.open_session(session_id.clone());
    if needs_context {
        let ticket = state.begin_bootstrap();
        effects.push(Effect::LoadSession { ticket, session_id });
    }
}

fn close_panel(state: &mut PanelState, effects: &mut Vec<Effect>) {
    if !state.is_open() {
        return;
    }
    let was_busy = state.is_busy();
    let generation = state.close_session();
    effects.push(Effect::CloseSession { generation });
    if was_busy {
        effects.push(Effect::BusyChanged(false));
    }
}

fn submit_prompt(state: &mut PanelState, effects: &mut Vec<Effect>) {
    let Some(prompt) = validate_prompt(state, effects) else {
        return;
    };
    let history = state.transcript().history_as_pairs();
    let text = prompt.clone();
    let request = match state.variant() {
        PanelVariant::MetricDiscovery => DiscoverRequest::Candidates { prompt, history },
        PanelVariant::ScopedAnalysis => {
            let Some(scope) = state.selected_scope_item().map(|item| item.payload.clone())
            else {
                effects.push(Effect::ShowValidation(ValidationFailure::NoScopeSelected));
                return;
            };
            DiscoverRequest::Analysis {
                prompt,
                history,
                scope,
            }
        }
    };
    let Some(ticket) = begin_call(state, Stage::Discovering, effects) else {
        return;
    };
    state.take_input();
    append(state, ConversationEntry::user(text), effects);
    engine_info!("discovery issued (seq {})", ticket.seq);
    effects.push(Effect::Discover { ticket, request });
}

fn submit_quick_table(state: &mut PanelState, effects: &mut Vec<Effect>) {
    let Some(prompt) = validate_prompt(state, effects) else {
        return;
    };
    let Some(ticket) = begin_call(state, Stage::Synthesizing, effects) else {
        return;
    };
    state.take_input();
    append(state, ConversationEntry::user(prompt.clone()), effects);
    engine_info!("table synthesis issued (seq {})", ticket.seq);
    effects.push(Effect::Synthesize {
        ticket,
        request: SynthesisRequest::Prompt { prompt },
    });
}

/// Guards shared by every turn that starts from the input box.
fn validate_prompt(state: &PanelState, effects: &mut Vec<Effect>) -> Option<String> {
    if !state.is_open() {
        return None;
    }
    if state.transcript().has_pending_selection() {
        effects.push(Effect::ShowValidation(ValidationFailure::SelectionPending));
        return None;
    }
    if state.is_busy() {
        engine_debug!("submission ignored: a request is already in flight");
        return None;
    }
    let prompt = state.input().trim();
    if prompt.is_empty() {
        effects.push(Effect::ShowValidation(ValidationFailure::EmptyInput));
        return None;
    }
    Some(prompt.to_string())
}

fn confirm_selection(state: &mut PanelState, effects: &mut Vec<Effect>) {
    if state.stage() != Stage::AwaitingSelection {
        return;
    }
    let labels = state.candidates().approved_labels();
    if labels.is_empty() {
        effects.push(Effect::ShowValidation(ValidationFailure::NoCandidateApproved));
        return;
    }
    let Some(ticket) = begin_call(state, Stage::Synthesizing, effects) else {
        return;
    };
    engine_info!(
        "synthesis issued for {} metric(s) (seq {})",
        labels.len(),
        ticket.seq
    );
    effects.push(Effect::Synthesize {
        ticket,
        request: SynthesisRequest::Selection { labels },
    });
}

fn request_report(state: &mut PanelState, effects: &mut Vec<Effect>) {
    if !state.is_open() {
        return;
    }
    if state.selected_scope_item().is_none() {
        effects.push(Effect::ShowValidation(ValidationFailure::NoScopeSelected));
        return;
    }
    let Some(session_id) = state.session_id().map(ToOwned::to_owned) else {
        return;
    };
    let Some(ticket) = begin_call(state, Stage::GeneratingReport, effects) else {
        return;
    };
    let extra = state.transcript().history_as_pairs();
    engine_info!(
        "report issued with {} prior turn(s) (seq {})",
        extra.len(),
        ticket.seq
    );
    effects.push(Effect::GenerateReport {
        ticket,
        session_id,
        extra,
    });
}

fn complete_discovery(
    state: &mut PanelState,
    result: Result<Discovery, TransportFailure>,
    effects: &mut Vec<Effect>,
) {
    match result {
        Ok(Discovery::Candidates(labels)) => {
            let candidates = CandidateSet::from_labels(labels);
            let has_candidates = !candidates.is_empty();
            state.replace_candidates(candidates);
            effects.push(Effect::CandidatesChanged(state.candidates().items().to_vec()));
            if has_candidates {
                append(state, ConversationEntry::SelectionPrompt, effects);
            } else {
                engine_info!("discovery returned no candidates");
            }
            release_gate(state, effects);
        }
        Ok(Discovery::Analysis { text }) => {
            append(state, ConversationEntry::assistant_text(text), effects);
            release_gate(state, effects);
        }
        Err(err) => fail_call(state, "discovery", &err, effects),
    }
}

fn complete_delivery(
    state: &mut PanelState,
    result: Result<String, TransportFailure>,
    effects: &mut Vec<Effect>,
) {
    let link = match result {
        Ok(link) => link,
        Err(err) => return fail_call(state, "delivery", &err, effects),
    };
    if state.transcript().has_pending_selection() {
        state.drop_pending_entries();
        state.replace_candidates(CandidateSet::new());
        effects.push(Effect::CandidatesChanged(Vec::new()));
    }
    append(state, ConversationEntry::assistant_link(link), effects);
    release_gate(state, effects);
}

fn accept_completion(state: &PanelState, ticket: Ticket, stage: &str) -> bool {
    if state.accepts_completion(ticket) {
        return true;
    }
    engine_debug!("stale {} completion dropped (ticket {:?})", stage, ticket);
    false
}

fn begin_call(state: &mut PanelState, stage: Stage, effects: &mut Vec<Effect>) -> Option<Ticket> {
    let ticket = state.try_begin_call(stage);
    match ticket {
        Some(_) => effects.push(Effect::BusyChanged(true)),
        None => engine_debug!("call refused: gate already held"),
    }
    ticket
}

fn release_gate(state: &mut PanelState, effects: &mut Vec<Effect>) {
    state.finish_call();
    effects.push(Effect::BusyChanged(false));
}

fn fail_call(
    state: &mut PanelState,
    stage: &str,
    err: &TransportFailure,
    effects: &mut Vec<Effect>,
) {
    engine_warn!("{} call failed: {}", stage, err);
    release_gate(state, effects);
}

fn append(state: &mut PanelState, entry: ConversationEntry, effects: &mut Vec<Effect>) {
    state.append_entry(entry.clone());
    effects.push(Effect::TurnAppended(entry));
    effects.push(Effect::ScrollToBottom);
}
