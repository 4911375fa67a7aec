use std::sync::Once;

use analyst_core::{
    update, ConversationEntry, DiscoverRequest, Discovery, Effect, HistoryTurn, Msg, PanelState,
    SessionContext, Stage, SynthesisRequest, Ticket, TransportFailure, ValidationFailure,
    USER_ROLE,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn ready_panel() -> PanelState {
    let (state, effects) = update(
        PanelState::new(),
        Msg::PanelOpened {
            session_id: "dash-1".to_string(),
        },
    );
    let ticket = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadSession { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("load session effect");
    let (state, _) = update(
        state,
        Msg::SessionLoaded {
            ticket,
            result: Ok(SessionContext::default()),
        },
    );
    state
}

fn submit(state: PanelState, text: &str) -> (PanelState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(text.to_string()));
    update(state, Msg::PromptSubmitted)
}

fn ticket_of(effects: &[Effect]) -> Ticket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Discover { ticket, .. }
            | Effect::Synthesize { ticket, .. }
            | Effect::Deliver { ticket, .. }
            | Effect::GenerateReport { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("pipeline call effect")
}

fn discover(state: PanelState, text: &str, labels: &[&str]) -> PanelState {
    let (state, effects) = submit(state, text);
    let ticket = ticket_of(&effects);
    let (state, _) = update(
        state,
        Msg::DiscoveryCompleted {
            ticket,
            result: Ok(Discovery::Candidates(
                labels.iter().map(|l| l.to_string()).collect(),
            )),
        },
    );
    state
}

#[test]
fn submit_appends_user_turn_and_issues_discovery() {
    init_logging();
    let (mut state, effects) = submit(ready_panel(), "  Q1 assets by bar chart ");

    let ticket = ticket_of(&effects);
    assert_eq!(
        effects,
        vec![
            Effect::BusyChanged(true),
            Effect::TurnAppended(ConversationEntry::user("Q1 assets by bar chart")),
            Effect::ScrollToBottom,
            Effect::Discover {
                ticket,
                request: DiscoverRequest::Candidates {
                    prompt: "Q1 assets by bar chart".to_string(),
                    history: Vec::new(),
                },
            },
        ]
    );
    let view = state.view();
    assert!(view.busy);
    assert_eq!(view.stage, Stage::Discovering);
    assert_eq!(view.input, "");
    assert!(state.consume_dirty());
}

#[test]
fn full_cycle_ends_with_single_link_turn() {
    init_logging();
    let state = discover(ready_panel(), "Q1 assets by bar chart", &["current_assets"]);
    assert_eq!(state.stage(), Stage::AwaitingSelection);
    assert_eq!(state.transcript().last(), Some(&ConversationEntry::SelectionPrompt));

    let (state, _) = update(
        state,
        Msg::CandidateToggled {
            index: 0,
            approved: true,
        },
    );
    let (state, effects) = update(state, Msg::SelectionConfirmed);
    let synth_ticket = ticket_of(&effects);
    assert!(effects.contains(&Effect::Synthesize {
        ticket: synth_ticket,
        request: SynthesisRequest::Selection {
            labels: vec!["current_assets".to_string()],
        },
    }));

    let payload = json!({ "table": [["current_assets", 10]] });
    let (state, effects) = update(
        state,
        Msg::SynthesisCompleted {
            ticket: synth_ticket,
            result: Ok(payload.clone()),
        },
    );
    let deliver_ticket = ticket_of(&effects);
    assert_eq!(
        effects,
        vec![Effect::Deliver {
            ticket: deliver_ticket,
            payload,
        }]
    );
    assert!(state.is_busy());

    let (state, effects) = update(
        state,
        Msg::DeliveryCompleted {
            ticket: deliver_ticket,
            result: Ok("https://x/y".to_string()),
        },
    );

    let entries = state.transcript().entries();
    assert_eq!(
        entries,
        &[
            ConversationEntry::user("Q1 assets by bar chart"),
            ConversationEntry::assistant_link("https://x/y"),
        ]
    );
    assert_eq!(
        entries.iter().filter(|e| e.is_selection_prompt()).count(),
        0
    );
    assert!(!state.is_busy());
    assert_eq!(state.stage(), Stage::Idle);
    assert!(state.candidates().is_empty());
    assert!(effects.contains(&Effect::BusyChanged(false)));
}

#[test]
fn discovery_failure_keeps_only_user_turn_and_frees_gate() {
    init_logging();
    let (state, effects) = submit(ready_panel(), "revenue trend");
    let ticket = ticket_of(&effects);

    let (state, effects) = update(
        state,
        Msg::DiscoveryCompleted {
            ticket,
            result: Err(TransportFailure::new("connection refused")),
        },
    );

    assert_eq!(effects, vec![Effect::BusyChanged(false)]);
    assert_eq!(
        state.transcript().entries(),
        &[ConversationEntry::user("revenue trend")]
    );
    assert!(!state.is_busy());
    assert_eq!(state.stage(), Stage::Idle);

    let (state, effects) = submit(state, "revenue trend again");
    assert!(effects.iter().any(|e| matches!(e, Effect::Discover { .. })));
    assert_eq!(state.transcript().len(), 2);
}

#[test]
fn second_discovery_sends_prior_user_turns_as_history() {
    init_logging();
    let (state, effects) = submit(ready_panel(), "first question");
    let ticket = ticket_of(&effects);
    let (state, _) = update(
        state,
        Msg::DiscoveryCompleted {
            ticket,
            result: Ok(Discovery::Candidates(Vec::new())),
        },
    );

    let (_state, effects) = submit(state, "second question");
    let ticket = ticket_of(&effects);
    assert!(effects.contains(&Effect::Discover {
        ticket,
        request: DiscoverRequest::Candidates {
            prompt: "second question".to_string(),
            history: vec![HistoryTurn {
                role: USER_ROLE,
                content: "first question".to_string(),
            }],
        },
    }));
}

#[test]
fn empty_discovery_result_does_not_leave_a_prompt_behind() {
    init_logging();
    let state = discover(ready_panel(), "unknown metric", &[]);

    assert!(!state.transcript().has_pending_selection());
    assert_eq!(state.stage(), Stage::Idle);
    assert!(!state.is_busy());
}

#[test]
fn new_question_rejected_while_selection_is_pending() {
    init_logging();
    let state = discover(ready_panel(), "assets", &["current_assets", "fixed_assets"]);
    let before = state.transcript().clone();

    let (state, effects) = submit(state, "another question");

    assert_eq!(
        effects,
        vec![Effect::ShowValidation(ValidationFailure::SelectionPending)]
    );
    assert_eq!(state.transcript(), &before);
    assert_eq!(state.input(), "another question");
}

#[test]
fn empty_input_is_rejected_without_entering_gate() {
    init_logging();
    let (state, effects) = submit(ready_panel(), "   ");

    assert_eq!(
        effects,
        vec![Effect::ShowValidation(ValidationFailure::EmptyInput)]
    );
    assert!(!state.is_busy());
    assert!(state.transcript().is_empty());
}

#[test]
fn synthesis_failure_leaves_checklist_actionable() {
    init_logging();
    let state = discover(ready_panel(), "assets", &["current_assets"]);
    let (state, _) = update(state, Msg::SelectAllToggled(true));
    let (state, effects) = update(state, Msg::SelectionConfirmed);
    let ticket = ticket_of(&effects);

    let (state, effects) = update(
        state,
        Msg::SynthesisCompleted {
            ticket,
            result: Err(TransportFailure::new("http status 500")),
        },
    );

    assert_eq!(effects, vec![Effect::BusyChanged(false)]);
    assert!(state.transcript().has_pending_selection());
    assert_eq!(state.stage(), Stage::AwaitingSelection);

    let (_state, effects) = update(state, Msg::SelectionConfirmed);
    assert!(effects.iter().any(|e| matches!(e, Effect::Synthesize { .. })));
}

#[test]
fn relative_delivery_link_is_appended_as_returned() {
    init_logging();
    let state = discover(ready_panel(), "Q1 assets by bar chart", &["current_assets"]);
    let (state, _) = update(state, Msg::SelectAllToggled(true));
    let (state, effects) = update(state, Msg::SelectionConfirmed);
    let (state, effects) = update(
        state,
        Msg::SynthesisCompleted {
            ticket: ticket_of(&effects),
            result: Ok(json!({ "t": 1 })),
        },
    );
    let (state, effects) = update(
        state,
        Msg::DeliveryCompleted {
            ticket: ticket_of(&effects),
            result: Ok("/superset/dashboard/12/".to_string()),
        },
    );

    let link = ConversationEntry::assistant_link("/superset/dashboard/12/");
    assert!(effects.contains(&Effect::TurnAppended(link.clone())));
    assert_eq!(
        state.transcript().entries(),
        &[ConversationEntry::user("Q1 assets by bar chart"), link]
    );
    assert!(!state.transcript().has_pending_selection());
    assert!(!state.is_busy());
    assert_eq!(state.stage(), Stage::Idle);
}

#[test]
fn completion_with_foreign_ticket_is_ignored() {
    init_logging();
    let (state, effects) = submit(ready_panel(), "assets");
    let ticket = ticket_of(&effects);
    let forged = Ticket {
        generation: ticket.generation,
        seq: ticket.seq + 10,
    };

    let (state, effects) = update(
        state.clone(),
        Msg::DiscoveryCompleted {
            ticket: forged,
            result: Ok(Discovery::Candidates(vec!["late".to_string()])),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_busy());
    assert_eq!(state.transcript().len(), 1);
}

#[test]
fn transcript_order_follows_issue_order_across_cycles() {
    init_logging();
    let mut state = ready_panel();
    for round in 0..3 {
        let question = format!("question {round}");
        state = discover(state, &question, &["metric"]);
        let (next, _) = update(state, Msg::SelectAllToggled(true));
        let (next, effects) = update(next, Msg::SelectionConfirmed);
        let stale = ticket_of(&effects);
        let (next, effects) = update(
            next,
            Msg::SynthesisCompleted {
                ticket: stale,
                result: Ok(json!({ "round": round })),
            },
        );
        // A duplicate of the already-consumed synthesis reply must not advance anything.
        let (next, dup) = update(
            next,
            Msg::SynthesisCompleted {
                ticket: stale,
                result: Ok(json!({ "round": "dup" })),
            },
        );
        assert!(dup.is_empty());
        let (next, _) = update(
            next,
            Msg::DeliveryCompleted {
                ticket: ticket_of(&effects),
                result: Ok(format!("https://x/{round}")),
            },
        );
        state = next;
    }

    let expected: Vec<ConversationEntry> = (0..3)
        .flat_map(|round| {
            [
                ConversationEntry::user(format!("question {round}")),
                ConversationEntry::assistant_link(format!("https://x/{round}")),
            ]
        })
        .collect();
    assert_eq!(state.transcript().entries(), expected.as_slice());
}

#[test]
fn quick_table_goes_straight_to_synthesis() {
    init_logging();
    let (state, _) = update(ready_panel(), Msg::InputChanged("sales by region".to_string()));
    let (state, effects) = update(state, Msg::QuickTableSubmitted);
    let ticket = ticket_of(&effects);

    assert!(effects.contains(&Effect::Synthesize {
        ticket,
        request: SynthesisRequest::Prompt {
            prompt: "sales by region".to_string(),
        },
    }));
    assert_eq!(state.stage(), Stage::Synthesizing);

    let (state, effects) = update(
        state,
        Msg::SynthesisCompleted {
            ticket,
            result: Ok(json!({ "rows": 3 })),
        },
    );
    let (state, _) = update(
        state,
        Msg::DeliveryCompleted {
            ticket: ticket_of(&effects),
            result: Ok("https://dash.example.com/d/9".to_string()),
        },
    );

    assert_eq!(
        state.transcript().entries(),
        &[
            ConversationEntry::user("sales by region"),
            ConversationEntry::assistant_link("https://dash.example.com/d/9"),
        ]
    );
}

#[test]
fn activating_a_link_opens_the_artifact() {
    init_logging();
    let (state, _) = update(ready_panel(), Msg::InputChanged("sales".to_string()));
    let (state, effects) = update(state, Msg::QuickTableSubmitted);
    let (state, effects) = update(
        state,
        Msg::SynthesisCompleted {
            ticket: ticket_of(&effects),
            result: Ok(json!({})),
        },
    );
    let (state, _) = update(
        state,
        Msg::DeliveryCompleted {
            ticket: ticket_of(&effects),
            result: Ok("https://x/y".to_string()),
        },
    );

    let (state, effects) = update(state, Msg::ArtifactActivated { entry_index: 1 });
    assert_eq!(
        effects,
        vec![Effect::OpenArtifact {
            url: "https://x/y".to_string(),
        }]
    );

    let (_state, effects) = update(state, Msg::ArtifactActivated { entry_index: 0 });
    assert!(effects.is_empty());
}
