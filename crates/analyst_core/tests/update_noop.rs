use analyst_core::{update, Msg, PanelState};

#[test]
fn update_is_noop() {
    let state = PanelState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn user_actions_on_closed_panel_are_ignored() {
    let state = PanelState::new();
    for msg in [
        Msg::InputChanged("hello".to_string()),
        Msg::PromptSubmitted,
        Msg::QuickTableSubmitted,
        Msg::SelectionConfirmed,
        Msg::ReportRequested,
        Msg::PanelClosed,
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(next, state);
        assert!(effects.is_empty());
    }
}
