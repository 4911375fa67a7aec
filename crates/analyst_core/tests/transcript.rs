use analyst_core::{ConversationEntry, HistoryTurn, Transcript, USER_ROLE};
use pretty_assertions::assert_eq;

fn sample() -> Transcript {
    Transcript::new()
        .append(ConversationEntry::user("first"))
        .append(ConversationEntry::SelectionPrompt)
        .append(ConversationEntry::assistant_text("answer"))
        .append(ConversationEntry::SelectionPrompt)
        .append(ConversationEntry::user("second"))
}

#[test]
fn append_keeps_insertion_order() {
    let transcript = sample();
    assert_eq!(transcript.len(), 5);
    assert_eq!(transcript.get(0), Some(&ConversationEntry::user("first")));
    assert_eq!(transcript.last(), Some(&ConversationEntry::user("second")));
}

#[test]
fn drop_pending_removes_only_selection_prompts() {
    let transcript = sample();
    assert!(transcript.has_pending_selection());

    let filtered = transcript.drop_pending();

    assert!(!filtered.has_pending_selection());
    assert_eq!(
        filtered.entries(),
        &[
            ConversationEntry::user("first"),
            ConversationEntry::assistant_text("answer"),
            ConversationEntry::user("second"),
        ]
    );
}

#[test]
fn drop_pending_on_clean_transcript_is_identity() {
    let transcript = Transcript::new()
        .append(ConversationEntry::user("q"))
        .append(ConversationEntry::assistant_link("https://x/y"));
    assert_eq!(transcript.clone().drop_pending(), transcript);
}

#[test]
fn history_contains_only_user_turns_in_order() {
    let history = sample().history_as_pairs();
    assert_eq!(
        history,
        vec![
            HistoryTurn {
                role: USER_ROLE,
                content: "first".to_string(),
            },
            HistoryTurn {
                role: USER_ROLE,
                content: "second".to_string(),
            },
        ]
    );
}

#[test]
fn link_url_is_exposed_only_for_assistant_links() {
    assert_eq!(
        ConversationEntry::assistant_link("https://x/y").link_url(),
        Some("https://x/y")
    );
    assert_eq!(ConversationEntry::assistant_text("t").link_url(), None);
    assert_eq!(ConversationEntry::user("u").link_url(), None);
}
