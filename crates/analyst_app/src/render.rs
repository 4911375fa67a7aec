use analyst_core::{Candidate, ConversationEntry, PanelViewModel, Stage};

pub fn render_entry(position: usize, entry: &ConversationEntry) -> String {
    match entry {
        ConversationEntry::UserTurn { text } => format!("[{position}] you: {text}"),
        ConversationEntry::AssistantTurn {
            link_url: Some(url),
            ..
        } => format!("[{position}] analyst: result ready at {url} (/open {position})"),
        ConversationEntry::AssistantTurn {
            text: Some(text), ..
        } => format!("[{position}] analyst: {text}"),
        ConversationEntry::AssistantTurn { .. } => format!("[{position}] analyst: (empty reply)"),
        ConversationEntry::SelectionPrompt => format!(
            "[{position}] analyst: these metrics may relate to your question; \
             pick some with /check N or /all, then /confirm"
        ),
    }
}

pub fn render_candidates(candidates: &[Candidate]) -> Vec<String> {
    let mut lines = Vec::with_capacity(candidates.len() + 1);
    let all = !candidates.is_empty() && candidates.iter().all(|c| c.approved);
    lines.push(format!("    {} suggested metrics", checkbox(all)));
    for (i, candidate) in candidates.iter().enumerate() {
        lines.push(format!(
            "    {} {}. {}",
            checkbox(candidate.approved),
            i + 1,
            candidate.label
        ));
    }
    lines
}

pub fn render_panel(view: &PanelViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    let session = view.session_id.as_deref().unwrap_or("-");
    lines.push(format!("== session {session} =="));
    if view.loading_context {
        lines.push("summary: loading...".to_string());
    } else if !view.summary_text.is_empty() {
        lines.push(format!("summary: {}", view.summary_text));
    }
    if !view.scope_items.is_empty() {
        lines.push("charts:".to_string());
        for item in &view.scope_items {
            let marker = if view.selected_scope == Some(item.id) {
                "*"
            } else {
                " "
            };
            lines.push(format!("  {marker} {:>4}  {}", item.id, item.title));
        }
    }
    for (i, entry) in view.entries.iter().enumerate() {
        lines.push(render_entry(i + 1, entry));
        if entry.is_selection_prompt() {
            lines.extend(render_candidates(&view.candidates));
        }
    }
    if let Some(status) = status_line(view.stage) {
        lines.push(status.to_string());
    }
    lines
}

pub fn status_line(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Idle | Stage::AwaitingSelection => None,
        Stage::Discovering => Some("... looking for related metrics"),
        Stage::Synthesizing => Some("... building the table"),
        Stage::Delivering => Some("... rendering the chart"),
        Stage::GeneratingReport => Some("... writing the report"),
    }
}

/// Position (0-based) of the most recent entry carrying a link.
pub fn latest_link(view: &PanelViewModel) -> Option<usize> {
    view.entries.iter().rposition(|e| e.link_url().is_some())
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}
