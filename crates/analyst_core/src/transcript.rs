use crate::ConversationEntry;

/// Role attached to every history pair sent to the backend.
pub const USER_ROLE: &str = "user";

/// A prior user turn, shaped as conversation context for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: &'static str,
    pub content: String,
}

/// Ordered conversation log.
///
/// Transitions consume the current value and return the next one, so a
/// rendered snapshot can never observe a later mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    entries: Vec<ConversationEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn append(mut self, entry: ConversationEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Removes every selection prompt, keeping the relative order of the rest.
    #[must_use]
    pub fn drop_pending(self) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .filter(|entry| !entry.is_selection_prompt())
                .collect(),
        }
    }

    pub fn history_as_pairs(&self) -> Vec<HistoryTurn> {
        self.user_turns()
            .map(|text| HistoryTurn {
                role: USER_ROLE,
                content: text.to_string(),
            })
            .collect()
    }

    pub fn user_turns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            ConversationEntry::UserTurn { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_pending_selection(&self) -> bool {
        self.entries.iter().any(ConversationEntry::is_selection_prompt)
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ConversationEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
