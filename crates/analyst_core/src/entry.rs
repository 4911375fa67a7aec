/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEntry {
    /// Echo of what the user typed.
    UserTurn { text: String },
    /// Inline answer text, or a deep link to a generated artifact.
    AssistantTurn {
        text: Option<String>,
        link_url: Option<String>,
    },
    /// The candidate checklist is awaiting confirmation.
    SelectionPrompt,
}

impl ConversationEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self::UserTurn { text: text.into() }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::AssistantTurn {
            text: Some(text.into()),
            link_url: None,
        }
    }

    pub fn assistant_link(url: impl Into<String>) -> Self {
        Self::AssistantTurn {
            text: None,
            link_url: Some(url.into()),
        }
    }

    pub fn is_selection_prompt(&self) -> bool {
        matches!(self, Self::SelectionPrompt)
    }

    pub fn link_url(&self) -> Option<&str> {
        match self {
            Self::AssistantTurn { link_url, .. } => link_url.as_deref(),
            _ => None,
        }
    }
}
