pub type SessionId = String;
pub type ScopeId = i64;

/// A chart the user can scope analysis and reports to.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeItem {
    pub id: ScopeId,
    pub title: String,
    /// Passed verbatim to later backend calls.
    pub payload: serde_json::Value,
}

/// Read-once background data for a panel session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionContext {
    pub summary_text: String,
    pub scope_items: Vec<ScopeItem>,
}

impl SessionContext {
    pub fn scope_item(&self, id: ScopeId) -> Option<&ScopeItem> {
        self.scope_items.iter().find(|item| item.id == id)
    }
}
