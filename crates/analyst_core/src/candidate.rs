#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    pub approved: bool,
}

/// Backend-suggested metrics awaiting the user's approval.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateSet {
    items: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh batch with nothing approved.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: labels
                .into_iter()
                .map(|label| Candidate {
                    label: label.into(),
                    approved: false,
                })
                .collect(),
        }
    }

    /// Returns false when `index` is out of range.
    pub fn toggle(&mut self, index: usize, approved: bool) -> bool {
        match self.items.get_mut(index) {
            Some(candidate) => {
                candidate.approved = approved;
                true
            }
            None => false,
        }
    }

    pub fn set_all(&mut self, approved: bool) {
        for candidate in &mut self.items {
            candidate.approved = approved;
        }
    }

    /// True when the batch is non-empty and every member is approved.
    pub fn all_approved(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|c| c.approved)
    }

    pub fn approved_labels(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|c| c.approved)
            .map(|c| c.label.clone())
            .collect()
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
