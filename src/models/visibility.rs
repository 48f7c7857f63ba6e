use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::LineId;

/// Per-line toggle state, owned by the UI.
///
/// A line that has never been toggled has no entry and counts as visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    lines: IndexMap<LineId, bool>,
}

impl VisibilityState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_visible(&self, line: &str) -> bool {
        self.lines.get(line).copied().unwrap_or(true)
    }

    pub fn set(&mut self, line: &str, visible: bool) {
        self.lines.insert(line.to_string(), visible);
    }

    pub fn toggle(&mut self, line: &str) {
        let visible = self.is_visible(line);
        self.set(line, !visible);
    }

    /// Number of lines explicitly switched off
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.lines.values().filter(|visible| !**visible).count()
    }
}
