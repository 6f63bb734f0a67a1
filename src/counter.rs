//! Character counter shown under the input box

use serde::Serialize;

/// Visual level of the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterLevel {
    Normal,
    Warning,
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharCount {
    pub used: usize,
    pub limit: usize,
    pub level: CounterLevel,
}

impl CharCount {
    /// Count characters (not bytes) in the current draft
    pub fn measure(draft: &str, limit: usize, warning_percent: usize) -> Self {
        let used = draft.chars().count();
        let level = if used > limit {
            CounterLevel::Over
        } else if used * 100 > limit * warning_percent {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        };
        Self { used, limit, level }
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.used, self.limit)
    }
}
