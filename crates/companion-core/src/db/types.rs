//! Database types for companion-core.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Entity Types
// ─────────────────────────────────────────────────────────────────────────────

/// One persisted question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Epoch milliseconds
    pub created_at: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Input Types
// ─────────────────────────────────────────────────────────────────────────────

/// Input for recording a new interaction
#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub question: String,
    pub answer: String,
    /// Defaults to the write time when None
    pub created_at: Option<i64>,
}

impl NewInteraction {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            created_at: None,
        }
    }

    /// Use an explicit creation timestamp
    pub fn at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
