use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    pub fn new(id: i64, description: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            created_at: created_at.into(),
            completed_at: None,
        }
    }

    pub fn status_glyph(&self) -> &'static str {
        if self.completed { "✓" } else { "○" }
    }
}
