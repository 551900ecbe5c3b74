use serde::{Deserialize, Serialize};
use std::fmt;

/// A single text substitution: a known fragment and the text that replaces it.
///
/// The fragment is matched whitespace-tolerantly (see `spreadpatch-edit`); the
/// replacement is inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSpec {
    /// Stable identifier, e.g. "recast-object-spread".
    pub id: String,

    /// One-line human title.
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub fragment: String,
    pub replacement: String,
}

impl PatchSpec {
    pub fn new(
        id: impl Into<String>,
        fragment: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: String::new(),
            fragment: fragment.into(),
            replacement: replacement.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// How many fragment occurrences a run is allowed to rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Exactly one occurrence must exist; more than one is an ambiguity error.
    #[default]
    ExactlyOne,
    /// Rewrite the first occurrence and leave any others alone.
    First,
    /// Rewrite every non-overlapping occurrence.
    All,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::ExactlyOne => "exactly_one",
            MatchMode::First => "first",
            MatchMode::All => "all",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
