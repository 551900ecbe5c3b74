//! Error types for spreadpatch-edit.
//!
//! This module defines error types that distinguish between:
//! - Policy blocks (exit code 2): the target is not in a state the patch can be applied to
//! - Runtime errors (exit code 1): I/O errors, invalid UTF-8, invalid patch specs

use camino::Utf8PathBuf;
use spreadpatch_types::receipt::PatchStatus;
use thiserror::Error;

/// The top-level error type for spreadpatch-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// A policy block occurred (exit code 2).
    /// The target file was left untouched.
    #[error("policy block: {0}")]
    PolicyBlock(#[from] PolicyBlockError),

    /// A runtime/tool error occurred (exit code 1).
    #[error("runtime error: {0:#}")]
    Runtime(#[from] anyhow::Error),
}

/// Policy block errors that should result in exit code 2.
#[derive(Debug, Error)]
pub enum PolicyBlockError {
    /// The fragment could not be matched the way the run requires.
    #[error("{path}: {source}")]
    Match {
        path: Utf8PathBuf,
        #[source]
        source: MatchError,
    },
}

/// Why a fragment substitution was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("pattern not found")]
    NotFound,

    #[error("pattern is ambiguous: {count} occurrences, exactly one required")]
    Ambiguous { count: usize },

    #[error("patch already applied: replacement present, fragment absent")]
    AlreadyApplied,
}

impl MatchError {
    pub fn status(&self) -> PatchStatus {
        match self {
            MatchError::NotFound => PatchStatus::NotFound,
            MatchError::Ambiguous { .. } => PatchStatus::Ambiguous,
            MatchError::AlreadyApplied => PatchStatus::AlreadyApplied,
        }
    }

    /// Occurrences of the fragment that were seen when the error was raised.
    pub fn matches(&self) -> usize {
        match self {
            MatchError::Ambiguous { count } => *count,
            MatchError::NotFound | MatchError::AlreadyApplied => 0,
        }
    }
}

/// Errors building a search pattern from a fragment.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("fragment contains no tokens")]
    EmptyFragment,

    #[error("invalid search pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl EditError {
    /// Returns true if this is a policy block error (exit code 2).
    pub fn is_policy_block(&self) -> bool {
        matches!(self, EditError::PolicyBlock(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::PolicyBlock(_) => 2,
            EditError::Runtime(_) => 1,
        }
    }

    /// Receipt status describing this error.
    pub fn status(&self) -> PatchStatus {
        match self {
            EditError::PolicyBlock(PolicyBlockError::Match { source, .. }) => source.status(),
            EditError::Runtime(_) => PatchStatus::Failed,
        }
    }
}

impl From<PatternError> for EditError {
    fn from(err: PatternError) -> Self {
        EditError::Runtime(anyhow::Error::new(err))
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
