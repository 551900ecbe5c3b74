use crate::patch::MatchMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Outcome of one patch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    /// The replacement was written to the target.
    Applied,
    /// The replacement was computed but not written.
    DryRun,
    /// The fragment does not occur in the target.
    NotFound,
    /// The fragment occurs more than once and the mode requires exactly one.
    Ambiguous,
    /// The fragment is absent but the replacement is already present.
    AlreadyApplied,
    /// I/O or other runtime failure.
    Failed,
}

impl PatchStatus {
    /// True when the target is in the desired state (or would be, for dry runs).
    pub fn is_success(self) -> bool {
        matches!(self, PatchStatus::Applied | PatchStatus::DryRun)
    }

    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            PatchStatus::Applied => "applied",
            PatchStatus::DryRun => "dry_run",
            PatchStatus::NotFound => "not_found",
            PatchStatus::Ambiguous => "ambiguous",
            PatchStatus::AlreadyApplied => "already_applied",
            PatchStatus::Failed => "failed",
        }
    }
}

/// Content digest of the target on one side of the substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDigest {
    pub sha256: String,
    pub bytes: u64,
}

/// Machine-readable record of a single run against a single target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReceipt {
    pub schema: String,
    pub tool: ToolInfo,
    pub patch_id: String,
    pub target: String,
    pub mode: MatchMode,
    pub status: PatchStatus,

    /// Non-overlapping fragment occurrences found.
    #[serde(default)]
    pub matches: u64,

    /// Occurrences actually rewritten.
    #[serde(default)]
    pub replaced: u64,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<FileDigest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<FileDigest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl PatchReceipt {
    pub fn new(
        tool: ToolInfo,
        patch_id: impl Into<String>,
        target: impl Into<String>,
        mode: MatchMode,
        status: PatchStatus,
    ) -> Self {
        Self {
            schema: crate::schema::SPREADPATCH_RECEIPT_V1.to_string(),
            tool,
            patch_id: patch_id.into(),
            target: target.into(),
            mode,
            status,
            matches: 0,
            replaced: 0,
            dry_run: false,
            before: None,
            after: None,
            backup_path: None,
            message: None,
            started_at: None,
            ended_at: None,
        }
    }
}
