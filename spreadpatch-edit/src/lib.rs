//! Edit engine for spreadpatch.
//!
//! Responsibilities:
//! - Compile a whitespace-tolerant search pattern from a literal fragment.
//! - Substitute the replacement in memory under a [`MatchMode`].
//! - Apply a patch to a file on disk (read, substitute, optional backup, write).
//! - Generate a unified diff preview and a [`PatchReceipt`].

pub mod catalog;
mod error;
mod pattern;
mod substitute;

pub use error::{EditError, EditResult, MatchError, PatternError, PolicyBlockError};
pub use pattern::FragmentPattern;
pub use substitute::{CompiledPatch, Substitution};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use diffy::PatchFormatter;
use fs_err as fs;
use spreadpatch_hash::sha256_hex;
use spreadpatch_types::patch::{MatchMode, PatchSpec};
use spreadpatch_types::receipt::{FileDigest, PatchReceipt, PatchStatus, ToolInfo};
use tracing::{debug, info, warn};

pub const DEFAULT_BACKUP_SUFFIX: &str = ".spreadpatch.bak";

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub mode: MatchMode,
    pub dry_run: bool,
    /// Copy the original next to the target before overwriting it.
    pub backup: Option<BackupOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOptions {
    pub suffix: String,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// What a successful [`apply_patch`] did.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub patch_id: String,
    pub path: Utf8PathBuf,
    pub mode: MatchMode,
    pub before: String,
    pub after: String,
    pub matches: usize,
    pub replaced: usize,
    pub first_line: usize,
    /// False for dry runs.
    pub written: bool,
    pub backup: Option<Utf8PathBuf>,
    pub started_at: DateTime<Utc>,
}

impl PatchOutcome {
    pub fn status(&self) -> PatchStatus {
        if self.written {
            PatchStatus::Applied
        } else {
            PatchStatus::DryRun
        }
    }

    pub fn diff(&self) -> String {
        render_diff(&self.path, &self.before, &self.after)
    }

    pub fn receipt(&self, tool: ToolInfo) -> PatchReceipt {
        let mut receipt = PatchReceipt::new(
            tool,
            &self.patch_id,
            self.path.as_str(),
            self.mode,
            self.status(),
        );
        receipt.matches = self.matches as u64;
        receipt.replaced = self.replaced as u64;
        receipt.dry_run = !self.written;
        receipt.before = Some(digest(&self.before));
        receipt.after = Some(digest(&self.after));
        receipt.backup_path = self.backup.as_ref().map(|p| p.to_string());
        receipt.started_at = Some(self.started_at);
        receipt.ended_at = Some(Utc::now());
        receipt
    }
}

/// Receipt for a run that ended in `err`. The target was not written.
pub fn failure_receipt(
    tool: ToolInfo,
    spec: &PatchSpec,
    path: &Utf8Path,
    opts: &ApplyOptions,
    err: &EditError,
) -> PatchReceipt {
    let mut receipt = PatchReceipt::new(tool, &spec.id, path.as_str(), opts.mode, err.status());
    if let EditError::PolicyBlock(PolicyBlockError::Match { source, .. }) = err {
        receipt.matches = source.matches() as u64;
    }
    receipt.dry_run = opts.dry_run;
    receipt.before = fs::read(path).ok().map(|bytes| FileDigest {
        sha256: sha256_hex(&bytes),
        bytes: bytes.len() as u64,
    });
    receipt.message = Some(err.to_string());
    receipt.ended_at = Some(Utc::now());
    receipt
}

/// Apply `spec` to the file at `path`.
///
/// The whole file is read and its handle closed before anything is written.
/// When the fragment cannot be matched as `opts.mode` requires, nothing is
/// written and a [`PolicyBlockError`] is returned.
pub fn apply_patch(path: &Utf8Path, spec: &PatchSpec, opts: &ApplyOptions) -> EditResult<PatchOutcome> {
    let started_at = Utc::now();
    let patch = CompiledPatch::new(spec)?;

    let before = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    debug!(path = %path, bytes = before.len(), "read target");

    let sub = match patch.substitute(&before, opts.mode) {
        Ok(sub) => sub,
        Err(source) => {
            warn!(path = %path, patch = %spec.id, "{}", source);
            return Err(PolicyBlockError::Match {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };
    debug!(
        path = %path,
        matches = sub.matches,
        replaced = sub.replaced,
        line = sub.first_line,
        "fragment matched"
    );

    let mut backup = None;
    if !opts.dry_run {
        if let Some(b) = &opts.backup {
            let backup_path = Utf8PathBuf::from(format!("{}{}", path, b.suffix));
            fs::copy(path, &backup_path).with_context(|| format!("backup {}", path))?;
            debug!(backup = %backup_path, "wrote backup");
            backup = Some(backup_path);
        }
        fs::write(path, &sub.output).with_context(|| format!("write {}", path))?;
        info!(path = %path, patch = %spec.id, replaced = sub.replaced, "patched");
    }

    Ok(PatchOutcome {
        patch_id: spec.id.clone(),
        path: path.to_path_buf(),
        mode: opts.mode,
        before,
        after: sub.output,
        matches: sub.matches,
        replaced: sub.replaced,
        first_line: sub.first_line,
        written: !opts.dry_run,
        backup,
        started_at,
    })
}

/// Git-style unified diff between two versions of `path`. Empty when unchanged.
pub fn render_diff(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let body = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy emits its own ---/+++ header; keep only the hunks.
    let hunks = body
        .split_once("\n@@")
        .map(|(_, rest)| format!("@@{}", rest))
        .unwrap_or(body);
    out.push_str(&hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn digest(contents: &str) -> FileDigest {
    FileDigest {
        sha256: sha256_hex(contents.as_bytes()),
        bytes: contents.len() as u64,
    }
}
