//! Rendering helpers (markdown) for human-readable artifacts.

use spreadpatch_types::receipt::{FileDigest, PatchReceipt};

pub fn render_receipt_md(receipt: &PatchReceipt) -> String {
    let mut out = String::new();
    out.push_str("# spreadpatch receipt\n\n");
    out.push_str(&format!("- Status: `{}`\n", receipt.status.as_str()));
    out.push_str(&format!("- Patch: `{}`\n", receipt.patch_id));
    out.push_str(&format!("- Target: `{}`\n", receipt.target));
    out.push_str(&format!("- Mode: `{}`\n", receipt.mode));
    out.push_str(&format!(
        "- Matches: {} (replaced {})\n",
        receipt.matches, receipt.replaced
    ));
    if receipt.dry_run {
        out.push_str("- Dry run: nothing was written\n");
    }
    if let Some(backup) = &receipt.backup_path {
        out.push_str(&format!("- Backup: `{}`\n", backup));
    }

    if receipt.before.is_some() || receipt.after.is_some() {
        out.push_str("\n## Content\n\n");
        out.push_str(&format!("- Before: {}\n", digest_label(receipt.before.as_ref())));
        out.push_str(&format!("- After: {}\n", digest_label(receipt.after.as_ref())));
    }

    if let Some(msg) = &receipt.message {
        out.push_str(&format!("\n{}\n", msg));
    }

    out
}

fn digest_label(d: Option<&FileDigest>) -> String {
    match d {
        Some(d) => format!("`{}` ({} bytes)", d.sha256, d.bytes),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spreadpatch_types::patch::MatchMode;
    use spreadpatch_types::receipt::{PatchStatus, ToolInfo};

    fn receipt(status: PatchStatus) -> PatchReceipt {
        PatchReceipt::new(
            ToolInfo {
                name: "spreadpatch".to_string(),
                version: None,
            },
            "recast-object-spread",
            "tmp/src/recast.js",
            MatchMode::ExactlyOne,
            status,
        )
    }

    #[test]
    fn renders_applied_receipt() {
        let mut r = receipt(PatchStatus::Applied);
        r.matches = 1;
        r.replaced = 1;
        r.before = Some(FileDigest {
            sha256: "abc".to_string(),
            bytes: 3,
        });
        r.after = Some(FileDigest {
            sha256: "def".to_string(),
            bytes: 4,
        });
        r.backup_path = Some("tmp/src/recast.js.bak".to_string());

        assert_eq!(
            render_receipt_md(&r),
            "# spreadpatch receipt\n\n\
             - Status: `applied`\n\
             - Patch: `recast-object-spread`\n\
             - Target: `tmp/src/recast.js`\n\
             - Mode: `exactly_one`\n\
             - Matches: 1 (replaced 1)\n\
             - Backup: `tmp/src/recast.js.bak`\n\
             \n## Content\n\n\
             - Before: `abc` (3 bytes)\n\
             - After: `def` (4 bytes)\n"
        );
    }

    #[test]
    fn renders_blocked_receipt_with_message() {
        let mut r = receipt(PatchStatus::NotFound);
        r.message = Some("policy block: pattern not found".to_string());

        let md = render_receipt_md(&r);
        assert!(md.contains("- Status: `not_found`"));
        assert!(!md.contains("## Content"));
        assert!(md.ends_with("\npolicy block: pattern not found\n"));
    }

    #[test]
    fn dry_run_is_called_out() {
        let mut r = receipt(PatchStatus::DryRun);
        r.dry_run = true;
        assert!(render_receipt_md(&r).contains("- Dry run: nothing was written"));
    }
}
