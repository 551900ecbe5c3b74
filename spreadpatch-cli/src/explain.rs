//! Patch explanation for the `spreadpatch explain` command.

use spreadpatch_edit::catalog;
use spreadpatch_edit::CompiledPatch;
use spreadpatch_types::patch::PatchSpec;

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Find a built-in patch by id, ignoring case and `_`/`-` differences.
pub fn lookup_patch(query: &str) -> Option<PatchSpec> {
    if let Some(spec) = catalog::lookup(query) {
        return Some(spec);
    }
    let normalized = normalize(query);
    catalog::all().into_iter().find(|p| {
        let id = normalize(&p.id);
        // Accept the id without its "recast-" prefix too.
        id == normalized || id.strip_prefix("recast-") == Some(normalized.as_str())
    })
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace('_', "-")
}

/// Full explanation text: what the patch does, what it looks for, what it writes.
pub fn render_explanation(spec: &PatchSpec) -> anyhow::Result<String> {
    let compiled = CompiledPatch::new(spec)?;
    let pattern = compiled.pattern();

    let mut out = String::new();
    out.push_str(&format!("PATCH: {}\n", spec.title));
    out.push_str(&format!("ID:    {}\n\n", spec.id));

    if !spec.description.is_empty() {
        section(&mut out, "DESCRIPTION", &spec.description);
    }
    section(&mut out, "FRAGMENT", &spec.fragment);
    section(&mut out, "REPLACEMENT", &spec.replacement);
    section(
        &mut out,
        &format!("SEARCH PATTERN ({} tokens)", pattern.token_count()),
        pattern.as_str(),
    );
    Ok(out)
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(body);
    out.push_str("\n\n");
}
