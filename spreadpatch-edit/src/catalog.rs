//! Built-in patches.

use spreadpatch_types::patch::PatchSpec;

/// Where the upstream build step leaves the generated recast bundle.
pub const DEFAULT_TARGET: &str = "tmp/src/recast.js";

pub const OBJECT_SPREAD_ID: &str = "recast-object-spread";

/// Object-literal property parsing in the generated recast bundle. Enough
/// context is included to make the location unambiguous.
pub const OBJECT_PROPERTY_FRAGMENT: &str = "else if (this.match('*')) {
this.nextToken();
}
else {
computed = this.match('[');
key = this.parseObjectPropertyKey();
}";

/// Clause that teaches the object-property parser about `{ ...expr }`.
pub const OBJECT_SPREAD_CLAUSE: &str =
    "else if (this.match('...')) { return this.parseSpreadElement(); }";

const FINAL_ELSE: &str = "else {";

/// Insert `clause` and a single space immediately before the last `else {` of `fragment`.
///
/// Returns `None` when the fragment has no final `else` branch.
pub fn splice_before_final_else(fragment: &str, clause: &str) -> Option<String> {
    let at = fragment.rfind(FINAL_ELSE)?;
    let mut out = String::with_capacity(fragment.len() + clause.len() + 1);
    out.push_str(&fragment[..at]);
    out.push_str(clause);
    out.push(' ');
    out.push_str(&fragment[at..]);
    Some(out)
}

pub fn object_spread() -> PatchSpec {
    let replacement = splice_before_final_else(OBJECT_PROPERTY_FRAGMENT, OBJECT_SPREAD_CLAUSE)
        .unwrap_or_else(|| OBJECT_PROPERTY_FRAGMENT.to_string());
    PatchSpec::new(OBJECT_SPREAD_ID, OBJECT_PROPERTY_FRAGMENT, replacement)
        .with_title("Parse spread elements in object literals")
        .with_description(
            "Adds a branch to recast's object property parser so that `...` inside an \
             object literal is parsed as a spread element instead of falling through to \
             the property-key branch.",
        )
}

/// All built-in patches, in listing order.
pub fn all() -> Vec<PatchSpec> {
    vec![object_spread()]
}

pub fn lookup(id: &str) -> Option<PatchSpec> {
    all().into_iter().find(|p| p.id == id)
}

pub fn ids() -> Vec<String> {
    all().into_iter().map(|p| p.id).collect()
}
