//! In-memory fragment substitution.

use crate::error::{MatchError, PatternError};
use crate::pattern::FragmentPattern;
use spreadpatch_types::patch::{MatchMode, PatchSpec};
use tracing::debug;

/// Result of a successful in-memory substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub output: String,
    /// Non-overlapping fragment occurrences in the input.
    pub matches: usize,
    /// Occurrences rewritten in `output`.
    pub replaced: usize,
    /// 1-based line of the first occurrence in the input.
    pub first_line: usize,
}

/// A patch spec with its search patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledPatch<'a> {
    spec: &'a PatchSpec,
    fragment: FragmentPattern,
    replacement: Option<FragmentPattern>,
}

impl<'a> CompiledPatch<'a> {
    pub fn new(spec: &'a PatchSpec) -> Result<Self, PatternError> {
        let fragment = FragmentPattern::compile(&spec.fragment)?;
        // An empty replacement (pure deletion) cannot be detected after the fact.
        let replacement = FragmentPattern::compile(&spec.replacement).ok();
        debug!(patch = %spec.id, pattern = fragment.as_str(), "compiled fragment pattern");
        Ok(Self {
            spec,
            fragment,
            replacement,
        })
    }

    pub fn pattern(&self) -> &FragmentPattern {
        &self.fragment
    }

    /// Substitute the replacement for the fragment in `contents`.
    ///
    /// The replacement is inserted literally and bytes outside the matched
    /// ranges are preserved. On error the caller must treat `contents` as
    /// unchanged.
    pub fn substitute(&self, contents: &str, mode: MatchMode) -> Result<Substitution, MatchError> {
        let ranges = self.fragment.find_all(contents);
        let Some(first) = ranges.first() else {
            return Err(if self.already_applied(contents) {
                MatchError::AlreadyApplied
            } else {
                MatchError::NotFound
            });
        };

        if mode == MatchMode::ExactlyOne && ranges.len() > 1 {
            return Err(MatchError::Ambiguous {
                count: ranges.len(),
            });
        }

        let selected = match mode {
            MatchMode::ExactlyOne | MatchMode::First => &ranges[..1],
            MatchMode::All => &ranges[..],
        };

        let replacement = &self.spec.replacement;
        let mut output = String::with_capacity(contents.len() + replacement.len() * selected.len());
        let mut cursor = 0;
        for range in selected {
            output.push_str(&contents[cursor..range.start]);
            output.push_str(replacement);
            cursor = range.end;
        }
        output.push_str(&contents[cursor..]);

        Ok(Substitution {
            output,
            matches: ranges.len(),
            replaced: selected.len(),
            first_line: line_of(contents, first.start),
        })
    }

    fn already_applied(&self, contents: &str) -> bool {
        self.replacement
            .as_ref()
            .is_some_and(|p| p.is_match(contents))
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
