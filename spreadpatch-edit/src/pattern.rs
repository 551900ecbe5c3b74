//! Whitespace-tolerant search patterns compiled from literal fragments.
//!
//! A fragment is split on whitespace into tokens. Each token is escaped with
//! [`regex::escape`] and tokens are joined with `\s+`, so the pattern matches
//! the same token sequence under any indentation or line wrapping.

use crate::error::PatternError;
use regex::Regex;
use std::ops::Range;

const WHITESPACE_RUN: &str = r"\s+";

#[derive(Debug, Clone)]
pub struct FragmentPattern {
    regex: Regex,
    tokens: usize,
}

impl FragmentPattern {
    pub fn compile(fragment: &str) -> Result<Self, PatternError> {
        let tokens: Vec<String> = fragment.split_whitespace().map(regex::escape).collect();
        if tokens.is_empty() {
            return Err(PatternError::EmptyFragment);
        }
        let regex = Regex::new(&tokens.join(WHITESPACE_RUN))?;
        Ok(Self {
            regex,
            tokens: tokens.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn token_count(&self) -> usize {
        self.tokens
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte ranges of all non-overlapping matches, left to right.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_syntax_characters() {
        let p = FragmentPattern::compile("this.match('*') [x]").unwrap();
        assert_eq!(p.as_str(), r"this\.match\('\*'\)\s+\[x\]");
        assert_eq!(p.token_count(), 2);
    }

    #[test]
    fn dot_is_literal() {
        let p = FragmentPattern::compile("a.b").unwrap();
        assert!(p.is_match("a.b"));
        assert!(!p.is_match("axb"));
    }

    #[test]
    fn newline_tolerates_any_whitespace_run() {
        let p = FragmentPattern::compile("}\nelse {").unwrap();
        assert!(p.is_match("}\nelse {"));
        assert!(p.is_match("}   else {"));
        assert!(p.is_match("}\r\n\t\telse\n{"));
    }

    #[test]
    fn whitespace_is_required_between_tokens() {
        let p = FragmentPattern::compile("}\nelse").unwrap();
        assert!(!p.is_match("}else"));
    }

    #[test]
    fn leading_and_trailing_whitespace_is_ignored() {
        let p = FragmentPattern::compile("\n   foo();\n  ").unwrap();
        assert_eq!(p.as_str(), r"foo\(\);");
    }

    #[test]
    fn empty_fragment_is_rejected() {
        assert!(matches!(
            FragmentPattern::compile(" \n\t "),
            Err(PatternError::EmptyFragment)
        ));
    }

    #[test]
    fn find_all_returns_non_overlapping_ranges() {
        let p = FragmentPattern::compile("x y").unwrap();
        let text = "x y -- x\n y";
        assert_eq!(p.find_all(text), vec![0..3, 7..11]);
        assert_eq!(p.find_all(text).len(), 2);
    }
}
