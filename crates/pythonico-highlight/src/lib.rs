//! `pythonico-highlight` - regex-based, per-block highlighting for `pythonico-core`.
//!
//! A [`RegexHighlighter`] holds an ordered list of [`RegexRule`]s. Highlighting a block scans it
//! left to right: at each point the rule whose next match starts earliest claims that match,
//! with the lower rule index winning ties. Claimed ranges never overlap, so an opening quote
//! shields a `#` (or a keyword) inside the string, and a `#` shields everything after it.
//!
//! Rules are compiled once; a malformed pattern fails construction, never highlighting.

mod python;

pub use python::{
    PYTHON_KEYWORDS, PYTHON_STYLE_COMMENT, PYTHON_STYLE_KEYWORD, PYTHON_STYLE_STRING, PythonStyles,
    Rgb, TextStyle, python_style,
};

use pythonico_core::{BlockHighlighter, HighlightSpan, StyleId};
use regex::Regex;
use thiserror::Error;

/// Errors produced while building a highlighter.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// A rule pattern failed to compile.
    #[error("highlight rule #{index} has an invalid pattern '{pattern}': {source}")]
    InvalidRule {
        /// Index of the rule in the rule list (its priority).
        index: usize,
        /// The offending pattern.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },
}

/// A single regex highlighting rule.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    style_id: StyleId,
}

impl RegexRule {
    /// Compile a rule. Patterns are matched against one block at a time.
    pub fn new(pattern: &str, style_id: StyleId) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            style_id,
        })
    }

    /// Style applied to this rule's matches.
    pub fn style_id(&self) -> StyleId {
        self.style_id
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Leftmost non-empty match starting at or after byte `from`.
    fn next_match(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut from = from;
        while from <= text.len() {
            let m = self.regex.find_at(text, from)?;
            if m.end() > m.start() {
                return Some((m.start(), m.end()));
            }
            from = next_char_boundary(text, m.start())?;
        }
        None
    }
}

/// A regex-based highlighter with a fixed, prioritized rule list.
#[derive(Debug, Clone)]
pub struct RegexHighlighter {
    rules: Vec<RegexRule>,
}

impl RegexHighlighter {
    /// Build from already compiled rules. Earlier rules win ties.
    pub fn new(rules: Vec<RegexRule>) -> Self {
        Self { rules }
    }

    /// Compile `(pattern, style)` pairs in priority order.
    pub fn from_patterns<'a, I>(patterns: I) -> Result<Self, HighlightError>
    where
        I: IntoIterator<Item = (&'a str, StyleId)>,
    {
        let rules = patterns
            .into_iter()
            .enumerate()
            .map(|(index, (pattern, style_id))| {
                RegexRule::new(pattern, style_id).map_err(|source| {
                    tracing::error!(rule = index, pattern, %source, "invalid highlight rule");
                    HighlightError::InvalidRule {
                        index,
                        pattern: pattern.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// The rule set for Python source files.
    pub fn python(styles: PythonStyles) -> Result<Self, HighlightError> {
        Self::from_patterns(python::rule_patterns(styles).iter().map(|(p, s)| (p.as_str(), *s)))
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// Highlight one line of text (no newline), returning spans in character offsets.
    pub fn highlight_line(&self, text: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        // Next known match per rule (byte range). A cached match that starts at or after the
        // scan position is still the leftmost one for that rule.
        let mut pending: Vec<Option<(usize, usize)>> = vec![None; self.rules.len()];
        let mut exhausted = vec![false; self.rules.len()];
        let mut chars = CharCounter::default();
        let mut pos = 0;

        loop {
            let mut best: Option<(usize, usize, usize)> = None;
            for (idx, rule) in self.rules.iter().enumerate() {
                if exhausted[idx] {
                    continue;
                }
                let found = match pending[idx] {
                    Some((start, end)) if start >= pos => Some((start, end)),
                    _ => rule.next_match(text, pos),
                };
                pending[idx] = found;
                match found {
                    None => exhausted[idx] = true,
                    Some((start, end)) => {
                        if best.is_none_or(|(_, best_start, _)| start < best_start) {
                            best = Some((idx, start, end));
                        }
                    }
                }
            }

            let Some((idx, start, end)) = best else {
                break;
            };
            let start_col = chars.advance_to(text, start);
            let end_col = chars.advance_to(text, end);
            spans.push(HighlightSpan::new(
                start_col,
                end_col - start_col,
                self.rules[idx].style_id,
            ));
            pos = end;
        }

        spans
    }
}

impl BlockHighlighter for RegexHighlighter {
    fn highlight_block(&self, text: &str) -> Vec<HighlightSpan> {
        self.highlight_line(text)
    }
}

/// Incremental byte-offset to character-offset conversion for increasing offsets.
#[derive(Debug, Default)]
struct CharCounter {
    byte: usize,
    chars: usize,
}

impl CharCounter {
    fn advance_to(&mut self, text: &str, byte: usize) -> usize {
        if byte > self.byte {
            self.chars += text[self.byte..byte].chars().count();
            self.byte = byte;
        }
        self.chars
    }
}

fn next_char_boundary(text: &str, byte: usize) -> Option<usize> {
    text[byte..].chars().next().map(|ch| byte + ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_pattern_reports_rule_index() {
        let err = RegexHighlighter::from_patterns([("ok", 1), ("(unclosed", 2)]);
        match err {
            Err(HighlightError::InvalidRule { index, pattern, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "(unclosed");
            }
            Ok(_) => panic!("expected an invalid rule"),
        }
    }

    #[test]
    fn test_earlier_rule_wins_ties() {
        let highlighter = RegexHighlighter::from_patterns([("ab", 1), ("abc", 2)]).unwrap();
        assert_eq!(
            highlighter.highlight_line("abc"),
            vec![HighlightSpan::new(0, 2, 1)]
        );
    }

    #[test]
    fn test_leftmost_match_wins_over_priority() {
        let highlighter = RegexHighlighter::from_patterns([("b+", 1), ("a.*", 2)]).unwrap();
        assert_eq!(
            highlighter.highlight_line("xabb"),
            vec![HighlightSpan::new(1, 3, 2)]
        );
    }

    #[test]
    fn test_empty_matches_are_ignored() {
        let highlighter = RegexHighlighter::from_patterns([("x*", 1)]).unwrap();
        assert_eq!(
            highlighter.highlight_line("abxxc"),
            vec![HighlightSpan::new(2, 2, 1)]
        );
        assert!(highlighter.highlight_line("").is_empty());
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let highlighter = RegexHighlighter::from_patterns([("x", 1)]).unwrap();
        assert_eq!(
            highlighter.highlight_line("你好x世x"),
            vec![HighlightSpan::new(2, 1, 1), HighlightSpan::new(4, 1, 1)]
        );
    }

    #[test]
    fn test_rule_accessors() {
        let rule = RegexRule::new(r"\d+", 7).unwrap();
        assert_eq!(rule.style_id(), 7);
        assert_eq!(rule.pattern(), r"\d+");
        let highlighter = RegexHighlighter::new(vec![rule]);
        assert_eq!(highlighter.rules().len(), 1);
    }
}
