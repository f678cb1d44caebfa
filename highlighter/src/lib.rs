#![cfg_attr(not(test), no_std)]

//! # Highlighter
//!
//! Delimiter emphasis for the playground editor.
//!
//! ## Philosophy
//!
//! - **Pure**: Same input => same output, so callers may memoize freely
//! - **Flat**: No nesting depth, no strings or comments, no balance checking
//! - **Single pass**: One cursor, one character at a time, never backtracks
//!
//! ## Design
//!
//! The scanner ([`segments`]) splits source text into plain runs and
//! delimiter characters. A [`Markup`] target decides how each segment is
//! written: HTML bold tags (the default), ANSI bold, or nothing at all.

extern crate alloc;

mod markup;
mod scan;

pub use markup::{Markup, UnknownMarkup};
pub use scan::{segments, Segment, Segments};

use alloc::string::String;

/// Returns true for the characters the highlighter emphasizes
pub const fn is_delimiter(ch: char) -> bool {
    matches!(ch, '(' | ')')
}

/// Highlight source text for the default (HTML) target
///
/// Every `(` and `)` is wrapped in `<b>…</b>`; all other text is copied
/// through with `&`, `<` and `>` escaped.
pub fn highlight(text: &str) -> String {
    highlight_with(text, Markup::Html)
}

/// Highlight source text for a specific rendering target
pub fn highlight_with(text: &str, markup: Markup) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        markup.write_segment(&mut out, segment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(highlight(""), "");
        assert_eq!(highlight_with("", Markup::Ansi), "");
    }

    #[test]
    fn test_wraps_both_parentheses() {
        assert_eq!(highlight("(+ 1 2)"), "<b>(</b>+ 1 2<b>)</b>");
    }

    #[test]
    fn test_no_parentheses_unchanged() {
        assert_eq!(highlight("def x 10"), "def x 10");
    }

    #[test]
    fn test_unmatched_parentheses_still_wrapped() {
        assert_eq!(highlight("(("), "<b>(</b><b>(</b>");
        assert_eq!(highlight(")"), "<b>)</b>");
        assert_eq!(highlight(")x("), "<b>)</b>x<b>(</b>");
    }

    #[test]
    fn test_ignores_strings_and_comments() {
        // Parentheses inside a string literal are still delimiters.
        assert_eq!(highlight("\"(\""), "\"<b>(</b>\"");
    }

    #[test]
    fn test_html_escaping() {
        assert_eq!(highlight("(< a b)"), "<b>(</b>&lt; a b<b>)</b>");
        assert_eq!(highlight("a && b > c"), "a &amp;&amp; b &gt; c");
    }

    #[test]
    fn test_other_brackets_untouched() {
        assert_eq!(highlight("[x] {y}"), "[x] {y}");
    }

    #[test]
    fn test_ansi_target() {
        assert_eq!(
            highlight_with("(f)", Markup::Ansi),
            "\x1b[1m(\x1b[22mf\x1b[1m)\x1b[22m"
        );
        // No escaping outside of HTML.
        assert_eq!(highlight_with("a < b", Markup::Ansi), "a < b");
    }

    #[test]
    fn test_plain_target_is_identity() {
        let source = "(defn add (x y) (+ x y))\n(add 1 2)";
        assert_eq!(highlight_with(source, Markup::Plain), source);
    }

    #[test]
    fn test_multiline_and_unicode() {
        assert_eq!(highlight("(λ x\n  é)"), "<b>(</b>λ x\n  é<b>)</b>");
    }

    #[test]
    fn test_deterministic() {
        let source = "(print \"hi\")";
        assert_eq!(highlight(source), highlight(source));
    }

    #[test]
    fn test_is_delimiter() {
        assert!(is_delimiter('('));
        assert!(is_delimiter(')'));
        assert!(!is_delimiter('['));
        assert!(!is_delimiter('a'));
    }
}
