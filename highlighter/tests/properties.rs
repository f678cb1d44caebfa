//! Property tests for the delimiter highlighter

use highlighter::{highlight, highlight_with, segments, Markup, Segment};
use proptest::prelude::*;

fn delimiter_count(text: &str) -> usize {
    text.chars().filter(|&ch| ch == '(' || ch == ')').count()
}

proptest! {
    #[test]
    fn highlight_is_deterministic(source in any::<String>()) {
        prop_assert_eq!(highlight(&source), highlight(&source));
    }

    #[test]
    fn every_delimiter_gets_one_marker(source in any::<String>()) {
        let output = highlight(&source);
        prop_assert_eq!(output.matches("<b>").count(), delimiter_count(&source));
        prop_assert_eq!(output.matches("</b>").count(), delimiter_count(&source));
    }

    #[test]
    fn text_without_delimiters_is_unchanged(source in "[^()&<>]*") {
        prop_assert_eq!(highlight(&source), source.clone());
        prop_assert_eq!(highlight_with(&source, Markup::Ansi), source);
    }

    #[test]
    fn plain_markup_is_identity(source in any::<String>()) {
        prop_assert_eq!(highlight_with(&source, Markup::Plain), source);
    }

    #[test]
    fn segments_reassemble_input(source in any::<String>()) {
        let mut rebuilt = String::new();
        for segment in segments(&source) {
            match segment {
                Segment::Text(text) => {
                    prop_assert!(!text.is_empty());
                    prop_assert!(!text.contains(['(', ')']));
                    rebuilt.push_str(text);
                }
                Segment::Delimiter(ch) => rebuilt.push(ch),
            }
        }
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn stripping_markers_recovers_input(source in "[^&<>]*") {
        let stripped = highlight(&source).replace("<b>", "").replace("</b>", "");
        prop_assert_eq!(stripped, source);
    }
}

#[test]
fn test_sexpr_example() {
    let output = highlight("(+ 1 2)");
    assert!(output.starts_with("<b>(</b>"));
    assert!(output.ends_with("<b>)</b>"));
    assert!(output.contains("+ 1 2"));
}
