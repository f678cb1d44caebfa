//! Rendering targets for highlighted text

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::Segment;

/// How emphasized delimiters are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde_support",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Markup {
    /// `<b>(</b>`, with plain text HTML-escaped
    #[default]
    Html,
    /// SGR bold on, SGR normal intensity off
    Ansi,
    /// No markers
    Plain,
}

impl Markup {
    /// Marker written before a delimiter
    pub const fn open(self) -> &'static str {
        match self {
            Markup::Html => "<b>",
            Markup::Ansi => "\x1b[1m",
            Markup::Plain => "",
        }
    }

    /// Marker written after a delimiter
    pub const fn close(self) -> &'static str {
        match self {
            Markup::Html => "</b>",
            Markup::Ansi => "\x1b[22m",
            Markup::Plain => "",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Markup::Html => "html",
            Markup::Ansi => "ansi",
            Markup::Plain => "plain",
        }
    }

    /// Append one segment to `out`
    pub fn write_segment(self, out: &mut String, segment: Segment<'_>) {
        match segment {
            Segment::Delimiter(ch) => {
                out.push_str(self.open());
                out.push(ch);
                out.push_str(self.close());
            }
            Segment::Text(text) if self == Markup::Html => escape_html(out, text),
            Segment::Text(text) => out.push_str(text),
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown markup name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMarkup(pub String);

impl fmt::Display for UnknownMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown markup: {} (expected html, ansi or plain)", self.0)
    }
}

impl FromStr for Markup {
    type Err = UnknownMarkup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Markup::Html),
            "ansi" | "terminal" => Ok(Markup::Ansi),
            "plain" | "none" => Ok(Markup::Plain),
            _ => Err(UnknownMarkup(s.into())),
        }
    }
}

fn escape_html(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
