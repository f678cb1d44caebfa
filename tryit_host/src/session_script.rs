//! # Session Script Parser
//!
//! Line-based scripts that drive the playground deterministically.
//!
//! ## Format
//!
//! One action per line:
//! - Text: `"(+ 1 2)"` typed at the cursor; `\n`, `\t`, `\"` and `\\` escapes
//! - Keys: `Enter`, `Backspace`, `Left`, `Right`, `Up`, `Down`, `Home`, `End`
//! - Idle steps: `wait` or `wait 3`
//! - Commands: `:run`, `:clear`, `:load demo.ot`, ...
//! - Comments: `# This is a comment`
//!
//! ## Example
//!
//! ```text
//! # Type a program and run it
//! "(+ 1 2)"
//! :run
//! ```

use std::collections::VecDeque;

use thiserror::Error;

/// Session script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionScriptError {
    #[error("Invalid key name: {0}")]
    InvalidKeyName(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,
}

/// Editing keys understood by the edit surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

impl EditKey {
    pub fn from_name(name: &str) -> Result<Self, SessionScriptError> {
        match name.to_lowercase().as_str() {
            "enter" | "return" => Ok(EditKey::Enter),
            "backspace" | "back" => Ok(EditKey::Backspace),
            "left" | "arrowleft" => Ok(EditKey::Left),
            "right" | "arrowright" => Ok(EditKey::Right),
            "up" | "arrowup" => Ok(EditKey::Up),
            "down" | "arrowdown" => Ok(EditKey::Down),
            "home" => Ok(EditKey::Home),
            "end" => Ok(EditKey::End),
            _ => Err(SessionScriptError::InvalidKeyName(name.to_string())),
        }
    }
}

/// A single scripted action; each one is one host step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAction {
    /// Insert text at the cursor
    Type(String),
    /// Press an editing key
    Key(EditKey),
    /// Do nothing this step
    Idle,
    /// Host command text, without the leading `:`
    Command(String),
}

impl ScriptedAction {
    /// Interpret one line of interactive input
    ///
    /// `:` lines are commands; anything else is typed followed by a newline.
    pub fn from_interactive_line(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.trim_start().strip_prefix(':') {
            Some(command) => ScriptedAction::Command(command.trim().to_string()),
            None => ScriptedAction::Type(format!("{}\n", line)),
        }
    }
}

/// Queued script line; a `wait N` stays one entry until it is counted down
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptEntry {
    Action(ScriptedAction),
    Idle(usize),
}

/// Session script
#[derive(Debug, Clone, Default)]
pub struct SessionScript {
    entries: VecDeque<ScriptEntry>,
}

impl SessionScript {
    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, SessionScriptError> {
        let mut entries = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::parse_line(line, line_num + 1)? {
                ScriptEntry::Idle(0) => {}
                entry => entries.push_back(entry),
            }
        }

        if entries.is_empty() {
            return Err(SessionScriptError::EmptyScript);
        }

        Ok(Self { entries })
    }

    fn parse_line(line: &str, line_num: usize) -> Result<ScriptEntry, SessionScriptError> {
        let parse_error = |message: String| SessionScriptError::ParseError {
            line: line_num,
            message,
        };

        if let Some(command) = line.strip_prefix(':') {
            let command = command.trim();
            if command.is_empty() {
                return Err(parse_error("empty command".to_string()));
            }
            return Ok(ScriptEntry::Action(ScriptedAction::Command(
                command.to_string(),
            )));
        }

        if let Some(quoted) = line.strip_prefix('"') {
            let text = Self::parse_quoted(quoted).map_err(parse_error)?;
            return Ok(ScriptEntry::Action(ScriptedAction::Type(text)));
        }

        if line == "wait" || line.starts_with("wait ") {
            let count = match line["wait".len()..].trim() {
                "" => 1,
                n => n
                    .parse::<usize>()
                    .map_err(|_| parse_error(format!("invalid wait count: {}", n)))?,
            };
            return Ok(ScriptEntry::Idle(count));
        }

        let key = EditKey::from_name(line).map_err(|e| parse_error(e.to_string()))?;
        Ok(ScriptEntry::Action(ScriptedAction::Key(key)))
    }

    /// Unescape the body of a quoted string (opening quote already removed)
    fn parse_quoted(body: &str) -> Result<String, String> {
        let mut text = String::new();
        let mut chars = body.chars();

        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    let trailing = chars.as_str().trim();
                    if !trailing.is_empty() {
                        return Err(format!("unexpected text after string: {}", trailing));
                    }
                    return Ok(text);
                }
                '\\' => match chars.next() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(other) => return Err(format!("unknown escape: \\{}", other)),
                    None => return Err("unterminated string".to_string()),
                },
                _ => text.push(c),
            }
        }

        Err("unterminated string".to_string())
    }

    /// Returns the next action, if any
    pub fn next_action(&mut self) -> Option<ScriptedAction> {
        match self.entries.pop_front()? {
            ScriptEntry::Action(action) => Some(action),
            ScriptEntry::Idle(count) => {
                if count > 1 {
                    self.entries.push_front(ScriptEntry::Idle(count - 1));
                }
                Some(ScriptedAction::Idle)
            }
        }
    }

    /// Returns true if the script has more actions
    pub fn has_more(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns the number of remaining actions, saturating at `usize::MAX`
    pub fn remaining(&self) -> usize {
        self.entries.iter().fold(0usize, |total, entry| match entry {
            ScriptEntry::Action(_) => total.saturating_add(1),
            ScriptEntry::Idle(count) => total.saturating_add(*count),
        })
    }
}
