//! Frame rendering for the playground
//!
//! A frame is the highlighted source pane, the console pane and a status
//! line. Frames are redrawn only when the buffer revision or the status
//! text changes.

use execution_bridge::EngineState;
use source_buffer::SourceBuffer;

const SEPARATOR_WIDTH: usize = 60;

/// Status line contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub engine: String,
    pub state: EngineState,
    pub revision: u64,
    pub message: Option<String>,
}

impl Status {
    pub fn line(&self) -> String {
        let mut line = format!("[{}] {} | rev {}", self.engine, self.state, self.revision);
        if let Some(message) = &self.message {
            line.push_str(" | ");
            line.push_str(message);
        }
        line
    }
}

/// Text renderer for playground frames
#[derive(Debug, Clone, Default)]
pub struct PlaygroundRenderer {
    line_numbers: bool,
    last_revision: Option<u64>,
    last_status: Option<String>,
}

impl PlaygroundRenderer {
    pub fn new(line_numbers: bool) -> Self {
        Self {
            line_numbers,
            last_revision: None,
            last_status: None,
        }
    }

    pub fn needs_redraw(&self, buffer: &SourceBuffer, status: &Status) -> bool {
        self.last_revision != Some(buffer.revision())
            || self.last_status.as_deref() != Some(status.line().as_str())
    }

    /// Forget what was drawn so the next frame is always rendered
    pub fn invalidate(&mut self) {
        self.last_revision = None;
        self.last_status = None;
    }

    /// Render a full frame and remember what it showed
    pub fn render(&mut self, buffer: &SourceBuffer, status: &Status) -> String {
        let mut output = String::new();

        section(&mut output, "source");
        let lines: Vec<&str> = buffer.rendered().split('\n').collect();
        let width = lines.len().to_string().len();
        for (index, line) in lines.iter().enumerate() {
            if self.line_numbers {
                output.push_str(&format!("{:>width$} | ", index + 1, width = width));
            }
            output.push_str(line);
            output.push('\n');
        }

        section(&mut output, "console");
        let transcript = buffer.console().text();
        output.push_str(&transcript);
        if !transcript.is_empty() && !transcript.ends_with('\n') {
            output.push('\n');
        }

        output.push_str(&"─".repeat(SEPARATOR_WIDTH));
        output.push('\n');
        let status_line = status.line();
        output.push_str(&status_line);
        output.push('\n');

        self.last_revision = Some(buffer.revision());
        self.last_status = Some(status_line);
        output
    }
}

fn section(output: &mut String, title: &str) {
    let label = format!("── {} ", title);
    let fill = SEPARATOR_WIDTH.saturating_sub(label.chars().count());
    output.push_str(&label);
    output.push_str(&"─".repeat(fill));
    output.push('\n');
}
