//! Operator dialogs for terminals and scripted runs.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::application::main_window::{FileRequest, OperatorDialogs};

/// Line-based dialogs over any input and output stream.
///
/// File prompts accept a path relative to the request's start directory.
/// An empty answer, or end of input, cancels the dialog.
pub struct ConsoleDialogs<R, W> {
    input: R,
    output: W,
    preset_path: Option<PathBuf>,
}

impl<R: BufRead, W: Write> ConsoleDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            preset_path: None,
        }
    }

    /// Answers the next file dialog with `path` instead of prompting.
    pub fn preset_path(&mut self, path: PathBuf) {
        self.preset_path = Some(path);
    }

    /// Writes `text` followed by a newline.
    pub fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            warn!("could not write to console: {e}");
        }
    }

    /// Shows `prompt` and reads one line without its line ending.
    ///
    /// Returns `None` at end of input or on a read error.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{prompt}").and_then(|()| self.output.flush()) {
            warn!("could not write to console: {e}");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("could not read from console: {e}");
                None
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn file_name(&mut self, request: &FileRequest) -> Option<PathBuf> {
        if let Some(path) = self.preset_path.take() {
            return Some(path);
        }

        self.say(&format!("{} [{}]", request.title, request.filter));
        let answer = self.read_line(&format!("{}> ", request.directory.display()))?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        Some(request.directory.join(answer))
    }
}

impl<R: BufRead, W: Write> OperatorDialogs for ConsoleDialogs<R, W> {
    fn open_file_name(&mut self, request: &FileRequest) -> Option<PathBuf> {
        self.file_name(request)
    }

    fn save_file_name(&mut self, request: &FileRequest) -> Option<PathBuf> {
        self.file_name(request)
    }

    fn question(&mut self, title: &str, text: &str) -> bool {
        self.say(title);
        let Some(answer) = self.read_line(&format!("{text} [y/N] ")) else {
            return false;
        };
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn information(&mut self, title: &str, text: &str) {
        self.say(title);
        self.say(text);
    }
}

/// Fixed answers for one-shot commands run without a terminal.
#[derive(Debug, Clone, Default)]
pub struct PresetDialogs {
    /// Returned by every file dialog; `None` cancels.
    pub path: Option<PathBuf>,
    /// Answer to every question.
    pub assume_yes: bool,
    /// Information boxes shown so far, as `(title, text)`.
    pub messages: Vec<(String, String)>,
}

impl PresetDialogs {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl OperatorDialogs for PresetDialogs {
    fn open_file_name(&mut self, _request: &FileRequest) -> Option<PathBuf> {
        self.path.clone()
    }

    fn save_file_name(&mut self, _request: &FileRequest) -> Option<PathBuf> {
        self.path.clone()
    }

    fn question(&mut self, title: &str, _text: &str) -> bool {
        info!("{title}: answering {}", if self.assume_yes { "yes" } else { "no" });
        self.assume_yes
    }

    fn information(&mut self, title: &str, text: &str) {
        self.messages.push((title.to_string(), text.to_string()));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
