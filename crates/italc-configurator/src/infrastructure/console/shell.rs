//! Interactive command loop driving the main window from a terminal.
//!
//! ```text
//! italc> set Logging/LogLevel 6
//! italc*> apply
//! Settings applied.
//! italc> quit
//! ```
//!
//! The `*` in the prompt marks pending changes.  `quit` goes through the
//! window's close gate, so unsaved settings need an explicit confirmation.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use italc_config_core::{split_key, ConfigurationError};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::dialogs::ConsoleDialogs;
use super::summary_page::{render_configuration, SummaryView};
use crate::application::main_window::{ActionOutcome, MainWindow, WindowAction};

const HELP: &str = "\
Commands:
  show                 list the current settings
  set KEY VALUE        change a setting, e.g. `set Network/CoreServerPort 11200`
  apply                commit the settings to this computer
  reset                discard changes and reload the applied settings
  load [PATH]          read settings from a JSON file
  save [PATH]          write the current settings to a JSON file
  bug-report [PATH]    save a bug report archive
  help                 show this list
  quit                 leave the configurator";

/// Error type for unparseable shell input.
#[derive(Debug, Error, PartialEq)]
pub enum ShellError {
    #[error("unknown command `{0}`; type `help` for a list of commands")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    InvalidKey(#[from] ConfigurationError),
}

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Show,
    /// `parent` is the group path, empty for a top-level key.
    Set {
        key: String,
        parent: String,
        value: Value,
    },
    Apply,
    Reset,
    Load(Option<PathBuf>),
    Save(Option<PathBuf>),
    BugReport(Option<PathBuf>),
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses one input line; blank lines yield `Ok(None)`.
    ///
    /// `set` values are read as JSON (`6`, `true`, `"text"`); anything that is
    /// not valid JSON is taken as a plain string.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let path = || (!rest.is_empty()).then(|| PathBuf::from(rest));

        let command = match name.to_ascii_lowercase().as_str() {
            "show" => Self::Show,
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ShellError::Usage("set KEY VALUE"))?;
                let (key, parent) = split_key(key)?;
                Self::Set {
                    key: key.to_string(),
                    parent: parent.to_string(),
                    value: parse_value(value),
                }
            }
            "apply" => Self::Apply,
            "reset" => Self::Reset,
            "load" => Self::Load(path()),
            "save" => Self::Save(path()),
            "bug-report" => Self::BugReport(path()),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Reads `text` as JSON, or as a plain string when it is not valid JSON.
pub fn parse_value(text: &str) -> Value {
    let text = text.trim();
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Runs the command loop until the operator quits or input ends.
///
/// `summary` is the view of a [`SummaryPage`](super::SummaryPage) registered
/// with the window's controller; it is printed after the widgets are reset.
pub fn run_shell<R: BufRead, W: Write>(
    window: &mut MainWindow,
    console: &mut ConsoleDialogs<R, W>,
    summary: &SummaryView,
) {
    console.say(&window.title());
    if window.settings().has_pending_changes() {
        console.say("The local configuration is incomplete. Review the settings and apply them.");
    }
    console.say("Type `help` for a list of commands.");

    loop {
        let prompt = if window.settings().has_pending_changes() {
            "italc*> "
        } else {
            "italc> "
        };
        let Some(line) = console.read_line(prompt) else {
            if window.settings().has_pending_changes() {
                warn!("input closed with unsaved settings");
            }
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                console.say(&e.to_string());
                continue;
            }
        };

        if command == ShellCommand::Quit {
            if window.request_close(console) {
                break;
            }
            continue;
        }
        execute(window, console, summary, command);
    }
}

fn execute<R: BufRead, W: Write>(
    window: &mut MainWindow,
    console: &mut ConsoleDialogs<R, W>,
    summary: &SummaryView,
    command: ShellCommand,
) {
    match command {
        ShellCommand::Show => {
            for line in render_configuration(window.settings().config()) {
                console.say(&line);
            }
        }
        ShellCommand::Set { key, parent, value } => {
            window.settings_mut().set_value(&key, value, &parent);
        }
        ShellCommand::Apply => match window.trigger(WindowAction::Apply, console) {
            ActionOutcome::Completed => console.say("Settings applied."),
            _ => console.say("Applying the settings failed; see the log for details."),
        },
        ShellCommand::Reset => {
            window.trigger(WindowAction::Reset, console);
            print_summary(console, summary);
        }
        ShellCommand::Load(path) => {
            if let Some(path) = path {
                console.preset_path(path);
            }
            if window.trigger(WindowAction::LoadSettings, console) == ActionOutcome::Completed {
                print_summary(console, summary);
            }
        }
        ShellCommand::Save(path) => {
            if let Some(path) = path {
                console.preset_path(path);
            }
            if window.trigger(WindowAction::SaveSettings, console) == ActionOutcome::Completed {
                console.say("Settings saved.");
            }
        }
        ShellCommand::BugReport(path) => {
            if let Some(path) = path {
                console.preset_path(path);
            }
            window.trigger(WindowAction::GenerateBugReport, console);
        }
        ShellCommand::Help => console.say(HELP),
        ShellCommand::Quit => {}
    }
}

fn print_summary<R: BufRead, W: Write>(console: &mut ConsoleDialogs<R, W>, summary: &SummaryView) {
    for line in summary.lines() {
        console.say(&line);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bug_report::ArchiveBuilder;
    use crate::application::settings_controller::SettingsController;
    use crate::infrastructure::console::SummaryPage;
    use crate::infrastructure::log_files::LogDirectoryScanner;
    use crate::infrastructure::storage::local_backend::LocalBackend;
    use crate::infrastructure::system_info::MockSystemInfo;
    use italc_config_core::{default_configuration, JsonStore};
    use serde_json::json;
    use std::io::Cursor;
    use std::path::Path;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("italc_shell_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn build_window(dir: &Path) -> (MainWindow, SummaryView) {
        let backend = LocalBackend::new(dir.join("italc.toml"));
        let mut settings = SettingsController::new(Box::new(backend), default_configuration());
        let (page, view) = SummaryPage::new();
        settings.add_page(Box::new(page));
        let archive = ArchiveBuilder::new(
            Box::new(MockSystemInfo::unknown()),
            Box::new(LogDirectoryScanner::new().unwrap()),
            vec![dir.to_path_buf()],
        );
        (MainWindow::new(settings, archive, dir.to_path_buf()), view)
    }

    fn run(window: &mut MainWindow, view: &SummaryView, input: &str) -> String {
        let mut console = ConsoleDialogs::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        run_shell(window, &mut console, view);
        String::from_utf8(console.into_inner().1).unwrap()
    }

    #[test]
    fn test_parse_set_reads_json_values() {
        assert_eq!(
            ShellCommand::parse("set Logging/LogLevel 6").unwrap(),
            Some(ShellCommand::Set {
                key: "LogLevel".to_string(),
                parent: "Logging".to_string(),
                value: json!(6),
            })
        );
        assert_eq!(
            ShellCommand::parse("set VNC/PollFullScreen false").unwrap(),
            Some(ShellCommand::Set {
                key: "PollFullScreen".to_string(),
                parent: "VNC".to_string(),
                value: json!(false),
            })
        );
    }

    #[test]
    fn test_parse_set_splits_nested_and_top_level_keys() {
        assert_eq!(
            ShellCommand::parse("set VNC/Advanced/LowAccuracy true").unwrap(),
            Some(ShellCommand::Set {
                key: "LowAccuracy".to_string(),
                parent: "VNC/Advanced".to_string(),
                value: json!(true),
            })
        );
        assert_eq!(
            ShellCommand::parse("set Room 12").unwrap(),
            Some(ShellCommand::Set {
                key: "Room".to_string(),
                parent: String::new(),
                value: json!(12),
            })
        );
    }

    #[test]
    fn test_set_nested_key_lands_in_its_group() {
        let dir = temp_dir();
        let (mut window, view) = build_window(&dir);

        run(&mut window, &view, "set VNC/Advanced/LowAccuracy false\n");

        assert_eq!(
            window.settings().config().value("LowAccuracy", "VNC/Advanced"),
            Some(&json!(false))
        );
        assert!(window.settings().has_pending_changes());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_parse_set_falls_back_to_plain_string() {
        assert_eq!(
            ShellCommand::parse("set Logging/LogFileDirectory $TEMP/italc logs").unwrap(),
            Some(ShellCommand::Set {
                key: "LogFileDirectory".to_string(),
                parent: "Logging".to_string(),
                value: json!("$TEMP/italc logs"),
            })
        );
    }

    #[test]
    fn test_parse_value_prefers_json_over_plain_text() {
        assert_eq!(parse_value("\"11100\""), json!("11100"));
        assert_eq!(parse_value(" 11100 "), json!(11100));
        assert_eq!(parse_value("C:\\Temp"), json!("C:\\Temp"));
    }

    #[test]
    fn test_parse_set_without_value_reports_usage() {
        assert_eq!(
            ShellCommand::parse("set Logging/LogLevel"),
            Err(ShellError::Usage("set KEY VALUE"))
        );
    }

    #[test]
    fn test_parse_rejects_empty_key_segment() {
        assert!(matches!(
            ShellCommand::parse("set Logging/ 4"),
            Err(ShellError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_parse_optional_paths_and_blank_lines() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(ShellCommand::parse("save").unwrap(), Some(ShellCommand::Save(None)));
        assert_eq!(
            ShellCommand::parse("LOAD /tmp/lab.json").unwrap(),
            Some(ShellCommand::Load(Some(PathBuf::from("/tmp/lab.json"))))
        );
        assert_eq!(ShellCommand::parse("exit").unwrap(), Some(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            ShellCommand::parse("frobnicate"),
            Err(ShellError::UnknownCommand("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_set_then_apply_commits_to_local_backend() {
        // Arrange
        let dir = temp_dir();
        let (mut window, view) = build_window(&dir);

        // Act
        let output = run(&mut window, &view, "set Network/CoreServerPort 11200\napply\nquit\n");

        // Assert
        assert!(output.contains("Settings applied."));
        assert!(!window.settings().has_pending_changes());
        let applied = LocalBackend::new(dir.join("italc.toml")).read().unwrap();
        assert_eq!(applied.value("CoreServerPort", "Network"), Some(&json!(11200)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_quit_with_unsaved_settings_needs_confirmation() {
        let dir = temp_dir();
        let (mut window, view) = build_window(&dir);

        // First local start is incomplete, so changes are pending: decline, then confirm.
        let output = run(&mut window, &view, "quit\nn\nquit\ny\n");

        assert_eq!(output.matches("Unsaved settings").count(), 2);
        assert!(window.settings().has_pending_changes());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_show_lists_settings() {
        let dir = temp_dir();
        let (mut window, view) = build_window(&dir);

        let output = run(&mut window, &view, "show\n");

        assert!(output.contains("Logging/LogLevel = 4"));
        assert!(output.contains("Network/CoreServerPort = 11100"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_with_paths() {
        let dir = temp_dir();
        let (mut window, view) = build_window(&dir);
        let settings_file = dir.join("lab");

        run(
            &mut window,
            &view,
            &format!("set Service/Arguments -debug\nsave {}\n", settings_file.display()),
        );
        let saved = JsonStore::new(dir.join("lab.json")).load().unwrap();
        assert_eq!(saved.value("Arguments", "Service"), Some(&json!("-debug")));

        let (mut fresh, fresh_view) = build_window(&dir);
        let output = run(&mut fresh, &fresh_view, &format!("load {}\n", dir.join("lab.json").display()));

        assert!(output.contains("Service/Arguments = \"-debug\""));
        assert!(fresh.settings().has_pending_changes());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bug_report_reports_confirmation() {
        let dir = temp_dir();
        std::fs::write(dir.join("ItalcService.log"), b"started").unwrap();
        let (mut window, view) = build_window(&dir);

        let output = run(
            &mut window,
            &view,
            &format!("bug-report {}\n", dir.join("report").display()),
        );

        assert!(output.contains("iTALC bug report archive saved"));
        assert!(dir.join("report.json").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_command_keeps_loop_running() {
        let dir = temp_dir();
        let (mut window, view) = build_window(&dir);

        let output = run(&mut window, &view, "bogus\nhelp\n");

        assert!(output.contains("unknown command `bogus`"));
        assert!(output.contains("bug-report [PATH]"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
