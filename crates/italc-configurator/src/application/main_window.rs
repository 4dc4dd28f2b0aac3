//! MainWindow: binds operator actions to the settings and bug report use cases.
//!
//! The window itself holds no configuration state; it routes each action to
//! the [`SettingsController`] or the [`ArchiveBuilder`] and talks to the
//! operator only through [`OperatorDialogs`].  The dialogs are passed in per
//! call so a console loop can own its input stream and still lend it to the
//! window for prompts.
//!
//! | Action               | Dialog              | Use case                          |
//! |----------------------|---------------------|-----------------------------------|
//! | `Apply`              | –                   | `SettingsController::apply`       |
//! | `Reset`              | –                   | `SettingsController::reset(false)`|
//! | `LoadSettings`       | open file (JSON)    | `SettingsController::load_from_file` |
//! | `SaveSettings`       | save file (JSON)    | `SettingsController::save_to_file`   |
//! | `GenerateBugReport`  | save file (JSON)    | `ArchiveBuilder::build_and_save`     |
//!
//! A cancelled or empty file dialog abandons the action silently.

use std::path::PathBuf;

use italc_config_core::{APPLICATION_NAME, VERSION};
use tracing::{error, info};

use super::bug_report::ArchiveBuilder;
use super::settings_controller::SettingsController;

const JSON_FILTER: &str = "JSON files (*.json)";

/// Parameters for an open or save file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub title: String,
    /// Directory the dialog starts in.
    pub directory: PathBuf,
    /// Name filter, e.g. `"JSON files (*.json)"`.
    pub filter: String,
}

/// Every interaction the window needs from the operator.
#[cfg_attr(test, mockall::automock)]
pub trait OperatorDialogs {
    /// Asks for an existing file; `None` when cancelled.
    fn open_file_name(&mut self, request: &FileRequest) -> Option<PathBuf>;

    /// Asks for a file to write; `None` when cancelled.
    fn save_file_name(&mut self, request: &FileRequest) -> Option<PathBuf>;

    /// Yes/No question; `true` only for an explicit yes.
    fn question(&mut self, title: &str, text: &str) -> bool;

    /// Informational message box.
    fn information(&mut self, title: &str, text: &str);
}

/// Operator actions bound to buttons and menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Apply,
    Reset,
    LoadSettings,
    SaveSettings,
    GenerateBugReport,
}

/// Result of triggering a [`WindowAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The operator cancelled a dialog.
    Cancelled,
    /// The action ran but did not succeed; details were logged and, for file
    /// operations, shown to the operator.
    Failed,
}

/// The configurator's main window.
pub struct MainWindow {
    settings: SettingsController,
    archive: ArchiveBuilder,
    home_dir: PathBuf,
}

impl MainWindow {
    /// Builds the snapshot via [`SettingsController::start`]; an incomplete
    /// local configuration shows up as pending changes immediately.
    pub fn new(mut settings: SettingsController, archive: ArchiveBuilder, home_dir: PathBuf) -> Self {
        settings.start();
        Self {
            settings,
            archive,
            home_dir,
        }
    }

    pub fn title(&self) -> String {
        format!("{APPLICATION_NAME} Configurator {VERSION}")
    }

    pub fn settings(&self) -> &SettingsController {
        &self.settings
    }

    /// Mutable access for bound widgets editing values.
    pub fn settings_mut(&mut self) -> &mut SettingsController {
        &mut self.settings
    }

    pub fn trigger(&mut self, action: WindowAction, dialogs: &mut dyn OperatorDialogs) -> ActionOutcome {
        info!("action {action:?}");
        match action {
            WindowAction::Apply => {
                if self.settings.apply() {
                    ActionOutcome::Completed
                } else {
                    ActionOutcome::Failed
                }
            }
            WindowAction::Reset => {
                self.settings.reset(false);
                ActionOutcome::Completed
            }
            WindowAction::LoadSettings => self.load_settings(dialogs),
            WindowAction::SaveSettings => self.save_settings(dialogs),
            WindowAction::GenerateBugReport => self.generate_bug_report(dialogs),
        }
    }

    /// Handles a close request; returns `true` when the window may close.
    ///
    /// With pending changes the operator must explicitly confirm; declining
    /// vetoes the close and leaves every piece of state unchanged.
    pub fn request_close(&mut self, dialogs: &mut dyn OperatorDialogs) -> bool {
        if !self.settings.has_pending_changes() {
            return true;
        }
        dialogs.question("Unsaved settings", "There are unsaved settings. Quit anyway?")
    }

    fn load_settings(&mut self, dialogs: &mut dyn OperatorDialogs) -> ActionOutcome {
        let request = self.json_request("Load settings from file", JSON_FILTER);
        let Some(path) = non_empty(dialogs.open_file_name(&request)) else {
            return ActionOutcome::Cancelled;
        };

        match self.settings.load_from_file(&path) {
            Ok(()) => ActionOutcome::Completed,
            Err(e) => {
                error!("{e}");
                dialogs.information("Load settings from file", &format!("Could not load settings: {e}"));
                ActionOutcome::Failed
            }
        }
    }

    fn save_settings(&mut self, dialogs: &mut dyn OperatorDialogs) -> ActionOutcome {
        let request = self.json_request("Save settings to file", JSON_FILTER);
        let Some(path) = non_empty(dialogs.save_file_name(&request)) else {
            return ActionOutcome::Cancelled;
        };

        match self.settings.save_to_file(&path) {
            Ok(_) => ActionOutcome::Completed,
            Err(e) => {
                dialogs.information("Save settings to file", &format!("Could not save settings: {e}"));
                ActionOutcome::Failed
            }
        }
    }

    fn generate_bug_report(&mut self, dialogs: &mut dyn OperatorDialogs) -> ActionOutcome {
        let filter = format!("{APPLICATION_NAME} bug report (*.json)");
        let request = self.json_request("Save bug report archive", &filter);
        let Some(path) = non_empty(dialogs.save_file_name(&request)) else {
            return ActionOutcome::Cancelled;
        };

        match self.archive.build_and_save(&path, self.settings.config()) {
            Ok(summary) => {
                dialogs.information(&summary.confirmation_title(), &summary.confirmation_text());
                ActionOutcome::Completed
            }
            Err(e) => {
                error!("bug report generation failed: {e}");
                dialogs.information(
                    "Save bug report archive",
                    &format!("Could not save the bug report archive: {e}"),
                );
                ActionOutcome::Failed
            }
        }
    }

    fn json_request(&self, title: &str, filter: &str) -> FileRequest {
        FileRequest {
            title: title.to_string(),
            directory: self.home_dir.clone(),
            filter: filter.to_string(),
        }
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
