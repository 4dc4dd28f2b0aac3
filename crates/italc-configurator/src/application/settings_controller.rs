//! SettingsController: the configuration snapshot and its dirty state.
//!
//! The controller owns the one authoritative in-memory [`Configuration`]
//! that all configuration pages are bound to.  It is constructed with an
//! explicit backend and default layer instead of reaching for process-wide
//! state, so one controller serves exactly one window.
//!
//! # Lifecycle
//!
//! ```text
//!            start() / reset(false)
//!   defaults ──+=──► local backend ──► snapshot ──► pages.reset_widgets()
//!                                          │
//!        set_value() / load_from_file()    │  dirty = true
//!                                          ▼
//!                         apply() ──► backend.commit() ──► pages.apply_configuration()
//!                                                          dirty = false
//! ```
//!
//! Saving to a file never changes the dirty flag: a file on disk is not the
//! configuration the iTALC components read, so the changes are still
//! unapplied afterwards.

use std::path::{Path, PathBuf};

use italc_config_core::{
    with_json_extension, Configuration, ExtensionCheck, JsonStore, StoreError,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error type for the local configuration backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be read.
    #[error("local configuration backend unavailable: {0}")]
    Unavailable(String),

    /// The backend refused to store the configuration.
    #[error("configuration could not be applied: {0}")]
    Rejected(String),
}

/// The machine-local configuration store that the iTALC components read.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigurationBackend {
    /// Returns the configuration currently stored in the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if the store cannot be read.
    fn load(&self) -> Result<Configuration, BackendError>;

    /// Commits `config` to the system.
    ///
    /// The implementation reports failures through its own channel (logging);
    /// the controller only uses the result to decide whether to clear the
    /// dirty flag.
    fn commit(&self, config: &Configuration) -> Result<(), BackendError>;
}

/// A group of widgets bound to configuration values.
pub trait ConfigurationPage {
    /// Re-synchronises every widget with the values in `config`.
    fn reset_widgets(&mut self, config: &Configuration);

    /// Called after `config` was committed successfully.
    fn apply_configuration(&mut self, config: &Configuration);
}

type PendingCallback = Box<dyn FnMut(bool)>;

/// Owns the configuration snapshot, its pages, and the dirty flag.
pub struct SettingsController {
    config: Configuration,
    defaults: Configuration,
    backend: Box<dyn ConfigurationBackend>,
    pages: Vec<Box<dyn ConfigurationPage>>,
    pending_callbacks: Vec<PendingCallback>,
    changed: bool,
}

impl SettingsController {
    /// Creates a controller with an empty snapshot.  Call [`start`](Self::start)
    /// once pages and callbacks are registered.
    pub fn new(backend: Box<dyn ConfigurationBackend>, defaults: Configuration) -> Self {
        Self {
            config: Configuration::new(),
            defaults,
            backend,
            pages: Vec::new(),
            pending_callbacks: Vec::new(),
            changed: false,
        }
    }

    pub fn add_page(&mut self, page: Box<dyn ConfigurationPage>) {
        self.pages.push(page);
    }

    /// Registers a callback that receives the pending-changes state whenever
    /// the apply/reset affordance should be enabled or disabled.
    pub fn on_pending_changed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.pending_callbacks.push(Box::new(callback));
    }

    /// Builds the snapshot from defaults and the local backend.
    ///
    /// Returns `true` when the local backend holds fewer values than the
    /// effective configuration; the snapshot is then marked dirty so the
    /// operator is prompted to review and apply it.
    pub fn start(&mut self) -> bool {
        let local = self.rebuild_snapshot();
        self.reset(true);

        let incomplete = local.key_count() < self.config.key_count();
        if incomplete {
            info!(
                "local configuration incomplete ({} of {} values); changes pending",
                local.key_count(),
                self.config.key_count()
            );
            self.notify_changed();
        }
        incomplete
    }

    /// Re-synchronises the pages and clears the dirty flag.
    ///
    /// Unless `only_ui` is set the snapshot is first rebuilt from the default
    /// layer and the local backend, discarding unapplied edits.
    pub fn reset(&mut self, only_ui: bool) {
        if !only_ui {
            self.rebuild_snapshot();
        }

        for page in &mut self.pages {
            page.reset_widgets(&self.config);
        }

        self.changed = false;
        self.signal_pending();
    }

    /// Marks the snapshot dirty and enables the pending-changes affordance.
    pub fn notify_changed(&mut self) {
        self.changed = true;
        self.signal_pending();
    }

    /// Commits the snapshot to the local backend.
    ///
    /// On success every page is told about the commit and the dirty flag is
    /// cleared.  On failure nothing changes and `false` is returned.
    pub fn apply(&mut self) -> bool {
        if let Err(e) = self.backend.commit(&self.config) {
            error!("applying configuration failed: {e}");
            return false;
        }

        for page in &mut self.pages {
            page.apply_configuration(&self.config);
        }

        self.changed = false;
        self.signal_pending();
        info!("configuration applied ({} values)", self.config.key_count());
        true
    }

    /// Reads a settings file into the live snapshot and marks it dirty so the
    /// operator can decide whether to apply it.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] when the file cannot be loaded; the snapshot
    /// and the dirty flag are left untouched in that case.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), StoreError> {
        JsonStore::new(path).load_into(&mut self.config)?;
        info!("loaded settings from {}", path.display());

        self.reset(true);
        self.notify_changed();
        Ok(())
    }

    /// Writes the current snapshot (not the applied one) to `path`, appending
    /// `.json` unless it already ends with it in any letter case.
    ///
    /// The dirty flag keeps its previous value whether or not the write
    /// succeeds.  Returns the path actually written.
    pub fn save_to_file(&mut self, path: &Path) -> Result<PathBuf, StoreError> {
        let path = with_json_extension(path, ExtensionCheck::CaseInsensitive);
        let changed_before = self.changed;

        let result = JsonStore::new(&path).flush(&self.config);

        self.changed = changed_before;
        self.signal_pending();

        match result {
            Ok(()) => {
                info!("saved settings to {}", path.display());
                Ok(path)
            }
            Err(e) => {
                warn!("saving settings failed: {e}");
                Err(e)
            }
        }
    }

    /// Changes one value as a bound widget would, then marks the snapshot dirty.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>, parent_key: &str) {
        let value = value.into();
        debug!("{parent_key}/{key} = {value}");
        self.config.set_value(key, value, parent_key);
        self.notify_changed();
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Whether the snapshot may differ from what was last applied.
    pub fn has_pending_changes(&self) -> bool {
        self.changed
    }

    fn rebuild_snapshot(&mut self) -> Configuration {
        let local = match self.backend.load() {
            Ok(local) => local,
            Err(e) => {
                warn!("{e}; continuing with default configuration");
                Configuration::new()
            }
        };

        self.config.clear();
        self.config += &self.defaults;
        self.config += &local;
        local
    }

    fn signal_pending(&mut self) {
        let pending = self.changed;
        for callback in &mut self.pending_callbacks {
            callback(pending);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
