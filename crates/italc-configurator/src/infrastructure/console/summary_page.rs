//! A read-only configuration page for text front ends.

use std::cell::RefCell;
use std::rc::Rc;

use italc_config_core::Configuration;
use tracing::info;

use crate::application::settings_controller::ConfigurationPage;

/// Renders every leaf value as a `Group/Key = value` line.
pub fn render_configuration(config: &Configuration) -> Vec<String> {
    config
        .flatten()
        .into_iter()
        .map(|(key, value)| format!("{key} = {value}"))
        .collect()
}

/// Page whose "widgets" are the rendered lines of the last reset.
pub struct SummaryPage {
    lines: Rc<RefCell<Vec<String>>>,
}

/// Read handle onto a [`SummaryPage`] owned by the controller.
#[derive(Clone)]
pub struct SummaryView {
    lines: Rc<RefCell<Vec<String>>>,
}

impl SummaryPage {
    pub fn new() -> (Self, SummaryView) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                lines: Rc::clone(&lines),
            },
            SummaryView { lines },
        )
    }
}

impl SummaryView {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl ConfigurationPage for SummaryPage {
    fn reset_widgets(&mut self, config: &Configuration) {
        *self.lines.borrow_mut() = render_configuration(config);
    }

    fn apply_configuration(&mut self, config: &Configuration) {
        info!("applied {} settings", config.key_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reset_widgets_renders_group_key_lines() {
        let (mut page, view) = SummaryPage::new();
        let cfg = Configuration::from_value(json!({
            "Logging": { "LogLevel": 4, "LogFileDirectory": "$TEMP" }
        }))
        .unwrap();

        page.reset_widgets(&cfg);

        assert_eq!(
            view.lines(),
            vec![
                "Logging/LogLevel = 4".to_string(),
                "Logging/LogFileDirectory = \"$TEMP\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_reset_widgets_replaces_previous_lines() {
        let (mut page, view) = SummaryPage::new();
        page.reset_widgets(&Configuration::from_value(json!({ "A": { "x": 1 } })).unwrap());

        page.reset_widgets(&Configuration::new());

        assert!(view.lines().is_empty());
    }
}
