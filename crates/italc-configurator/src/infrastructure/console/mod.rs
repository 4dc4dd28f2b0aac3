//! Console front end for the main window.
//!
//! - **`dialogs`** – [`OperatorDialogs`] over a line-based terminal
//!   ([`ConsoleDialogs`]) and for non-interactive commands ([`PresetDialogs`]).
//! - **`summary_page`** – a configuration page rendering `Group/Key = value`
//!   lines whenever the controller resets its widgets.
//! - **`shell`** – the interactive command loop.
//!
//! [`OperatorDialogs`]: crate::application::main_window::OperatorDialogs

pub mod dialogs;
pub mod shell;
pub mod summary_page;

pub use dialogs::{ConsoleDialogs, PresetDialogs};
pub use shell::{parse_value, run_shell, ShellCommand};
pub use summary_page::{render_configuration, SummaryPage, SummaryView};
