// Prompt interface used by the navigation layer.
// Menus, text input, and messages go through this trait so tests can script them.

use crate::error::Result;
use crate::state::BreadcrumbNode;

use super::label::display_label;

/// One entry in a selection menu. Only `label` is ever rendered;
/// `value` is handed back untouched when the entry is picked.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Choice whose label is fixed up for right-to-left text.
    pub fn display(text: &str, value: T) -> Self {
        Self {
            label: display_label(text).into_owned(),
            value,
        }
    }
}

/// Interactive terminal operations needed by the navigator.
pub trait Prompter {
    /// Show a menu. `Ok(None)` means the user backed out without choosing.
    fn select<T: Clone>(&mut self, question: &str, choices: &[Choice<T>]) -> Result<Option<T>>;

    /// Ask for a line of text. `Ok(None)` means the prompt was cancelled.
    fn text(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Ask for a secret without echoing it.
    fn password(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Wait for any key.
    fn pause(&mut self) -> Result<()>;

    /// Print an informational line.
    fn info(&mut self, message: &str);

    /// Print an error line.
    fn error(&mut self, message: &str) {
        self.info(message);
    }

    /// Clear the screen before the next menu.
    fn clear(&mut self);

    /// Navigation trail for the next menu.
    fn show_breadcrumbs(&mut self, _trail: &[BreadcrumbNode]) {}
}

/// Hands URLs to an external viewer.
pub trait Opener {
    fn open(&mut self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs in the system browser without waiting for it.
#[derive(Debug, Default)]
pub struct BrowserOpener;

impl Opener for BrowserOpener {
    fn open(&mut self, url: &str) -> std::io::Result<()> {
        tracing::info!(url, "opening in browser");
        open::that_detached(url)
    }
}
