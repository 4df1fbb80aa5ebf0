// UI module for terminal interaction.
// Selection menus, progress spinner, and display-label helpers.

pub mod breadcrumb;
pub mod label;
pub mod progress;
pub mod prompt;
pub mod terminal;

pub use label::display_label;
pub use progress::{Progress, with_progress};
pub use prompt::{BrowserOpener, Choice, Opener, Prompter};
pub use terminal::TerminalPrompter;
