pub mod command;
pub mod reader;
pub mod terminal;
pub mod terminal_guard;
pub mod theme;

pub use command::{command_to_app_event, parse_command, Command};
pub use reader::view::{render_buffer, render_progress_bar, render_word_display, wrap_buffer};
pub use terminal::{CommandLine, TuiManager};
pub use terminal_guard::TerminalGuard;
