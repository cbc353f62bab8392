//! Terminal rendering of the wizard prompts

pub mod keybindings;
mod render;
mod screen;
mod terminal;
pub mod terminal_guard;

pub use terminal::TerminalSurface;
pub use terminal_guard::install_panic_hook;
