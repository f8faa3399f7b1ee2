//! TUI (Terminal User Interface) module

mod browser;
mod theme;

pub use browser::TerminalEntityBrowser;
