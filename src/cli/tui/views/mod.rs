//! TUI views

pub mod shell;
mod sidebar;
mod viewport;
