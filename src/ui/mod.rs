//! Terminal user interface.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Applying API completions and reporting their outcome
//! - `render` - Layout and overlays
//! - `articles` - Article card list
//! - `categories` - Category filter bar
//! - `help` - Keybinding overlay
//! - `status` - Status bar

mod articles;
mod categories;
mod events;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

pub use articles::format_relative_time;
pub use loop_runner::{run, Action};
