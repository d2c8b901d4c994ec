//! Terminal client for a news summarizer backend.
//!
//! - `api` - HTTP client and wire types
//! - `sync` - view state and the controller that keeps it in step with the backend
//! - `app` - TUI application state
//! - `ui` - event loop and widgets
//! - `config`, `theme`, `keybindings` - user configuration
//! - `util` - text and URL helpers

pub mod api;
pub mod app;
pub mod config;
pub mod keybindings;
pub mod sync;
pub mod theme;
pub mod ui;
pub mod util;
