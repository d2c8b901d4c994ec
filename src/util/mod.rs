//! Utility functions for common operations.
//!
//! - **URL validation**: scheme checks before opening article links
//! - **Text processing**: Unicode-aware width calculation, truncation and sanitizing
//!
//! # Examples
//!
//! ```
//! use briefing::util::{display_width, summary_preview, truncate_to_width};
//!
//! let width = display_width("Hello");
//! let truncated = truncate_to_width("Long article title", 15);
//! let (preview, cut) = summary_preview("A fairly short summary", 200);
//! assert!(!cut);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, summary_preview, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};
