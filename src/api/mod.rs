//! Client for the news summarizer backend.
//!
//! - `client` - REST operations (`submit`, `list_all`, `list_by_category`, `remove`)
//! - `error` - error payload normalization and the `ApiError` taxonomy
//! - `types` - `Article`, `Category` and request bodies

mod client;
mod error;
mod types;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use error::{
    normalize_error_body, normalize_error_value, ApiError, BackendError,
    ARTICLES_NOT_FOUND_FOR_CATEGORY, GENERIC_ERROR_MESSAGE,
};
pub use types::{Article, Category, SubmitRequest, UnknownCategory};
