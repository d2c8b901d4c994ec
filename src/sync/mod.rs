//! Article synchronization: the view state and the controller that keeps it
//! in step with the backend.

mod controller;
mod state;

pub use controller::{
    validate_submit_url, SyncController, SyncEvent, SyncOutcome, EMPTY_URL_MESSAGE,
};
pub use state::{sort_newest_first, FetchTicket, ViewState};
