//! Orchestrates API calls against the view state.
//!
//! Network work runs in spawned tasks that never touch [`ViewState`]; each
//! task reports back with a [`SyncEvent`] and the owner of the controller feeds
//! it to [`SyncController::apply`]. That keeps every mutation on one task.

use super::state::{FetchTicket, ViewState};
use crate::api::{ApiClient, ApiError, Article, Category, GENERIC_ERROR_MESSAGE};
use futures::FutureExt;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Message shown when a URL is submitted blank.
pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid URL";

/// Trim a URL about to be submitted, rejecting blank input before any request.
pub fn validate_submit_url(url: &str) -> Result<&str, ApiError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ApiError::Validation(EMPTY_URL_MESSAGE.to_string()));
    }
    Ok(url)
}

/// Completion events from background API tasks.
#[derive(Debug)]
pub enum SyncEvent {
    ArticlesLoaded {
        ticket: FetchTicket,
        result: Result<Vec<Article>, ApiError>,
    },
    ArticleSubmitted {
        url: String,
        result: Result<Article, ApiError>,
    },
    ArticleDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
}

/// What applying a [`SyncEvent`] did, for the UI to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Loaded { count: usize },
    FetchFailed(String),
    /// A superseded fetch result arrived and was dropped.
    Stale,
    Submitted { id: i64, title: String },
    SubmitFailed(String),
    Deleted { id: i64 },
    DeleteFailed { id: i64, message: String },
}

/// Owns the view state and drives it from user actions and API replies.
pub struct SyncController {
    client: ApiClient,
    state: ViewState,
    events: mpsc::Sender<SyncEvent>,
    /// Handle to the in-flight fetch, aborted when a newer filter is chosen.
    fetch_handle: Option<JoinHandle<()>>,
    /// Ids with a delete request in flight.
    pending_deletes: HashSet<i64>,
}

impl SyncController {
    pub fn new(client: ApiClient, events: mpsc::Sender<SyncEvent>) -> Self {
        Self {
            client,
            state: ViewState::new(),
            events,
            fetch_handle: None,
            pending_deletes: HashSet::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.pending_deletes.contains(&id)
    }

    /// Select a category (or `None` for all) and fetch its articles.
    ///
    /// The previous fetch is aborted and its ticket superseded, so whichever
    /// way the replies race, only this selection's result is applied.
    pub fn set_category_filter(&mut self, category: Option<Category>) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous fetch task");
        }

        let ticket = self.state.begin_fetch(category);
        tracing::debug!(generation = ticket.generation, ?category, "Spawning article fetch");

        let client = self.client.clone();
        self.fetch_handle = Some(spawn_reporting(
            self.events.clone(),
            "fetch_articles",
            async move {
                let result = match category {
                    Some(c) => client.list_by_category(c).await,
                    None => client.list_all().await,
                };
                SyncEvent::ArticlesLoaded { ticket, result }
            },
            move || SyncEvent::ArticlesLoaded {
                ticket,
                result: Err(ApiError::Fetch(GENERIC_ERROR_MESSAGE.to_string())),
            },
        ));
    }

    /// Re-run the fetch for the current filter.
    pub fn refresh(&mut self) {
        self.set_category_filter(self.state.selected_category());
    }

    /// Submit a URL. Blank input is rejected here, before any request.
    pub fn submit_new(&mut self, url: &str) -> Result<(), ApiError> {
        let url = validate_submit_url(url)?;

        tracing::debug!(url, "Spawning article submission");
        let client = self.client.clone();
        let url = url.to_string();
        let url_on_panic = url.clone();
        spawn_reporting(
            self.events.clone(),
            "submit_article",
            async move {
                let result = client.submit(&url).await;
                SyncEvent::ArticleSubmitted { url, result }
            },
            move || SyncEvent::ArticleSubmitted {
                url: url_on_panic,
                result: Err(ApiError::Submission(GENERIC_ERROR_MESSAGE.to_string())),
            },
        );
        Ok(())
    }

    /// Ask the backend to delete `id`. The article stays listed until the
    /// backend confirms. Returns `false` if a delete for it is already pending.
    pub fn delete(&mut self, id: i64) -> bool {
        if !self.pending_deletes.insert(id) {
            tracing::debug!(id, "Delete already in flight, skipping");
            return false;
        }

        let client = self.client.clone();
        spawn_reporting(
            self.events.clone(),
            "delete_article",
            async move {
                let result = client.remove(id).await;
                SyncEvent::ArticleDeleted { id, result }
            },
            move || SyncEvent::ArticleDeleted {
                id,
                result: Err(ApiError::Deletion(GENERIC_ERROR_MESSAGE.to_string())),
            },
        );
        true
    }

    /// Local only: show or hide the full summary of `id`.
    pub fn toggle_expanded(&mut self, id: i64) -> bool {
        self.state.toggle_expanded(id)
    }

    pub fn dismiss_error(&mut self) {
        self.state.clear_error();
    }

    /// Apply a completion event to the view state.
    pub fn apply(&mut self, event: SyncEvent) -> SyncOutcome {
        match event {
            SyncEvent::ArticlesLoaded { ticket, result } => {
                let failure = result.as_ref().err().map(|e| e.message().to_string());
                if !self.state.finish_fetch(ticket, result) {
                    return SyncOutcome::Stale;
                }
                self.fetch_handle = None;
                match failure {
                    Some(message) => {
                        tracing::warn!(category = ?ticket.category, error = %message, "Article fetch failed");
                        SyncOutcome::FetchFailed(message)
                    }
                    None => SyncOutcome::Loaded {
                        count: self.state.articles().len(),
                    },
                }
            }
            SyncEvent::ArticleSubmitted { url, result } => match result {
                Ok(article) => {
                    let id = article.id;
                    let title = article.display_title().to_string();
                    self.state.insert(article);
                    SyncOutcome::Submitted { id, title }
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Article submission failed");
                    SyncOutcome::SubmitFailed(e.message().to_string())
                }
            },
            SyncEvent::ArticleDeleted { id, result } => {
                self.pending_deletes.remove(&id);
                match result {
                    Ok(()) => {
                        self.state.remove(id);
                        SyncOutcome::Deleted { id }
                    }
                    Err(e) => {
                        tracing::warn!(id, error = %e, "Article deletion failed");
                        self.state.set_error(e.message());
                        SyncOutcome::DeleteFailed {
                            id,
                            message: e.message().to_string(),
                        }
                    }
                }
            }
        }
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted fetch task on controller drop");
        }
    }
}

/// Wraps a future to catch panics and convert them to errors.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Spawn `work` and send its event. A panicking task still reports, with the
/// failure event built by `on_panic`, so the UI never waits forever.
fn spawn_reporting<F, P>(
    events: mpsc::Sender<SyncEvent>,
    task: &'static str,
    work: F,
    on_panic: P,
) -> JoinHandle<()>
where
    F: Future<Output = SyncEvent> + Send + 'static,
    P: FnOnce() -> SyncEvent + Send + 'static,
{
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                on_panic()
            }
        };
        if let Err(e) = events.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    })
}
