//! Background event handling.
//!
//! Feeds completion events from API tasks into the sync controller and turns
//! the outcome into selection, form and status-bar updates.

use crate::app::{App, SubmitForm};
use crate::sync::{SyncEvent, SyncOutcome};
use crate::util::truncate_to_width;

/// Longest article title echoed in the status bar.
const STATUS_TITLE_WIDTH: usize = 40;

/// Apply a background event. Returns `false` when nothing visible changed.
pub(super) fn handle_sync_event(app: &mut App, event: SyncEvent) -> bool {
    let outcome = app.sync.apply(event);
    tracing::debug!(?outcome, "Applied sync event");

    match outcome {
        SyncOutcome::Stale => return false,
        SyncOutcome::Loaded { .. } | SyncOutcome::FetchFailed(_) => {
            app.clamp_selection();
        }
        SyncOutcome::Submitted { id, title } => {
            if matches!(app.submit_form, Some(SubmitForm::Submitting { .. })) {
                app.submit_form = None;
            }
            if let Some(pos) = app.articles().iter().position(|a| a.id == id) {
                app.selected_article = pos;
            }
            app.set_status(format!(
                "Added: {}",
                truncate_to_width(&title, STATUS_TITLE_WIDTH)
            ));
        }
        SyncOutcome::SubmitFailed(message) => match app.submit_form.take() {
            Some(SubmitForm::Submitting { url }) => {
                app.submit_form = Some(SubmitForm::InputUrl {
                    input: url,
                    error: Some(message),
                });
            }
            other => {
                // Form was closed or reopened meanwhile; report in the status bar
                app.submit_form = other;
                app.set_status(format!("Submit failed: {}", message));
            }
        },
        SyncOutcome::Deleted { .. } => {
            app.clamp_selection();
            app.set_status("Article deleted");
        }
        SyncOutcome::DeleteFailed { message, .. } => {
            app.set_status(format!("Delete failed: {}", message));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiError, Article};
    use crate::config::Config;
    use crate::sync::{FetchTicket, SyncController};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn article(id: i64, hour: u32) -> Article {
        Article {
            id,
            title: Some(format!("Story {}", id)),
            summary: None,
            category: Some("business".into()),
            url: format!("https://example.com/{}", id),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).single(),
        }
    }

    fn loaded_app(articles: Vec<Article>) -> (App, mpsc::Receiver<SyncEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let mut app = App::new(SyncController::new(client, tx), &Config::default());
        let ticket = FetchTicket {
            generation: app.sync.state().fetch_generation(),
            category: None,
        };
        handle_sync_event(
            &mut app,
            SyncEvent::ArticlesLoaded {
                ticket,
                result: Ok(articles),
            },
        );
        (app, rx)
    }

    #[tokio::test]
    async fn test_stale_event_reports_no_change() {
        let (mut app, _rx) = loaded_app(vec![article(1, 1)]);
        let stale = FetchTicket {
            generation: app.sync.state().fetch_generation().wrapping_sub(1),
            category: None,
        };
        let changed = handle_sync_event(
            &mut app,
            SyncEvent::ArticlesLoaded {
                ticket: stale,
                result: Ok(vec![]),
            },
        );
        assert!(!changed);
        assert_eq!(app.articles().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_success_closes_form_and_selects_article() {
        let (mut app, _rx) = loaded_app(vec![article(1, 1), article(2, 3)]);
        app.submit_form = Some(SubmitForm::Submitting {
            url: "https://example.com/5".into(),
        });

        handle_sync_event(
            &mut app,
            SyncEvent::ArticleSubmitted {
                url: "https://example.com/5".into(),
                result: Ok(article(5, 2)),
            },
        );

        assert!(app.submit_form.is_none());
        assert_eq!(app.selected_article().map(|a| a.id), Some(5));
        assert_eq!(app.selected_article, 1);
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert_eq!(status.as_deref(), Some("Added: Story 5"));
    }

    #[tokio::test]
    async fn test_submit_failure_returns_to_input_with_error() {
        let (mut app, _rx) = loaded_app(vec![article(1, 1)]);
        app.submit_form = Some(SubmitForm::Submitting {
            url: "https://bad.example".into(),
        });

        handle_sync_event(
            &mut app,
            SyncEvent::ArticleSubmitted {
                url: "https://bad.example".into(),
                result: Err(ApiError::Submission("Could not fetch article".into())),
            },
        );

        assert_eq!(
            app.submit_form,
            Some(SubmitForm::InputUrl {
                input: "https://bad.example".into(),
                error: Some("Could not fetch article".into())
            })
        );
        assert_eq!(app.articles().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_after_form_closed_uses_status() {
        let (mut app, _rx) = loaded_app(vec![]);
        handle_sync_event(
            &mut app,
            SyncEvent::ArticleSubmitted {
                url: "https://bad.example".into(),
                result: Err(ApiError::Submission("Invalid URL".into())),
            },
        );
        assert!(app.submit_form.is_none());
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert_eq!(status.as_deref(), Some("Submit failed: Invalid URL"));
    }

    #[tokio::test]
    async fn test_delete_clamps_selection() {
        let (mut app, _rx) = loaded_app(vec![article(1, 1), article(2, 2)]);
        app.selected_article = 1;
        handle_sync_event(&mut app, SyncEvent::ArticleDeleted { id: 1, result: Ok(()) });
        assert_eq!(app.selected_article, 0);
        assert_eq!(app.articles().len(), 1);
    }
}
