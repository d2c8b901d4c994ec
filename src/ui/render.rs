//! Render functions for the TUI.
//!
//! Lays out the submit form, category bar, optional error banner, article
//! list and status bar, then draws any overlay on top.

use crate::app::{App, ConfirmAction, SubmitForm};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{articles, categories, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    render_main(f, app, area);

    if app.show_help {
        help::render(f, app);
    }

    if let Some(ref confirm) = app.pending_confirm {
        render_confirm_overlay(f, app, confirm);
    }
}

/// Error banner above a non-empty list. An empty list shows the error in
/// place of the cards instead.
fn banner_text(app: &App) -> Option<&str> {
    let state = app.sync.state();
    if state.articles().is_empty() {
        return None;
    }
    state.error()
}

fn form_height(app: &App) -> u16 {
    match &app.submit_form {
        Some(SubmitForm::InputUrl { error: Some(_), .. }) => 4,
        _ => 3,
    }
}

fn render_main(f: &mut Frame, app: &App, area: Rect) {
    let banner = banner_text(app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(form_height(app)),
            Constraint::Length(1),
            Constraint::Length(u16::from(banner.is_some())),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_form(f, app, chunks[0]);
    categories::render(f, app, chunks[1]);
    if let Some(message) = banner {
        let text = format!(
            " {}  (Esc to dismiss)",
            truncate_to_width(message, chunks[2].width.saturating_sub(20) as usize)
        );
        f.render_widget(
            Paragraph::new(text).style(app.style("error_banner")),
            chunks[2],
        );
    }
    articles::render(f, app, chunks[3]);
    status::render(f, app, chunks[4]);
}

/// Render the submit form line.
fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.submit_form.is_some();
    let border_style = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let input_width = area.width.saturating_sub(6) as usize;

    let mut lines = Vec::with_capacity(2);
    match &app.submit_form {
        None => lines.push(Line::from(Span::styled(
            "Press 'a' to submit an article URL",
            app.style("help_hint"),
        ))),
        Some(SubmitForm::InputUrl { input, error }) => {
            // Keep the tail visible while typing long URLs
            let shown = tail_to_width(input, input_width);
            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(format!("{}_", shown), app.style("form_input")),
            ]));
            if let Some(error) = error {
                lines.push(Line::from(Span::styled(
                    truncate_to_width(error, input_width + 2).into_owned(),
                    app.style("form_error"),
                )));
            }
        }
        Some(SubmitForm::Submitting { url }) => lines.push(Line::from(vec![
            Span::styled("Submitting... ", app.style("help_hint")),
            Span::styled(
                truncate_to_width(url, input_width.saturating_sub(14)).into_owned(),
                app.style("form_input"),
            ),
        ])),
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Submit Article "),
    );
    f.render_widget(paragraph, area);
}

/// The longest suffix of `s` that fits in `width` columns.
fn tail_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        used += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used > width {
            return &s[idx + c.len_utf8()..];
        }
    }
    s
}

/// Render a confirmation dialog overlay centered on screen.
fn render_confirm_overlay(f: &mut Frame, app: &App, confirm: &ConfirmAction) {
    let area = f.area();

    let text = match confirm {
        ConfirmAction::DeleteArticle { title, .. } => format!(
            "Delete \"{}\"?\n\nThis cannot be undone.\n\n(y) Confirm  (n/Esc) Cancel",
            truncate_to_width(title, 40)
        ),
    };

    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .style(app.style("help_body"));

    f.render_widget(paragraph, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiError, Article, Category};
    use crate::config::Config;
    use crate::sync::{FetchTicket, SyncController, SyncEvent};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn test_app() -> (App, mpsc::Receiver<SyncEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        (App::new(SyncController::new(client, tx), &Config::default()), rx)
    }

    fn finish(app: &mut App, result: Result<Vec<Article>, ApiError>) {
        let ticket = FetchTicket {
            generation: app.sync.state().fetch_generation(),
            category: app.sync.state().selected_category(),
        };
        app.sync.apply(SyncEvent::ArticlesLoaded { ticket, result });
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_initial_frame_shows_loading() {
        let (app, _rx) = test_app();
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Loading articles..."));
        assert!(screen.contains("Technology"));
    }

    #[tokio::test]
    async fn test_empty_category_message() {
        let (mut app, _rx) = test_app();
        app.select_filter(Some(Category::Sports));
        finish(&mut app, Ok(vec![]));
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("No articles found for category: Sports"));
    }

    #[tokio::test]
    async fn test_fetch_error_replaces_list() {
        let (mut app, _rx) = test_app();
        finish(&mut app, Err(ApiError::Fetch("Backend unavailable".into())));
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Backend unavailable"));
        assert!(!screen.contains("Esc to dismiss"));
    }

    #[tokio::test]
    async fn test_delete_error_is_banner_over_list() {
        let (mut app, _rx) = test_app();
        finish(
            &mut app,
            Ok(vec![Article {
                id: 1,
                title: Some("Kept article".into()),
                summary: Some("Body".into()),
                category: Some("health".into()),
                url: "https://example.com/1".into(),
                created_at: None,
            }]),
        );
        app.sync.apply(SyncEvent::ArticleDeleted {
            id: 1,
            result: Err(ApiError::Deletion("Delete refused".into())),
        });

        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Delete refused"));
        assert!(screen.contains("Esc to dismiss"));
        assert!(screen.contains("Kept article"));
    }

    #[tokio::test]
    async fn test_small_terminal_message() {
        let (app, _rx) = test_app();
        let screen = draw(&app, 30, 8);
        assert!(screen.contains("Terminal too small"));
    }

    #[test]
    fn test_tail_to_width() {
        assert_eq!(tail_to_width("https://example.com", 7), "ple.com");
        assert_eq!(tail_to_width("short", 10), "short");
        assert_eq!(tail_to_width("", 3), "");
    }
}
