//! Input handling for the TUI.
//!
//! Overlays (help, confirm dialog, submit form) capture every key while
//! visible; otherwise keys go through the keybinding registry.

use crate::app::{App, ConfirmAction, SubmitForm};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::validate_url_for_open;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Longest URL the form accepts; held keys stop growing the input here.
const MAX_URL_INPUT: usize = 2048;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if app.show_help {
        return handle_help_input(app, code, modifiers);
    }

    if app.pending_confirm.is_some() {
        return handle_confirm_input(app, code);
    }

    if app.submit_form.is_some() {
        return handle_form_input(app, code, modifiers);
    }

    handle_list_input(app, code, modifiers)
}

/// Handle input while the help overlay is visible.
fn handle_help_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Help)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::ScrollDown) => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        Some(KbAction::ScrollUp) => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        Some(KbAction::Back) | Some(KbAction::ShowHelp) => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the article list.
fn handle_list_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::ArticleList);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => {
            if app.sync.state().error().is_some() {
                app.sync.dismiss_error();
            }
        }
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::NextCategory) => app.cycle_filter(1),
        Some(KbAction::PrevCategory) => app.cycle_filter(-1),
        Some(KbAction::Refresh) => {
            app.sync.refresh();
            app.set_status("Reloading articles...");
        }
        Some(KbAction::Submit) => app.open_submit_form(),
        Some(KbAction::ToggleSummary) => {
            if let Some(article) = app.selected_article() {
                let id = article.id;
                if app.summary_is_collapsible(article) {
                    app.sync.toggle_expanded(id);
                }
            }
        }
        Some(KbAction::Delete) => request_delete(app),
        Some(KbAction::OpenInBrowser) => open_selected(app),
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ScrollDown) | Some(KbAction::ScrollUp) | None => {}
    }
    Action::Continue
}

/// Ask for confirmation (or delete straight away when disabled in config).
fn request_delete(app: &mut App) {
    let Some(article) = app.selected_article() else {
        return;
    };
    let id = article.id;
    let title = article.display_title().to_string();

    if app.sync.is_deleting(id) {
        app.set_status("Delete already in progress");
    } else if app.confirm_delete {
        app.pending_confirm = Some(ConfirmAction::DeleteArticle { id, title });
    } else {
        start_delete(app, id, &title);
    }
}

fn start_delete(app: &mut App, id: i64, title: &str) {
    if app.sync.delete(id) {
        app.set_status(format!("Deleting {}...", title));
    }
}

fn open_selected(app: &mut App) {
    let Some(article) = app.selected_article() else {
        return;
    };
    let url = article.url.clone();

    if let Err(e) = validate_url_for_open(&url) {
        app.set_status(e.to_string());
    } else if let Err(e) = open::that(&url) {
        tracing::warn!(url = %url, error = %e, "Failed to open browser");
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status("Opening in browser...");
    }
}

/// Handle input while the confirmation dialog is visible.
///
/// y/Y confirms the action, n/N/Esc cancels.
fn handle_confirm_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(ConfirmAction::DeleteArticle { id, title }) = app.pending_confirm.take() {
                start_delete(app, id, &title);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_confirm = None;
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the submit form is open.
fn handle_form_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // Take ownership temporarily to match on state
    match app.submit_form.take() {
        Some(SubmitForm::InputUrl { mut input, error }) => match code {
            KeyCode::Char(c) => {
                if input.len() < MAX_URL_INPUT {
                    input.push(c);
                }
                app.submit_form = Some(SubmitForm::InputUrl { input, error: None });
            }
            KeyCode::Backspace => {
                input.pop();
                app.submit_form = Some(SubmitForm::InputUrl { input, error: None });
            }
            KeyCode::Enter => match app.sync.submit_new(&input) {
                Ok(()) => {
                    app.submit_form = Some(SubmitForm::Submitting {
                        url: input.trim().to_string(),
                    });
                }
                Err(e) => {
                    app.submit_form = Some(SubmitForm::InputUrl {
                        input,
                        error: Some(e.message().to_string()),
                    });
                }
            },
            KeyCode::Esc => {
                // Cancel: submit_form is already None from take()
            }
            _ => {
                app.submit_form = Some(SubmitForm::InputUrl { input, error });
            }
        },
        Some(SubmitForm::Submitting { url }) => {
            if code == KeyCode::Esc {
                // The request keeps going; its result still lands in the list.
                app.set_status("Submission continues in the background");
            } else {
                app.submit_form = Some(SubmitForm::Submitting { url });
            }
        }
        None => {}
    }
    Action::Continue
}
