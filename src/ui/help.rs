//! Help overlay: scrollable keybinding table.
//!
//! Shows the live bindings, including any overrides from config.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::render::centered_rect;

/// Registry-backed sections: global and list bindings read as one screen.
const SECTIONS: [(&str, &[Context]); 2] = [
    ("Browsing", &[Context::Global, Context::ArticleList]),
    ("Help Screen", &[Context::Help]),
];

/// Keys handled directly by the submit form and the delete dialog. These are
/// not rebindable, so they are listed as fixed text.
const FIXED_SECTIONS: [(&str, &[(&str, &str)]); 2] = [
    (
        "Submit Form",
        &[
            ("Enter", "Submit the URL"),
            ("Backspace", "Delete last character"),
            ("Esc", "Cancel (or hide while submitting)"),
        ],
    ),
    (
        "Delete Dialog",
        &[("y", "Delete the article"), ("n / Esc", "Keep it")],
    ),
];

fn heading(app: &App, label: &str) -> Row<'static> {
    Row::new(vec![
        Line::from(Span::styled(
            format!("-- {} --", label),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ])
    .style(app.style("help_heading"))
}

/// `(key, description)` lines grouped under their section label.
fn help_sections(app: &App) -> Vec<(&'static str, Vec<(String, String)>)> {
    let bindings = app.keybindings.all_bindings();
    let mut sections = Vec::with_capacity(SECTIONS.len() + FIXED_SECTIONS.len());

    for (label, contexts) in SECTIONS {
        let mut entries: Vec<(String, String)> = Vec::new();
        for ctx in contexts {
            for (c, key, _action, description) in &bindings {
                if c != ctx {
                    continue;
                }
                // The list context falls back to global keys; show each once
                let entry = (key.to_string(), description.to_string());
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
        }
        if !entries.is_empty() {
            sections.push((label, entries));
        }
    }

    for (label, keys) in FIXED_SECTIONS {
        let entries = keys
            .iter()
            .map(|(k, d)| (k.to_string(), d.to_string()))
            .collect();
        sections.push((label, entries));
    }

    sections
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, entries) in help_sections(app) {
        if !rows.is_empty() {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(heading(app, label));
        rows.extend(
            entries
                .into_iter()
                .map(|(key, description)| Row::new(vec![format!("  {}", key), description])),
        );
    }

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize; // -2 border -1 header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(
            " Help ({}/{}) ",
            scroll.saturating_add(1),
            max_scroll.saturating_add(1)
        )
    } else {
        " Help (? to close) ".to_string()
    };

    let widths = [Constraint::Length(16), Constraint::Min(20)];
    let table = Table::new(visible_rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("help_body"));

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("help_hint"),
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::sync::SyncController;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::channel(8);
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        App::new(SyncController::new(client, tx), &Config::default())
    }

    #[tokio::test]
    async fn test_global_and_list_keys_share_one_section() {
        let app = test_app();
        let sections = help_sections(&app);
        let labels: Vec<&str> = sections.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec!["Browsing", "Help Screen", "Submit Form", "Delete Dialog"]
        );

        let browsing = &sections[0].1;
        assert!(browsing.iter().any(|(key, _)| key == "q"));
        assert!(browsing.iter().any(|(key, _)| key == "d"));
    }

    #[tokio::test]
    async fn test_sections_have_no_duplicate_entries() {
        let app = test_app();
        for (label, entries) in help_sections(&app) {
            for (i, entry) in entries.iter().enumerate() {
                assert!(
                    !entries[i + 1..].contains(entry),
                    "duplicate {:?} in {}",
                    entry,
                    label
                );
            }
        }
    }
}
