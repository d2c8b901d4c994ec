use crate::api::Article;
use crate::app::App;
use crate::util::{display_width, strip_control_chars, summary_preview, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = SPINNER.len();

/// Format a timestamp relative to `now`: "5m", "3h", "2d", then "May 01".
pub fn format_relative_time(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let diff = (now - ts).num_seconds();

    // Clock skew between backend and client
    if diff < 60 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    ts.format("%b %d").to_string()
}

/// Greedy word wrap by display width. Words wider than `width` are split.
fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word;
            let mut word_width = display_width(word);

            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            while word_width > width {
                let split = split_at_width(word, width);
                if current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                lines.push(word[..split].to_string());
                word = &word[split..];
                word_width = display_width(word);
            }

            if word.is_empty() {
                continue;
            }
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Byte offset where `word` stops fitting in `width` columns. Always at least
/// one character so wrapping makes progress on very wide glyphs.
fn split_at_width(word: &str, width: usize) -> usize {
    let mut used = 0;
    for (idx, c) in word.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return if idx == 0 { c.len_utf8() } else { idx };
        }
        used += w;
    }
    word.len()
}

/// Build the card for one article.
fn article_card<'a>(
    app: &App,
    article: &'a Article,
    width: usize,
    now: DateTime<Utc>,
) -> ListItem<'a> {
    let pending = app.sync.is_deleting(article.id);
    let title_style = if pending {
        app.style("article_pending")
    } else {
        app.style("article_title")
    };

    let time_str = format_relative_time(article.created_at, now);
    let category = article.category.as_deref().unwrap_or("uncategorized");
    let meta = format!("  {} · {}", category, time_str);
    let title_width = width.saturating_sub(display_width(&meta)).max(8);

    let title: Cow<'_, str> = match strip_control_chars(article.display_title()) {
        Cow::Borrowed(t) => truncate_to_width(t, title_width),
        Cow::Owned(t) => Cow::Owned(truncate_to_width(&t, title_width).into_owned()),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(title, title_style),
        Span::styled(format!("  {}", category), app.style("article_category")),
        Span::styled(
            if time_str.is_empty() {
                String::new()
            } else {
                format!(" · {}", time_str)
            },
            app.style("article_date"),
        ),
    ])];

    let summary = strip_control_chars(article.summary_text());
    if !summary.trim().is_empty() {
        let collapsible = app.summary_is_collapsible(article);
        let expanded = app.sync.state().is_expanded(article.id);
        let body: Cow<'_, str> = if collapsible && !expanded {
            summary_preview(&summary, app.summary_preview_chars).0
        } else {
            Cow::Borrowed(summary.trim())
        };

        for line in wrap_to_width(&body, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                app.style("article_summary"),
            )));
        }
        if collapsible {
            let marker = if expanded { "  [less]" } else { "  [more]" };
            lines.push(Line::from(Span::styled(marker, app.style("article_date"))));
        }
    }

    lines.push(Line::from(Span::styled(
        format!("  {}", truncate_to_width(&article.url, width.saturating_sub(2))),
        app.style("article_url"),
    )));
    lines.push(Line::from(""));

    ListItem::new(Text::from(lines))
}

/// Text shown in place of the list when there is nothing to list.
fn empty_message(app: &App) -> Cow<'static, str> {
    let state = app.sync.state();
    if state.is_loading() {
        Cow::Owned(format!(
            "{} Loading articles...",
            SPINNER[app.spinner_frame % SPINNER_FRAMES]
        ))
    } else if let Some(error) = state.error() {
        Cow::Owned(error.to_string())
    } else if let Some(category) = state.selected_category() {
        Cow::Owned(format!("No articles found for category: {}", category.label()))
    } else {
        Cow::Borrowed("No articles found")
    }
}

/// Render the article card list
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let state = app.sync.state();
    let count = state.articles().len();
    let title = match (state.is_loading(), state.selected_category()) {
        (true, _) if count > 0 => format!(
            " Articles {} ",
            SPINNER[app.spinner_frame % SPINNER_FRAMES]
        ),
        (_, Some(category)) => format!(" {} ({}) ", category.label(), count),
        (_, None) => format!(" Articles ({}) ", count),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(title);

    if count == 0 {
        let style = if !state.is_loading() && state.error().is_some() {
            app.style("form_error")
        } else {
            app.style("empty_state")
        };
        let paragraph = Paragraph::new(empty_message(app))
            .block(block)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let now = Utc::now();
    let items: Vec<ListItem> = state
        .articles()
        .iter()
        .map(|article| article_card(app, article, inner_width, now))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("article_selected"));

    let mut list_state = ListState::default().with_selected(Some(app.selected_article));
    f.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = now();
        assert_eq!(format_relative_time(None, now), "");
        assert_eq!(format_relative_time(Some(now - Duration::seconds(30)), now), "now");
        assert_eq!(format_relative_time(Some(now - Duration::minutes(5)), now), "5m");
        assert_eq!(format_relative_time(Some(now - Duration::hours(3)), now), "3h");
        assert_eq!(format_relative_time(Some(now - Duration::days(2)), now), "2d");
        assert_eq!(
            format_relative_time(Some(now - Duration::days(30)), now),
            "May 16"
        );
    }

    #[test]
    fn test_relative_time_future_is_now() {
        let now = now();
        assert_eq!(format_relative_time(Some(now + Duration::hours(1)), now), "now");
    }

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_to_width("one two three", 20), vec!["one two three"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_to_width("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_to_width("abcdefghijkl", 5);
        assert!(lines.iter().all(|l| display_width(l) <= 5));
        assert_eq!(lines.concat(), "abcdefghijkl");
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        assert_eq!(wrap_to_width("first\nsecond", 40), vec!["first", "second"]);
    }
}
