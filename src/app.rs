use crate::api::{Article, Category};
use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::sync::SyncController;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::strip_control_chars;
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Filter bar entries in display order: "All" first, then every category.
pub fn filter_options() -> impl Iterator<Item = Option<Category>> {
    std::iter::once(None).chain(Category::ALL.into_iter().map(Some))
}

/// Number of entries in the filter bar.
pub const FILTER_COUNT: usize = Category::ALL.len() + 1;

// ============================================================================
// Confirmation Dialog
// ============================================================================

/// Pending confirmation action for destructive operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteArticle { id: i64, title: String },
}

// ============================================================================
// Submit Form State
// ============================================================================

/// State machine for the submit-by-URL form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitForm {
    /// User is typing a URL. `error` holds the last failure for this input.
    InputUrl {
        input: String,
        error: Option<String>,
    },
    /// The URL was sent; waiting for the backend.
    Submitting { url: String },
}

impl SubmitForm {
    pub fn empty() -> Self {
        Self::InputUrl {
            input: String::new(),
            error: None,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub sync: SyncController,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    pub selected_article: usize,

    // Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,

    /// Pending confirmation dialog. While set, input goes to the dialog.
    pub pending_confirm: Option<ConfirmAction>,

    /// Submit form. While set, input goes to the form.
    pub submit_form: Option<SubmitForm>,

    /// Ask before deleting.
    pub confirm_delete: bool,
    /// Summaries longer than this many characters start collapsed.
    pub summary_preview_chars: usize,
}

impl App {
    pub fn new(sync: SyncController, config: &Config) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        Self {
            sync,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            selected_article: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            pending_confirm: None,
            submit_form: None,
            confirm_delete: config.confirm_delete,
            summary_preview_chars: config.summary_preview_chars.max(1),
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant and return its name for the status bar.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn articles(&self) -> &[Article] {
        self.sync.state().articles()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles().get(self.selected_article)
    }

    /// Keep the selection inside the list after it shrinks or is replaced.
    pub fn clamp_selection(&mut self) {
        let len = self.articles().len();
        self.selected_article = self.selected_article.min(len.saturating_sub(1));
    }

    pub fn nav_up(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.articles().len();
        if len > 0 {
            self.selected_article = self.selected_article.saturating_add(1).min(len - 1);
        }
    }

    /// Position of the active filter in the filter bar.
    pub fn filter_index(&self) -> usize {
        let current = self.sync.state().selected_category();
        filter_options().position(|c| c == current).unwrap_or(0)
    }

    /// Select a filter and start fetching it.
    pub fn select_filter(&mut self, category: Option<Category>) {
        self.sync.set_category_filter(category);
        self.selected_article = 0;
        self.needs_redraw = true;
    }

    /// Step the filter bar by `delta` entries, wrapping at both ends.
    pub fn cycle_filter(&mut self, delta: isize) {
        let next = (self.filter_index() as isize + delta).rem_euclid(FILTER_COUNT as isize);
        let category = filter_options().nth(next as usize).flatten();
        self.select_filter(category);
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    pub fn open_submit_form(&mut self) {
        if self.submit_form.is_none() {
            self.submit_form = Some(SubmitForm::empty());
        }
    }

    /// Whether `article`'s summary is long enough to need a more/less toggle.
    pub fn summary_is_collapsible(&self, article: &Article) -> bool {
        strip_control_chars(article.summary_text())
            .trim()
            .chars()
            .count()
            > self.summary_preview_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::sync::{FetchTicket, SyncEvent};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time;

    fn article(id: i64, minute: u32) -> Article {
        Article {
            id,
            title: Some(format!("Article {}", id)),
            summary: Some("Short summary".into()),
            category: Some("technology".into()),
            url: format!("https://example.com/{}", id),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).single(),
        }
    }

    fn test_app_with(config: &Config) -> (App, mpsc::Receiver<SyncEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        (App::new(SyncController::new(client, tx), config), rx)
    }

    fn test_app() -> (App, mpsc::Receiver<SyncEvent>) {
        test_app_with(&Config::default())
    }

    fn load(app: &mut App, articles: Vec<Article>) {
        let state = app.sync.state();
        let ticket = FetchTicket {
            generation: state.fetch_generation(),
            category: state.selected_category(),
        };
        app.sync.apply(SyncEvent::ArticlesLoaded {
            ticket,
            result: Ok(articles),
        });
    }

    #[tokio::test]
    async fn test_nav_empty_list() {
        let (mut app, _rx) = test_app();
        assert!(app.selected_article().is_none());
        app.nav_down();
        assert_eq!(app.selected_article, 0);
        app.nav_up();
        assert_eq!(app.selected_article, 0);
    }

    #[tokio::test]
    async fn test_nav_stays_in_bounds() {
        let (mut app, _rx) = test_app();
        load(&mut app, vec![article(1, 1), article(2, 2)]);

        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.selected_article, 1);
        // Newest first: id 2 is at index 0
        assert_eq!(app.selected_article().map(|a| a.id), Some(1));
    }

    #[tokio::test]
    async fn test_clamp_selection_after_shrink() {
        let (mut app, _rx) = test_app();
        load(&mut app, vec![article(1, 1), article(2, 2), article(3, 3)]);
        app.selected_article = 2;

        app.sync.apply(SyncEvent::ArticleDeleted { id: 1, result: Ok(()) });
        app.clamp_selection();
        assert_eq!(app.selected_article, 1);
    }

    #[tokio::test]
    async fn test_cycle_filter_wraps() {
        let (mut app, _rx) = test_app();
        assert_eq!(app.filter_index(), 0);

        app.cycle_filter(-1);
        assert_eq!(app.sync.state().selected_category(), Some(Category::Health));
        assert_eq!(app.filter_index(), FILTER_COUNT - 1);

        app.cycle_filter(1);
        assert_eq!(app.sync.state().selected_category(), None);

        app.cycle_filter(1);
        assert_eq!(app.sync.state().selected_category(), Some(Category::General));
        assert!(app.sync.state().is_loading());
    }

    #[tokio::test]
    async fn test_select_filter_resets_selection() {
        let (mut app, _rx) = test_app();
        load(&mut app, vec![article(1, 1), article(2, 2)]);
        app.selected_article = 1;

        app.select_filter(Some(Category::Sports));
        assert_eq!(app.selected_article, 0);
        assert_eq!(app.filter_index(), 4);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let (mut app, _rx) = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_config_applies_theme_and_keys() {
        let mut keybindings = HashMap::new();
        keybindings.insert("delete".to_string(), "x".to_string());
        let config = Config {
            theme: "light".into(),
            confirm_delete: false,
            keybindings,
            ..Config::default()
        };
        let (app, _rx) = test_app_with(&config);

        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert!(!app.confirm_delete);
        let bound = app
            .keybindings
            .all_bindings()
            .into_iter()
            .any(|(_, key, action, _)| {
                key == "x" && action == crate::keybindings::Action::Delete
            });
        assert!(bound);
    }

    #[tokio::test]
    async fn test_unknown_theme_falls_back_to_dark() {
        let config = Config {
            theme: "solarized".into(),
            ..Config::default()
        };
        let (mut app, _rx) = test_app_with(&config);
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        assert_eq!(app.cycle_theme(), "Light");
    }

    #[tokio::test]
    async fn test_summary_is_collapsible() {
        let config = Config {
            summary_preview_chars: 10,
            ..Config::default()
        };
        let (app, _rx) = test_app_with(&config);
        let mut a = article(1, 1);
        assert!(app.summary_is_collapsible(&a));
        a.summary = Some("tiny".into());
        assert!(!app.summary_is_collapsible(&a));
        a.summary = None;
        assert!(!app.summary_is_collapsible(&a));
    }

    #[tokio::test]
    async fn test_control_chars_do_not_count_toward_collapse() {
        let config = Config {
            summary_preview_chars: 10,
            ..Config::default()
        };
        let (app, _rx) = test_app_with(&config);
        let mut a = article(1, 1);
        a.summary = Some("\x1b[31mshort red\x1b[0m\x07\x07".into());
        assert!(!app.summary_is_collapsible(&a));
        a.summary = Some("\x1b[1mdefinitely longer\x1b[0m".into());
        assert!(app.summary_is_collapsible(&a));
    }

    #[tokio::test]
    async fn test_open_submit_form_keeps_existing_input() {
        let (mut app, _rx) = test_app();
        app.open_submit_form();
        if let Some(SubmitForm::InputUrl { input, .. }) = app.submit_form.as_mut() {
            input.push_str("https://a.com");
        }
        app.open_submit_form();
        assert_eq!(
            app.submit_form,
            Some(SubmitForm::InputUrl {
                input: "https://a.com".into(),
                error: None
            })
        );
    }
}
