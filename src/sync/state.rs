use crate::api::{ApiError, Article, Category};
use std::collections::HashSet;

/// Tag attached to a filter-driven fetch.
///
/// A result is only applied if its ticket's generation is still the current
/// one; selecting another filter (even the same category again) supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub category: Option<Category>,
}

/// Articles plus the view state around them.
///
/// `articles` stays sorted newest-first by `created_at` after every mutation.
#[derive(Debug, Clone)]
pub struct ViewState {
    articles: Vec<Article>,
    selected_category: Option<Category>,
    expanded_ids: HashSet<i64>,
    loading: bool,
    error: Option<String>,
    fetch_generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Empty state, `loading` set: the first fetch is expected right away.
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            selected_category: None,
            expanded_ids: HashSet::new(),
            loading: true,
            error: None,
            fetch_generation: 0,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded_ids.contains(&id)
    }

    pub fn expanded_ids(&self) -> &HashSet<i64> {
        &self.expanded_ids
    }

    pub fn fetch_generation(&self) -> u64 {
        self.fetch_generation
    }

    pub fn find(&self, id: i64) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Start a fetch for `category`, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self, category: Option<Category>) -> FetchTicket {
        self.fetch_generation = self.fetch_generation.wrapping_add(1);
        self.selected_category = category;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.fetch_generation,
            category,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.fetch_generation && ticket.category == self.selected_category
    }

    /// Apply a fetch result. Returns `false` (and changes nothing) if the
    /// ticket has been superseded.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Article>, ApiError>,
    ) -> bool {
        if !self.is_current(&ticket) {
            tracing::debug!(
                expected = self.fetch_generation,
                got = ticket.generation,
                category = ?ticket.category,
                "Ignoring stale article fetch (generation mismatch)"
            );
            return false;
        }

        match result {
            Ok(mut articles) => {
                sort_newest_first(&mut articles);
                self.articles = articles;
                // begin_fetch already cleared the error; anything set since is a delete failure
                let present: HashSet<i64> = self.articles.iter().map(|a| a.id).collect();
                self.expanded_ids.retain(|id| present.contains(id));
            }
            Err(e) => {
                self.error = Some(e.message().to_string());
                self.articles.clear();
            }
        }
        self.loading = false;
        true
    }

    /// Insert a freshly submitted article at its sorted position.
    ///
    /// Ties go before existing articles with the same timestamp. An article
    /// already present under the same id is replaced.
    pub fn insert(&mut self, article: Article) {
        self.articles.retain(|a| a.id != article.id);
        let idx = self
            .articles
            .partition_point(|existing| existing.created_at > article.created_at);
        self.articles.insert(idx, article);
    }

    /// Remove exactly the article with `id`, pruning its expansion state.
    pub fn remove(&mut self, id: i64) -> Option<Article> {
        self.expanded_ids.remove(&id);
        let idx = self.articles.iter().position(|a| a.id == id)?;
        Some(self.articles.remove(idx))
    }

    /// Flip whether `id`'s summary is shown in full. Returns the new state.
    pub fn toggle_expanded(&mut self, id: i64) -> bool {
        if self.expanded_ids.remove(&id) {
            false
        } else {
            self.expanded_ids.insert(id);
            true
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Newest first; undated articles last. Stable, so ties keep backend order.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
