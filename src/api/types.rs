use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Article
// ============================================================================

/// A summarized, categorized article as returned by the backend.
///
/// Text columns are nullable on the backend (summarization can fail partway),
/// so they stay optional here and the renderer substitutes placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub url: String,
    /// Ordering key only. `None` sorts after every dated article.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Display title, falling back to the URL when the backend has none.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.url,
        }
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }
}

/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`) as well as the naive ISO form
/// the backend emits for timezone-less columns (`2024-05-01T10:00:00.123456`),
/// which is read as UTC. Unparseable values become `None` rather than failing
/// the whole list.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    tracing::debug!(value = %s, "Unparseable created_at, treating as undated");
    None
}

/// Request body for `POST /articles/`.
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub url: &'a str,
}

// ============================================================================
// Category
// ============================================================================

/// The fixed set of categories offered for filtering.
///
/// The backend is the source of truth for valid categories and may still
/// reject one of these; "no filter" is represented as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Technology,
    Business,
    Sports,
    Entertainment,
    Health,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Technology,
        Category::Business,
        Category::Sports,
        Category::Entertainment,
        Category::Health,
    ];

    /// Lower-case name used in request paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technology => "technology",
            Self::Business => "business",
            Self::Sports => "sports",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
        }
    }

    /// Capitalized name for the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Technology => "Technology",
            Self::Business => "Business",
            Self::Sports => "Sports",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}' (expected one of: general, technology, business, sports, entertainment, health)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
