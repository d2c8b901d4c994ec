use super::error::{
    normalize_error_body, ApiError, BackendError, ARTICLES_NOT_FOUND_FOR_CATEGORY,
};
use super::types::{Article, Category, SubmitRequest};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::redirect::Policy;
use reqwest::{RequestBuilder, Response};
use std::time::Duration;

/// Default request timeout when the config does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create a redirect policy with loop detection and limited hops.
///
/// The backend redirects slash-less collection paths, so a couple of hops are
/// normal; anything longer or circular is treated as a transport failure.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Thin wrapper over the summarizer backend's REST surface.
///
/// Every operation resolves to a value or a single normalized message; see
/// [`normalize_error_body`] for how backend payloads are reduced. Cloning is
/// cheap (the underlying `reqwest::Client` is reference counted), so clones are
/// handed to background tasks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("briefing/", env!("CARGO_PKG_VERSION")))
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a URL; the backend fetches, summarizes and categorizes it.
    pub async fn submit(&self, url: &str) -> Result<Article, ApiError> {
        let request = self
            .http
            .post(format!("{}/articles/", self.base_url))
            .json(&SubmitRequest { url });

        let response = self
            .execute(request, "submit")
            .await
            .map_err(|e| ApiError::Submission(e.message))?;

        let article = response.json::<Article>().await.map_err(|e| {
            tracing::warn!(error = %e, "Undecodable submit response");
            ApiError::Submission(BackendError::generic().message)
        })?;
        tracing::info!(id = article.id, url = %article.url, "Article submitted");
        Ok(article)
    }

    /// All articles, in whatever order the backend returns them.
    pub async fn list_all(&self) -> Result<Vec<Article>, ApiError> {
        let request = self.http.get(format!("{}/articles/", self.base_url));

        let response = self
            .execute(request, "list_all")
            .await
            .map_err(|e| ApiError::Fetch(e.message))?;

        let articles = response.json::<Vec<Article>>().await.map_err(|e| {
            tracing::warn!(error = %e, "Undecodable article list");
            ApiError::Fetch(BackendError::generic().message)
        })?;
        tracing::debug!(count = articles.len(), "Fetched all articles");
        Ok(articles)
    }

    /// Articles in one category.
    ///
    /// The backend reports an empty category as a domain error; that case is
    /// an ordinary empty view here, not a failure.
    pub async fn list_by_category(&self, category: Category) -> Result<Vec<Article>, ApiError> {
        let request = self.http.get(format!(
            "{}/articles/category/{}",
            self.base_url,
            category.as_str().to_lowercase()
        ));

        let response = match self.execute(request, "list_by_category").await {
            Ok(response) => response,
            Err(e) if e.is_domain(ARTICLES_NOT_FOUND_FOR_CATEGORY) => {
                tracing::debug!(%category, "No articles for category");
                return Ok(Vec::new());
            }
            Err(e) => return Err(ApiError::Fetch(e.message)),
        };

        let body = response.json::<serde_json::Value>().await.map_err(|e| {
            tracing::warn!(error = %e, %category, "Undecodable category listing");
            ApiError::Fetch(BackendError::generic().message)
        })?;

        if !body.is_array() {
            tracing::debug!(%category, "Category listing was not an array, treating as empty");
            return Ok(Vec::new());
        }

        let articles: Vec<Article> = serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, %category, "Malformed article in category listing");
            ApiError::Fetch(BackendError::generic().message)
        })?;
        tracing::debug!(%category, count = articles.len(), "Fetched category articles");
        Ok(articles)
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        let request = self.http.delete(format!("{}/articles/{}", self.base_url, id));
        self.execute(request, "remove")
            .await
            .map_err(|e| ApiError::Deletion(e.message))?;
        tracing::info!(id, "Article deleted");
        Ok(())
    }

    /// Send a request, turning transport failures and non-2xx responses into
    /// a normalized [`BackendError`].
    async fn execute(
        &self,
        request: RequestBuilder,
        op: &'static str,
    ) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(op, error = %e, "Request failed before a response arrived");
            BackendError::generic()
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = normalize_error_body(&body);
        tracing::warn!(
            op,
            status = status.as_u16(),
            domain = ?err.domain,
            message = %err.message,
            "Backend returned an error"
        );
        Err(err)
    }
}
