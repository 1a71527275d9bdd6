use crate::core::{CategoryFetcher, ConfigProvider};
use crate::utils::error::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const CATEGORY_PREFIX: &str = "Category:";
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
    error: Option<ApiErrorBody>,
    #[serde(rename = "continue")]
    continuation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    categorymembers: Vec<CategoryMember>,
}

#[derive(Debug, Deserialize)]
struct CategoryMember {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

/// `title` without the category namespace prefix and surrounding whitespace.
pub fn strip_category_prefix(title: &str) -> &str {
    let title = title.trim();
    title.strip_prefix(CATEGORY_PREFIX).unwrap_or(title).trim()
}

/// Fetches category members from a MediaWiki `api.php` endpoint.
///
/// Only the first page of members is read; a `continue` marker in the
/// response is logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct MediaWikiFetcher {
    client: Client,
    endpoint: String,
    page_limit: u32,
    subcategories_only: bool,
}

impl MediaWikiFetcher {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
            subcategories_only: false,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build()?;

        Ok(Self::new(client, config.api_endpoint())
            .with_page_limit(config.page_limit())
            .with_subcategories_only(config.subcategories_only()))
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn with_subcategories_only(mut self, subcategories_only: bool) -> Self {
        self.subcategories_only = subcategories_only;
        self
    }

    fn query_params(&self, category: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("action", "query".to_string()),
            ("list", "categorymembers".to_string()),
            ("cmtitle", format!("{}{}", CATEGORY_PREFIX, category)),
            ("cmlimit", self.page_limit.to_string()),
            ("format", "json".to_string()),
        ];
        if self.subcategories_only {
            params.push(("cmtype", "subcat".to_string()));
        }
        params
    }
}

#[async_trait]
impl CategoryFetcher for MediaWikiFetcher {
    async fn fetch_subcategories(&self, category: &str) -> Result<Vec<String>> {
        tracing::debug!("Making API request to: {} for '{}'", self.endpoint, category);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(category))
            .send()
            .await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error {
            return Err(TrackerError::ApiResponseError {
                category: category.to_string(),
                message: format!("{}: {}", error.code, error.info),
            });
        }

        let query = parsed.query.ok_or_else(|| TrackerError::ApiResponseError {
            category: category.to_string(),
            message: "response has no 'query' object".to_string(),
        })?;

        if parsed.continuation.is_some() {
            tracing::warn!(
                "⚠️ '{}' has more than {} members; only the first page is used",
                category,
                self.page_limit
            );
        }

        Ok(query
            .categorymembers
            .iter()
            .map(|member| strip_category_prefix(&member.title).to_string())
            .collect())
    }
}
