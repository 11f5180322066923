//! Jira client: the issue model and the search capability the `search` command runs against.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::JiraConfig;
use crate::error::JiraError;

/// An issue as returned by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    /// Every field the tracker returned, custom fields included.
    pub fields: Map<String, Value>,
}

#[cfg(test)]
impl Issue {
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    key: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        let summary = raw
            .fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            key: raw.key,
            summary,
            fields: raw.fields,
        }
    }
}

/// Options passed along with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: u32,
}

/// Runs a JQL query and returns one page of issues.
pub trait IssueSearch {
    async fn issue_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Issue>, JiraError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    jql: &'a str,
    start_at: u32,
    max_results: u32,
    fields: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<RawIssue>,
}

/// REST client for `/rest/api/2/search`.
///
/// Targets Jira Server and Data Center. Jira Cloud has retired this endpoint in
/// favour of `/rest/api/3/search/jql`.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self, JiraError> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(JiraError::MissingBaseUrl)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("jiraq/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            token: config.token.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/rest/api/2/search", self.base_url)
    }
}

impl IssueSearch for JiraClient {
    async fn issue_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Issue>, JiraError> {
        let body = SearchRequest {
            jql: query,
            start_at: 0,
            max_results: options.max_results,
            fields: ["*navigable"],
        };

        let mut request = self.http.post(self.search_url()).json(&body);
        request = match (&self.username, &self.token) {
            (Some(user), token) => request.basic_auth(user, token.as_deref()),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        };

        tracing::debug!(url = %self.search_url(), "sending search request");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JiraError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: SearchResponse = response.json().await?;
        Ok(page.issues.into_iter().map(Issue::from).collect())
    }
}
