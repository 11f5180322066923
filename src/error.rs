//! Errors raised while resolving, running and rendering a search.
use thiserror::Error;

/// Errors from the tracker client.
#[derive(Debug, Error)]
pub enum JiraError {
    /// No `jira.base_url` in the configuration.
    #[error("jira.base_url is not configured")]
    MissingBaseUrl,

    /// Transport or decoding failure.
    #[error("request to Jira failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The tracker answered with a non-success status.
    #[error("Jira returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors from the `search` command.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("please use --query or --template to search")]
    MissingQuerySpecifier,

    #[error("{name} is not defined")]
    UndefinedTemplate { name: String },

    /// Anything the tracker client reports, passed through untouched.
    #[error(transparent)]
    Search(#[from] JiraError),

    /// The configured story point field holds something other than a number.
    #[error("story point field '{field}' on {key} is not numeric: {value}")]
    NonNumericStoryPoints {
        key: String,
        field: String,
        value: String,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
