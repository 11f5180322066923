//! The `search` command: pick the query, run it, render the issues.
use std::io::Write;

use crate::cli::{DEFAULT_MAX_RESULTS, Format, SearchArgs};
use crate::config::Config;
use crate::error::SearchError;
use crate::fields::StoryPoints;
use crate::jira::{Issue, IssueSearch, SearchOptions};
use crate::render;

/// The query to run and how many results to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub query: String,
    pub max_results: u32,
}

/// Turns command options into a concrete query using the configured templates.
pub struct QueryResolver<'a> {
    config: &'a Config,
}

impl<'a> QueryResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// A template wins over `--query`. Its `count` becomes the limit unless
    /// `--max-results` was set to something other than the default; passing the
    /// default value explicitly is indistinguishable from not passing it.
    pub fn resolve(&self, args: &SearchArgs) -> Result<ResolvedQuery, SearchError> {
        let (query, mut max_results) = if let Some(name) = args.template_name() {
            let template =
                self.config
                    .template_for(name)
                    .ok_or_else(|| SearchError::UndefinedTemplate {
                        name: name.to_string(),
                    })?;
            tracing::debug!(template = name, count = template.count, "using template");
            (template.query.clone(), template.count)
        } else if let Some(query) = args.inline_query() {
            (query.to_string(), DEFAULT_MAX_RESULTS)
        } else {
            return Err(SearchError::MissingQuerySpecifier);
        };

        if args.max_results != DEFAULT_MAX_RESULTS {
            max_results = args.max_results;
        }

        Ok(ResolvedQuery { query, max_results })
    }
}

/// Run the resolved query against the tracker. Errors pass through as they are.
pub async fn invoke<C: IssueSearch>(
    client: &C,
    resolved: &ResolvedQuery,
) -> Result<Vec<Issue>, SearchError> {
    let options = SearchOptions {
        max_results: resolved.max_results,
    };
    let issues = client.issue_search(&resolved.query, &options).await?;
    tracing::info!(count = issues.len(), "search returned");
    Ok(issues)
}

/// Resolve the query for `args`. Runs before any tracker client exists so that
/// option errors are reported ahead of connection setup errors.
pub fn resolve(config: &Config, args: &SearchArgs) -> Result<ResolvedQuery, SearchError> {
    if !args.args.is_empty() {
        tracing::debug!(ignored = ?args.args, "ignoring positional arguments");
    }

    let resolved = QueryResolver::new(config).resolve(args)?;
    tracing::debug!(
        query = %resolved.query,
        max_results = resolved.max_results,
        "resolved query"
    );
    Ok(resolved)
}

/// Search with an already resolved query and render the result.
pub async fn search_and_render<C: IssueSearch, W: Write>(
    client: &C,
    config: &Config,
    resolved: &ResolvedQuery,
    format: Format,
    w: &mut W,
) -> Result<(), SearchError> {
    let issues = invoke(client, resolved).await?;
    render::render(&issues, format, &StoryPoints::from_config(config), w)?;
    w.flush()?;
    Ok(())
}
