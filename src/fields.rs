//! Story point lookup over an issue's untyped field map.
use serde_json::Value;

use crate::config::Config;
use crate::error::SearchError;
use crate::jira::Issue;

/// Reads story points out of the configured custom field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryPoints {
    field: Option<String>,
}

impl StoryPoints {
    pub fn new(field: Option<&str>) -> Self {
        Self {
            field: field.map(str::to_string),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.story_point_field())
    }

    /// Whether a story point field is configured at all.
    pub fn is_configured(&self) -> bool {
        self.field.is_some()
    }

    /// Points on `issue`, truncated towards zero.
    ///
    /// `Ok(None)` when no field is configured, the key is missing, or the value is
    /// null. Any other non-numeric value is an error.
    pub fn for_issue(&self, issue: &Issue) -> Result<Option<i64>, SearchError> {
        let Some(field) = &self.field else {
            return Ok(None);
        };

        match issue.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64().map(|points| points.trunc() as i64)),
            Some(other) => Err(non_numeric(issue, field, other)),
        }
    }
}

fn non_numeric(issue: &Issue, field: &str, value: &Value) -> SearchError {
    SearchError::NonNumericStoryPoints {
        key: issue.key.clone(),
        field: field.to_string(),
        value: value.to_string(),
    }
}
