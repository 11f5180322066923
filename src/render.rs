//! Output formatting for search results: line list and metric table.
use std::io::Write;

use comfy_table::{Table, presets::NOTHING};

use crate::cli::Format;
use crate::error::SearchError;
use crate::fields::StoryPoints;
use crate::jira::Issue;

/// An issue with its story points already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueRow<'a> {
    pub key: &'a str,
    pub summary: &'a str,
    pub points: Option<i64>,
}

/// Totals shown by the table format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub issue_count: usize,
    pub total_points: i64,
    pub unestimated_count: usize,
}

impl RenderSummary {
    pub fn from_rows(rows: &[IssueRow<'_>]) -> Self {
        rows.iter().fold(
            Self {
                issue_count: rows.len(),
                ..Self::default()
            },
            |mut summary, row| {
                match row.points {
                    Some(points) => {
                        summary.total_points = summary.total_points.saturating_add(points)
                    }
                    None => summary.unestimated_count += 1,
                }
                summary
            },
        )
    }
}

/// Resolve story points for every issue up front so a bad value aborts before
/// anything is written.
pub fn project<'a>(
    issues: &'a [Issue],
    story_points: &StoryPoints,
) -> Result<Vec<IssueRow<'a>>, SearchError> {
    issues
        .iter()
        .map(|issue| {
            Ok(IssueRow {
                key: &issue.key,
                summary: &issue.summary,
                points: story_points.for_issue(issue)?,
            })
        })
        .collect()
}

/// Write `issues` to `w` in the chosen format.
pub fn render<W: Write>(
    issues: &[Issue],
    format: Format,
    story_points: &StoryPoints,
    w: &mut W,
) -> Result<(), SearchError> {
    let rows = project(issues, story_points)?;
    match format {
        Format::List => render_list(&rows, w)?,
        Format::Table => render_table(&rows, story_points.is_configured(), w)?,
    }
    Ok(())
}

pub fn render_list<W: Write>(rows: &[IssueRow<'_>], w: &mut W) -> std::io::Result<()> {
    for row in rows {
        let points = row
            .points
            .map(|p| format!("({p}) "))
            .unwrap_or_default();
        writeln!(w, "* {} - {points}{}", row.key, row.summary)?;
    }
    Ok(())
}

pub fn render_table<W: Write>(
    rows: &[IssueRow<'_>],
    points_used: bool,
    w: &mut W,
) -> std::io::Result<()> {
    let summary = RenderSummary::from_rows(rows);

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.add_row(["Metric", "Count"]);
    table.add_row(["------", "-----"]);
    table.add_row(["Issues".to_string(), summary.issue_count.to_string()]);
    if points_used {
        table.add_row(["Points".to_string(), summary.total_points.to_string()]);
        table.add_row([
            "Not pointed".to_string(),
            summary.unestimated_count.to_string(),
        ]);
    }
    table.add_row(["------", "-----"]);
    for column in table.column_iter_mut() {
        column.set_padding((0, 1));
    }

    for line in table.to_string().lines() {
        writeln!(w, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn issues() -> Vec<Issue> {
        vec![
            Issue::new("KEY-1", "First").with_field("storypoints", json!(3.0)),
            Issue::new("KEY-2", "Second").with_field("storypoints", json!(5.0)),
            Issue::new("KEY-3", "Third").with_field("storypoints", Value::Null),
        ]
    }

    fn rendered(issues: &[Issue], format: Format, story_points: &StoryPoints) -> String {
        let mut out = Vec::new();
        render(issues, format, story_points, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Collapse column padding so rows compare independent of alignment width.
    fn cells(output: &str) -> Vec<String> {
        output
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect()
    }

    #[test]
    fn test_list_without_story_points() {
        let output = rendered(&issues(), Format::List, &StoryPoints::default());
        assert_eq!(
            output,
            "* KEY-1 - First\n* KEY-2 - Second\n* KEY-3 - Third\n"
        );
    }

    #[test]
    fn test_list_with_story_points() {
        let output = rendered(
            &issues(),
            Format::List,
            &StoryPoints::new(Some("storypoints")),
        );
        assert_eq!(
            output,
            "* KEY-1 - (3) First\n* KEY-2 - (5) Second\n* KEY-3 - Third\n"
        );
    }

    #[test]
    fn test_list_preserves_tracker_order() {
        let mut reversed = issues();
        reversed.reverse();
        let output = rendered(&reversed, Format::List, &StoryPoints::default());
        let keys: Vec<&str> = output
            .lines()
            .map(|line| line.split(' ').nth(1).unwrap())
            .collect();
        assert_eq!(keys, ["KEY-3", "KEY-2", "KEY-1"]);
    }

    #[test]
    fn test_list_empty() {
        assert_eq!(rendered(&[], Format::List, &StoryPoints::default()), "");
    }

    #[test]
    fn test_table_with_story_points() {
        let output = rendered(
            &issues(),
            Format::Table,
            &StoryPoints::new(Some("storypoints")),
        );
        assert_eq!(
            cells(&output),
            [
                "Metric Count",
                "------ -----",
                "Issues 3",
                "Points 8",
                "Not pointed 1",
                "------ -----",
            ]
        );
    }

    #[test]
    fn test_table_without_story_points() {
        let output = rendered(&issues(), Format::Table, &StoryPoints::default());
        assert_eq!(
            cells(&output),
            ["Metric Count", "------ -----", "Issues 3", "------ -----"]
        );
    }

    #[test]
    fn test_table_columns_are_aligned() {
        let output = rendered(
            &issues(),
            Format::Table,
            &StoryPoints::new(Some("storypoints")),
        );
        let header = output.lines().next().unwrap();
        let column = header.find("Count").unwrap();
        assert!(column > "Not pointed".len());
        for line in output.lines() {
            assert!(!line.ends_with(' '));
            assert!(line[..column].ends_with(' '));
            assert!(!line[column..].starts_with(' '));
        }
    }

    #[test]
    fn test_table_empty_result() {
        let output = rendered(&[], Format::Table, &StoryPoints::new(Some("storypoints")));
        assert_eq!(
            cells(&output),
            [
                "Metric Count",
                "------ -----",
                "Issues 0",
                "Points 0",
                "Not pointed 0",
                "------ -----",
            ]
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let story_points = StoryPoints::new(Some("storypoints"));
        for format in [Format::List, Format::Table] {
            let first = rendered(&issues(), format, &story_points);
            let second = rendered(&issues(), format, &story_points);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_bad_points_write_nothing() {
        let mut bad = issues();
        bad.push(Issue::new("KEY-4", "Fourth").with_field("storypoints", json!("lots")));

        let mut out = Vec::new();
        let result = render(
            &bad,
            Format::List,
            &StoryPoints::new(Some("storypoints")),
            &mut out,
        );
        assert!(matches!(
            result,
            Err(SearchError::NonNumericStoryPoints { ref key, .. }) if key == "KEY-4"
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_huge_point_totals_saturate() {
        let huge = vec![
            Issue::new("KEY-1", "a").with_field("storypoints", json!(1e19)),
            Issue::new("KEY-2", "b").with_field("storypoints", json!(1e19)),
        ];
        let story_points = StoryPoints::new(Some("storypoints"));

        let rows = project(&huge, &story_points).unwrap();
        assert_eq!(RenderSummary::from_rows(&rows).total_points, i64::MAX);

        let output = rendered(&huge, Format::Table, &story_points);
        assert!(cells(&output).contains(&format!("Points {}", i64::MAX)));
    }

    #[test]
    fn test_summary_fold() {
        let rows = [
            IssueRow { key: "A-1", summary: "a", points: Some(2) },
            IssueRow { key: "A-2", summary: "b", points: None },
            IssueRow { key: "A-3", summary: "c", points: Some(13) },
        ];
        assert_eq!(
            RenderSummary::from_rows(&rows),
            RenderSummary {
                issue_count: 3,
                total_points: 15,
                unestimated_count: 1,
            }
        );
    }
}
