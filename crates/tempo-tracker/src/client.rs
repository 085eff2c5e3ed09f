//! Paginated issue fetch against a Jira-compatible REST API.
//!
//! The client pulls `/rest/api/2/search` pages with `expand=changelog` and
//! flattens each wire issue into the analyzer's [`Issue`] model. Pagination
//! is throttled and capped so a typo'd JQL query cannot turn into an
//! unbounded crawl of a large instance.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tempo_core::{Period, Result, TempoError, TrackerConfig};

use crate::model::{Issue, StatusTransition};

/// HTTP client for a Jira-compatible issue tracker.
///
/// # Examples
///
/// ```no_run
/// use tempo_core::TrackerConfig;
/// use tempo_tracker::client::TrackerClient;
///
/// # async fn run() -> tempo_core::Result<()> {
/// let config = TrackerConfig {
///     base_url: Some("https://example.atlassian.net".to_string()),
///     email: Some("dev@example.com".to_string()),
///     api_token: Some("token".to_string()),
///     ..TrackerConfig::default()
/// };
/// let client = TrackerClient::from_config(&config)?;
/// let issues = client.fetch_issues("project = ENG ORDER BY created DESC").await?;
/// println!("{} issues", issues.len());
/// # Ok(())
/// # }
/// ```
pub struct TrackerClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
    page_size: usize,
    page_delay: Duration,
    max_pages: usize,
}

impl TrackerClient {
    /// Builds a client from `[tracker]` config.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Config`] when `base_url`, `email`, or
    /// `api_token` is missing.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| TempoError::Config("tracker base_url is not set".to_string()))?;
        let email = config
            .email
            .clone()
            .ok_or_else(|| TempoError::Config("tracker email is not set".to_string()))?;
        let api_token = config
            .api_token
            .clone()
            .ok_or_else(|| TempoError::Config("tracker api_token is not set".to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            api_token,
            page_size: config.page_size,
            page_delay: Duration::from_millis(config.page_delay_ms),
            max_pages: config.max_pages,
        })
    }

    /// Fetches every issue matching `jql`, paging until the tracker reports
    /// the result set exhausted or the page cap is hit.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Tracker`] on transport failures, non-success
    /// responses, undecodable pages, or unparseable timestamps. Any failing
    /// page aborts the whole fetch; partial results are never returned.
    pub async fn fetch_issues(&self, jql: &str) -> Result<Vec<Issue>> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let mut issues = Vec::new();
        let mut start_at = 0usize;

        for page in 0..self.max_pages {
            if page > 0 {
                tokio::time::sleep(self.page_delay).await;
            }

            let query = [
                ("jql", jql.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", self.page_size.to_string()),
                ("expand", "changelog".to_string()),
            ];
            let response = self
                .http
                .get(&url)
                .query(&query)
                .basic_auth(&self.email, Some(&self.api_token))
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| TempoError::Tracker(format!("search request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TempoError::Tracker(format!(
                    "search returned {status}: {body}"
                )));
            }

            let page_data: SearchPage = response
                .json()
                .await
                .map_err(|e| TempoError::Tracker(format!("failed to decode search response: {e}")))?;

            let fetched = page_data.issues.len();
            for wire in page_data.issues {
                issues.push(into_issue(wire)?);
            }

            start_at += fetched;
            if fetched == 0 || fetched < self.page_size || start_at >= page_data.total {
                break;
            }
        }

        Ok(issues)
    }
}

/// Builds the JQL query the subcommands use: project scope plus creation
/// bounds, newest first.
///
/// # Examples
///
/// ```
/// use tempo_core::Period;
/// use tempo_tracker::client::build_jql;
///
/// let jql = build_jql(Some("ENG"), &Period::open());
/// assert_eq!(jql, "project = \"ENG\" ORDER BY created DESC");
/// ```
#[must_use]
pub fn build_jql(project: Option<&str>, period: &Period) -> String {
    let mut clauses = Vec::new();
    if let Some(project) = project {
        clauses.push(format!("project = \"{project}\""));
    }
    if let Some(from) = period.from {
        clauses.push(format!("created >= \"{}\"", from.format("%Y-%m-%d")));
    }
    if let Some(to) = period.to {
        clauses.push(format!("created <= \"{}\"", to.format("%Y-%m-%d")));
    }

    if clauses.is_empty() {
        "ORDER BY created DESC".to_string()
    } else {
        format!("{} ORDER BY created DESC", clauses.join(" AND "))
    }
}

// Wire shapes for the slice of the search response the analyzers care
// about. Everything else in the payload is ignored.

#[derive(Debug, Deserialize)]
struct SearchPage {
    total: usize,
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    key: String,
    fields: WireFields,
    changelog: Option<WireChangelog>,
}

#[derive(Debug, Deserialize)]
struct WireFields {
    summary: Option<String>,
    #[serde(rename = "issuetype")]
    issue_type: Option<WireNamed>,
    status: Option<WireNamed>,
    assignee: Option<WireUser>,
    priority: Option<WireNamed>,
    created: String,
    #[serde(rename = "resolutiondate")]
    resolution_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChangelog {
    histories: Vec<WireHistory>,
}

#[derive(Debug, Deserialize)]
struct WireHistory {
    created: String,
    items: Vec<WireHistoryItem>,
}

#[derive(Debug, Deserialize)]
struct WireHistoryItem {
    field: String,
    #[serde(rename = "toString")]
    to_value: Option<String>,
    #[serde(rename = "fromString")]
    from_value: Option<String>,
}

/// Jira emits `+0000`-style offsets, which RFC 3339 parsing rejects, so try
/// both forms.
fn parse_tracker_time(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3f%z"))
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TempoError::Tracker(format!("invalid timestamp '{s}': {e}")))
}

fn into_issue(wire: WireIssue) -> Result<Issue> {
    let fields = wire.fields;

    let mut transitions = Vec::new();
    if let Some(changelog) = wire.changelog {
        for history in changelog.histories {
            let at = parse_tracker_time(&history.created)?;
            for item in history.items {
                if item.field.eq_ignore_ascii_case("status") {
                    transitions.push(StatusTransition {
                        at,
                        from_status: item.from_value.unwrap_or_default(),
                        to_status: item.to_value.unwrap_or_default(),
                    });
                }
            }
        }
    }
    transitions.sort_by_key(|t| t.at);

    Ok(Issue {
        key: wire.key,
        summary: fields.summary.unwrap_or_default(),
        issue_type: fields
            .issue_type
            .map(|t| t.name)
            .unwrap_or_else(|| "Task".to_string()),
        status: fields.status.map(|s| s.name).unwrap_or_default(),
        assignee: fields
            .assignee
            .and_then(|u| u.display_name.or(u.email_address)),
        priority: fields.priority.map(|p| p.name),
        created: parse_tracker_time(&fields.created)?,
        resolved: fields
            .resolution_date
            .as_deref()
            .map(parse_tracker_time)
            .transpose()?,
        transitions,
    })
}
