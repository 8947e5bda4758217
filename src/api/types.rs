//! Mojira search API request and response types.
//!
//! These types model the `POST /api/jql-search-post` endpoint used by the
//! public Mojira tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of a search request.
///
/// Field names follow the endpoint's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JqlSearchRequest {
    /// Project id (e.g. "MC").
    pub project: String,
    /// Filter id (e.g. "all").
    pub filter: String,
    /// Sort field id (e.g. "created").
    pub sort_field: String,
    /// Ascending sort when true.
    pub sort_asc: bool,
    /// Treat `search` as raw JQL instead of free text.
    pub advanced: bool,
    /// Free-text (or JQL) search string.
    pub search: String,
    /// Zero-based offset of the first issue.
    pub start_at: u32,
    /// Maximum number of issues to return.
    pub max_results: u32,
    /// Always false for the public tracker.
    pub is_forge: bool,
    /// Always empty for the public tracker.
    pub workspace_id: String,
}

/// Response of a search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The matching issues, in server order.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Total number of matching issues, when reported.
    #[serde(default)]
    pub total: Option<u32>,
    /// Offset echoed back by the server, when reported.
    #[serde(default)]
    pub start_at: Option<u32>,
    /// Page size echoed back by the server, when reported.
    #[serde(default)]
    pub max_results: Option<u32>,
}

/// A tracker issue.
///
/// Issues are read-only snapshots; nothing in this crate mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// The issue key (e.g. "MC-4").
    pub key: String,
    /// The issue fields.
    pub fields: IssueFields,
}

impl Issue {
    /// Get the issue summary.
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// Look up one of the opaque fields by name.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.other.get(name)
    }

    /// Get the status name, if the server included one.
    pub fn status(&self) -> Option<&str> {
        self.field("status")
            .and_then(|s| s.get("name"))
            .and_then(|n| n.as_str())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.fields.summary)
    }
}

/// Issue fields.
///
/// Only the summary is interpreted; everything else is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue summary/title.
    #[serde(default)]
    pub summary: String,
    /// All remaining fields.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = JqlSearchRequest {
            project: "MC".to_string(),
            filter: "all".to_string(),
            sort_field: "created".to_string(),
            sort_asc: false,
            advanced: false,
            search: String::new(),
            start_at: 25,
            max_results: 25,
            is_forge: false,
            workspace_id: String::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sortField"], "created");
        assert_eq!(json["sortAsc"], false);
        assert_eq!(json["startAt"], 25);
        assert_eq!(json["maxResults"], 25);
        assert_eq!(json["isForge"], false);
        assert_eq!(json["workspaceId"], "");
    }

    #[test]
    fn test_response_keeps_opaque_fields() {
        let json = r#"{
            "issues": [
                {
                    "key": "MC-4",
                    "fields": {
                        "summary": "Item drops sometimes appear at the wrong location",
                        "status": { "name": "Resolved" },
                        "votes": 12
                    }
                }
            ],
            "total": 1
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total, Some(1));
        assert_eq!(response.issues.len(), 1);

        let issue = &response.issues[0];
        assert_eq!(issue.key, "MC-4");
        assert!(issue.summary().starts_with("Item drops"));
        assert_eq!(issue.status(), Some("Resolved"));
        assert_eq!(issue.field("votes"), Some(&serde_json::json!(12)));
    }

    #[test]
    fn test_response_without_issues() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.issues.is_empty());
        assert!(response.total.is_none());
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue {
            key: "MCPE-1".to_string(),
            fields: IssueFields {
                summary: "Crash on start".to_string(),
                ..Default::default()
            },
        };
        assert_eq!(issue.to_string(), "MCPE-1: Crash on start");
        assert!(issue.status().is_none());
    }
}
