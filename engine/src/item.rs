//! Work item model (read-only input to the engine).
//!
//! Items deserialize from GitHub-style JSON: camelCase timestamps, labels as
//! `[{ "name": .. }]`, assignees as `[{ "login": .. }]`. Label and assignee
//! matching is case-insensitive everywhere.

use crate::errors::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open/closed state. Accepts both REST (`open`) and GraphQL (`OPEN`) casing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    #[serde(alias = "OPEN", alias = "Open")]
    Open,
    #[serde(alias = "CLOSED", alias = "Closed")]
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Assignee {
    pub login: String,
}

/// A single work item as handed over by the item store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: ItemState,
}

impl WorkItem {
    /// Open item with no body, labels, assignees, or timestamps.
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            body: None,
            labels: Vec::new(),
            assignees: Vec::new(),
            created_at: None,
            updated_at: None,
            state: ItemState::Open,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|name| Label { name: name.into() }));
        self
    }

    pub fn with_assignee(mut self, login: impl Into<String>) -> Self {
        self.assignees.push(Assignee {
            login: login.into(),
        });
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    pub fn is_open(&self) -> bool {
        self.state == ItemState::Open
    }

    /// Case-insensitive exact label match.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// True if any of `names` is present (case-insensitive).
    pub fn has_any_label(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_label(name))
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.name.as_str())
    }

    /// Body text with surrounding whitespace removed, `None` when blank.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .map(str::trim)
            .filter(|body| !body.is_empty())
    }

    pub fn has_body(&self) -> bool {
        self.body_text().is_some()
    }

    pub fn has_assignees(&self) -> bool {
        !self.assignees.is_empty()
    }

    pub fn is_assigned_to(&self, user: &str) -> bool {
        self.assignees
            .iter()
            .any(|a| a.login.eq_ignore_ascii_case(user))
    }

    /// Lacks enough information to act on: blank body or nobody assigned.
    pub fn is_mystery_meat(&self) -> bool {
        !self.has_body() || !self.has_assignees()
    }
}

/// Open items assigned to `user`, in input order.
pub fn open_assigned<'a>(
    items: &'a [WorkItem],
    user: &'a str,
) -> impl Iterator<Item = &'a WorkItem> + 'a {
    items
        .iter()
        .filter(move |item| item.is_open() && item.is_assigned_to(user))
}

/// Read-only snapshot of one repository's items, captured for a single request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub items: Vec<WorkItem>,
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotRepr {
    Items(Vec<WorkItem>),
    Snapshot(ItemSnapshot),
}

impl ItemSnapshot {
    pub fn new(repo: impl Into<String>, items: Vec<WorkItem>) -> Self {
        Self {
            repo: repo.into(),
            items,
            fetched_at: None,
        }
    }

    /// Decode either a bare JSON array of items or a snapshot object.
    pub fn from_json(json: &str) -> Result<Self> {
        let repr: SnapshotRepr = serde_json::from_str(json).map_err(|e| {
            EngineError::snapshot_with_source("failed to decode item snapshot", e)
        })?;

        Ok(match repr {
            SnapshotRepr::Items(items) => Self::new("", items),
            SnapshotRepr::Snapshot(snapshot) => snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_github_shaped_json() {
        let json = r#"[{
            "number": 42,
            "title": "Fix login",
            "body": "  ",
            "labels": [{"name": "Bug"}, {"name": "urgent"}],
            "assignees": [{"login": "OctoCat"}],
            "createdAt": "2026-01-28T09:00:00Z",
            "updatedAt": "2026-01-30T18:30:00Z",
            "state": "OPEN"
        }]"#;

        let snapshot = ItemSnapshot::from_json(json).expect("decode");
        assert_eq!(snapshot.repo, "");
        let item = &snapshot.items[0];
        assert_eq!(item.number, 42);
        assert!(item.is_open());
        assert!(item.has_label("bug"));
        assert!(item.is_assigned_to("octocat"));
        assert!(!item.has_body());
        assert!(item.is_mystery_meat());
    }

    #[test]
    fn decodes_snapshot_object_with_defaults() {
        let json = r#"{"repo": "acme/widgets", "items": [{"number": 1, "state": "closed"}]}"#;
        let snapshot = ItemSnapshot::from_json(json).expect("decode");
        assert_eq!(snapshot.repo, "acme/widgets");
        assert_eq!(snapshot.items[0].state, ItemState::Closed);
        assert!(snapshot.items[0].labels.is_empty());
        assert!(snapshot.fetched_at.is_none());
    }

    #[test]
    fn malformed_json_is_a_snapshot_error() {
        let err = ItemSnapshot::from_json("{not json").unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::SnapshotError);
    }

    #[test]
    fn open_assigned_skips_closed_and_others() {
        let items = vec![
            WorkItem::new(1, "mine").with_assignee("alice"),
            WorkItem::new(2, "closed")
                .with_assignee("alice")
                .with_state(ItemState::Closed),
            WorkItem::new(3, "theirs").with_assignee("bob"),
            WorkItem::new(4, "mine too").with_assignee("ALICE"),
        ];
        let numbers: Vec<u64> = open_assigned(&items, "alice").map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 4]);
    }
}
