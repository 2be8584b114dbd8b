//! External mutations proposed by a plan.
//!
//! The engine never touches the item store. It hands an ordered list of
//! mutations to an executor, which applies them one by one with no atomicity
//! across the list.

use crate::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mutation {
    AddLabels {
        #[serde(rename = "itemNumber")]
        item_number: u64,
        labels: Vec<String>,
    },
    RemoveLabels {
        #[serde(rename = "itemNumber")]
        item_number: u64,
        labels: Vec<String>,
    },
    Comment {
        #[serde(rename = "itemNumber")]
        item_number: u64,
        body: String,
    },
}

impl Mutation {
    pub fn add_labels(item_number: u64, labels: &[&str]) -> Self {
        Self::AddLabels {
            item_number,
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    pub fn remove_labels(item_number: u64, labels: &[&str]) -> Self {
        Self::RemoveLabels {
            item_number,
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    pub fn comment(item_number: u64, body: impl Into<String>) -> Self {
        Self::Comment {
            item_number,
            body: body.into(),
        }
    }

    pub fn item_number(&self) -> u64 {
        match self {
            Self::AddLabels { item_number, .. }
            | Self::RemoveLabels { item_number, .. }
            | Self::Comment { item_number, .. } => *item_number,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddLabels { .. } => "AddLabels",
            Self::RemoveLabels { .. } => "RemoveLabels",
            Self::Comment { .. } => "Comment",
        }
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddLabels {
                item_number,
                labels,
            } => write!(f, "#{item_number} +labels {}", labels.join(", ")),
            Self::RemoveLabels {
                item_number,
                labels,
            } => write!(f, "#{item_number} -labels {}", labels.join(", ")),
            Self::Comment { item_number, body } => write!(f, "#{item_number} comment: {body}"),
        }
    }
}

/// Ordered mutations for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPlan {
    pub repo: String,
    pub actions: Vec<Mutation>,
    #[serde(default = "crate::schema_version")]
    pub schema_version: u32,
}

impl MutationPlan {
    pub fn new(repo: impl Into<String>, actions: Vec<Mutation>) -> Self {
        Self {
            repo: repo.into(),
            actions,
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Nothing to execute (dry runs, not-synced repositories).
    pub fn empty(repo: impl Into<String>) -> Self {
        Self::new(repo, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
