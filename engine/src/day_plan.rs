//! Today's 1-3-3 plan: one deep-work item, up to three quick wins, up to three
//! maintenance tasks, everything else deferred.

use crate::compliance::{Buckets, MAX_MAINTENANCE, MAX_QUICK_WINS};
use crate::item::WorkItem;
use crate::labels::priority_weight;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedItem {
    pub number: u64,
    pub title: String,
}

impl From<&WorkItem> for PlannedItem {
    fn from(item: &WorkItem) -> Self {
        Self {
            number: item.number,
            title: item.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub deep_work: Option<PlannedItem>,
    pub quick_wins: Vec<PlannedItem>,
    pub maintenance: Vec<PlannedItem>,
    pub deferred: Vec<PlannedItem>,
}

impl DayPlan {
    /// Always true for plans from [`build_day_plan`]; kept for plans built by hand.
    pub fn is_compliant(&self) -> bool {
        self.quick_wins.len() <= MAX_QUICK_WINS && self.maintenance.len() <= MAX_MAINTENANCE
    }

    pub fn active_count(&self) -> usize {
        usize::from(self.deep_work.is_some()) + self.quick_wins.len() + self.maintenance.len()
    }
}

/// Fill the 1-3-3 slots from `user`'s open items. Within a bucket, higher
/// priority wins, then the most recently updated, then the lower number.
pub fn build_day_plan(items: &[WorkItem], user: &str) -> DayPlan {
    let buckets = Buckets::collect(items, user);

    let mut deep = sorted(&buckets.deep_work);
    let mut quick = sorted(&buckets.quick_wins);
    let mut maint = sorted(&buckets.maintenance);

    let mut deferred = Vec::new();
    let deep_work = if deep.is_empty() {
        None
    } else {
        let first = deep.remove(0);
        deferred.append(&mut deep);
        Some(first)
    };
    deferred.extend(quick.split_off(quick.len().min(MAX_QUICK_WINS)));
    deferred.extend(maint.split_off(maint.len().min(MAX_MAINTENANCE)));
    deferred.extend(sorted(&buckets.deferred));

    DayPlan {
        deep_work: deep_work.map(PlannedItem::from),
        quick_wins: quick.into_iter().map(PlannedItem::from).collect(),
        maintenance: maint.into_iter().map(PlannedItem::from).collect(),
        deferred: deferred.into_iter().map(PlannedItem::from).collect(),
    }
}

fn sorted<'a>(bucket: &[&'a WorkItem]) -> Vec<&'a WorkItem> {
    let mut items = bucket.to_vec();
    items.sort_by_key(|item| (priority_weight(item), Reverse(item.updated_at), item.number));
    items
}
