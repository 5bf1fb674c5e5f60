//! Dependency relation grouping.
//!
//! Package pages list relations as a flat run of entries, where an entry
//! starting with "or" is an alternative to the entry before it. The page
//! adapter flattens the markup into [`RelationEntry`] values; grouping here
//! is a single forward scan with no markup access.

use crate::model::{DependencyGroup, RelationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEntry {
    /// Package name the entry links to.
    pub label: String,
    /// Relation keyword as printed on the page (`dep:`, `rec:`, ...).
    pub keyword: String,
    /// Entry text began with the "or" marker.
    pub continuation: bool,
}

impl RelationEntry {
    pub fn new(label: impl Into<String>, keyword: impl Into<String>, continuation: bool) -> Self {
        Self {
            label: label.into(),
            keyword: keyword.into(),
            continuation,
        }
    }
}

/// Groups entries of `kind` into OR-alternatives, in page order.
pub fn group_relations(entries: &[RelationEntry], kind: RelationKind) -> Vec<DependencyGroup> {
    let mut groups: Vec<DependencyGroup> = Vec::new();
    let mut previous_matched = false;

    for entry in entries {
        if entry.label.is_empty() || !kind.matches(&entry.keyword) {
            previous_matched = false;
            continue;
        }

        match groups.last_mut() {
            Some(group) if entry.continuation && previous_matched => group.push(&entry.label),
            _ => groups.push(DependencyGroup::new(&entry.label)),
        }
        previous_matched = true;
    }

    groups
}
