//! Record merging.
//!
//! Upstreams often report one row per (package, architecture) or per
//! (package, release). [`aggregate`] folds those rows into one entry per
//! [`DedupKey`], keeping first-occurrence order.

use crate::model::PackageRecord;
use std::collections::HashMap;

/// Identity of a logical entry within one result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Release { release: String, name: String },
    SourceLabel(String),
    Section { section: String, name: String },
    NameVersion { name: String, version: String },
}

/// Which fields of a record form its [`DedupKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Tabular multi-release listings.
    ReleaseName,
    /// Tabular listings searched by source package: `"<release>: <name>"`.
    SourceLabel,
    /// Single-page and table listings.
    SectionName,
    /// JSON search listings.
    NameVersion,
}

impl KeyStrategy {
    pub fn key_for(&self, record: &PackageRecord) -> DedupKey {
        let release = record.release.clone().unwrap_or_default();
        match self {
            Self::ReleaseName => DedupKey::Release {
                release,
                name: record.name.clone(),
            },
            Self::SourceLabel => DedupKey::SourceLabel(format!("{}: {}", release, record.name)),
            Self::SectionName => DedupKey::Section {
                section: record.section.clone().unwrap_or_default(),
                name: record.name.clone(),
            },
            Self::NameVersion => DedupKey::NameVersion {
                name: record.name.clone(),
                version: record.version.clone(),
            },
        }
    }
}

/// Merges records sharing a key, then optionally reverses the merged order.
///
/// Architecture sets are unioned in first-seen order; for every other field
/// the first non-empty value wins.
pub fn aggregate<I>(records: I, strategy: KeyStrategy, reverse: bool) -> Vec<PackageRecord>
where
    I: IntoIterator<Item = PackageRecord>,
{
    let mut merged: Vec<PackageRecord> = Vec::new();
    let mut index: HashMap<DedupKey, usize> = HashMap::new();

    for record in records {
        let key = strategy.key_for(&record);
        match index.get(&key) {
            Some(&slot) => merge_into(&mut merged[slot], record),
            None => {
                index.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    if reverse {
        merged.reverse();
    }
    merged
}

fn merge_into(target: &mut PackageRecord, other: PackageRecord) {
    target.archs.union(&other.archs);

    if target.version.is_empty() {
        target.version = other.version;
    }
    if target.release.is_none() {
        target.release = other.release;
    }
    if target.section.is_none() {
        target.section = other.section;
    }
    if target.description.is_none() {
        target.description = other.description;
    }
    for (key, value) in other.extra {
        target.extra.entry(key).or_insert(value);
    }
}
