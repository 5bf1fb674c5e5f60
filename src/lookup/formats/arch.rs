use crate::lookup::aggregate::{aggregate, KeyStrategy};
use crate::lookup::formats::expect_format;
use crate::model::{EntryStyle, PackageQuery, PackageRecord, RawFormat, RawResponse, ResultSet};
use crate::traits::LookupError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    valid: bool,
    #[serde(default)]
    results: Vec<ArchPackage>,
}

#[derive(Debug, Deserialize)]
struct ArchPackage {
    pkgname: String,
    pkgver: String,
    #[serde(default)]
    pkgdesc: Option<String>,
    arch: String,
    #[serde(default)]
    repo: Option<String>,
}

/// Parse archlinux.org `packages/search/json` output.
///
/// The API returns one result per (package, architecture); results that only
/// differ in architecture are merged and their architectures collected.
pub fn parse(raw: &RawResponse, query: &PackageQuery) -> Result<ResultSet, LookupError> {
    expect_format(raw, RawFormat::Json)?;

    let response: SearchResponse = serde_json::from_slice(&raw.body)
        .map_err(|e| LookupError::parse(RawFormat::Json, e.to_string()))?;
    if !response.valid || response.results.is_empty() {
        return Err(LookupError::not_found());
    }

    let records = response.results.into_iter().map(|pkg| {
        let record = PackageRecord::new(pkg.pkgname, pkg.pkgver)
            .with_description(pkg.pkgdesc)
            .with_archs([pkg.arch]);
        match pkg.repo {
            Some(repo) => record.with_section(repo),
            None => record,
        }
    });
    let merged = aggregate(records, KeyStrategy::NameVersion, query.reverse);

    Ok(ResultSet::packages(EntryStyle::ArchRepo, merged))
}
