use crate::lookup::aggregate::{aggregate, KeyStrategy};
use crate::lookup::formats::expect_format;
use crate::model::{EntryStyle, PackageQuery, PackageRecord, RawFormat, RawResponse, ResultSet};
use crate::traits::LookupError;
use serde::Deserialize;
use serde_json::Value;

/// Results carried per search; `resultcount` still reports the full total.
pub const AUR_RESULT_CAP: usize = 150;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    resultcount: usize,
    #[serde(default)]
    results: Value,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AurPackage {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "ID", default)]
    id: Option<u64>,
    #[serde(rename = "NumVotes", default)]
    num_votes: Option<u64>,
}

/// Parse AUR RPC `type=search` output.
pub fn parse(raw: &RawResponse, query: &PackageQuery) -> Result<ResultSet, LookupError> {
    expect_format(raw, RawFormat::Json)?;

    let response: RpcResponse = serde_json::from_slice(&raw.body)
        .map_err(|e| LookupError::parse(RawFormat::Json, e.to_string()))?;

    if response.kind == "error" {
        // Older RPC versions put the message in `results`
        let message = response
            .error
            .or_else(|| response.results.as_str().map(String::from))
            .unwrap_or_else(|| "The AUR reported an error.".to_string());
        return Err(LookupError::NotFound(message));
    }

    let packages: Vec<AurPackage> = serde_json::from_value(response.results)
        .map_err(|e| LookupError::parse(RawFormat::Json, e.to_string()))?;
    if response.resultcount == 0 || packages.is_empty() {
        return Err(LookupError::not_found());
    }

    let records = packages.into_iter().take(AUR_RESULT_CAP).map(|pkg| {
        let mut record =
            PackageRecord::new(pkg.name, pkg.version).with_description(pkg.description);
        if let Some(id) = pkg.id {
            record = record.with_extra("ID", id.to_string());
        }
        if let Some(votes) = pkg.num_votes {
            record = record.with_extra("Votes", votes.to_string());
        }
        record
    });
    let merged = aggregate(records, KeyStrategy::NameVersion, query.reverse);

    Ok(ResultSet::packages(EntryStyle::Aur, merged).with_total(response.resultcount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QueryKind;

    fn query() -> PackageQuery {
        PackageQuery::new(QueryKind::Aur, "yay")
    }

    #[test]
    fn test_parse_search_results() {
        let output = r#"{
            "version": 5, "type": "search", "resultcount": 2,
            "results": [
                {"ID": 1126284, "Name": "yay", "Version": "12.3.5-1",
                 "Description": "Yet another yogurt", "NumVotes": 2120},
                {"ID": 1126290, "Name": "yay-bin", "Version": "12.3.5-1",
                 "Description": null, "NumVotes": 580}
            ]
        }"#;
        let raw = RawResponse::new(RawFormat::Json, output);

        let set = parse(&raw, &query()).expect("parse aur json");

        assert_eq!(set.total_count, 2);
        let yay = &set.records()[0];
        assert_eq!(yay.extra["ID"], "1126284");
        assert_eq!(yay.extra["Votes"], "2120");
        assert_eq!(set.records()[1].description, None);
    }

    #[test]
    fn test_results_capped_but_total_kept() {
        let results: Vec<String> = (0..200)
            .map(|i| format!(r#"{{"ID": {i}, "Name": "pkg{i}", "Version": "1.0-1"}}"#))
            .collect();
        let output = format!(
            r#"{{"type": "search", "resultcount": 200, "results": [{}]}}"#,
            results.join(",")
        );
        let raw = RawResponse::new(RawFormat::Json, output);

        let set = parse(&raw, &query()).expect("parse aur json");

        assert_eq!(set.len(), AUR_RESULT_CAP);
        assert_eq!(set.total_count, 200);
    }

    #[test]
    fn test_error_type_reports_message() {
        let current = r#"{"type": "error", "resultcount": 0, "results": [], "error": "Too many package results."}"#;
        let err = parse(&RawResponse::new(RawFormat::Json, current), &query()).unwrap_err();
        assert_eq!(err.to_string(), "Too many package results.");

        let legacy = r#"{"type": "error", "resultcount": 0, "results": "Query arg too small"}"#;
        let err = parse(&RawResponse::new(RawFormat::Json, legacy), &query()).unwrap_err();
        assert_eq!(err.to_string(), "Query arg too small");
    }

    #[test]
    fn test_no_results() {
        let output = r#"{"type": "search", "resultcount": 0, "results": []}"#;
        let err = parse(&RawResponse::new(RawFormat::Json, output), &query()).unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }
}
