use crate::lookup::aggregate::{aggregate, KeyStrategy};
use crate::lookup::formats::expect_format;
use crate::model::{EntryStyle, PackageQuery, PackageRecord, RawFormat, RawResponse, ResultSet};
use crate::traits::LookupError;

/// Pseudo-architectures always added to the requested filter, so that
/// architecture-independent and source-only packages are not reported missing.
pub const IMPLIED_ARCHS: &[&str] = &["all", "source"];

/// Parse madison text output (`madison.php?text=on`).
///
/// Each line reads `name | version | release | arch, arch, ...`. Rows for the
/// same release are merged into one entry.
pub fn parse(raw: &RawResponse, query: &PackageQuery) -> Result<ResultSet, LookupError> {
    expect_format(raw, RawFormat::Tabular)?;

    let mut records = Vec::new();
    for (index, line) in raw.text().lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        let [name, version, release, archs] = fields.as_slice() else {
            return Err(LookupError::parse(
                RawFormat::Tabular,
                format!(
                    "line {}: expected 4 '|'-separated fields, found {}",
                    index + 1,
                    fields.len()
                ),
            ));
        };

        records.push(
            PackageRecord::new(*name, *version)
                .with_release(*release)
                .with_archs(archs.split(',').map(str::trim)),
        );
    }

    if records.is_empty() {
        return Err(LookupError::not_found());
    }

    let strategy = if query.use_source {
        KeyStrategy::SourceLabel
    } else {
        KeyStrategy::ReleaseName
    };
    let merged = aggregate(records, strategy, query.reverse);

    Ok(ResultSet::packages(
        EntryStyle::Versions {
            by_source: query.use_source,
        },
        merged,
    ))
}

/// Comma-joined architecture filter: configured archs plus [`IMPLIED_ARCHS`].
pub fn arch_filter(configured: &[String]) -> String {
    let mut archs: Vec<&str> = Vec::new();
    for arch in configured
        .iter()
        .map(String::as_str)
        .chain(IMPLIED_ARCHS.iter().copied())
    {
        if !arch.is_empty() && !archs.contains(&arch) {
            archs.push(arch);
        }
    }
    archs.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QueryKind;

    const CURL: &str = "\
 curl       | 7.26.0-1+wheezy25 | wheezy   | amd64, armel, i386
 curl       | 7.38.0-4+deb8u16  | jessie   | amd64, i386
 curl       | 7.52.1-5+deb9u9   | stretch  | amd64, arm64, i386
";

    fn query() -> PackageQuery {
        PackageQuery::new(QueryKind::Versions, "curl")
    }

    fn releases(set: &ResultSet) -> Vec<&str> {
        set.records()
            .iter()
            .map(|r| r.release.as_deref().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_parse_release_rows() {
        let raw = RawResponse::new(RawFormat::Tabular, CURL);

        let set = parse(&raw, &query()).expect("parse madison");

        assert_eq!(set.total_count, 3);
        assert_eq!(releases(&set), vec!["wheezy", "jessie", "stretch"]);
        assert_eq!(set.records()[0].version, "7.26.0-1+wheezy25");
        assert_eq!(set.records()[0].archs.join(","), "amd64,armel,i386");
    }

    #[test]
    fn test_reverse_flag() {
        let raw = RawResponse::new(RawFormat::Tabular, CURL);

        let set = parse(&raw, &query().reversed(true)).expect("parse madison");

        assert_eq!(releases(&set), vec!["stretch", "jessie", "wheezy"]);
    }

    #[test]
    fn test_rows_in_same_release_merge() {
        let output = "\
 curl | 7.38.0-4+deb8u16 | jessie | amd64
 curl | 7.38.0-4+deb8u16 | jessie | i386, amd64
 curl | 7.38.0-4+deb8u11 | jessie-security | source
";
        let raw = RawResponse::new(RawFormat::Tabular, output);

        let set = parse(&raw, &query()).expect("parse madison");

        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].archs.join(","), "amd64,i386");
        assert_eq!(set.records()[1].release.as_deref(), Some("jessie-security"));
    }

    #[test]
    fn test_source_search_keeps_binary_names_apart() {
        let output = "\
 glibc      | 2.19-18+deb8u10 | jessie | source
 libc6      | 2.19-18+deb8u10 | jessie | amd64, i386
 libc6-dev  | 2.19-18+deb8u10 | jessie | amd64, i386
";
        let raw = RawResponse::new(RawFormat::Tabular, output);

        let set = parse(&raw, &query().with_source(true)).expect("parse madison");

        assert_eq!(set.len(), 3);
        match set.entries {
            crate::model::Entries::Packages { style, .. } => {
                assert_eq!(style, EntryStyle::Versions { by_source: true })
            }
            _ => panic!("expected package entries"),
        }
    }

    #[test]
    fn test_empty_output_is_not_found() {
        let raw = RawResponse::new(RawFormat::Tabular, "\n  \n");

        let err = parse(&raw, &query()).unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[test]
    fn test_malformed_line_is_parse_error() {
        let raw = RawResponse::new(RawFormat::Tabular, "curl | 7.38.0-4 | jessie\n");

        let err = parse(&raw, &query()).unwrap_err();
        assert!(matches!(err, LookupError::Parse { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_wrong_format_tag() {
        let raw = RawResponse::new(RawFormat::Json, CURL);
        assert!(matches!(
            parse(&raw, &query()),
            Err(LookupError::Parse { .. })
        ));
    }

    #[test]
    fn test_arch_filter() {
        let configured = vec!["amd64".to_string(), "i386".to_string(), "all".to_string()];
        assert_eq!(arch_filter(&configured), "amd64,i386,all,source");
        assert_eq!(arch_filter(&[]), "all,source");
    }
}
