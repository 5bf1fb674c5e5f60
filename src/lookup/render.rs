//! Summary formatting.
//!
//! Turns a [`ResultSet`] into a single line of text. At most `max_results`
//! entries are listed, but the reported count is always the set's
//! `total_count`.

use crate::model::{DependencyGroup, Entries, EntryStyle, PackageRecord, ResultSet};

/// Formats `result` as a one-line summary.
pub fn format(result: &ResultSet, max_results: usize, verbose: bool) -> String {
    let body = match &result.entries {
        Entries::Dependencies {
            package,
            relation,
            groups,
        } => {
            let items: Vec<String> = groups.iter().take(max_results).map(render_group).collect();
            if items.len() < result.total_count {
                format!(
                    "Package {} {} ({}): {}",
                    package,
                    relation.label(),
                    result.total_count,
                    and_join(&items)
                )
            } else {
                format!("Package {} {}: {}", package, relation.label(), and_join(&items))
            }
        }
        Entries::Packages {
            style: EntryStyle::PackageDetail,
            records,
        } if records.len() == 1 => render_detail(&records[0], verbose),
        Entries::Packages { style, records } => {
            let items: Vec<String> = records
                .iter()
                .take(max_results)
                .map(|record| render_record(*style, record, verbose))
                .collect();
            format!(
                "Found {}: {}",
                count_noun(result.total_count, "result"),
                and_join(&items)
            )
        }
    };

    match &result.view_more {
        Some(url) => format!("{}, View more at: {}", body, url),
        None => body,
    }
}

fn render_group(group: &DependencyGroup) -> String {
    group.alternatives.join(" or ")
}

fn render_detail(record: &PackageRecord, verbose: bool) -> String {
    let mut line = format!("Package: {} ({})", record.name, record.version);
    if let Some(release) = &record.release {
        line.push_str(&format!(" in {}", release));
    }
    if let Some(description) = &record.description {
        line.push_str(&format!(" - {}", description));
    }
    if verbose {
        line.push_str(&render_extra(record));
    }
    line
}

fn render_record(style: EntryStyle, record: &PackageRecord, verbose: bool) -> String {
    let mut line = match style {
        EntryStyle::Versions { by_source } => {
            let release = record.release.as_deref().unwrap_or("?");
            let label = if by_source {
                format!("{}: {}", release, record.name)
            } else {
                release.to_string()
            };
            if verbose && !record.archs.is_empty() {
                format!("{} ({} [{}])", label, record.version, record.archs.join(", "))
            } else {
                format!("{} ({})", label, record.version)
            }
        }
        EntryStyle::ArchRepo => format!(
            "{} ({}) [{}]",
            name_and_description(record),
            record.version,
            record.archs.join(", ")
        ),
        EntryStyle::Aur | EntryStyle::PackageDetail => {
            format!("{} ({})", name_and_description(record), record.version)
        }
        EntryStyle::Mint => format!(
            "{} [{}] ({})",
            record.name,
            record.section.as_deref().unwrap_or("?"),
            record.version
        ),
        EntryStyle::SearchHit => record.name.clone(),
    };

    if verbose {
        line.push_str(&render_extra(record));
    }
    line
}

fn name_and_description(record: &PackageRecord) -> String {
    match &record.description {
        Some(description) => format!("{} - {}", record.name, description),
        None => record.name.clone(),
    }
}

fn render_extra(record: &PackageRecord) -> String {
    if record.extra.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = record
        .extra
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect();
    format!(" [{}]", pairs.join(" "))
}

/// "1 result", "3 results".
pub fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// "a", "a and b", "a, b, and c".
pub fn and_join(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationKind;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_and_join() {
        assert_eq!(and_join(&[]), "");
        assert_eq!(and_join(&strings(&["a"])), "a");
        assert_eq!(and_join(&strings(&["a", "b"])), "a and b");
        assert_eq!(and_join(&strings(&["a", "b", "c"])), "a, b, and c");
    }

    #[test]
    fn test_total_reported_while_truncated() {
        let records = vec![
            PackageRecord::new("alpha", "1"),
            PackageRecord::new("beta", "2"),
            PackageRecord::new("gamma", "3"),
        ];
        let set = ResultSet::packages(EntryStyle::SearchHit, records).with_total(12);

        let line = format(&set, 2, false);

        assert_eq!(line, "Found 12 results: alpha and beta");
        assert!(!line.contains("gamma"));
    }

    #[test]
    fn test_versions_verbose_adds_archs() {
        let records = vec![
            PackageRecord::new("curl", "7.38.0-4")
                .with_release("jessie")
                .with_archs(["amd64", "i386"]),
            PackageRecord::new("curl", "7.52.1-5")
                .with_release("stretch")
                .with_archs(["amd64"]),
        ];
        let set = ResultSet::packages(EntryStyle::Versions { by_source: false }, records)
            .with_view_more(Some("https://packages.debian.org/search?keywords=curl".into()));

        assert_eq!(
            format(&set, 10, false),
            "Found 2 results: jessie (7.38.0-4) and stretch (7.52.1-5), \
             View more at: https://packages.debian.org/search?keywords=curl"
        );
        assert!(format(&set, 10, true).starts_with(
            "Found 2 results: jessie (7.38.0-4 [amd64, i386]) and stretch (7.52.1-5 [amd64])"
        ));
    }

    #[test]
    fn test_source_labels() {
        let records = vec![PackageRecord::new("glibc", "2.19-18").with_release("jessie")];
        let set = ResultSet::packages(EntryStyle::Versions { by_source: true }, records);
        assert_eq!(format(&set, 5, false), "Found 1 result: jessie: glibc (2.19-18)");
    }

    #[test]
    fn test_package_detail() {
        let record = PackageRecord::new("curl", "7.38.0-4+deb8u16")
            .with_release("jessie")
            .with_description(Some("command line tool for transferring data".into()));
        let set = ResultSet::packages(EntryStyle::PackageDetail, vec![record])
            .with_view_more(Some("https://packages.debian.org/jessie/curl".into()));

        assert_eq!(
            format(&set, 5, false),
            "Package: curl (7.38.0-4+deb8u16) in jessie - command line tool for transferring \
             data, View more at: https://packages.debian.org/jessie/curl"
        );
    }

    #[test]
    fn test_dependency_groups() {
        let mut mta = DependencyGroup::new("default-mta");
        mta.push("mail-transport-agent");
        let set = ResultSet::dependencies(
            "mutt",
            RelationKind::Recommends,
            vec![
                DependencyGroup::new("libsasl2-modules"),
                mta,
                DependencyGroup::new("locales"),
            ],
        );

        assert_eq!(
            format(&set, 10, false),
            "Package mutt recommends: libsasl2-modules, default-mta or mail-transport-agent, \
             and locales"
        );
        assert_eq!(
            format(&set, 1, false),
            "Package mutt recommends (3): libsasl2-modules"
        );
    }

    #[test]
    fn test_truncated_dependencies_report_total() {
        let groups = (0..12)
            .map(|i| DependencyGroup::new(format!("lib{}", i)))
            .collect();
        let set = ResultSet::dependencies("curl", RelationKind::Depends, groups);

        let line = format(&set, 2, false);

        assert_eq!(line, "Package curl depends (12): lib0 and lib1");
        assert!(!line.contains("lib2"));
    }

    #[test]
    fn test_verbose_extra_metadata() {
        let record = PackageRecord::new("yay", "12.3.5-1")
            .with_description(Some("Yet another yogurt".into()))
            .with_extra("ID", "1126284")
            .with_extra("Votes", "2120");
        let set = ResultSet::packages(EntryStyle::Aur, vec![record]);

        assert_eq!(
            format(&set, 5, false),
            "Found 1 result: yay - Yet another yogurt (12.3.5-1)"
        );
        assert_eq!(
            format(&set, 5, true),
            "Found 1 result: yay - Yet another yogurt (12.3.5-1) [ID: 1126284 Votes: 2120]"
        );
    }

    #[test]
    fn test_arch_and_mint_items() {
        let arch = PackageRecord::new("pacman", "6.1.0")
            .with_description(Some("A library-based package manager".into()))
            .with_archs(["x86_64", "i686"]);
        let set = ResultSet::packages(EntryStyle::ArchRepo, vec![arch]);
        assert_eq!(
            format(&set, 5, false),
            "Found 1 result: pacman - A library-based package manager (6.1.0) [x86_64, i686]"
        );

        let mint = PackageRecord::new("mintupdate", "5.1.0").with_section("Main");
        let set = ResultSet::packages(EntryStyle::Mint, vec![mint]);
        assert_eq!(format(&set, 5, false), "Found 1 result: mintupdate [Main] (5.1.0)");
    }
}
