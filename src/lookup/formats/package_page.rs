//! packages.debian.org / packages.ubuntu.com package pages.
//!
//! A page describes one package in one release. Version and release come
//! from the `Keywords` meta tag (last and second token), the summary from
//! `Description`. Relation lookups read the page's `<dt>` entries instead.

use crate::lookup::formats::{element_text, expect_format, selector};
use crate::lookup::relations::{group_relations, RelationEntry};
use crate::model::{
    EntryStyle, PackageQuery, PackageRecord, RawFormat, RawResponse, RelationKind, ResultSet,
};
use crate::traits::LookupError;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Version keyword carried by virtual packages.
pub const VIRTUAL_MARKER: &str = "virtual";

/// Providers listed before the remainder is summarized as "and N others".
pub const PROVIDER_DISPLAY_LIMIT: usize = 10;

const AMBIGUOUS_SPECIFIER: &str = "two or more packages specified";
const CONTINUATION_MARKER: &str = "or";

pub fn parse(raw: &RawResponse, query: &PackageQuery) -> Result<ResultSet, LookupError> {
    expect_format(raw, RawFormat::HtmlPage)?;
    let html = Html::parse_document(&raw.text());

    if let Some(message) = error_message(&html)? {
        if message.contains(AMBIGUOUS_SPECIFIER) {
            return Err(LookupError::UnknownDistribution(
                query.release.clone().unwrap_or(message),
            ));
        }
        return Err(LookupError::NotFound(message));
    }

    if query.relation != RelationKind::None {
        let entries = relation_entries(&html)?;
        let groups = group_relations(&entries, query.relation);
        if groups.is_empty() {
            return Err(LookupError::NotFound(format!(
                "{} doesn't seem to have any {}.",
                query.name,
                query.relation.label()
            )));
        }
        return Ok(ResultSet::dependencies(&query.name, query.relation, groups));
    }

    let keywords = meta_content(&html, "Keywords")?
        .ok_or_else(|| LookupError::parse(RawFormat::HtmlPage, "missing Keywords meta tag"))?;
    let tokens: Vec<&str> = keywords
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    let version = tokens
        .last()
        .copied()
        .ok_or_else(|| LookupError::parse(RawFormat::HtmlPage, "empty Keywords meta tag"))?;

    let mut description = meta_content(&html, "Description")?;
    if version == VIRTUAL_MARKER {
        description = Some(virtual_description(&providers(&html)?));
    }

    let mut record = PackageRecord::new(&query.name, version).with_description(description);
    if let Some(release) = tokens.get(1) {
        record = record.with_release(*release);
    }

    Ok(ResultSet::packages(EntryStyle::PackageDetail, vec![record]))
}

/// Error pages carry "Error" in the title and the reason in `#content p`.
fn error_message(html: &Html) -> Result<Option<String>, LookupError> {
    let title = selector("title", RawFormat::HtmlPage)?;
    let is_error = html
        .select(&title)
        .next()
        .is_some_and(|t| element_text(t).contains("Error"));
    if !is_error {
        return Ok(None);
    }

    let reason = selector("div#content p", RawFormat::HtmlPage)?;
    let message = html
        .select(&reason)
        .next()
        .map(element_text)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "No such package.".to_string());
    Ok(Some(message))
}

fn meta_content(html: &Html, name: &str) -> Result<Option<String>, LookupError> {
    let meta = selector("meta", RawFormat::HtmlPage)?;
    Ok(html
        .select(&meta)
        .find(|m| {
            m.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string()))
}

fn providers(html: &Html) -> Result<Vec<String>, LookupError> {
    let dt = selector("dt", RawFormat::HtmlPage)?;
    let link = selector("a", RawFormat::HtmlPage)?;
    Ok(html
        .select(&dt)
        .filter_map(|item| item.select(&link).next())
        .map(element_text)
        .filter(|name| !name.is_empty())
        .collect())
}

pub fn virtual_description(providers: &[String]) -> String {
    let shown: Vec<&str> = providers
        .iter()
        .take(PROVIDER_DISPLAY_LIMIT)
        .map(String::as_str)
        .collect();
    let mut description = format!("Virtual package provided by: {}", shown.join(", "));
    if providers.len() > PROVIDER_DISPLAY_LIMIT {
        description.push_str(&format!(
            " and {} others",
            providers.len() - PROVIDER_DISPLAY_LIMIT
        ));
    }
    description
}

/// Flattens the page's `<dt>` entries for [`group_relations`].
///
/// A continuation entry ("or ...") has no keyword of its own and takes the
/// one of the nearest preceding `<dt>` in the same list. Entries without a
/// link or keyword are dropped.
fn relation_entries(html: &Html) -> Result<Vec<RelationEntry>, LookupError> {
    let dt = selector("dt", RawFormat::HtmlPage)?;
    let span = selector("span", RawFormat::HtmlPage)?;
    let link = selector("a", RawFormat::HtmlPage)?;

    let mut entries = Vec::new();
    for item in html.select(&dt) {
        let continuation =
            element_text(item).split_whitespace().next() == Some(CONTINUATION_MARKER);
        let keyword = if continuation {
            inherited_keyword(item, &span)
        } else {
            item.select(&span).next().map(element_text)
        };

        let (Some(label), Some(keyword)) = (item.select(&link).next().map(element_text), keyword)
        else {
            debug!("skipping malformed relation entry: {}", element_text(item));
            continue;
        };
        entries.push(RelationEntry::new(label, keyword, continuation));
    }
    Ok(entries)
}

fn inherited_keyword(item: ElementRef<'_>, span: &Selector) -> Option<String> {
    let mut current = item;
    loop {
        let previous = current
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "dt")?;
        if let Some(keyword) = previous.select(span).next() {
            return Some(element_text(keyword));
        }
        current = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entries, QueryKind};

    const CURL_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<title>Debian -- Details of package curl in jessie</title>
<meta name="Description" content="command line tool for transferring data with URL syntax">
<meta name="Keywords" content="Debian,  jessie, jessie/web, curl, 7.38.0-4+deb8u16">
</head><body><div id="content">
<div id="pdeps">
<ul class="uldep">
<li><dl><dt><span class="nonvisual">dep:</span> <a href="/jessie/libc6">libc6</a> (&gt;= 2.17)</dt><dd>GNU C Library</dd></dl></li>
<li><dl><dt><span class="nonvisual">dep:</span> <a href="/jessie/libcurl3">libcurl3</a> (= 7.38.0-4+deb8u16)</dt><dd>easy-to-use client-side URL transfer library</dd></dl></li>
<li><dl><dt><span class="nonvisual">dep:</span> <a href="/jessie/default-mta">default-mta</a></dt><dd>virtual</dd>
<dt>or <a href="/jessie/mail-transport-agent">mail-transport-agent</a></dt><dd>virtual</dd>
<dt>or <a href="/jessie/exim4">exim4</a></dt><dd>mail server</dd></dl></li>
</ul>
<ul class="ulrec">
<li><dl><dt><span class="nonvisual">rec:</span> <a href="/jessie/ca-certificates">ca-certificates</a></dt><dd>CA certificates</dd></dl></li>
</ul>
<ul class="ulsug">
<li><dl><dt><span class="nonvisual">sug:</span> broken entry without link</dt></dl></li>
</ul>
</div></div></body></html>"#;

    fn query() -> PackageQuery {
        PackageQuery::new(QueryKind::Package, "curl").with_release("jessie")
    }

    fn page(body: &str) -> RawResponse {
        RawResponse::new(RawFormat::HtmlPage, body)
    }

    #[test]
    fn test_package_detail() {
        let set = parse(&page(CURL_PAGE), &query()).expect("parse page");

        let record = &set.records()[0];
        assert_eq!(record.name, "curl");
        assert_eq!(record.version, "7.38.0-4+deb8u16");
        assert_eq!(record.release.as_deref(), Some("jessie"));
        assert_eq!(
            record.description.as_deref(),
            Some("command line tool for transferring data with URL syntax")
        );
    }

    #[test]
    fn test_depends_groups_alternatives() {
        let set = parse(
            &page(CURL_PAGE),
            &query().with_relation(RelationKind::Depends),
        )
        .expect("parse relations");

        let Entries::Dependencies { package, groups, .. } = &set.entries else {
            panic!("expected dependency entries");
        };
        assert_eq!(package, "curl");
        let groups: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.alternatives.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(
            groups,
            vec![
                vec!["libc6"],
                vec!["libcurl3"],
                vec!["default-mta", "mail-transport-agent", "exim4"],
            ]
        );
    }

    #[test]
    fn test_recommends_and_missing_suggests() {
        let set = parse(
            &page(CURL_PAGE),
            &query().with_relation(RelationKind::Recommends),
        )
        .expect("parse relations");
        assert_eq!(set.len(), 1);

        let err = parse(
            &page(CURL_PAGE),
            &query().with_relation(RelationKind::Suggests),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "curl doesn't seem to have any suggests.");
    }

    #[test]
    fn test_virtual_package_lists_providers() {
        let providers: String = (1..=15)
            .map(|i| format!("<dt><a href=\"/sid/mta{i}\">mta{i}</a></dt><dd>mail</dd>"))
            .collect();
        let body = format!(
            r#"<html><head><title>Debian -- Details of package mail-transport-agent in sid</title>
<meta name="Keywords" content="Debian, sid, sid/virtual, mail-transport-agent, virtual">
</head><body><div id="content"><dl>{}</dl></div></body></html>"#,
            providers
        );
        let query = PackageQuery::new(QueryKind::Package, "mail-transport-agent").with_release("sid");

        let set = parse(&page(&body), &query).expect("parse virtual page");

        let record = &set.records()[0];
        assert_eq!(record.version, VIRTUAL_MARKER);
        let description = record.description.as_deref().unwrap_or_default();
        assert!(description.starts_with("Virtual package provided by: mta1, mta2,"));
        assert!(description.contains("mta10 and 5 others"));
        assert!(!description.contains("mta11"));
    }

    #[test]
    fn test_virtual_description_without_overflow() {
        let providers = vec!["exim4".to_string(), "postfix".to_string()];
        assert_eq!(
            virtual_description(&providers),
            "Virtual package provided by: exim4, postfix"
        );
    }

    #[test]
    fn test_error_page_is_not_found() {
        let body = r#"<html><head><title>Debian -- Error</title></head><body>
<div id="content"><h1>Error</h1><p>No such package.</p></div></body></html>"#;

        let err = parse(&page(body), &query()).unwrap_err();
        assert!(matches!(err, LookupError::NotFound(ref m) if m == "No such package."));
    }

    #[test]
    fn test_ambiguous_specifier_is_unknown_distribution() {
        let body = r#"<html><head><title>Debian -- Error</title></head><body>
<div id="content"><p>Invalid request: two or more packages specified (foo, jessie)</p></div>
</body></html>"#;

        let err = parse(&page(body), &query()).unwrap_err();
        assert!(matches!(err, LookupError::UnknownDistribution(ref r) if r == "jessie"));
    }

    #[test]
    fn test_missing_keywords_is_parse_error() {
        let body = "<html><head><title>Debian -- Details</title></head><body></body></html>";

        let err = parse(&page(body), &query()).unwrap_err();
        assert!(matches!(err, LookupError::Parse { .. }));
    }

    #[test]
    fn test_meta_content_lookup() {
        let html = Html::parse_document(
            r#"<html><head><meta name="keywords" content=" Debian, sid, bash, 5.2 "></head></html>"#,
        );

        assert_eq!(
            meta_content(&html, "Keywords").unwrap().as_deref(),
            Some("Debian, sid, bash, 5.2")
        );
        assert_eq!(meta_content(&html, "Description").unwrap(), None);
    }
}
