use crate::lookup::aggregate::{aggregate, KeyStrategy};
use crate::lookup::classify::Distro;
use crate::lookup::formats::{element_text, expect_format, selector};
use crate::model::{EntryStyle, PackageQuery, PackageRecord, RawFormat, RawResponse, ResultSet};
use crate::traits::LookupError;
use scraper::Html;

/// Parse a packages.debian.org / packages.ubuntu.com `search?keywords=` page.
///
/// Hits are `<h3>Package name</h3>` headings. When there are none, the
/// site's own notice (e.g. "too many results") becomes the error message.
pub fn parse(
    raw: &RawResponse,
    query: &PackageQuery,
    distro: Distro,
) -> Result<ResultSet, LookupError> {
    expect_format(raw, RawFormat::HtmlPage)?;
    let html = Html::parse_document(&raw.text());
    let heading = selector("h3", RawFormat::HtmlPage)?;

    let records: Vec<PackageRecord> = html
        .select(&heading)
        .filter_map(|h3| {
            let text = element_text(h3);
            let mut tokens = text.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(_), Some(name)) => Some(PackageRecord::new(name, "")),
                _ => None,
            }
        })
        .collect();

    if records.is_empty() {
        return Err(match notice(&html, distro)? {
            Some(message) => LookupError::NotFound(message),
            None => LookupError::not_found(),
        });
    }

    let merged = aggregate(records, KeyStrategy::SectionName, query.reverse);
    Ok(ResultSet::packages(EntryStyle::SearchHit, merged))
}

fn notice(html: &Html, distro: Distro) -> Result<Option<String>, LookupError> {
    let css = match distro {
        Distro::Debian => "div.note p",
        Distro::Ubuntu => "p#psearchtoomanyhits",
    };
    let notice = selector(css, RawFormat::HtmlPage)?;
    Ok(html
        .select(&notice)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty()))
}
