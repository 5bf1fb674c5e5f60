//! packages.linuxmint.com `list.php` tables.
//!
//! The list page groups packages into one table per repository section, each
//! table preceded by a heading naming the section. Rows read `name | version`.

use crate::lookup::aggregate::{aggregate, KeyStrategy};
use crate::lookup::formats::{element_text, expect_format, is_heading, selector};
use crate::model::{EntryStyle, PackageQuery, PackageRecord, RawFormat, RawResponse, ResultSet};
use crate::traits::LookupError;
use scraper::{ElementRef, Html};

pub fn parse(raw: &RawResponse, query: &PackageQuery) -> Result<ResultSet, LookupError> {
    expect_format(raw, RawFormat::HtmlTable)?;
    let html = Html::parse_document(&raw.text());
    let rows = selector("tr", RawFormat::HtmlTable)?;

    let mut records = Vec::new();
    for row in html.select(&rows) {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .collect();
        let [name_cell, version_cell, ..] = cells.as_slice() else {
            continue;
        };

        let name = element_text(*name_cell);
        if !matches_query(&name, query) {
            continue;
        }

        let section = section_heading(row).ok_or_else(|| {
            LookupError::parse(
                RawFormat::HtmlTable,
                format!("no section heading above row for '{}'", name),
            )
        })?;
        records.push(PackageRecord::new(name, element_text(*version_cell)).with_section(section));
    }

    if records.is_empty() {
        return Err(LookupError::not_found());
    }
    let merged = aggregate(records, KeyStrategy::SectionName, query.reverse);
    Ok(ResultSet::packages(EntryStyle::Mint, merged))
}

fn matches_query(name: &str, query: &PackageQuery) -> bool {
    if query.exact {
        name.eq_ignore_ascii_case(&query.name)
    } else {
        name.to_lowercase().contains(&query.name)
    }
}

/// Nearest heading before the row, looking at the row's own siblings first
/// and then at each ancestor's.
fn section_heading(row: ElementRef<'_>) -> Option<String> {
    std::iter::once(row)
        .chain(row.ancestors().filter_map(ElementRef::wrap))
        .find_map(|level| {
            level
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .find(|sibling| is_heading(*sibling))
        })
        .map(element_text)
}
