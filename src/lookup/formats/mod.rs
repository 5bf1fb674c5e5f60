//! Upstream format adapters.
//!
//! Each adapter is a pure `parse(raw, query) -> ResultSet` function for one
//! upstream's payload:
//! - `madison` - pipe-delimited multi-release version tables
//! - `package_page` - single package pages on packages.debian.org / packages.ubuntu.com
//! - `arch` - archlinux.org repository search JSON
//! - `aur` - AUR RPC search JSON
//! - `mint` - Linux Mint package list tables
//! - `search_page` - Debian/Ubuntu site search results

pub mod arch;
pub mod aur;
pub mod madison;
pub mod mint;
pub mod package_page;
pub mod search_page;

use crate::model::{RawFormat, RawResponse};
use crate::traits::LookupError;
use scraper::{ElementRef, Selector};

/// Rejects a response whose declared format is not the one the adapter reads.
pub(crate) fn expect_format(raw: &RawResponse, expected: RawFormat) -> Result<(), LookupError> {
    if raw.format == expected {
        Ok(())
    } else {
        Err(LookupError::parse(
            expected,
            format!("adapter expects {} input, got {}", expected, raw.format),
        ))
    }
}

pub(crate) fn selector(css: &'static str, format: RawFormat) -> Result<Selector, LookupError> {
    Selector::parse(css)
        .map_err(|e| LookupError::parse(format, format!("invalid selector '{}': {}", css, e)))
}

/// Text content with runs of whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn is_heading(element: ElementRef<'_>) -> bool {
    matches!(
        element.value().name(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}
