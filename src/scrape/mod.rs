//! Adapters over the HTML pages the upstream services return.
//!
//! Nothing outside this module knows about selectors or marker strings, so an
//! upstream template change is fixed here and nowhere else.

pub mod filehost;
pub mod outcome;

pub use filehost::{extract_share_link, extract_upload_target};
pub use outcome::classify;

use scraper::{ElementRef, Html, Selector};

/// Concatenated text of every element matching `selector` whose text contains
/// `needle`, or `None` when nothing matches. Equivalent of
/// `$('p:contains("...")').text()`.
pub(crate) fn text_containing(document: &Html, selector: &Selector, needle: &str) -> Option<String> {
    let matches: Vec<String> = document
        .select(selector)
        .map(element_text)
        .filter(|text| text.contains(needle))
        .collect();

    if matches.is_empty() {
        None
    } else {
        Some(matches.concat())
    }
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
