// src/integrations/imdb/mod.rs
//
// IMDb - server-rendered source. Highest-priority provider of numeric
// ratings and long-form user reviews.

pub mod client;
pub mod extract;
pub mod search;

pub use client::ImdbScraper;

use scraper::ElementRef;

/// Collapse an element's text nodes into a single space-separated string.
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
