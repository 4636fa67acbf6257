// src/integrations/imdb/search.rs
//
// Parsing of IMDb find-page markup into identifiers and candidates.
//
// The find page has been redesigned repeatedly; every lookup goes through
// an explicit ordered chain of structural strategies, newest layout first.
// All functions here are pure over the fetched markup.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::resolution::CandidateResult;
use crate::integrations::imdb::element_text;

/// How many results the fuzzy stage considers.
pub const MAX_CANDIDATES: usize = 10;

/// How many ancestor levels the released-movie heuristic climbs.
const MAX_ANCESTOR_LEVELS: usize = 10;

struct SearchSelectors {
    testid_result: Selector,
    summary_item_link: Selector,
    any_title_link: Selector,
    candidate_items: Selector,
    candidate_title: Selector,
    candidate_link: Selector,
    candidate_metadata: Selector,
    legacy_result_cells: Selector,
    legacy_link: Selector,
    title_id: Regex,
    year: Regex,
    runtime: Regex,
    runtime_short: Regex,
    rating_blob: Regex,
}

impl Default for SearchSelectors {
    fn default() -> Self {
        Self {
            testid_result: Selector::parse(r#"a[data-testid="search-result-title"]"#).unwrap(),
            summary_item_link: Selector::parse(r#"a[class*="ipc-metadata-list-summary-item__t"]"#)
                .unwrap(),
            any_title_link: Selector::parse(r#"a[href*="/title/tt"]"#).unwrap(),
            candidate_items: Selector::parse("li.ipc-metadata-list-summary-item").unwrap(),
            candidate_title: Selector::parse(r#"h3[class*="ipc-title__text"]"#).unwrap(),
            candidate_link: Selector::parse("a.ipc-lockup-overlay").unwrap(),
            candidate_metadata: Selector::parse("div.cli-title-metadata span").unwrap(),
            legacy_result_cells: Selector::parse("td.result_text").unwrap(),
            legacy_link: Selector::parse("a").unwrap(),
            title_id: Regex::new(r"(tt\d+)").unwrap(),
            year: Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap(),
            runtime: Regex::new(r"\d+h\s*\d+m").unwrap(),
            runtime_short: Regex::new(r"^\d+m").unwrap(),
            rating_blob: Regex::new(r"\d+\.\d+\(\d+K?\)").unwrap(),
        }
    }
}

/// Try to pull the first confident title id out of a find page.
///
/// Strategy order:
/// 1. the data-testid result link (current layout), year-verified
/// 2. the summary-item link class (slightly older layout)
/// 3. any /title/tt link whose surrounding containers look like a released
///    movie (runtime or rating text nearby); in-development entries carry
///    almost no metadata and are skipped in favor of the next result
pub fn parse_first_result(html: &str, year: Option<i32>) -> Option<String> {
    let doc = Html::parse_document(html);
    let selectors = SearchSelectors::default();

    if let Some(link) = doc.select(&selectors.testid_result).next() {
        if let Some(id) = extract_title_id(&selectors, &link) {
            if year.is_none() || parent_text_mentions_year(&link, year.unwrap()) {
                return Some(id);
            }
            log::debug!("year mismatch on first result {}, trying next strategy", id);
        }
    }

    if let Some(link) = doc.select(&selectors.summary_item_link).next() {
        if let Some(id) = extract_title_id(&selectors, &link) {
            return Some(id);
        }
    }

    scan_title_links(&doc, &selectors, year)
}

fn scan_title_links(doc: &Html, selectors: &SearchSelectors, year: Option<i32>) -> Option<String> {
    let mut fallback: Option<String> = None;

    for link in doc.select(&selectors.any_title_link).take(MAX_CANDIDATES) {
        let Some(id) = extract_title_id(selectors, &link) else {
            continue;
        };

        let mut released = false;
        let mut in_development = false;

        let mut levels = 0;
        for ancestor in link.ancestors() {
            if levels >= MAX_ANCESTOR_LEVELS {
                break;
            }
            levels += 1;

            let Some(container) = ElementRef::wrap(ancestor) else {
                continue;
            };
            let text = element_text(&container);
            if text.len() < 15 {
                continue;
            }

            let has_runtime = selectors.runtime.is_match(&text)
                || selectors.runtime_short.is_match(&text);
            let has_rating =
                selectors.rating_blob.is_match(&text) || text.contains("Metascore");

            if has_runtime || has_rating {
                released = true;
                match year {
                    Some(wanted) if !mentions_year(&text, wanted) => {
                        // Released but the wrong year; move to the next link
                        released = false;
                        in_development = false;
                    }
                    _ => return Some(id),
                }
                break;
            }

            // Short surrounding text with no runtime/rating marks an
            // unreleased entry when a year was requested
            if year.is_some() && text.len() < 50 {
                in_development = true;
                break;
            }
        }

        if in_development {
            log::debug!("skipping in-development result {}", id);
            continue;
        }
        if !released && year.is_none() && fallback.is_none() {
            fallback = Some(id);
        }
    }

    fallback
}

/// Parse all candidates a find page offers, current layout first, falling
/// back to the legacy table layout.
pub fn parse_candidates(html: &str) -> Vec<CandidateResult> {
    let doc = Html::parse_document(html);
    let selectors = SearchSelectors::default();

    let mut candidates = Vec::new();

    for item in doc.select(&selectors.candidate_items) {
        let Some(title_el) = item.select(&selectors.candidate_title).next() else {
            continue;
        };
        let Some(link) = item.select(&selectors.candidate_link).next() else {
            continue;
        };
        let Some(id) = extract_title_id(&selectors, &link) else {
            continue;
        };

        let display_title = element_text(&title_el);
        let year = item
            .select(&selectors.candidate_metadata)
            .next()
            .and_then(|span| parse_year(&selectors, &element_text(&span)))
            .or_else(|| parse_year(&selectors, &display_title));

        candidates.push(CandidateResult {
            display_title,
            external_id: id,
            year,
        });
    }

    if !candidates.is_empty() {
        return candidates;
    }

    for cell in doc.select(&selectors.legacy_result_cells) {
        let Some(link) = cell.select(&selectors.legacy_link).next() else {
            continue;
        };
        let Some(id) = extract_title_id(&selectors, &link) else {
            continue;
        };

        let cell_text = element_text(&cell);
        candidates.push(CandidateResult {
            display_title: element_text(&link),
            external_id: id,
            year: parse_year(&selectors, &cell_text),
        });
    }

    candidates
}

/// Strip a trailing "(1999)" style year decoration for matching purposes.
pub fn strip_year_suffix(display_title: &str) -> String {
    let re = Regex::new(r"\s*\(\d{4}\).*$").unwrap();
    re.replace(display_title, "").to_string()
}

fn extract_title_id(selectors: &SearchSelectors, link: &ElementRef) -> Option<String> {
    let href = link.value().attr("href")?;
    selectors
        .title_id
        .captures(href)
        .map(|caps| caps[1].to_string())
}

fn parent_text_mentions_year(link: &ElementRef, year: i32) -> bool {
    link.ancestors()
        .next()
        .and_then(ElementRef::wrap)
        .map(|parent| mentions_year(&element_text(&parent), year))
        .unwrap_or(false)
}

/// Release years near a result are allowed to be off by one.
fn mentions_year(text: &str, year: i32) -> bool {
    (year - 1..=year + 1).any(|y| text.contains(&y.to_string()))
}

fn parse_year(selectors: &SearchSelectors, text: &str) -> Option<i32> {
    selectors
        .year
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}
