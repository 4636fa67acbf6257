// src/integrations/imdb/extract.rs
//
// Review extraction from IMDb review-listing markup.
//
// Containers and every field inside them go through ordered selector
// chains: the 2024+ layout first, then the old layout, then generic
// attribute probes. A container that yields no usable body is skipped with
// a typed reason; its siblings keep parsing.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::review::{RawReview, ReviewCategory, SkipReason};
use crate::integrations::imdb::element_text;

/// Minimum text length for the last-resort block-level container probe.
const GENERIC_BLOCK_MIN_CHARS: usize = 50;

struct ReviewSelectors {
    containers: Vec<Selector>,
    titles: Vec<Selector>,
    bodies: Vec<Selector>,
    ratings: Vec<Selector>,
    authors: Vec<Selector>,
    dates: Vec<Selector>,
    vote_up: Selector,
    vote_down: Selector,
    legacy_actions: Selector,
    any_div: Selector,
    interactive: Selector,
    load_more: Selector,
    jsonld: Selector,
    rating_prefix: Regex,
    spoiler: Regex,
    number: Regex,
    aria_rating: Regex,
    legacy_votes: Regex,
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self {
            containers: vec![
                Selector::parse(r#"article[class*="user-review"]"#).unwrap(),
                Selector::parse("div.review-container").unwrap(),
                Selector::parse(r#"div[data-testid*="review"]"#).unwrap(),
            ],
            titles: vec![
                Selector::parse("a.title").unwrap(),
                Selector::parse(r#"h3[class*="ipc-title__text"]"#).unwrap(),
                Selector::parse(r#"div[data-testid="review-summary"] h3"#).unwrap(),
                Selector::parse(r#"span[class*="title"]"#).unwrap(),
            ],
            bodies: vec![
                Selector::parse("div.text.show-more__control").unwrap(),
                Selector::parse("div.content").unwrap(),
                Selector::parse(r#"div[class*="content"]"#).unwrap(),
            ],
            ratings: vec![
                Selector::parse("span.rating-other-user-rating").unwrap(),
                Selector::parse(r#"span[class*="ipc-rating-star--rating"]"#).unwrap(),
            ],
            authors: vec![
                Selector::parse("span.display-name-link").unwrap(),
                Selector::parse(r#"a[data-testid="author-link"]"#).unwrap(),
                Selector::parse(r#"a[class*="author"]"#).unwrap(),
                Selector::parse(r#"a[href*="/user/"]"#).unwrap(),
            ],
            dates: vec![
                Selector::parse("span.review-date").unwrap(),
                Selector::parse(r#"li[class*="review-date"]"#).unwrap(),
            ],
            vote_up: Selector::parse(r#"span[class*="ipc-voting__label__count--up"]"#).unwrap(),
            vote_down: Selector::parse(r#"span[class*="ipc-voting__label__count--down"]"#).unwrap(),
            legacy_actions: Selector::parse("div.actions.text-muted").unwrap(),
            any_div: Selector::parse("div").unwrap(),
            interactive: Selector::parse("button, a.ipc-title-link-wrapper").unwrap(),
            load_more: Selector::parse("div.load-more-data").unwrap(),
            jsonld: Selector::parse(r#"script[type="application/ld+json"]"#).unwrap(),
            rating_prefix: Regex::new(r"^\d+/\d+\s*").unwrap(),
            spoiler: Regex::new(r"(?i)\bspoiler\b").unwrap(),
            number: Regex::new(r"(\d+(?:\.\d+)?)").unwrap(),
            aria_rating: Regex::new(r"rating:\s*(\d+)").unwrap(),
            legacy_votes: Regex::new(r"(\d+)\s+out of\s+(\d+)").unwrap(),
        }
    }
}

/// Extract reviews from one listing page, in document order, up to
/// `max_count`. Skipped containers are returned alongside for logging.
pub fn extract_reviews(
    html: &str,
    max_count: usize,
    min_chars: usize,
) -> (Vec<RawReview>, Vec<SkipReason>) {
    let doc = Html::parse_document(html);
    let selectors = ReviewSelectors::default();

    let mut reviews = Vec::new();
    let mut skipped = Vec::new();

    for container in find_containers(&doc, &selectors) {
        if reviews.len() >= max_count {
            break;
        }
        match parse_container(&selectors, &container, min_chars) {
            Ok(review) => reviews.push(review),
            Err(reason) => skipped.push(reason),
        }
    }

    (reviews, skipped)
}

/// The pagination key for the next page of reviews, if any.
pub fn pagination_key(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selectors = ReviewSelectors::default();
    doc.select(&selectors.load_more)
        .next()
        .and_then(|el| el.value().attr("data-key"))
        .map(str::to_string)
}

/// Pull the aggregate rating out of a title page's JSON-LD block.
pub fn parse_rating_jsonld(html: &str) -> Option<(f64, Option<u32>)> {
    let doc = Html::parse_document(html);
    let selectors = ReviewSelectors::default();

    for script in doc.select(&selectors.jsonld) {
        let raw: String = script.text().collect();
        let Ok(data) = serde_json::from_str::<serde_json::Value>(&raw) else {
            continue;
        };
        let Some(aggregate) = data.get("aggregateRating") else {
            continue;
        };
        let Some(value) = aggregate.get("ratingValue").and_then(json_number) else {
            continue;
        };
        let count = aggregate
            .get("ratingCount")
            .and_then(json_number)
            .map(|c| c as u32);
        return Some((value, count));
    }

    None
}

fn json_number(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn find_containers<'a>(doc: &'a Html, selectors: &ReviewSelectors) -> Vec<ElementRef<'a>> {
    for selector in &selectors.containers {
        let found: Vec<ElementRef> = doc.select(selector).collect();
        if !found.is_empty() {
            return found;
        }
    }

    // Last resort: innermost block-level elements with substantial text and
    // no interactive controls
    let passes = |el: &ElementRef| -> bool {
        el.select(&selectors.interactive).next().is_none()
            && element_text(el).len() > GENERIC_BLOCK_MIN_CHARS
    };
    doc.select(&selectors.any_div)
        .filter(|div| passes(div) && !div.select(&selectors.any_div).any(|inner| passes(&inner)))
        .collect()
}

fn parse_container(
    selectors: &ReviewSelectors,
    container: &ElementRef,
    min_chars: usize,
) -> Result<RawReview, SkipReason> {
    let text = extract_body(selectors, container)?;
    let length = text.chars().count();
    if length < min_chars {
        return Err(SkipReason::ContentTooShort { length });
    }

    let title_el = selectors
        .titles
        .iter()
        .find_map(|s| container.select(s).next());
    let title = title_el.and_then(|el| {
        let raw = element_text(&el);
        let stripped = selectors.rating_prefix.replace(&raw, "").trim().to_string();
        if stripped.is_empty() {
            None
        } else {
            Some(stripped)
        }
    });

    let rating = extract_rating(selectors, container, title_el.as_ref());
    let author = selectors
        .authors
        .iter()
        .find_map(|s| container.select(s).next())
        .map(|el| element_text(&el))
        .filter(|name| !name.is_empty());
    let published_at = selectors
        .dates
        .iter()
        .find_map(|s| container.select(s).next())
        .and_then(|el| parse_review_date(&element_text(&el)));
    let (upvotes, downvotes) = extract_votes(selectors, container);

    let source_id = container
        .value()
        .attr("data-review-id")
        .map(str::to_string)
        .or_else(|| {
            container
                .value()
                .attr("data-testid")
                .map(|t| t.trim_start_matches("review-").to_string())
        })
        .filter(|id| !id.is_empty())
        .map(|id| format!("imdb_{}", id))
        .unwrap_or_else(|| {
            // No id attribute in this layout: derive a stable one from the
            // content so reruns stay idempotent
            format!(
                "imdb_{}",
                &crate::domain::review::fingerprint_text(&text)[..16]
            )
        });

    let mut review = RawReview::from_text(source_id, text, ReviewCategory::Audience);
    review.rating = rating;
    review.title = title;
    review.author = author;
    review.published_at = published_at;
    review.upvotes = upvotes;
    review.downvotes = downvotes;
    Ok(review)
}

fn extract_body(
    selectors: &ReviewSelectors,
    container: &ElementRef,
) -> Result<String, SkipReason> {
    let body_el = selectors
        .bodies
        .iter()
        .find_map(|s| container.select(s).next())
        .or_else(|| {
            container.select(&selectors.any_div).find(|div| {
                div.select(&selectors.interactive).next().is_none()
                    && element_text(div).len() > GENERIC_BLOCK_MIN_CHARS
            })
        });

    let Some(el) = body_el else {
        return Err(SkipReason::BodyMissing);
    };

    let raw = element_text(&el);
    let without_spoiler = selectors.spoiler.replace_all(&raw, "");
    let collapsed = without_spoiler
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = selectors
        .rating_prefix
        .replace(&collapsed, "")
        .trim()
        .to_string();

    if cleaned.is_empty() {
        return Err(SkipReason::BodyMissing);
    }
    Ok(cleaned)
}

fn extract_rating(
    selectors: &ReviewSelectors,
    container: &ElementRef,
    title_el: Option<&ElementRef>,
) -> Option<f64> {
    for selector in &selectors.ratings {
        if let Some(el) = container.select(selector).next() {
            if let Some(caps) = selectors.number.captures(&element_text(&el)) {
                if let Ok(value) = caps[1].parse() {
                    return Some(value);
                }
            }
        }
    }

    // Some layouts only expose the rating in the title's aria-label
    let aria = title_el?.value().attr("aria-label")?;
    selectors
        .aria_rating
        .captures(aria)
        .and_then(|caps| caps[1].parse().ok())
}

fn extract_votes(selectors: &ReviewSelectors, container: &ElementRef) -> (u32, u32) {
    let up = container
        .select(&selectors.vote_up)
        .next()
        .and_then(|el| parse_count(&element_text(&el)));
    let down = container
        .select(&selectors.vote_down)
        .next()
        .and_then(|el| parse_count(&element_text(&el)));

    if let Some(up) = up {
        return (up, down.unwrap_or(0));
    }

    // Old layout: "N out of M found this helpful"
    if let Some(actions) = container.select(&selectors.legacy_actions).next() {
        if let Some(caps) = selectors.legacy_votes.captures(&element_text(&actions)) {
            let helpful: u32 = caps[1].parse().unwrap_or(0);
            let total: u32 = caps[2].parse().unwrap_or(helpful);
            return (helpful, total.saturating_sub(helpful));
        }
    }

    (0, 0)
}

fn parse_count(text: &str) -> Option<u32> {
    text.replace(',', "").trim().parse().ok()
}

/// IMDb shows absolute dates in a handful of formats.
fn parse_review_date(text: &str) -> Option<DateTime<Utc>> {
    const FORMATS: [&str; 3] = ["%d %B %Y", "%B %d, %Y", "%b %d, %Y"];
    let trimmed = text.trim();
    FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(trimmed, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })
}
