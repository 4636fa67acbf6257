// src/integrations/rotten_tomatoes/extract.rs
//
// Review extraction from Rotten Tomatoes review pages.
//
// These pages are client-rendered: cards only exist after the SPA hydrates,
// and more load as the page scrolls. Extraction therefore drives a live
// BrowserSession instead of parsing fetched markup.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use regex::Regex;
use std::time::Duration;

use crate::domain::review::{fingerprint_text, RawReview, ReviewCategory, SkipReason};
use crate::error::AppResult;
use crate::integrations::ports::{BrowserSession, ElementNode};

/// Upper bound on the progressive-loading scroll loop.
pub const MAX_SCROLL_ITERATIONS: usize = 5;

/// UI artifact strings the SPA mixes into review text slots.
const TEXT_ARTIFACTS: [&str; 3] = ["Content collapsed.", "See Less", "See More"];

const CARD_SELECTOR: &str = "review-card";
const DRAWER_SELECTOR: &str = r#"drawer-more[slot="review"]"#;
const CONTENT_SELECTOR: &str = r#"span[slot="content"]"#;
const AUTHOR_SELECTOR: &str = r#"rt-link[slot="name"]"#;
const TIMESTAMP_SELECTOR: &str = r#"span[slot="timestamp"]"#;

pub struct ExtractOptions {
    pub max_reviews: usize,
    pub min_chars: usize,
    /// How long to wait for the first card to hydrate
    pub card_wait: Duration,
    /// Pause between scroll iterations so lazy content can load
    pub scroll_pause: Duration,
    /// Reference clock for resolving relative timestamps
    pub now: DateTime<Utc>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_reviews: 20,
            min_chars: 20,
            card_wait: Duration::from_secs(5),
            scroll_pause: Duration::from_secs(2),
            now: Utc::now(),
        }
    }
}

/// Collect review cards from the page the session is currently on.
///
/// Waits for the first card (timeout means "no reviews here", not an
/// error), then scrolls to trigger lazy loading until the target count is
/// reached or the page stops growing.
pub async fn collect_cards(
    session: &mut dyn BrowserSession,
    category: ReviewCategory,
    options: &ExtractOptions,
) -> AppResult<Vec<RawReview>> {
    if !session.wait_for(CARD_SELECTOR, options.card_wait).await? {
        log::info!("no review cards appeared for {} listing", category);
        return Ok(Vec::new());
    }

    let mut last_height = session.page_height().await?;
    for _ in 0..MAX_SCROLL_ITERATIONS {
        let loaded = session.query(CARD_SELECTOR).await?.len();
        if loaded >= options.max_reviews {
            break;
        }
        session.scroll_to_bottom().await?;
        tokio::time::sleep(options.scroll_pause).await;

        let height = session.page_height().await?;
        if height == last_height {
            break;
        }
        last_height = height;
    }

    let cards = session.query(CARD_SELECTOR).await?;
    let mut reviews = Vec::new();
    for card in cards.iter().take(options.max_reviews) {
        match parse_review_card(card.as_ref(), category, options.min_chars, options.now) {
            Ok(review) => reviews.push(review),
            Err(reason) => log::debug!("skipped {} card: {}", category, reason),
        }
    }

    log::info!("extracted {} reviews from {} listing", reviews.len(), category);
    Ok(reviews)
}

/// Parse one review-card element. The review text lives in light-DOM slots:
/// <review-card><drawer-more slot="review"><span slot="content">TEXT</span>...
pub fn parse_review_card(
    card: &dyn ElementNode,
    category: ReviewCategory,
    min_chars: usize,
    now: DateTime<Utc>,
) -> Result<RawReview, SkipReason> {
    let raw_text = card
        .find(DRAWER_SELECTOR)
        .and_then(|drawer| {
            drawer
                .find(CONTENT_SELECTOR)
                .map(|span| span.text())
                .or_else(|| Some(drawer.text()))
        })
        .or_else(|| card.find(CONTENT_SELECTOR).map(|span| span.text()));

    let Some(raw_text) = raw_text else {
        return Err(SkipReason::BodyMissing);
    };

    let text = clean_review_text(&raw_text);
    if text.is_empty() {
        return Err(SkipReason::BodyMissing);
    }
    let length = text.chars().count();
    if length < min_chars {
        return Err(SkipReason::ContentTooShort { length });
    }

    let author = card
        .find(AUTHOR_SELECTOR)
        .map(|el| el.text().trim().to_string())
        .filter(|name| !name.is_empty());

    let published_at = card
        .find(TIMESTAMP_SELECTOR)
        .and_then(|el| parse_review_timestamp(&el.text(), now));

    // The source publishes no review id; derive a stable one from content
    let source_id = format!("rt_{}_{}", category, &fingerprint_text(&text)[..16]);

    let mut review = RawReview::from_text(source_id, text, category);
    review.author = author;
    review.published_at = published_at;
    Ok(review)
}

fn clean_review_text(raw: &str) -> String {
    let mut text = raw.to_string();
    for artifact in TEXT_ARTIFACTS {
        text = text.replace(artifact, "");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve the timestamp formats the SPA renders:
/// - full date: "Aug 26, 2024"
/// - bare month+day: "Aug 26" (current year, unless that lands in the
///   future, in which case it was last year)
/// - relative tokens: "2d", "3w", "1mo", ...
pub fn parse_review_timestamp(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains(',') {
        return NaiveDate::parse_from_str(trimmed, "%b %d, %Y")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
    }

    let with_year = format!("{}, {}", trimmed, now.year());
    if let Ok(date) = NaiveDate::parse_from_str(&with_year, "%b %d, %Y") {
        let parsed = date.and_hms_opt(0, 0, 0)?.and_utc();
        if parsed > now {
            let last_year = format!("{}, {}", trimmed, now.year() - 1);
            return NaiveDate::parse_from_str(&last_year, "%b %d, %Y")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc());
        }
        return Some(parsed);
    }

    let relative = Regex::new(r"^(\d+)\s*(mo|[smhdwy])$").unwrap();
    let caps = relative.captures(trimmed)?;
    let value: i64 = caps[1].parse().ok()?;
    let delta = match &caps[2] {
        "s" => ChronoDuration::seconds(value),
        "m" => ChronoDuration::minutes(value),
        "h" => ChronoDuration::hours(value),
        "d" => ChronoDuration::days(value),
        "w" => ChronoDuration::weeks(value),
        "mo" => ChronoDuration::days(value * 30),
        "y" => ChronoDuration::days(value * 365),
        _ => return None,
    };
    Some(now - delta)
}
