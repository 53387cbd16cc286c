//! Tweet field extraction from DOM element snapshots.
//!
//! Each element arrives as an outer-HTML string and is parsed with the
//! `scraper` crate. Every field resolves through an ordered list of selector
//! strategies, first hit wins, so markup drift degrades a single field to
//! its default instead of dropping the whole tweet.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use trendwire_common::Tweet;

use crate::traits::TWEET_SELECTOR;

// Selector fallbacks per field, most specific first.
const TEXT_SELECTORS: &[&str] = &[r#"[data-testid="tweetText"]"#, "div[lang]"];
const USER_LINK_SELECTORS: &[&str] = &[
    r#"[data-testid="User-Name"] a[role="link"]"#,
    r#"a[role="link"][href^="/"]"#,
];
const TIMESTAMP_SELECTORS: &[&str] = &["time"];
const REPLY_SELECTORS: &[&str] = &[r#"[data-testid="reply"]"#, r#"button[aria-label*="repl"]"#];
const RETWEET_SELECTORS: &[&str] = &[
    r#"[data-testid="retweet"]"#,
    r#"button[aria-label*="repost"]"#,
];
const LIKE_SELECTORS: &[&str] = &[r#"[data-testid="like"]"#, r#"button[aria-label*="like"]"#];
const PHOTO_SELECTORS: &[&str] = &[r#"[data-testid="tweetPhoto"] img[src]"#, r#"img[src*="media"]"#];
const VIDEO_SELECTORS: &[&str] = &["video[src]", "video source[src]"];

fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

/// Locate the tweet element inside a parsed fragment. Snapshots are the
/// tweet's own outer HTML, so the article is usually the first child; fall
/// back to the fragment root otherwise.
pub fn tweet_root(doc: &Html) -> ElementRef<'_> {
    doc.select(&sel(TWEET_SELECTOR))
        .next()
        .unwrap_or_else(|| doc.root_element())
}

/// Resolve a stable identifier for a tweet element.
///
/// Tries, in order: the native `data-tweet-id` attribute, the status id in
/// a permalink href, any attribute whose name mentions "tweet", and
/// finally a synthetic id hashed from the first characters of the text so
/// the same rendered tweet dedups across scroll iterations.
pub fn resolve_tweet_id(root: ElementRef<'_>) -> String {
    if let Some(id) = root.value().attr("data-tweet-id") {
        if !id.is_empty() {
            return id.to_string();
        }
    }

    let status_re = Regex::new(r"/status/([^/?#]+)").expect("static regex must parse");
    for link in root.select(&sel(r#"a[href*="/status/"]"#)) {
        if let Some(href) = link.value().attr("href") {
            if let Some(caps) = status_re.captures(href) {
                return caps[1].to_string();
            }
        }
    }

    for (name, value) in root.value().attrs() {
        if name.contains("tweet") && !value.is_empty() {
            return value.to_string();
        }
    }

    let text = first_text(root, TEXT_SELECTORS).unwrap_or_else(|| element_text(root));
    let prefix: String = text.chars().take(50).collect();
    format!("synthetic-id-{}", content_hash(&prefix))
}

/// Extract all tweet fields from an element. Missing fields get defaults;
/// this function does not fail.
pub fn extract_tweet(root: ElementRef<'_>, id: String) -> Tweet {
    let content = first_text(root, TEXT_SELECTORS).unwrap_or_default();
    let user = first_attr(root, USER_LINK_SELECTORS, "href")
        .map(|href| handle_from_href(&href))
        .unwrap_or_default();
    let timestamp = first_attr(root, TIMESTAMP_SELECTORS, "datetime").unwrap_or_default();

    let replies = parse_metric(&first_text(root, REPLY_SELECTORS).unwrap_or_default());
    let retweets = parse_metric(&first_text(root, RETWEET_SELECTORS).unwrap_or_default());
    let likes = parse_metric(&first_text(root, LIKE_SELECTORS).unwrap_or_default());

    let photo_urls = all_attrs(root, PHOTO_SELECTORS, "src");
    let video_urls = all_attrs(root, VIDEO_SELECTORS, "src");

    Tweet {
        id,
        content,
        user,
        timestamp,
        likes,
        retweets,
        replies,
        has_photos: !photo_urls.is_empty(),
        photo_urls,
        has_videos: !video_urls.is_empty(),
        video_urls,
    }
}

/// Parse a visible counter. Only plain digit runs parse; abbreviated
/// counters ("1.2K") and decorations count as zero.
fn parse_metric(text: &str) -> u32 {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return 0;
    }
    trimmed.parse().unwrap_or(0)
}

/// `@handle` from a profile href like `/handle` or `https://x.com/handle`.
fn handle_from_href(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(handle) if !handle.is_empty() => format!("@{handle}"),
        _ => String::new(),
    }
}

fn first_match<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|s| root.select(&sel(s)).next())
}

fn first_text(root: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    first_match(root, selectors).map(element_text).filter(|t| !t.is_empty())
}

fn first_attr(root: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    selectors.iter().find_map(|s| {
        root.select(&sel(s))
            .find_map(|el| el.value().attr(attr))
            .map(str::to_string)
    })
}

/// All values of `attr` across every selector match, deduped in order.
fn all_attrs(root: ElementRef<'_>, selectors: &[&str], attr: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for s in selectors {
        for el in root.select(&sel(s)) {
            if let Some(value) = el.value().attr(attr) {
                if !value.is_empty() && !urls.iter().any(|u| u == value) {
                    urls.push(value.to_string());
                }
            }
        }
    }
    urls
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join("").trim().to_string()
}

/// Fast hash for synthetic ids. Not cryptographic.
fn content_hash(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
