//! Markup extraction for scrape targets.
//!
//! Each extractor is an ordered list of heuristics; the first one that
//! yields something plausible wins. Patterns are compiled once.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::parse_coins;
use crate::domain::{Candidate, CandidateId, Platform};

/// A coin amount with optional thousands separators.
const AMOUNT: &str = r"[0-9][0-9.,]*(?:[ \x{a0}][0-9]{3})*";

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static extraction pattern is valid"))
}

fn amount_pattern(prefix: &str) -> String {
    format!("{prefix}({AMOUNT})")
}

// ---------------------------------------------------------------------------
// Listing pages
// ---------------------------------------------------------------------------

type ListingHeuristic = fn(&str, usize) -> Vec<Candidate>;

const LISTING_HEURISTICS: &[ListingHeuristic] = &[
    by_data_attributes,
    by_class_pairs,
    by_slug_anchors,
    by_season_anchors,
];

/// Extract up to `limit` candidates from a listing page.
#[must_use]
pub fn extract_listing(html: &str, limit: usize) -> Vec<Candidate> {
    LISTING_HEURISTICS
        .iter()
        .map(|heuristic| heuristic(html, limit))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// `data-player-name="…" … data-position="…" … data-rating="NN"`
fn by_data_attributes(html: &str, limit: usize) -> Vec<Candidate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(
        &RE,
        r#"(?is)data-player-name="([^"]+)".*?data-position="([^"]+)".*?data-rating="(\d{2})""#,
    );
    re.captures_iter(html)
        .filter_map(|caps| {
            Candidate::new(decode_entities(&caps[1])).map(|c| {
                c.with_position(Some(caps[2].to_string()))
                    .with_rating(caps[3].parse().ok())
            })
        })
        .take(limit)
        .collect()
}

/// `class="player-name">Name<…class="ovr">NN`
fn by_class_pairs(html: &str, limit: usize) -> Vec<Candidate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(
        &RE,
        r#"(?is)class="player-name"[^>]*>([^<]+)<.{0,120}?class="ovr"[^>]*>(\d{2})"#,
    );
    re.captures_iter(html)
        .filter_map(|caps| {
            Candidate::new(decode_entities(&caps[1])).map(|c| c.with_rating(caps[2].parse().ok()))
        })
        .take(limit)
        .collect()
}

/// `<a href="/players/12345-slug/">…</a>`
fn by_slug_anchors(html: &str, limit: usize) -> Vec<Candidate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r#"(?is)<a([^>]*href="/players/(\d+)-[^"]*"[^>]*)>(.*?)</a>"#);
    anchors(re, html, limit)
}

/// `href="/26/player/12345/slug">…</a>`
fn by_season_anchors(html: &str, limit: usize) -> Vec<Candidate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r#"(?is)<a([^>]*href="/(?:\d+/)?player/(\d+)[^"]*"[^>]*)>(.*?)</a>"#);
    anchors(re, html, limit)
}

fn anchors(re: &Regex, html: &str, limit: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    re.captures_iter(html)
        .filter_map(|caps| {
            let id = caps.get(2)?.as_str();
            if !seen.insert(id.to_string()) {
                return None;
            }
            let name = anchor_name(caps.get(1)?.as_str(), caps.get(3)?.as_str())?;
            Candidate::new(name).map(|c| c.with_id(CandidateId::new(id)))
        })
        .take(limit)
        .collect()
}

/// Name of an anchor: `title`, then `alt`, then the visible text.
fn anchor_name(attrs: &str, inner: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    static ALT: OnceLock<Regex> = OnceLock::new();
    let title = cached(&TITLE, r#"title="([^"]+)""#);
    let alt = cached(&ALT, r#"alt="([^"]+)""#);

    let attr = title
        .captures(attrs)
        .or_else(|| title.captures(inner))
        .or_else(|| alt.captures(inner))
        .map(|caps| decode_entities(&caps[1]));
    let name = attr.unwrap_or_else(|| strip_tags(inner));
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn strip_tags(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = cached(&TAG, r"<[^>]+>");
    let text = tag.replace_all(html, " ");
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// Player pages
// ---------------------------------------------------------------------------

type PriceHeuristic = fn(&str, Platform) -> Option<u64>;

const PRICE_HEURISTICS: &[PriceHeuristic] = &[
    embedded_platform_object,
    embedded_scalar,
    platform_box_label,
    lowest_bin_label,
    lc_price_label,
    inline_json_snippet,
    loose_bin,
    loose_buy_now,
];

/// Extract the lowest buy-now price for `platform` from a player page.
#[must_use]
pub fn extract_price(html: &str, platform: Platform) -> Option<u64> {
    PRICE_HEURISTICS
        .iter()
        .find_map(|heuristic| heuristic(html, platform))
}

/// First plausible amount among the pattern's matches.
fn first_amount(re: &Regex, html: &str) -> Option<u64> {
    re.captures_iter(html)
        .filter_map(|caps: Captures<'_>| caps.get(1))
        .find_map(|m| parse_coins(m.as_str()))
}

/// `"lowestBin": { ps: 6100, "xbox": "6,300" }`
fn embedded_platform_object(html: &str, platform: Platform) -> Option<u64> {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    static PAIR: OnceLock<Regex> = OnceLock::new();
    let object = cached(&OBJECT, r#"(?i)"lowestBin"\s*:\s*\{([^}]+)\}"#);
    let pair = cached(&PAIR, r#"(?i)"?([a-z0-9_]+)"?\s*:\s*"?([0-9][0-9.,]*)"#);

    let body = object.captures(html)?.get(1)?.as_str();
    let entries: Vec<(String, Option<u64>)> = pair
        .captures_iter(body)
        .map(|caps| (caps[1].to_ascii_lowercase(), parse_coins(&caps[2])))
        .collect();

    platform
        .spellings()
        .iter()
        .find_map(|spelling| {
            entries
                .iter()
                .find(|(key, _)| key == spelling)
                .and_then(|(_, value)| *value)
        })
        .or_else(|| entries.iter().find_map(|(_, value)| *value))
}

/// `"lowestBin": 6100`
fn embedded_scalar(html: &str, _platform: Platform) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r#"(?i)"lowestBin"\s*:\s*"?([0-9][0-9.,]*)"#);
    first_amount(re, html)
}

/// `PlayStation … LC Price … 6,100` inside a platform-specific box.
fn platform_box_label(html: &str, platform: Platform) -> Option<u64> {
    static PS: OnceLock<Regex> = OnceLock::new();
    static XBOX: OnceLock<Regex> = OnceLock::new();
    static PC: OnceLock<Regex> = OnceLock::new();
    let cell = match platform {
        Platform::Ps => &PS,
        Platform::Xbox => &XBOX,
        Platform::Pc => &PC,
    };
    let pattern = amount_pattern(&format!(
        r"(?is){}.{{0,400}}?(?:LC\s*Price|LOWEST\s*BIN|BIN|Price)[^0-9]{{0,40}}",
        platform.label()
    ));
    first_amount(cached(cell, &pattern), html)
}

/// `LOWEST BIN` followed by an amount within a few hundred characters.
fn lowest_bin_label(html: &str, _platform: Platform) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, &amount_pattern(r"(?is)LOWEST\s*BIN.{0,300}?"));
    first_amount(re, html)
}

fn lc_price_label(html: &str, _platform: Platform) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, &amount_pattern(r"(?i)LC\s*Price[^0-9]{0,40}"));
    first_amount(re, html)
}

/// `"LCPrice": 6100`, `"lowest": 6100`, `"lowestPrice": 6100`, `"lowest_bin": 6100`
fn inline_json_snippet(html: &str, _platform: Platform) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(
        &RE,
        r#"(?i)"(?:LCPrice|lowest|lowestPrice|lowest_bin)"\s*:\s*"?([0-9]+)"#,
    );
    first_amount(re, html)
}

fn loose_bin(html: &str, _platform: Platform) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, &amount_pattern(r"(?i)\bBIN[^0-9]{0,20}"));
    first_amount(re, html)
}

fn loose_buy_now(html: &str, _platform: Platform) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, &amount_pattern(r"(?i)Buy\s*Now[^0-9]{0,20}"));
    first_amount(re, html)
}
