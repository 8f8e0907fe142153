//! JSON payload decoding.
//!
//! Sources disagree on where they put the item array and the price, and
//! change it without notice. Each known layout is an explicit variant;
//! decoding walks the variants in a fixed priority order.

use serde_json::{Map, Value};

use super::parse_coins;
use crate::domain::{Candidate, CandidateId, Platform};

/// Keys that may hold the item array, in priority order.
const LISTING_KEYS: &[&str] = &["items", "data", "players", "result"];
/// Keys that may hold the lowest price, in priority order.
const PRICE_KEYS: &[&str] = &["lowestBin", "bin", "price"];

const NAME_KEYS: &[&str] = &["name", "commonName", "common_name", "fullName", "full_name"];
const ID_KEYS: &[&str] = &["id", "playerId", "player_id", "_id", "resourceId"];
const RATING_KEYS: &[&str] = &["rating", "ovr", "overall"];
const POSITION_KEYS: &[&str] = &["position", "pos", "preferredPosition"];

/// Where a listing payload keeps its items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListingShape<'a> {
    /// The body itself is the array.
    Bare(&'a [Value]),
    /// `{ "<key>": [...] }`
    Keyed { key: &'static str, items: &'a [Value] },
    /// `{ "data": { "<key>": [...] } }`
    Nested { key: &'static str, items: &'a [Value] },
    Unrecognized,
}

impl<'a> ListingShape<'a> {
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        if let Some(items) = value.as_array() {
            return Self::Bare(items);
        }
        if let Some((key, items)) = first_array(value) {
            return Self::Keyed { key, items };
        }
        if let Some((key, items)) = value.get("data").and_then(first_array) {
            return Self::Nested { key, items };
        }
        Self::Unrecognized
    }

    #[must_use]
    pub fn items(self) -> &'a [Value] {
        match self {
            Self::Bare(items) | Self::Keyed { items, .. } | Self::Nested { items, .. } => items,
            Self::Unrecognized => &[],
        }
    }
}

fn first_array(value: &Value) -> Option<(&'static str, &[Value])> {
    LISTING_KEYS
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array).map(|a| (*key, a.as_slice())))
}

/// Decode up to `limit` candidates from a listing payload.
#[must_use]
pub fn normalize_listing(value: &Value, limit: usize) -> Vec<Candidate> {
    ListingShape::classify(value)
        .items()
        .iter()
        .filter_map(decode_candidate)
        .take(limit)
        .collect()
}

fn decode_candidate(value: &Value) -> Option<Candidate> {
    let obj = value.as_object()?;
    let name = first_str(obj, NAME_KEYS).or_else(|| {
        let first = obj.get("firstName").and_then(Value::as_str).unwrap_or_default();
        let last = obj.get("lastName").and_then(Value::as_str).unwrap_or_default();
        Some(format!("{first} {last}"))
    })?;

    let id = ID_KEYS.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => CandidateId::new(s.as_str()),
        Value::Number(n) => n.as_u64().map(CandidateId::from),
        _ => None,
    });
    let rating = RATING_KEYS.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_u64().and_then(|r| u32::try_from(r).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    let position = first_str(obj, POSITION_KEYS);

    Candidate::new(name)
        .map(|c| c.with_id(id).with_rating(rating).with_position(position))
}

fn first_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

/// One place a price payload may keep the lowest price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceField<'a> {
    /// `{ "<field>": 6100 }`
    Scalar { field: &'static str, value: &'a Value },
    /// `{ "data": { "<field>": 6100 } }`
    Nested { field: &'static str, value: &'a Value },
    /// `{ "<field>": { "ps": 6100, "xbox": 6300 } }`, at either level.
    PerPlatform {
        field: &'static str,
        map: &'a Map<String, Value>,
    },
}

impl<'a> PriceField<'a> {
    /// Every populated price field in priority order: top level first.
    #[must_use]
    pub fn locate(value: &'a Value) -> Vec<Self> {
        let mut fields = Vec::new();
        for (nested, scope) in [(false, Some(value)), (true, value.get("data"))] {
            let Some(scope) = scope else { continue };
            for &field in PRICE_KEYS {
                let Some(found) = scope.get(field).filter(|v| !v.is_null()) else {
                    continue;
                };
                fields.push(match (found.as_object(), nested) {
                    (Some(map), _) => Self::PerPlatform { field, map },
                    (None, false) => Self::Scalar { field, value: found },
                    (None, true) => Self::Nested { field, value: found },
                });
            }
        }
        fields
    }

    fn coins(self, platform: Platform) -> Option<u64> {
        match self {
            Self::Scalar { value, .. } | Self::Nested { value, .. } => coin_value(value),
            Self::PerPlatform { map, .. } => platform_value(map, platform),
        }
    }
}

/// Decode the lowest price from a price payload.
#[must_use]
pub fn normalize_price(value: &Value, platform: Platform) -> Option<u64> {
    PriceField::locate(value)
        .into_iter()
        .find_map(|field| field.coins(platform))
}

fn platform_value(map: &Map<String, Value>, platform: Platform) -> Option<u64> {
    let spelled = platform.spellings().iter().find_map(|spelling| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(spelling))
            .and_then(|(_, v)| coin_value(v))
    });
    spelled.or_else(|| map.values().find_map(coin_value))
}

fn coin_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 1.0 && *f < u64::MAX as f64)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => parse_coins(s),
        _ => None,
    }
    .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_keys_are_probed_in_order() {
        let body = json!({
            "data": [{ "name": "From data" }],
            "items": [{ "name": "From items" }],
        });
        assert!(matches!(ListingShape::classify(&body), ListingShape::Keyed { key: "items", .. }));
        let names: Vec<_> = normalize_listing(&body, 10)
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["From items"]);
    }

    #[test]
    fn listing_accepts_bare_and_nested_arrays() {
        let bare = json!([{ "name": "Bare" }]);
        assert_eq!(normalize_listing(&bare, 5).len(), 1);

        let nested = json!({ "data": { "players": [{ "commonName": "Nested" }] } });
        assert!(matches!(ListingShape::classify(&nested), ListingShape::Nested { key: "players", .. }));
        assert_eq!(normalize_listing(&nested, 5)[0].name(), "Nested");
    }

    #[test]
    fn listing_decodes_field_variants() {
        let body = json!({ "players": [
            { "playerId": 231747, "firstName": "Kylian", "lastName": "Mbappé", "ovr": "91", "pos": "st" },
            { "_id": "abc", "name": "Haaland", "rating": 91, "position": "ST" },
            { "id": 3, "name": "   " },
            "not an object",
        ]});
        let out = normalize_listing(&body, 10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name(), "Kylian Mbappé");
        assert_eq!(out[0].id().unwrap().as_str(), "231747");
        assert_eq!(out[0].rating(), Some(91));
        assert_eq!(out[0].position(), Some("ST"));
        assert_eq!(out[1].id().unwrap().as_str(), "abc");
    }

    #[test]
    fn listing_respects_limit_and_unknown_shapes() {
        let body = json!({ "result": [{ "name": "a" }, { "name": "b" }, { "name": "c" }] });
        assert_eq!(normalize_listing(&body, 2).len(), 2);
        assert!(normalize_listing(&json!({ "rows": [] }), 10).is_empty());
        assert!(normalize_listing(&json!("nope"), 10).is_empty());
    }

    #[test]
    fn price_fields_in_priority_order() {
        assert_eq!(normalize_price(&json!({ "lowestBin": 6100, "price": 9 }), Platform::Ps), Some(6100));
        assert_eq!(normalize_price(&json!({ "bin": "12,500" }), Platform::Ps), Some(12_500));
        assert_eq!(normalize_price(&json!({ "data": { "price": 800.0 } }), Platform::Ps), Some(800));
    }

    #[test]
    fn implausible_fields_fall_through() {
        let body = json!({ "lowestBin": 0, "bin": "N/A", "data": { "lowestBin": 4_500 } });
        assert_eq!(normalize_price(&body, Platform::Ps), Some(4_500));
        assert_eq!(normalize_price(&json!({ "lowestBin": null }), Platform::Ps), None);
        assert_eq!(normalize_price(&json!({ "price": -5 }), Platform::Ps), None);
    }

    #[test]
    fn per_platform_maps_use_spellings_then_any() {
        let body = json!({ "lowestBin": { "PlayStation": 7000, "xb": 7200 } });
        assert_eq!(normalize_price(&body, Platform::Ps), Some(7000));
        assert_eq!(normalize_price(&body, Platform::Xbox), Some(7200));
        assert_eq!(normalize_price(&body, Platform::Pc), Some(7000));
    }
}
