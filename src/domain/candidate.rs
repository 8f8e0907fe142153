//! Tradable items discovered by a listing call.

use serde::Serialize;

use super::id::CandidateId;

/// Highest rating a card can carry.
pub const MAX_RATING: u8 = 99;

/// A tradable item identified by name and optionally by id, not yet priced.
///
/// Construction goes through [`Candidate::new`], which rejects blank names,
/// so every candidate in the pipeline has a usable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<CandidateId>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
    #[serde(rename = "source", skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
}

impl Candidate {
    /// Create a candidate from a display name. Whitespace runs are collapsed.
    ///
    /// Returns `None` when the name is empty after trimming.
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return None;
        }
        Some(Self {
            id: None,
            name,
            rating: None,
            position: None,
            origin: None,
        })
    }

    #[must_use]
    pub fn with_id(mut self, id: Option<CandidateId>) -> Self {
        self.id = id;
        self
    }

    /// Attach a reported rating. Values above [`MAX_RATING`] are discarded.
    #[must_use]
    pub fn with_rating(mut self, rating: Option<u32>) -> Self {
        self.rating = rating
            .filter(|r| *r <= u32::from(MAX_RATING))
            .and_then(|r| u8::try_from(r).ok());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Option<String>) -> Self {
        self.position = position
            .map(|p| p.trim().to_ascii_uppercase())
            .filter(|p| !p.is_empty());
        self
    }

    /// Record which source's id namespace the id belongs to.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&CandidateId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rating as reported by the source, if any.
    #[must_use]
    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    #[must_use]
    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Whether `source` may use this candidate's id verbatim.
    ///
    /// Ids without an origin were supplied by the caller and are offered to
    /// every source.
    #[must_use]
    pub fn id_usable_by(&self, source: &str) -> Option<&CandidateId> {
        match self.origin.as_deref() {
            None => self.id.as_ref(),
            Some(origin) if origin == source => self.id.as_ref(),
            Some(_) => None,
        }
    }

    /// Whether the name can be searched for. A name that only repeats the
    /// id carries nothing a search route could match.
    #[must_use]
    pub fn has_searchable_name(&self) -> bool {
        self.id.as_ref().map_or(true, |id| id.as_str() != self.name)
    }

    /// Rating guessed from a standalone two-digit token in the name.
    ///
    /// Low confidence: listing pages sometimes print the rating next to the
    /// name, but a shirt number or year fragment matches just as well.
    #[must_use]
    pub fn inferred_rating(&self) -> Option<u8> {
        self.name
            .split_whitespace()
            .find(|token| token.len() == 2 && token.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|token| token.parse().ok())
    }

    /// Reported rating, falling back to the inferred one.
    ///
    /// The flag is `true` when the value was inferred.
    #[must_use]
    pub fn effective_rating(&self) -> Option<(u8, bool)> {
        self.rating
            .map(|r| (r, false))
            .or_else(|| self.inferred_rating().map(|r| (r, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(Candidate::new("").is_none());
        assert!(Candidate::new(" \n\t ").is_none());
    }

    #[test]
    fn names_are_collapsed() {
        let c = Candidate::new("  Erling \n  Haaland ").unwrap();
        assert_eq!(c.name(), "Erling Haaland");
    }

    #[test]
    fn out_of_range_rating_is_dropped() {
        let c = Candidate::new("Mbappe").unwrap().with_rating(Some(120));
        assert_eq!(c.rating(), None);
        let c = Candidate::new("Mbappe").unwrap().with_rating(Some(91));
        assert_eq!(c.rating(), Some(91));
    }

    #[test]
    fn rating_inferred_from_name_token() {
        let c = Candidate::new("91 Kylian Mbappe ST").unwrap();
        assert_eq!(c.inferred_rating(), Some(91));
        assert_eq!(c.effective_rating(), Some((91, true)));

        let c = Candidate::new("Mbappe 2024").unwrap();
        assert_eq!(c.inferred_rating(), None);
    }

    #[test]
    fn reported_rating_wins_over_inferred() {
        let c = Candidate::new("88 Salah").unwrap().with_rating(Some(89));
        assert_eq!(c.effective_rating(), Some((89, false)));
    }

    #[test]
    fn id_affinity_follows_origin() {
        let c = Candidate::new("Salah")
            .unwrap()
            .with_id(CandidateId::new("209331"))
            .with_origin("futgg");
        assert!(c.id_usable_by("futgg").is_some());
        assert!(c.id_usable_by("futbin").is_none());

        let caller = Candidate::new("Salah").unwrap().with_id(CandidateId::new("1"));
        assert!(caller.id_usable_by("anything").is_some());
    }

    #[test]
    fn a_name_repeating_the_id_is_not_searchable() {
        let bare = Candidate::new("231747").unwrap().with_id(CandidateId::new("231747"));
        assert!(!bare.has_searchable_name());

        let named = Candidate::new("Kane").unwrap().with_id(CandidateId::new("231747"));
        assert!(named.has_searchable_name());
        assert!(Candidate::new("Kane").unwrap().has_searchable_name());
    }
}
