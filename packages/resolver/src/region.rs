//! Compile-time registry of target regions and the address
//! disambiguation heuristic.
//!
//! Each region is defined in a TOML file under `regions/`, embedded at
//! compile time. The heuristic exists because the downstream geocoder
//! frequently returns wrong-region matches for short local landmark
//! names (a street name that exists in dozens of cities); biasing the
//! query text toward the target region measurably improves accuracy.
//! It is a precision/availability trade-off, not a correctness
//! guarantee.

use serde::Deserialize;

/// A disaster-response target region loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    /// Unique identifier (e.g., `"los_angeles"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// City name appended to under-specified addresses.
    pub city: String,
    /// Two-letter city abbreviation (e.g., `"LA"`).
    pub city_abbrev: String,
    /// Two-letter state abbreviation (e.g., `"CA"`).
    pub state_abbrev: String,
    /// Full state name.
    pub state_name: String,
}

impl Region {
    /// Biases an address toward this region for geocoding.
    ///
    /// Case-insensitive substring checks: if the address mentions
    /// neither the city (name or abbreviation) nor the state (name or
    /// abbreviation), both are appended; if it mentions only one, the
    /// other is appended.
    #[must_use]
    pub fn normalize_address(&self, address: &str) -> String {
        let lower = address.to_lowercase();

        let mentions_city = lower.contains(&self.city.to_lowercase())
            || lower.contains(&self.city_abbrev.to_lowercase());
        let mentions_state = lower.contains(&self.state_abbrev.to_lowercase())
            || lower.contains(&self.state_name.to_lowercase());

        match (mentions_city, mentions_state) {
            (true, true) => address.to_string(),
            (false, false) => format!("{address}, {}, {}", self.city, self.state_abbrev),
            (true, false) => format!("{address}, {}", self.state_abbrev),
            (false, true) => format!("{address}, {}", self.city),
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const REGION_TOMLS: &[(&str, &str)] = &[(
    "los_angeles",
    include_str!("../regions/los_angeles.toml"),
)];

/// Returns all region configurations.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed (a compile-time
/// guarantee in practice, exercised by the tests below).
#[must_use]
pub fn all_regions() -> Vec<Region> {
    REGION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse region '{name}': {e}"))
        })
        .collect()
}

/// Returns the region with the given ID.
#[must_use]
pub fn region_by_id(id: &str) -> Option<Region> {
    all_regions().into_iter().find(|r| r.id == id)
}

/// Returns the default region (the first in the registry).
///
/// # Panics
///
/// Panics if the registry is empty, which would mean the embedded
/// configs were removed.
#[must_use]
pub fn default_region() -> Region {
    all_regions()
        .into_iter()
        .next()
        .expect("at least one embedded region config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_regions() {
        let regions = all_regions();
        assert!(!regions.is_empty());
        for region in &regions {
            assert!(!region.id.is_empty());
            assert!(!region.city.is_empty());
            assert!(!region.state_abbrev.is_empty());
        }
    }

    #[test]
    fn finds_region_by_id() {
        assert!(region_by_id("los_angeles").is_some());
        assert!(region_by_id("atlantis").is_none());
    }

    #[test]
    fn appends_city_and_state_when_neither_mentioned() {
        let region = default_region();
        assert_eq!(
            region.normalize_address("123 Main St"),
            "123 Main St, Los Angeles, CA"
        );
    }

    #[test]
    fn appends_city_when_only_state_mentioned() {
        let region = default_region();
        assert_eq!(
            region.normalize_address("123 Main St, CA"),
            "123 Main St, CA, Los Angeles"
        );
    }

    #[test]
    fn appends_state_when_only_city_mentioned() {
        let region = default_region();
        assert_eq!(
            region.normalize_address("123 Main St, Los Angeles"),
            "123 Main St, Los Angeles, CA"
        );
    }

    #[test]
    fn leaves_fully_specified_address_alone() {
        let region = default_region();
        assert_eq!(
            region.normalize_address("123 Main St, Los Angeles, California"),
            "123 Main St, Los Angeles, California"
        );
    }

    #[test]
    fn city_abbreviation_counts_as_city_mention() {
        let region = default_region();
        // "LA" is matched as a plain substring, so "Silver Lake Blvd"
        // would also count as a city mention. Accepted as part of the
        // precision/availability trade-off.
        assert_eq!(
            region.normalize_address("Echo Park, LA"),
            "Echo Park, LA, CA"
        );
    }

    #[test]
    fn checks_are_case_insensitive() {
        let region = default_region();
        assert_eq!(
            region.normalize_address("123 main st, los angeles, ca"),
            "123 main st, los angeles, ca"
        );
    }
}
