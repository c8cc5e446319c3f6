//! Status and phase normalization between French labels and internal codes.
//!
//! The storefront and backoffice historically sent a mix of French labels
//! ("À vendre", "en cours"), internal codes ("sale", "ongoing") and arbitrary
//! casing/whitespace. This module is the single canonical mapping: free-form
//! input is lowered and trimmed, recognized values map to a closed code set,
//! everything else maps to `None`.
//!
//! Write contract: a `None` result means the caller stores the raw input
//! unchanged. This is deliberate leniency, not a validation gate. Read
//! contract: list/detail handlers present the normalized code (and, for
//! properties, the French display label), falling back to the stored raw
//! value when normalization yields nothing.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a property listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    /// Listed for sale.
    Sale,
    /// Listed for rent.
    Rent,
    /// Sold.
    Sold,
}

impl PropertyStatus {
    /// Internal code stored in the database and returned by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
            Self::Sold => "sold",
        }
    }
}

/// Lifecycle phase of a development project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPhase {
    /// Planned, not yet started.
    Planned,
    /// Under construction.
    Ongoing,
    /// Delivered.
    Delivered,
}

impl ProjectPhase {
    /// Internal code stored in the database and returned by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Ongoing => "ongoing",
            Self::Delivered => "delivered",
        }
    }
}

/// Maps a free-form property status string to its internal code.
///
/// Recognizes French labels (with and without accents), already-valid
/// codes, and any casing or surrounding whitespace. Returns `None` for
/// anything unrecognized.
#[must_use]
pub fn normalize_property_status(input: &str) -> Option<PropertyStatus> {
    match input.trim().to_lowercase().as_str() {
        "vente" | "à vendre" | "a vendre" | "sale" => Some(PropertyStatus::Sale),
        "location" | "à louer" | "a louer" | "rent" => Some(PropertyStatus::Rent),
        "vendu" | "sold" => Some(PropertyStatus::Sold),
        _ => None,
    }
}

/// Maps a free-form project phase string to its internal code.
#[must_use]
pub fn normalize_project_phase(input: &str) -> Option<ProjectPhase> {
    match input.trim().to_lowercase().as_str() {
        "planifié" | "planifie" | "planned" => Some(ProjectPhase::Planned),
        "en cours" | "ongoing" => Some(ProjectPhase::Ongoing),
        "livré" | "livre" | "delivered" => Some(ProjectPhase::Delivered),
        _ => None,
    }
}

/// Maps a property status code back to its French display label.
///
/// Returns `None` for anything that is not a valid code, so raw
/// pass-through values never gain a label.
#[must_use]
pub fn property_status_label(code: &str) -> Option<&'static str> {
    match code {
        "sale" => Some("À vendre"),
        "rent" => Some("À louer"),
        "sold" => Some("Vendu"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("vente", PropertyStatus::Sale)]
    #[case("à vendre", PropertyStatus::Sale)]
    #[case("a vendre", PropertyStatus::Sale)]
    #[case("location", PropertyStatus::Rent)]
    #[case("à louer", PropertyStatus::Rent)]
    #[case("a louer", PropertyStatus::Rent)]
    #[case("vendu", PropertyStatus::Sold)]
    fn french_property_labels_normalize(#[case] input: &str, #[case] expected: PropertyStatus) {
        assert_eq!(normalize_property_status(input), Some(expected));
    }

    #[rstest]
    #[case("sale")]
    #[case("rent")]
    #[case("sold")]
    fn valid_codes_are_identity(#[case] code: &str) {
        assert_eq!(
            normalize_property_status(code).map(PropertyStatus::as_str),
            Some(code)
        );
    }

    #[rstest]
    #[case("  À VENDRE  ", PropertyStatus::Sale)]
    #[case("Vendu", PropertyStatus::Sold)]
    #[case("\tLOCATION\n", PropertyStatus::Rent)]
    fn casing_and_whitespace_are_ignored(#[case] input: &str, #[case] expected: PropertyStatus) {
        assert_eq!(normalize_property_status(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("villa")]
    #[case("for sale")]
    #[case("vendue")]
    fn unrecognized_property_input_is_none(#[case] input: &str) {
        assert_eq!(normalize_property_status(input), None);
    }

    #[rstest]
    #[case("planifié", ProjectPhase::Planned)]
    #[case("planifie", ProjectPhase::Planned)]
    #[case("en cours", ProjectPhase::Ongoing)]
    #[case("livré", ProjectPhase::Delivered)]
    #[case("livre", ProjectPhase::Delivered)]
    #[case("ONGOING", ProjectPhase::Ongoing)]
    fn phases_normalize(#[case] input: &str, #[case] expected: ProjectPhase) {
        assert_eq!(normalize_project_phase(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("terminé")]
    #[case("encours")]
    fn unrecognized_phase_input_is_none(#[case] input: &str) {
        assert_eq!(normalize_project_phase(input), None);
    }

    #[test]
    fn labels_round_trip_for_every_recognized_input() {
        for (input, label) in [
            ("vente", "À vendre"),
            ("à vendre", "À vendre"),
            ("a vendre", "À vendre"),
            ("location", "À louer"),
            ("à louer", "À louer"),
            ("a louer", "À louer"),
            ("vendu", "Vendu"),
            ("sale", "À vendre"),
            ("rent", "À louer"),
            ("sold", "Vendu"),
        ] {
            let code = normalize_property_status(input).expect(input);
            assert_eq!(property_status_label(code.as_str()), Some(label));
        }
    }

    #[test]
    fn label_is_none_for_raw_passthrough() {
        assert_eq!(property_status_label("bail emphytéotique"), None);
        assert_eq!(property_status_label(""), None);
    }
}
