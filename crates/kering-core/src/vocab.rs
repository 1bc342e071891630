//! # Vocabulary
//!
//! Well-known namespaces, classes, and properties used by the fact store,
//! plus the naming scheme for minted instance IRIs.
//!
//! The store itself treats IRIs as opaque strings; this module is the single
//! place that knows what they look like.

use crate::types::Iri;

// =============================================================================
// NAMESPACES
// =============================================================================

/// Rijkswaterstaat object type library (classes and properties).
pub const OTL: &str = "https://data.rws.nl/def/otl/";

/// NEN 2767 condition assessment vocabulary.
pub const NEN2767: &str = "https://data.rws.nl/def/nen2767/";

/// RDF core vocabulary.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// XML Schema datatypes.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Instance data namespace (assets, parts, inspections).
pub const DATA: &str = "https://data.rws.nl/data/";

/// Prefixes declared in the durable store file, in emission order.
///
/// The instance namespace is bound to `ex:`, matching the query prologue the
/// service has always used.
pub const PREFIXES: [(&str, &str); 5] = [
    ("otl", OTL),
    ("nen2767", NEN2767),
    ("rdf", RDF),
    ("xsd", XSD),
    ("ex", DATA),
];

// =============================================================================
// CLASSES
// =============================================================================

/// Class of the barrier asset itself.
pub const STORM_SEARCH_BARRIER: &str = "https://data.rws.nl/def/otl/StormSearchBarrier";

/// Class of a physical asset part.
pub const PART: &str = "https://data.rws.nl/def/otl/Part";

/// Class of a single inspection occurrence.
pub const INSPECTION: &str = "https://data.rws.nl/def/otl/Inspection";

/// Class of a condition score resource; also the datatype IRI of condition
/// literals.
pub const CONDITION_SCORE: &str = "https://data.rws.nl/def/nen2767/ConditionScore";

// =============================================================================
// PROPERTIES
// =============================================================================

/// Asset -> part containment.
pub const HAS_PART: &str = "https://data.rws.nl/def/otl/hasPart";

/// Part -> inspection occurrence.
pub const HAS_INSPECTION: &str = "https://data.rws.nl/def/otl/hasInspection";

/// Inspection -> condition score resource.
pub const HAS_NEN2767_CONDITION: &str = "https://data.rws.nl/def/otl/hasNEN2767Condition";

/// Inspection -> calendar date (`xsd:date` literal).
pub const INSPECTION_DATE: &str = "https://data.rws.nl/def/otl/inspectionDate";

/// RDF instance-of.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// RDF structured-value link; here: score resource -> condition literal.
pub const RDF_VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";

// =============================================================================
// DATATYPES
// =============================================================================

/// Datatype IRI of date literals.
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

// =============================================================================
// INSTANCE IRI SCHEME
// =============================================================================

/// IRI of an asset with the given local name, e.g. `oosterscheldekering`.
#[must_use]
pub fn asset_iri(local: &str) -> Iri {
    Iri::new(format!("{DATA}{local}"))
}

/// IRI of a part of an asset, e.g. `oosterscheldekering_part0`.
#[must_use]
pub fn part_iri(asset_local: &str, index: u64) -> Iri {
    Iri::new(format!("{DATA}{asset_local}_part{index}"))
}

/// IRI of the n-th inspection occurrence.
#[must_use]
pub fn inspection_iri(n: u64) -> Iri {
    Iri::new(format!("{DATA}inspection_{n}"))
}

/// IRI of the score resource paired with the n-th inspection.
#[must_use]
pub fn inspection_score_iri(n: u64) -> Iri {
    Iri::new(format!("{DATA}inspection_score_{n}"))
}

/// Extract `n` from an `inspection_{n}` IRI.
///
/// Returns `None` for anything else, including `inspection_score_{n}` IRIs
/// (the remainder after the prefix must be all digits). Used to re-derive
/// the inspection counter from a loaded graph.
#[must_use]
pub fn inspection_index(iri: &Iri) -> Option<u64> {
    let digits = iri.as_str().strip_prefix(DATA)?.strip_prefix("inspection_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The suffix a part IRI must carry to belong to `asset_local` at `index`.
///
/// Includes the `/data/` path segment so that the suffix cannot match inside
/// a local name, and is exact on the index: `_part2` does not match
/// `_part20`.
#[must_use]
pub fn part_filter_suffix(asset_local: &str, index: u64) -> String {
    format!("/data/{asset_local}_part{index}")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_iris_follow_the_scheme() {
        assert_eq!(
            asset_iri("oosterscheldekering").as_str(),
            "https://data.rws.nl/data/oosterscheldekering"
        );
        assert_eq!(
            part_iri("oosterscheldekering", 0).as_str(),
            "https://data.rws.nl/data/oosterscheldekering_part0"
        );
        assert_eq!(
            inspection_iri(7).as_str(),
            "https://data.rws.nl/data/inspection_7"
        );
        assert_eq!(
            inspection_score_iri(7).as_str(),
            "https://data.rws.nl/data/inspection_score_7"
        );
    }

    #[test]
    fn inspection_index_roundtrips() {
        assert_eq!(inspection_index(&inspection_iri(0)), Some(0));
        assert_eq!(inspection_index(&inspection_iri(41)), Some(41));
    }

    #[test]
    fn inspection_index_ignores_score_resources() {
        assert_eq!(inspection_index(&inspection_score_iri(41)), None);
    }

    #[test]
    fn inspection_index_ignores_foreign_iris() {
        assert_eq!(inspection_index(&Iri::new("https://example.org/inspection_1")), None);
        assert_eq!(inspection_index(&asset_iri("inspection_house")), None);
        assert_eq!(inspection_index(&Iri::new(format!("{DATA}inspection_"))), None);
    }

    #[test]
    fn part_filter_suffix_is_index_exact() {
        let part20 = part_iri("oosterscheldekering", 20);
        assert!(part20.as_str().ends_with(&part_filter_suffix("oosterscheldekering", 20)));
        assert!(!part20.as_str().ends_with(&part_filter_suffix("oosterscheldekering", 2)));

        let part2 = part_iri("oosterscheldekering", 2);
        assert!(part2.as_str().ends_with(&part_filter_suffix("oosterscheldekering", 2)));
        assert!(!part2.as_str().ends_with(&part_filter_suffix("oosterscheldekering", 20)));
    }
}
