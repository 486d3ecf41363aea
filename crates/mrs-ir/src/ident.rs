//! Identifier normalization
//!
//! The text report and the mapper XML decorate the same identifiers
//! differently: the report terminates names with `*`, and the mapper prefixes
//! attribute-backed fields with `_attr_`. Both markers are removed before any
//! comparison.

const PRESENTATION_MARKER: char = '*';
const ATTRIBUTE_MARKER: &str = "_attr_";

/// Strip presentation and attribute markers from a segment or element id
///
/// Attribute markers are removed until none remain, so a marker exposed by
/// an earlier removal is stripped as well.
#[must_use]
pub fn normalize(id: &str) -> String {
    let mut normalized = id.replace(PRESENTATION_MARKER, "");
    while normalized.contains(ATTRIBUTE_MARKER) {
        normalized = normalized.replace(ATTRIBUTE_MARKER, "");
    }
    normalized
}

/// Compare two identifiers after normalizing both sides
#[must_use]
pub fn ids_match(left: &str, right: &str) -> bool {
    normalize(left) == normalize(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_both_markers() {
        assert_eq!(normalize("_attr_Qualifier*"), "Qualifier");
        assert_eq!(normalize("N1*"), "N1");
        assert_eq!(normalize("PlainName"), "PlainName");
    }

    #[test]
    fn is_idempotent() {
        for id in ["", "*", "_attr_", "BEG*01*", "_attr__attr_X", "a_attr_b*c", "_a_attr_ttr_"] {
            let once = normalize(id);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {id:?}");
        }
    }

    #[test]
    fn comparison_is_symmetric() {
        let pairs = [("BEG01*", "BEG01"), ("_attr_Id", "Id*"), ("REF02", "REF03")];
        for (a, b) in pairs {
            assert_eq!(ids_match(a, b), ids_match(b, a));
        }
        assert!(ids_match("BEG01*", "BEG01"));
        assert!(!ids_match("REF02", "REF03"));
    }

    #[test]
    fn occurrence_suffix_is_significant() {
        assert!(!ids_match("N101:2", "N101*"));
        assert!(ids_match("N101:2*", "N101:2"));
    }
}
