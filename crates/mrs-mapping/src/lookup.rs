//! Schema lookup by normalized segment and element id

use mrs_ir::{ElementDescriptor, SegmentDescriptor, ids_match};

/// Find the element `element` of segment `segment`, comparing both through
/// the identifier normalizer. The first matching segment that contains a
/// matching element wins.
#[must_use]
pub fn find_element<'a>(
    segments: &'a [SegmentDescriptor],
    segment: &str,
    element: &str,
) -> Option<&'a ElementDescriptor> {
    segments
        .iter()
        .filter(|candidate| ids_match(&candidate.segment, segment))
        .flat_map(|candidate| candidate.elements.iter())
        .find(|candidate| ids_match(&candidate.element_id, element))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, elements: &[(&str, &str)]) -> SegmentDescriptor {
        SegmentDescriptor {
            segment: name.to_string(),
            tag: format!("{name}*"),
            elements: elements
                .iter()
                .map(|(id, description)| ElementDescriptor {
                    element_id: format!("{id}*"),
                    description: (*description).to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn matches_through_normalizer() {
        let segments = vec![segment("N1", &[("_attr_N101", "Entity Code")])];
        let found = find_element(&segments, "N1*", "N101").unwrap();
        assert_eq!(found.description, "Entity Code");
    }

    #[test]
    fn first_match_wins_across_duplicate_segments() {
        let segments = vec![
            segment("REF", &[("REF01", "first")]),
            segment("REF", &[("REF01", "second"), ("REF02", "only in second")]),
        ];
        assert_eq!(find_element(&segments, "REF", "REF01").unwrap().description, "first");
        assert_eq!(
            find_element(&segments, "REF", "REF02").unwrap().description,
            "only in second"
        );
    }

    #[test]
    fn occurrence_suffix_must_match_exactly() {
        let segments = vec![segment("N1", &[("N101", "")])];
        assert!(find_element(&segments, "N1:2", "N101").is_none());
        assert!(find_element(&segments, "N1", "N101:2").is_none());
        assert!(find_element(&[], "N1", "N101").is_none());
    }
}
