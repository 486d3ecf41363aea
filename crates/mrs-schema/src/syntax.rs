//! The two syntax trees a mapper can hold

use std::fmt;

use mrs_ir::Direction;
use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::node;

/// Which half of the mapper a tree lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Input,
    Output,
}

impl Side {
    /// Element name of this side under the `Mapper` root
    #[must_use]
    pub fn element(self) -> &'static str {
        match self {
            Side::Input => "INPUT",
            Side::Output => "OUTPUT",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element())
    }
}

/// Shape of a syntax tree
///
/// | | EDI | XML |
/// |---|---|---|
/// | container | `EDISyntax` | `XMLSyntax` |
/// | groups | `Group` | `XMLElementGroup`, `XMLParticleGroup` |
/// | segments | `Segment` | `XMLRecord` |
/// | rule owner | segment name | enclosing group name |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Syntax {
    Edi,
    Xml,
}

impl Syntax {
    /// The syntax found on `side` for a mapper of the given direction
    #[must_use]
    pub fn for_side(direction: Direction, side: Side) -> Self {
        match (direction, side) {
            (Direction::Inbound, Side::Input) | (Direction::Outbound, Side::Output) => Syntax::Edi,
            (Direction::Inbound, Side::Output) | (Direction::Outbound, Side::Input) => Syntax::Xml,
        }
    }

    /// Element wrapping the tree under `INPUT`/`OUTPUT`
    #[must_use]
    pub fn container(self) -> &'static str {
        match self {
            Syntax::Edi => "EDISyntax",
            Syntax::Xml => "XMLSyntax",
        }
    }

    /// Whether an element is a group the walk recurses into
    #[must_use]
    pub fn is_group(self, tag: &str) -> bool {
        match self {
            Syntax::Edi => tag == "Group",
            Syntax::Xml => matches!(tag, "XMLElementGroup" | "XMLParticleGroup"),
        }
    }

    /// Whether an element is a segment (EDI) or record (XML)
    #[must_use]
    pub fn is_segment(self, tag: &str) -> bool {
        match self {
            Syntax::Edi => tag == "Segment",
            Syntax::Xml => tag == "XMLRecord",
        }
    }

    /// Display tag of a segment, terminated with `*`.
    ///
    /// XML records may carry a `Tag` distinct from their `Name`.
    #[must_use]
    pub fn segment_tag(self, segment: Node<'_, '_>) -> String {
        let tag = match self {
            Syntax::Edi => node::name(segment),
            Syntax::Xml => {
                let tag = node::prop_or_empty(segment, "Tag");
                if tag.is_empty() { node::name(segment) } else { tag }
            }
        };
        format!("{tag}*")
    }

    /// Name that rules on a segment and its fields are reported under
    #[must_use]
    pub fn rule_owner<'s>(self, group: &'s str, segment: &'s str) -> &'s str {
        match self {
            Syntax::Edi => segment,
            Syntax::Xml => group,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.container())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn sides_swap_with_direction() {
        assert_eq!(Syntax::for_side(Direction::Inbound, Side::Input), Syntax::Edi);
        assert_eq!(Syntax::for_side(Direction::Inbound, Side::Output), Syntax::Xml);
        assert_eq!(Syntax::for_side(Direction::Outbound, Side::Input), Syntax::Xml);
        assert_eq!(Syntax::for_side(Direction::Outbound, Side::Output), Syntax::Edi);
    }

    #[test]
    fn xml_record_tag_falls_back_to_name() {
        let doc = Document::parse(
            "<R><XMLRecord><Name>Header</Name><Tag>hdr</Tag></XMLRecord><XMLRecord><Name>Line</Name><Tag/></XMLRecord></R>",
        )
        .unwrap();
        let records: Vec<_> = doc.root_element().children().filter(|c| c.is_element()).collect();
        assert_eq!(Syntax::Xml.segment_tag(records[0]), "hdr*");
        assert_eq!(Syntax::Xml.segment_tag(records[1]), "Line*");
        assert_eq!(Syntax::Edi.segment_tag(records[0]), "Header*");
    }

    #[test]
    fn particle_groups_are_groups_only_in_xml() {
        assert!(Syntax::Xml.is_group("XMLParticleGroup"));
        assert!(!Syntax::Edi.is_group("XMLParticleGroup"));
        assert!(Syntax::Edi.is_segment("Segment"));
        assert!(!Syntax::Xml.is_segment("Segment"));
    }
}
