//! Flatten a syntax tree into segment descriptors

use mrs_ir::{ElementDescriptor, Requirement, SegmentDescriptor, capitalize};
use roxmltree::Node;

use crate::Result;
use crate::node;
use crate::syntax::Syntax;
use crate::walk::SyntaxVisitor;

/// Visitor collecting every segment (or record) in walk order
#[derive(Debug)]
pub struct SegmentCollector {
    syntax: Syntax,
    segments: Vec<SegmentDescriptor>,
}

impl SegmentCollector {
    #[must_use]
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<SegmentDescriptor> {
        self.segments
    }
}

impl<'a, 'input> SyntaxVisitor<'a, 'input> for SegmentCollector {
    fn segment(&mut self, _group: Node<'a, 'input>, segment: Node<'a, 'input>) -> Result<()> {
        self.segments.push(describe_segment(self.syntax, segment)?);
        Ok(())
    }
}

/// Describe one `Segment` or `XMLRecord` node and its fields.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidNumber`] when `Min`, `Max` or a field's
/// length limits are present but not integers.
pub fn describe_segment(syntax: Syntax, segment: Node<'_, '_>) -> Result<SegmentDescriptor> {
    let min = node::prop(segment, "Min");
    let elements = node::children(segment, "Field")
        .map(describe_field)
        .collect::<Result<Vec<_>>>()?;

    Ok(SegmentDescriptor {
        segment: node::name(segment),
        tag: syntax.segment_tag(segment),
        requirement: Requirement::from_min_use(min.as_deref().map(str::trim)),
        min_use: node::number(segment, "Min", 0)?,
        max_use: node::number(segment, "Max", 1)?,
        description: node::prop_or_empty(segment, "Description"),
        elements,
    })
}

/// Describe one `Field` node; length and type come from its `StoreLimit`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidNumber`] for non-integer length limits.
pub fn describe_field(field: Node<'_, '_>) -> Result<ElementDescriptor> {
    let limit = node::child(field, "StoreLimit");

    let (min_length, max_length, data_type, format) = match limit {
        Some(limit) => {
            let data_type = node::prop_or_empty(limit, "DataType");
            let format = node::prop_or_empty(limit, "Format");
            (
                node::number(limit, "MinLen", 0)?,
                node::number(limit, "MaxLen", 0)?,
                if data_type.is_empty() {
                    "string".to_string()
                } else {
                    data_type
                },
                (!format.is_empty()).then_some(format),
            )
        }
        None => (0, 0, "string".to_string(), None),
    };

    Ok(ElementDescriptor {
        element_id: format!("{}*", node::name(field)),
        description: node::prop_or_empty(field, "Description"),
        requirement: Requirement::from_mandatory_flag(node::prop(field, "Mandatory").as_deref().map(str::trim)),
        min_length,
        max_length,
        data_type: capitalize(&data_type),
        format,
    })
}
