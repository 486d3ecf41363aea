//! Property access on mapper nodes
//!
//! Mapper exports are not consistent about attributes versus child
//! elements: `Active` shows up both as `Active="1"` and as `<Active>1</Active>`,
//! and hand-edited files do the same with `Min`, `Name` and friends. Every
//! property is therefore read from the attribute first and from a child
//! element second.

use roxmltree::Node;

use crate::{Error, Result};

/// First element child with the given tag name
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Element children with the given tag name, in document order
pub fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

/// Follow a path of element names from `node`
pub fn descend<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, name| child(current, name))
}

/// Concatenated direct text content of an element
pub fn text(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|c| c.text())
        .collect()
}

/// Whether the element has element children (a structured block rather than text)
pub fn has_element_children(node: Node<'_, '_>) -> bool {
    node.children().any(|c| c.is_element())
}

/// Property from an attribute, falling back to a child element's text
pub fn prop(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::to_string)
        .or_else(|| child(node, name).map(text))
}

/// Non-empty trimmed property, or an empty string
pub fn prop_or_empty(node: Node<'_, '_>, name: &str) -> String {
    prop(node, name)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// `Name` property, the identity of groups, segments, records and fields
pub fn name(node: Node<'_, '_>) -> String {
    prop_or_empty(node, "Name")
}

/// Parse an integer property; absent or blank values yield `default`.
///
/// # Errors
///
/// Returns [`Error::InvalidNumber`] when the value is present but not a
/// non-negative integer.
pub fn number(node: Node<'_, '_>, property: &str, default: usize) -> Result<usize> {
    let Some(raw) = prop(node, property) else {
        return Ok(default);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(default);
    }
    value.parse().map_err(|_| Error::InvalidNumber {
        node: owner_name(node),
        property: property.to_string(),
        value: value.to_string(),
    })
}

fn owner_name(node: Node<'_, '_>) -> String {
    let name = name(node);
    if name.is_empty() {
        node.tag_name().name().to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn prop_prefers_attribute_over_child() {
        let doc = Document::parse(r#"<Field Active="1"><Active>0</Active><Name>N101</Name></Field>"#)
            .unwrap();
        let field = doc.root_element();
        assert_eq!(prop(field, "Active").as_deref(), Some("1"));
        assert_eq!(prop(field, "Name").as_deref(), Some("N101"));
        assert_eq!(prop(field, "Missing"), None);
    }

    #[test]
    fn text_joins_cdata_and_text() {
        let doc = Document::parse("<R>if (x) <![CDATA[a < b]]> end</R>").unwrap();
        assert_eq!(text(doc.root_element()), "if (x) a < b end");
    }

    #[test]
    fn number_defaults_and_errors() {
        let doc = Document::parse("<Segment><Name>BEG</Name><Min>1</Min><Max> </Max><Bad>x</Bad></Segment>")
            .unwrap();
        let seg = doc.root_element();
        assert_eq!(number(seg, "Min", 0).unwrap(), 1);
        assert_eq!(number(seg, "Max", 1).unwrap(), 1);
        assert_eq!(number(seg, "Absent", 7).unwrap(), 7);

        match number(seg, "Bad", 0).unwrap_err() {
            Error::InvalidNumber { node, property, value } => {
                assert_eq!(node, "BEG");
                assert_eq!(property, "Bad");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn descend_follows_element_path() {
        let doc = Document::parse("<Mapper><INPUT><EDISyntax><Group/></EDISyntax></INPUT></Mapper>")
            .unwrap();
        let found = descend(doc.root_element(), &["INPUT", "EDISyntax", "Group"]);
        assert!(found.is_some());
        assert!(descend(doc.root_element(), &["OUTPUT"]).is_none());
    }
}
