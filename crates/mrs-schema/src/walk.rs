//! Generic depth-first walk over a syntax tree

use roxmltree::Node;

use crate::Result;
use crate::syntax::Syntax;

/// Callbacks invoked while walking a syntax tree
pub trait SyntaxVisitor<'a, 'input> {
    /// Called for every group, before its segments and sub-groups
    fn group(&mut self, _group: Node<'a, 'input>) -> Result<()> {
        Ok(())
    }

    /// Called for every segment (EDI) or record (XML) with its enclosing group
    fn segment(&mut self, group: Node<'a, 'input>, segment: Node<'a, 'input>) -> Result<()>;
}

/// Walk `groups` depth-first: each group, then its segments, then its
/// sub-groups. Elements that are neither are ignored.
///
/// # Errors
///
/// Propagates the first error returned by the visitor.
pub fn walk<'a, 'input, V>(
    syntax: Syntax,
    groups: impl IntoIterator<Item = Node<'a, 'input>>,
    visitor: &mut V,
) -> Result<()>
where
    'input: 'a,
    V: SyntaxVisitor<'a, 'input>,
{
    for group in groups {
        walk_group(syntax, group, visitor)?;
    }
    Ok(())
}

fn walk_group<'a, 'input, V>(syntax: Syntax, group: Node<'a, 'input>, visitor: &mut V) -> Result<()>
where
    'input: 'a,
    V: SyntaxVisitor<'a, 'input>,
{
    visitor.group(group)?;

    for segment in group
        .children()
        .filter(|c| c.is_element() && syntax.is_segment(c.tag_name().name()))
    {
        visitor.segment(group, segment)?;
    }

    for sub_group in group
        .children()
        .filter(|c| c.is_element() && syntax.is_group(c.tag_name().name()))
    {
        walk_group(syntax, sub_group, visitor)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node;
    use roxmltree::Document;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl<'a, 'input> SyntaxVisitor<'a, 'input> for Trace {
        fn group(&mut self, group: Node<'a, 'input>) -> Result<()> {
            self.0.push(format!("group {}", node::name(group)));
            Ok(())
        }

        fn segment(&mut self, group: Node<'a, 'input>, segment: Node<'a, 'input>) -> Result<()> {
            self.0
                .push(format!("segment {}/{}", node::name(group), node::name(segment)));
            Ok(())
        }
    }

    #[test]
    fn edi_walk_visits_segments_before_sub_groups() {
        let doc = Document::parse(
            r#"<EDISyntax>
                 <Group Name="ST">
                   <Group Name="N1Loop"><Segment Name="N1"/></Group>
                   <Segment Name="BEG"/>
                   <Segment Name="DTM"/>
                 </Group>
               </EDISyntax>"#,
        )
        .unwrap();
        let mut trace = Trace::default();
        let roots = node::children(doc.root_element(), "Group");
        walk(Syntax::Edi, roots, &mut trace).unwrap();

        assert_eq!(
            trace.0,
            vec![
                "group ST",
                "segment ST/BEG",
                "segment ST/DTM",
                "group N1Loop",
                "segment N1Loop/N1",
            ]
        );
    }

    #[test]
    fn xml_walk_descends_through_particle_groups() {
        let doc = Document::parse(
            r#"<XMLSyntax>
                 <XMLElementGroup Name="Order">
                   <XMLRecord Name="OrderRec"/>
                   <XMLParticleGroup>
                     <XMLElementGroup Name="Line"><XMLRecord Name="LineRec"/></XMLElementGroup>
                   </XMLParticleGroup>
                   <XMLElementGroup Name="Notes"/>
                 </XMLElementGroup>
               </XMLSyntax>"#,
        )
        .unwrap();
        let mut trace = Trace::default();
        let roots = node::children(doc.root_element(), "XMLElementGroup");
        walk(Syntax::Xml, roots, &mut trace).unwrap();

        assert_eq!(
            trace.0,
            vec![
                "group Order",
                "segment Order/OrderRec",
                "group ",
                "group Line",
                "segment Line/LineRec",
                "group Notes",
            ]
        );
    }
}
