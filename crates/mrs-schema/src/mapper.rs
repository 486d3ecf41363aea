//! Mapper document access

use std::fs;
use std::path::Path;

use mrs_ir::{Direction, ExtendedRule, ExtendedRules, SegmentDescriptor};
use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::rules::RuleCollector;
use crate::schema::SegmentCollector;
use crate::syntax::{Side, Syntax};
use crate::walk::walk;
use crate::{Error, Result, node};

const ROOT: &str = "Mapper";

/// Read a mapper file into memory.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
pub fn read_mapper(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))
}

/// Segment descriptors of both sides of a mapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperSchema {
    pub input: Vec<SegmentDescriptor>,
    pub output: Vec<SegmentDescriptor>,
}

/// A parsed mapper definition
pub struct Mapper<'input> {
    doc: Document<'input>,
}

impl<'input> Mapper<'input> {
    /// Parse mapper XML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Xml`] for malformed XML and [`Error::MissingNode`]
    /// when the root element is not `Mapper`.
    pub fn parse(text: &'input str) -> Result<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options)?;
        if doc.root_element().tag_name().name() != ROOT {
            return Err(Error::MissingNode(ROOT.to_string()));
        }
        Ok(Self { doc })
    }

    fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }

    /// Top-level groups of one side. A side without the expected syntax
    /// container yields no groups.
    pub fn side_roots(&self, side: Side, syntax: Syntax) -> Vec<Node<'_, 'input>> {
        let Some(container) = node::descend(self.root(), &[side.element(), syntax.container()]) else {
            warn!(%side, %syntax, "Mapper has no syntax tree on this side");
            return Vec::new();
        };
        container
            .children()
            .filter(|c| c.is_element() && syntax.is_group(c.tag_name().name()))
            .collect()
    }

    /// Flattened segments of one side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] for malformed numeric properties.
    pub fn segments(&self, side: Side, syntax: Syntax) -> Result<Vec<SegmentDescriptor>> {
        let mut collector = SegmentCollector::new(syntax);
        walk(syntax, self.side_roots(side, syntax), &mut collector)?;
        let segments = collector.into_segments();
        debug!(%side, %syntax, segments = segments.len(), "Flattened schema");
        Ok(segments)
    }

    /// Begin/end and field rules of one side.
    ///
    /// # Errors
    ///
    /// Propagates walk errors.
    pub fn side_rules(&self, side: Side, syntax: Syntax) -> Result<Vec<ExtendedRule>> {
        let mut collector = RuleCollector::new(syntax);
        walk(syntax, self.side_roots(side, syntax), &mut collector)?;
        Ok(collector.into_rules())
    }

    /// Pre- and post-session rule text, trimmed; empty when absent
    #[must_use]
    pub fn session_rules(&self) -> (String, String) {
        let block = node::descend(self.root(), &["MapDetails", "ExplicitRule"]);
        let read = |tag: &str| {
            block
                .and_then(|b| node::child(b, tag))
                .map(|n| node::text(n).trim().to_string())
                .unwrap_or_default()
        };
        (read("PreSessionRule"), read("PostSessionRule"))
    }

    /// Segment descriptors of both sides for the given direction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] for malformed numeric properties.
    pub fn schema(&self, direction: Direction) -> Result<MapperSchema> {
        Ok(MapperSchema {
            input: self.segments(Side::Input, Syntax::for_side(direction, Side::Input))?,
            output: self.segments(Side::Output, Syntax::for_side(direction, Side::Output))?,
        })
    }

    /// Every extended rule, bucketed by side.
    ///
    /// # Errors
    ///
    /// Propagates walk errors.
    pub fn extended_rules(&self, direction: Direction) -> Result<ExtendedRules> {
        let (pre_session, post_session) = self.session_rules();
        let rules = ExtendedRules {
            pre_session,
            post_session,
            input: self.side_rules(Side::Input, Syntax::for_side(direction, Side::Input))?,
            output: self.side_rules(Side::Output, Syntax::for_side(direction, Side::Output))?,
        };
        debug!(
            %direction,
            input = rules.input.len(),
            output = rules.output.len(),
            "Collected extended rules"
        );
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrs_ir::RuleKind;

    const INBOUND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE Mapper>
<Mapper>
  <MapDetails>
    <ExplicitRule>
      <PreSessionRule>  string[10] batch;  </PreSessionRule>
      <PostSessionRule/>
    </ExplicitRule>
  </MapDetails>
  <INPUT>
    <EDISyntax>
      <Group Name="ST">
        <Segment Name="BEG" Min="1">
          <Field Name="BEG03" Active="1">
            <ExplicitRule>po = BEG03;</ExplicitRule>
            <StoreLimit MaxLen="22" DataType="string"/>
          </Field>
        </Segment>
      </Group>
    </EDISyntax>
  </INPUT>
  <OUTPUT>
    <XMLSyntax>
      <XMLElementGroup Name="Order">
        <XMLRecord Name="Header">
          <Field Name="PONumber"/>
        </XMLRecord>
      </XMLElementGroup>
    </XMLSyntax>
  </OUTPUT>
</Mapper>"#;

    #[test]
    fn inbound_mapper_sides() {
        let mapper = Mapper::parse(INBOUND).unwrap();
        let schema = mapper.schema(Direction::Inbound).unwrap();

        assert_eq!(schema.input.len(), 1);
        assert_eq!(schema.input[0].segment, "BEG");
        assert_eq!(schema.output.len(), 1);
        assert_eq!(schema.output[0].elements[0].element_id, "PONumber*");
    }

    #[test]
    fn wrong_direction_finds_nothing() {
        let mapper = Mapper::parse(INBOUND).unwrap();
        let schema = mapper.schema(Direction::Outbound).unwrap();
        assert!(schema.input.is_empty());
        assert!(schema.output.is_empty());
    }

    #[test]
    fn extended_rules_include_sessions() {
        let mapper = Mapper::parse(INBOUND).unwrap();
        let rules = mapper.extended_rules(Direction::Inbound).unwrap();

        assert_eq!(rules.pre_session, "string[10] batch;");
        assert_eq!(rules.post_session, "");
        assert_eq!(rules.input.len(), 1);
        assert_eq!(rules.input[0].kind, RuleKind::Inline);
        assert_eq!(rules.input[0].context, "BEG.BEG03");
        assert!(rules.output.is_empty());
    }

    #[test]
    fn rejects_foreign_root() {
        let err = Mapper::parse("<Map/>").err().unwrap();
        assert!(matches!(err, Error::MissingNode(ref n) if n == "Mapper"));
    }

    #[test]
    fn rejects_malformed_xml() {
        let err = Mapper::parse("<Mapper><INPUT></Mapper>").err().unwrap();
        assert!(matches!(err, Error::Xml(_)));
    }
}
