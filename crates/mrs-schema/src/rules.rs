//! Extended rule collection

use mrs_ir::{ExtendedRule, RuleKind, capitalize};
use roxmltree::Node;
use tracing::trace;

use crate::Result;
use crate::node;
use crate::syntax::Syntax;
use crate::walk::SyntaxVisitor;

/// Visitor collecting the begin/end and field rules of one syntax tree.
///
/// Per group the order is the group's own rules, then the rules of each
/// segment. An EDI segment yields its begin/end rules before its active field
/// rules; an XML record yields its field rules first.
#[derive(Debug)]
pub struct RuleCollector {
    syntax: Syntax,
    rules: Vec<ExtendedRule>,
}

impl RuleCollector {
    #[must_use]
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_rules(self) -> Vec<ExtendedRule> {
        self.rules
    }

    fn begin_end(&mut self, owner: Node<'_, '_>, context: &str) {
        let Some(block) = node::child(owner, "ExplicitRule") else {
            return;
        };
        for (kind, tag) in [(RuleKind::OnBegin, "OnBegin"), (RuleKind::OnEnd, "OnEnd")] {
            let text = node::child(block, tag).map(node::text).unwrap_or_default();
            self.push(ExtendedRule::new(kind, context, &text, ""));
        }
    }

    fn fields(&mut self, segment: Node<'_, '_>, owner: &str) {
        for field in node::children(segment, "Field") {
            self.push(inline_rule(field, owner));
        }
    }

    fn push(&mut self, rule: Option<ExtendedRule>) {
        if let Some(rule) = rule {
            trace!(kind = %rule.kind, context = %rule.context, "Collected rule");
            self.rules.push(rule);
        }
    }
}

impl<'a, 'input> SyntaxVisitor<'a, 'input> for RuleCollector {
    fn group(&mut self, group: Node<'a, 'input>) -> Result<()> {
        let name = node::name(group);
        self.begin_end(group, &name);
        Ok(())
    }

    fn segment(&mut self, group: Node<'a, 'input>, segment: Node<'a, 'input>) -> Result<()> {
        let group_name = node::name(group);
        let segment_name = node::name(segment);
        let owner = self.syntax.rule_owner(&group_name, &segment_name).to_string();

        match self.syntax {
            Syntax::Edi => {
                self.begin_end(segment, &owner);
                self.fields(segment, &owner);
            }
            Syntax::Xml => {
                self.fields(segment, &owner);
                self.begin_end(segment, &owner);
            }
        }
        Ok(())
    }
}

/// Inline rule of an active field, with context `owner.FieldName`
fn inline_rule(field: Node<'_, '_>, owner: &str) -> Option<ExtendedRule> {
    let text = node::child(field, "ExplicitRule").map(node::text)?;
    let active = node::prop(field, "Active");
    if active.as_deref().map(str::trim) != Some("1") {
        return None;
    }

    let data_type = node::child(field, "StoreLimit")
        .map(|limit| capitalize(&node::prop_or_empty(limit, "DataType")))
        .unwrap_or_default();
    let context = format!("{owner}.{}", node::name(field));
    ExtendedRule::new(RuleKind::Inline, context, &text, data_type)
}
