//! Extended rules collected from the mapper definition

use std::fmt;

use serde::{Deserialize, Serialize};

/// When an extended rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "onBegin")]
    OnBegin,
    #[serde(rename = "onEnd")]
    OnEnd,
    #[serde(rename = "inline")]
    Inline,
    #[serde(rename = "preSession")]
    PreSession,
    #[serde(rename = "postSession")]
    PostSession,
}

impl RuleKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::OnBegin => "onBegin",
            RuleKind::OnEnd => "onEnd",
            RuleKind::Inline => "inline",
            RuleKind::PreSession => "preSession",
            RuleKind::PostSession => "postSession",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-blank rule attached to a group, segment or field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedRule {
    pub kind: RuleKind,
    /// `Segment` or `Segment.Field`
    pub context: String,
    pub rule: String,
    pub data_type: String,
}

impl ExtendedRule {
    /// Build a rule, trimming its text; blank text yields `None`.
    pub fn new(
        kind: RuleKind,
        context: impl Into<String>,
        rule: &str,
        data_type: impl Into<String>,
    ) -> Option<Self> {
        let rule = rule.trim();
        if rule.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            context: context.into(),
            rule: rule.to_string(),
            data_type: data_type.into(),
        })
    }

    /// Segment and field parts of the context, split on the first `.`
    #[must_use]
    pub fn context_parts(&self) -> (&str, &str) {
        self.context.split_once('.').unwrap_or((self.context.as_str(), ""))
    }
}

/// Every extended rule of one mapper, bucketed by the side it belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedRules {
    pub pre_session: String,
    pub post_session: String,
    /// Rules found on the side under `INPUT`
    pub input: Vec<ExtendedRule>,
    /// Rules found on the side under `OUTPUT`
    pub output: Vec<ExtendedRule>,
}

impl ExtendedRules {
    /// Total number of collected rules, session rules included
    #[must_use]
    pub fn len(&self) -> usize {
        let sessions = [&self.pre_session, &self.post_session]
            .iter()
            .filter(|rule| !rule.trim().is_empty())
            .count();
        sessions + self.input.len() + self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
