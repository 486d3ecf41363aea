//! Flattened schema descriptors

use serde::{Deserialize, Serialize};

/// Whether a segment or element must be present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Mandatory,
    #[default]
    Conditional,
}

impl Requirement {
    /// Segment-level rule: mandatory iff the declared minimum use is exactly `"1"`
    #[must_use]
    pub fn from_min_use(min: Option<&str>) -> Self {
        if min == Some("1") {
            Self::Mandatory
        } else {
            Self::Conditional
        }
    }

    /// Element-level rule: mandatory iff the flag reads `yes` in any case
    #[must_use]
    pub fn from_mandatory_flag(flag: Option<&str>) -> Self {
        if flag.is_some_and(|f| f.eq_ignore_ascii_case("yes")) {
            Self::Mandatory
        } else {
            Self::Conditional
        }
    }

    /// `Mandatory` / `Conditional`, as shown for segments
    #[must_use]
    pub fn as_word(self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::Conditional => "Conditional",
        }
    }

    /// `M` / `C`, as shown for elements
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Mandatory => "M",
            Self::Conditional => "C",
        }
    }
}

/// A segment (EDI side) or record (XML side) with its fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub segment: String,
    pub tag: String,
    pub requirement: Requirement,
    pub min_use: usize,
    pub max_use: usize,
    pub description: String,
    pub elements: Vec<ElementDescriptor>,
}

/// A field within a segment or record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub element_id: String,
    pub description: String,
    pub requirement: Requirement,
    pub min_length: usize,
    pub max_length: usize,
    pub data_type: String,
    pub format: Option<String>,
}

/// Upper-case the first character and lower-case the rest, e.g. `NUMBER` → `Number`
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
