//! Direction and transaction-type detection

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

static TRANSACTION_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d{3})(?:_|\.|$)").expect("transaction type pattern"));

const INBOUND_MARKERS: [&str; 3] = ["_IN.", "_IN_", "_IN-"];
const OUTBOUND_MARKERS: [&str; 3] = ["_OUT.", "_OUT_", "_OUT-"];

/// Processing direction of an integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// EDI in, XML out
    Inbound,
    /// XML in, EDI out
    Outbound,
}

impl Direction {
    /// Lower-case name used in logs and file names
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of inspecting a report file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detected {
    pub direction: Direction,
    /// Three-digit transaction set code such as `850`, when the name carries one
    pub transaction_type: Option<String>,
}

/// Detect the direction and transaction type encoded in a file name.
///
/// The name is upper-cased first. `_IN` followed by `.`, `_` or `-` means
/// inbound and is checked before the symmetric `_OUT` marker. The
/// transaction type is the first underscore-prefixed run of three digits
/// followed by `_`, `.` or the end of the name; a missing transaction type
/// is not an error.
///
/// # Errors
///
/// Returns [`Error::ModeUndetectable`] when neither marker is present.
pub fn detect(file_name: &str) -> Result<Detected> {
    let upper = file_name.to_uppercase();

    let direction = if INBOUND_MARKERS.iter().any(|m| upper.contains(m)) {
        Direction::Inbound
    } else if OUTBOUND_MARKERS.iter().any(|m| upper.contains(m)) {
        Direction::Outbound
    } else {
        return Err(Error::mode_undetectable(file_name));
    };

    let transaction_type = TRANSACTION_TYPE
        .captures(&upper)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    debug!(file_name, %direction, ?transaction_type, "Detected report direction");

    Ok(Detected {
        direction,
        transaction_type,
    })
}
