#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-schema
//!
//! Mapper XML loader with schema and extended-rule tree walkers.
//!
//! A mapper definition holds two syntax trees, one under `INPUT` and one
//! under `OUTPUT`. Inbound mappers put the EDI tree (`Group` / `Segment` /
//! `Field`) on the input side and the XML tree (`XMLElementGroup` /
//! `XMLRecord` / `Field`) on the output side; outbound mappers swap them.
//! Both trees are walked by the same recursion ([`walk`]), parameterized by
//! [`Syntax`] and by a visitor that either flattens segments or collects
//! rules.
//!
//! ## Example Usage
//!
//! ```rust
//! use mrs_ir::Direction;
//! use mrs_schema::Mapper;
//!
//! let xml = r#"<Mapper>
//!   <INPUT><EDISyntax><Group Name="ST"><Segment Name="BEG" Min="1"/></Group></EDISyntax></INPUT>
//! </Mapper>"#;
//!
//! let mapper = Mapper::parse(xml).unwrap();
//! let schema = mapper.schema(Direction::Inbound).unwrap();
//! assert_eq!(schema.input[0].tag, "BEG*");
//! assert!(schema.output.is_empty());
//! ```

pub mod mapper;
pub mod node;
pub mod rules;
pub mod schema;
pub mod syntax;
pub mod walk;

pub use mapper::{Mapper, MapperSchema, read_mapper};
pub use rules::RuleCollector;
pub use schema::{SegmentCollector, describe_field, describe_segment};
pub use syntax::{Side, Syntax};
pub use walk::{SyntaxVisitor, walk};

use thiserror::Error;

/// Errors that can occur when loading or walking a mapper
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mapper XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Required node not found: {0}")]
    MissingNode(String),

    #[error("Invalid number for {property} on '{node}': '{value}'")]
    InvalidNumber {
        node: String,
        property: String,
        value: String,
    },
}

impl Error {
    /// Build an I/O error with the path being read.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
