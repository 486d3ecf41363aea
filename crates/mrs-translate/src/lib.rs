#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-translate
//!
//! Translation of extended rules into target-runtime JavaScript.
//!
//! The [`RuleTranslator`] trait is the seam: [`ChatTranslator`] implements
//! it over any [`ChatClient`], and [`OpenAiClient`] is the HTTP client used
//! in production. [`annotate`] walks a reconciled table and fills the
//! generated-logic column row by row, recording failures in the row instead
//! of propagating them.
//!
//! ## Example Usage
//!
//! ```rust
//! use mrs_translate::decode_response;
//!
//! let js = decode_response("```json\n{\"js\": \"tmp.total = msg.qty;\"}\n```").unwrap();
//! assert_eq!(js, "tmp.total = msg.qty;");
//!
//! let js = decode_response(r#"{"js": "return 1;"}"#).unwrap();
//! assert!(js.starts_with("let tmp = {};"));
//! ```

pub mod annotate;
pub mod client;
pub mod config;
pub mod translator;

pub use annotate::{AnnotateOptions, AnnotationStats, PRESESSION_NOTE, annotate};
pub use client::{ChatClient, ChatMessage, OpenAiClient, Role};
pub use config::TranslationConfig;
pub use translator::{
    ChatTranslator, RuleRequest, RuleTranslator, decode_response, extract_declarations,
};

use thiserror::Error;

/// Errors that can occur while translating rules
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure or non-success status from the model endpoint
    #[error("{0}")]
    Api(String),

    /// The model answered, but not with the expected JSON object
    #[error("{message}")]
    Response { message: String, raw: String },

    #[error("Translation configuration error: {0}")]
    Config(String),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build an I/O error with the path involved.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
