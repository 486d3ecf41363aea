#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # mrs-mapping
//!
//! Joins the mapping groups parsed from a report with the segment
//! descriptors and extended rules walked from its mapper, producing the rows
//! of the mapping requirement sheet.
//!
//! Reconciliation never fails: a mapping whose segment or element is absent
//! from the schema still yields a row, with empty metadata cells, and is
//! counted as a lookup miss.
//!
//! ## Example Usage
//!
//! ```rust
//! use mrs_ir::{FieldMapping, MappingGroup, ExtendedRules, TransformationLogic};
//! use mrs_mapping::Reconciler;
//!
//! let mut group = MappingGroup::new("BEG");
//! group.push(FieldMapping {
//!     input: "BEG03".into(),
//!     output_element: "PONumber".into(),
//!     output_segment: "Header".into(),
//!     ..Default::default()
//! });
//!
//! let result = Reconciler::new(&[], &[]).reconcile(&[group], &ExtendedRules::default());
//! assert_eq!(result.rows.len(), 1);
//! assert_eq!(result.rows[0].logic, TransformationLogic::DirectMapping);
//! assert_eq!(result.stats.lookup_misses, 2);
//! ```

pub mod lookup;
pub mod reconcile;

pub use lookup::find_element;
pub use reconcile::{Reconciler, Reconciliation, ReconcileStats};
