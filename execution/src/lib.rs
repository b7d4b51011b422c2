//! FILENAME: execution/src/lib.rs
//! Execution model and shared services for the visualization transforms.
//!
//! Every visualization consumes the same execution triple (request, response,
//! result) produced by the data-execution engine. This crate owns that wire
//! model together with the pieces all transforms share.
//!
//! Layers:
//! - `model`: Serializable execution triple (WHAT was computed)
//! - `validate`: Shape checks at the input boundary
//! - `format`: Format-pattern parser and value formatter
//! - `number_format`: General number rendering and axis abbreviations
//! - `drill`: Identifier resolution, drillability matching, drill events
//! - `error`: Error taxonomy shared by all transforms

pub mod common;
pub mod drill;
pub mod error;
pub mod format;
pub mod model;
pub mod number_format;
pub mod validate;

pub use common::{get_attribute_element_id_from_uri, parse_value};
pub use drill::*;
pub use error::{FormatError, TransformError, TransformResult, ValidationError};
pub use format::{format_value, FormattedValue, ParsedFormat, EMPTY_VALUE_MARKER};
pub use model::*;
pub use number_format::{abbreviate_number, format_general, NumericSymbols};
pub use validate::{validate_execution, ExecutionTriple};
