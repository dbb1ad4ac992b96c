//! JSON batch import: boundary unwrapping and per-item validation

mod batch;
mod error;

pub use batch::{
    BatchOutcome, IMPORT_TEMPLATE, RawTaskItem, import_batch, parse_batch, unwrap_batch, validate_batch,
};
pub use error::{ImportError, ItemProblem, ParseError};
