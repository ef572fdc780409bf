//! Validation of untrusted caller input
//!
//! Field lists and order-by strings are checked here before they reach the
//! sort builder or the shaping projector. Request bodies are validated by the
//! [`Validated`] extractor.

pub mod extractor;
pub mod fields;

pub use extractor::{Validated, ValidatedList};
pub use fields::{ensure_order_by_valid, ensure_type_has_fields, fields_are_valid, type_has_fields};
