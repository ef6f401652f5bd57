//! Input validation.
//!
//! Pure checks that run before any side effect. Nothing here performs I/O.

pub mod address;
pub mod field;
pub mod transaction;

pub use address::validate_address;
pub use field::{validate_email, validate_field, validate_url, FieldRule, FieldType, FieldValue};
pub use transaction::{
    validate_transaction, TransferRequest, ValidatedTransfer, ValidationError, ValidationResult,
};
