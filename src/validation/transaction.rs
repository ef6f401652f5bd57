//! Transfer request validation.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. recipient present
//! 2. recipient well-formed
//! 3. value not negative

use alloy::primitives::{Address, Bytes, I256, U256};
use thiserror::Error;

use crate::validation::address::validate_address;

pub const RECIPIENT_REQUIRED: &str = "Recipient address is required";
pub const INVALID_RECIPIENT: &str = "Invalid recipient address";
pub const NEGATIVE_VALUE: &str = "Value cannot be negative";

/// A caller-supplied transfer, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient; empty means absent.
    pub to: String,
    /// Amount in wei. Signed so that bad input can be represented and rejected.
    pub value: I256,
    pub data: Option<Bytes>,
}

impl TransferRequest {
    pub fn new(to: impl Into<String>, value: I256) -> Self {
        Self {
            to: to.into(),
            value,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Bytes) -> Self {
        self.data = Some(data);
        self
    }

    /// Validate and convert into the typed form handed to the chain client.
    pub fn validate(&self) -> Result<ValidatedTransfer, ValidationError> {
        if let ValidationResult::Invalid(reason) = validate_transaction(self) {
            return Err(ValidationError(reason));
        }

        let to: Address = self
            .to
            .parse()
            .map_err(|_| ValidationError(INVALID_RECIPIENT.to_string()))?;

        Ok(ValidatedTransfer {
            to,
            value: self.value.into_raw(),
            data: self.data.clone().unwrap_or_default(),
        })
    }
}

/// A transfer that passed validation. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    to: Address,
    value: U256,
    data: Bytes,
}

impl ValidatedTransfer {
    pub fn to(&self) -> Address {
        self.to
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Result of [`validate_transaction`]. Never an error; always a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }
}

/// Rejected transfer input. Displays the failing rule's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Check a transfer request. Pure; the same input always yields the same
/// result.
pub fn validate_transaction(request: &TransferRequest) -> ValidationResult {
    if request.to.is_empty() {
        return ValidationResult::Invalid(RECIPIENT_REQUIRED.to_string());
    }

    if !validate_address(&request.to) {
        return ValidationResult::Invalid(INVALID_RECIPIENT.to_string());
    }

    if request.value.is_negative() {
        return ValidationResult::Invalid(NEGATIVE_VALUE.to_string());
    }

    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0x1234567890abcdef1234567890abcdef12345678";

    #[test]
    fn test_recipient_required_regardless_of_value() {
        for value in [I256::MINUS_ONE, I256::ZERO, I256::MAX] {
            assert_eq!(
                validate_transaction(&TransferRequest::new("", value)),
                ValidationResult::Invalid(RECIPIENT_REQUIRED.to_string())
            );
        }
    }

    #[test]
    fn test_invalid_recipient() {
        let result = validate_transaction(&TransferRequest::new("not-an-address", I256::ZERO));
        assert_eq!(result.error(), Some(INVALID_RECIPIENT));
    }

    #[test]
    fn test_address_checked_before_value() {
        let result = validate_transaction(&TransferRequest::new("bad", I256::MINUS_ONE));
        assert_eq!(result.error(), Some(INVALID_RECIPIENT));
    }

    #[test]
    fn test_negative_value() {
        let result = validate_transaction(&TransferRequest::new(VALID, I256::MINUS_ONE));
        assert_eq!(result.error(), Some(NEGATIVE_VALUE));
    }

    #[test]
    fn test_zero_value_is_valid() {
        let request = TransferRequest::new(VALID, I256::ZERO);
        assert!(validate_transaction(&request).is_valid());
        assert_eq!(validate_transaction(&request), validate_transaction(&request));
    }

    #[test]
    fn test_validate_converts() {
        let value = I256::try_from(1_000_000i64).unwrap();
        let request = TransferRequest::new(VALID, value).with_data(Bytes::from(vec![0xde, 0xad]));
        let transfer = request.validate().unwrap();
        assert_eq!(transfer.to(), VALID.parse::<Address>().unwrap());
        assert_eq!(transfer.value(), U256::from(1_000_000u64));
        assert_eq!(transfer.data().as_ref(), &[0xde, 0xad]);
    }

    #[test]
    fn test_validate_error_message() {
        let err = TransferRequest::new(VALID, I256::MINUS_ONE).validate().unwrap_err();
        assert_eq!(err.to_string(), NEGATIVE_VALUE);
    }
}
