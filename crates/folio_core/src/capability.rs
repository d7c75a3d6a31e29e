//! Write capability handed to the façade by the external admin gate.
//!
//! The core never checks passwords or reads ambient "is admin" state. Whoever
//! authenticates the operator mints an `AdminToken` and passes it into every
//! mutating façade call; holding one is the only proof the core requires.

use thiserror::Error;

const MAX_OPERATOR_CHARS: usize = 64;

/// Proof that the caller passed the admin gate.
///
/// Carries a short operator label used only for log attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken {
    operator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("operator label must not be empty")]
    EmptyOperator,
    #[error("operator label exceeds {} characters", MAX_OPERATOR_CHARS)]
    OperatorTooLong,
}

impl AdminToken {
    /// Mints a token for an operator the caller has already authenticated.
    ///
    /// The label is trimmed and must be a non-empty single line.
    pub fn issue(operator: &str) -> Result<Self, CapabilityError> {
        let label = operator.trim().replace(['\n', '\r'], " ");
        if label.is_empty() {
            return Err(CapabilityError::EmptyOperator);
        }
        if label.chars().count() > MAX_OPERATOR_CHARS {
            return Err(CapabilityError::OperatorTooLong);
        }
        Ok(Self { operator: label })
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }
}
