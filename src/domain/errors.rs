//! Domain-level error types.
//!
//! Errors raised by entities, value objects, and domain services while
//! enforcing negotiation rules. Application services wrap these in
//! [`ApplicationError`](crate::application::error::ApplicationError)
//! before they cross the service boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::value_objects::{ArithmeticError, ClauseKind, ProposalState, ResponseState};

/// Errors produced while enforcing domain rules.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A field failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A quantity was malformed or out of range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A validity window ends before it starts.
    #[error("invalid date range: valid_from {from} is after valid_until {until}")]
    InvalidDateRange {
        /// Start of the validity window.
        from: NaiveDate,
        /// End of the validity window.
        until: NaiveDate,
    },

    /// A clause was rejected without a counter-proposal or explanation.
    #[error("clause '{0}' rejected without justification")]
    MissingJustification(ClauseKind),

    /// A structured price total does not match the sum of its variables.
    #[error("declared price total {declared} does not match computed sum {computed}")]
    PriceTotalMismatch {
        /// Total declared by the submitter.
        declared: Decimal,
        /// Total recomputed from the price variables.
        computed: Decimal,
    },

    /// The proposing party has not accepted the derived management fee.
    #[error("management fee has not been accepted")]
    ManagementFeeNotAccepted,

    /// The responding party has not accepted the mirrored penalty fee.
    #[error("penalty fee has not been accepted")]
    PenaltyFeeNotAccepted,

    /// A response carries a penalty fee different from the proposal's
    /// management fee.
    #[error("penalty fee {actual} does not mirror management fee {expected}")]
    PenaltyFeeMismatch {
        /// Management fee stored on the proposal.
        expected: Decimal,
        /// Penalty fee carried by the response.
        actual: Decimal,
    },

    /// A response requests more volume than the proposal has left.
    #[error("requested quantity {requested} kg exceeds available {available} kg")]
    QuantityExceedsAvailable {
        /// Volume requested by the response.
        requested: Decimal,
        /// Volume still available on the proposal.
        available: Decimal,
    },

    /// A rejection was attempted without a reason.
    #[error("rejection reason must not be empty")]
    EmptyRejectionReason,

    /// A proposal state transition is not permitted.
    #[error("invalid proposal state transition from {from} to {to}")]
    InvalidProposalStateTransition {
        /// State the proposal is currently in.
        from: ProposalState,
        /// State the transition attempted to reach.
        to: ProposalState,
    },

    /// A response state transition is not permitted.
    #[error("invalid response state transition from {from} to {to}")]
    InvalidResponseStateTransition {
        /// State the response is currently in.
        from: ResponseState,
        /// State the transition attempted to reach.
        to: ResponseState,
    },

    /// Arithmetic failed while deriving a value.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates a validation error from any message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Creates an invalid-quantity error from any message.
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    /// Returns `true` when the error stems from user-correctable input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidQuantity(_)
                | Self::InvalidDateRange { .. }
                | Self::MissingJustification(_)
                | Self::PriceTotalMismatch { .. }
                | Self::EmptyRejectionReason
        )
    }

    /// Returns `true` when the error is a fee acceptance or mirroring failure.
    #[must_use]
    pub const fn is_fee_violation(&self) -> bool {
        matches!(
            self,
            Self::ManagementFeeNotAccepted
                | Self::PenaltyFeeNotAccepted
                | Self::PenaltyFeeMismatch { .. }
        )
    }

    /// Returns `true` when the error is a state machine violation.
    #[must_use]
    pub const fn is_state_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidProposalStateTransition { .. }
                | Self::InvalidResponseStateTransition { .. }
        )
    }
}

/// Convenience alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn validation_helper_builds_variant() {
        let err = DomainError::validation("name must not be empty");
        assert!(matches!(err, DomainError::ValidationError(_)));
        assert_eq!(err.to_string(), "validation error: name must not be empty");
    }

    #[test]
    fn invalid_quantity_helper_builds_variant() {
        let err = DomainError::invalid_quantity("quantity must be positive");
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
    }

    #[test]
    fn proposal_transition_error_names_both_states() {
        let err = DomainError::InvalidProposalStateTransition {
            from: ProposalState::Sold,
            to: ProposalState::Active,
        };
        let msg = err.to_string();
        assert!(msg.contains("SOLD"));
        assert!(msg.contains("ACTIVE"));
    }

    #[test]
    fn response_transition_error_names_both_states() {
        let err = DomainError::InvalidResponseStateTransition {
            from: ResponseState::Accepted,
            to: ResponseState::PendingBuyer,
        };
        let msg = err.to_string();
        assert!(msg.contains("ACCEPTED"));
        assert!(msg.contains("PENDING_BUYER"));
    }

    #[test]
    fn penalty_mismatch_reports_both_values() {
        let err = DomainError::PenaltyFeeMismatch {
            expected: Decimal::new(832, 1),
            actual: Decimal::new(60, 0),
        };
        let msg = err.to_string();
        assert!(msg.contains("83.2"));
        assert!(msg.contains("60"));
    }

    #[test]
    fn arithmetic_error_converts_via_from() {
        let err: DomainError = ArithmeticError::DivisionByZero.into();
        assert!(matches!(
            err,
            DomainError::Arithmetic(ArithmeticError::DivisionByZero)
        ));
    }

    #[test]
    fn predicates_classify_variants() {
        assert!(DomainError::validation("x").is_validation());
        assert!(DomainError::EmptyRejectionReason.is_validation());
        assert!(DomainError::ManagementFeeNotAccepted.is_fee_violation());
        assert!(DomainError::PenaltyFeeNotAccepted.is_fee_violation());
        assert!(
            DomainError::InvalidProposalStateTransition {
                from: ProposalState::PendingAdmin,
                to: ProposalState::Sold,
            }
            .is_state_violation()
        );
        assert!(!DomainError::ManagementFeeNotAccepted.is_validation());
        assert!(!DomainError::validation("x").is_state_violation());
    }
}
