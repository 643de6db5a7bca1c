//! # Fee Value Object
//!
//! Per-kilogram fee in COP.
//!
//! The same type carries both sides of the fee mirror: the management fee a
//! proposal author agrees to pay per kilogram posted, and the breach penalty
//! a responder accepts per kilogram committed. The two must be equal on any
//! given negotiation, which is why comparisons are plain equality on the
//! stored value rather than a re-derivation.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::fee::FeePerKg;
//! use rust_decimal::Decimal;
//!
//! let management = FeePerKg::new(Decimal::new(832, 1)).unwrap();
//! let penalty = FeePerKg::new(Decimal::new(832, 1)).unwrap();
//! assert_eq!(management, penalty);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative fee per kilogram, denominated in COP.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::fee::FeePerKg;
/// use rust_decimal::Decimal;
///
/// let fee = FeePerKg::new(Decimal::new(200, 0)).unwrap();
/// assert_eq!(fee.to_string(), "200");
/// assert!(FeePerKg::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct FeePerKg(Decimal);

impl FeePerKg {
    /// Creates a fee from a decimal COP-per-kg value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is negative.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::ValidationError(format!(
                "fee per kg cannot be negative: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Creates a fee from a float COP-per-kg value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is negative or not
    /// representable as a decimal.
    pub fn from_f64(value: f64) -> DomainResult<Self> {
        let decimal = Decimal::try_from(value)
            .map_err(|_| DomainError::ValidationError(format!("not representable: {value}")))?;
        Self::new(decimal)
    }

    /// Wraps a schedule-derived value without validation.
    pub(crate) const fn from_raw(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the COP-per-kg amount as a decimal.
    #[inline]
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for FeePerKg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
