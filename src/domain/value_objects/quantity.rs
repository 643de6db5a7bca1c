//! # Quantity Value Object
//!
//! Material volume in kilograms.
//!
//! Every volume on the platform (posted stock, requested amounts, commitment
//! volumes, per-delivery splits) is normalized to kilograms and carried as a
//! [`Quantity`]. The fee schedule and all stock arithmetic operate on this
//! type.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::quantity::Quantity;
//!
//! let posted = Quantity::new(1000.0).unwrap();
//! let requested = Quantity::new(400.0).unwrap();
//!
//! let remaining = posted.safe_sub(requested).unwrap();
//! assert_eq!(remaining, Quantity::new(600.0).unwrap());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative material volume in kilograms.
///
/// # Invariants
///
/// - Never negative; subtraction that would cross zero fails with
///   [`ArithmeticError::Underflow`]
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::quantity::Quantity;
///
/// let qty = Quantity::new(2500.0).unwrap();
/// assert_eq!(qty.tons().to_string(), "2.5");
/// assert!(Quantity::new(-1.0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Creates a quantity from a kilogram amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if the value is negative or not
    /// representable as a decimal.
    pub fn new(kg: f64) -> DomainResult<Self> {
        let value = Decimal::try_from(kg)
            .map_err(|_| DomainError::InvalidQuantity(format!("not representable: {kg}")))?;
        Self::from_decimal(value)
    }

    /// Creates a quantity from a decimal kilogram amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if the value is negative.
    pub fn from_decimal(kg: Decimal) -> DomainResult<Self> {
        if kg.is_sign_negative() && !kg.is_zero() {
            return Err(DomainError::InvalidQuantity(format!(
                "cannot be negative: {kg}"
            )));
        }
        Ok(Self(kg))
    }

    /// The zero quantity.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the kilogram amount as a decimal.
    #[inline]
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns true if this quantity is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the volume expressed in metric tons.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::quantity::Quantity;
    ///
    /// let qty = Quantity::new(6_000_000.0).unwrap();
    /// assert_eq!(qty.tons().to_string(), "6000");
    /// ```
    #[must_use]
    pub fn tons(&self) -> Decimal {
        self.0 / Decimal::ONE_THOUSAND
    }

    /// Safely adds another quantity.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }

    /// Safely subtracts another quantity.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would be negative.
    pub fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        let result = self.0.safe_sub(rhs.0)?;
        if result.is_sign_negative() && !result.is_zero() {
            return Err(ArithmeticError::Underflow);
        }
        Ok(Self(result))
    }

    /// Splits this quantity evenly into a number of parts, rounded to two
    /// decimal places.
    ///
    /// Used for per-delivery volumes on recurring agreements.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if `parts` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::quantity::Quantity;
    ///
    /// let total = Quantity::new(1000.0).unwrap();
    /// let per_delivery = total.divided_by(3).unwrap();
    /// assert_eq!(per_delivery.as_decimal().to_string(), "333.33");
    /// ```
    pub fn divided_by(self, parts: u32) -> ArithmeticResult<Self> {
        let result = self.0.safe_div(Decimal::from(parts))?;
        Ok(Self(result.round_dp(2)))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn new_accepts_positive() {
            let qty = Quantity::new(1000.0).unwrap();
            assert_eq!(qty.as_decimal(), Decimal::new(1000, 0));
        }

        #[test]
        fn new_accepts_zero() {
            let qty = Quantity::new(0.0).unwrap();
            assert!(qty.is_zero());
        }

        #[test]
        fn new_rejects_negative() {
            assert!(Quantity::new(-0.5).is_err());
        }

        #[test]
        fn new_rejects_nan() {
            assert!(Quantity::new(f64::NAN).is_err());
        }

        #[test]
        fn from_decimal_rejects_negative() {
            assert!(Quantity::from_decimal(Decimal::new(-1, 0)).is_err());
        }

        #[test]
        fn default_is_zero() {
            assert!(Quantity::default().is_zero());
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn safe_add_works() {
            let a = Quantity::new(400.0).unwrap();
            let b = Quantity::new(600.0).unwrap();
            assert_eq!(a.safe_add(b).unwrap(), Quantity::new(1000.0).unwrap());
        }

        #[test]
        fn safe_sub_works() {
            let a = Quantity::new(1000.0).unwrap();
            let b = Quantity::new(400.0).unwrap();
            assert_eq!(a.safe_sub(b).unwrap(), Quantity::new(600.0).unwrap());
        }

        #[test]
        fn safe_sub_to_zero() {
            let a = Quantity::new(600.0).unwrap();
            let b = Quantity::new(600.0).unwrap();
            assert!(a.safe_sub(b).unwrap().is_zero());
        }

        #[test]
        fn safe_sub_below_zero_fails() {
            let a = Quantity::new(400.0).unwrap();
            let b = Quantity::new(600.0).unwrap();
            assert_eq!(a.safe_sub(b), Err(ArithmeticError::Underflow));
        }

        #[test]
        fn divided_by_rounds_to_two_places() {
            let total = Quantity::new(1000.0).unwrap();
            let per = total.divided_by(3).unwrap();
            assert_eq!(per.as_decimal(), Decimal::new(33333, 2));
        }

        #[test]
        fn divided_by_one_is_identity() {
            let total = Quantity::new(1234.5).unwrap();
            assert_eq!(total.divided_by(1).unwrap(), total);
        }

        #[test]
        fn divided_by_zero_fails() {
            let total = Quantity::new(1000.0).unwrap();
            assert_eq!(total.divided_by(0), Err(ArithmeticError::DivisionByZero));
        }
    }

    mod conversion {
        use super::*;

        #[test]
        fn tons_conversion() {
            let qty = Quantity::new(1500.0).unwrap();
            assert_eq!(qty.tons(), Decimal::new(15, 1));
        }

        #[test]
        fn ordering() {
            let small = Quantity::new(400.0).unwrap();
            let large = Quantity::new(600.0).unwrap();
            assert!(small < large);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            let qty = Quantity::new(1000.5).unwrap();
            let json = serde_json::to_string(&qty).unwrap();
            let deserialized: Quantity = serde_json::from_str(&json).unwrap();
            assert_eq!(qty, deserialized);
        }

        #[test]
        fn deserializes_from_number() {
            let qty: Quantity = serde_json::from_str("1000").unwrap();
            assert_eq!(qty, Quantity::new(1000.0).unwrap());
        }
    }
}
