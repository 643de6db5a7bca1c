//! # Fee Schedule
//!
//! Volume-tiered derivation of the per-kilogram platform fee.
//!
//! One function serves two charges: the management fee owed by a proposal's
//! author and the penalty fee owed by a response's author. Both sides of a
//! negotiation therefore always see the same number for the same volume,
//! which is what makes the mirroring invariant checkable at all.
//!
//! The schedule is monotonically non-increasing in volume:
//!
//! ```text
//! tons ≤ 5000      16 fixed brackets, 250 down to 28 COP/kg
//! tons < 6000      25 COP/kg
//! 6000 ≤ t < 63000 23.8 − floor((t − 6000) / 1000) × 0.2
//! t ≥ 63000        max(12.5 − floor((t − 63000) / 1000) × 0.1, 1.0)
//! ```
//!
//! # Examples
//!
//! ```
//! use recimat::domain::services::fee_schedule::FeeSchedule;
//! use recimat::domain::value_objects::Quantity;
//! use rust_decimal::Decimal;
//!
//! let fee = FeeSchedule::fee_per_kg(Quantity::new(1000.0).unwrap());
//! assert_eq!(fee.as_decimal(), Decimal::new(200, 0));
//! ```

use rust_decimal::Decimal;

use crate::domain::value_objects::{FeePerKg, Quantity};

/// Start of the first formula tail, in tons.
const LOW_TAIL_START_TONS: i64 = 6_000;

/// Start of the second formula tail, in tons.
const HIGH_TAIL_START_TONS: i64 = 63_000;

/// Stateless fee derivation service.
pub struct FeeSchedule;

impl FeeSchedule {
    /// Version stamped onto records whose fee this schedule produced.
    ///
    /// Stored fees are always preferred over recomputation, so a schedule
    /// change bumps this constant instead of rewriting history.
    pub const VERSION: u16 = 1;

    /// Fixed brackets below the formula tails, as `(upper bound in tenths of
    /// a ton, inclusive; price in COP/kg)`. Volumes past the last bracket but
    /// under [`LOW_TAIL_START_TONS`] price at 25.
    const BRACKETS: [(i64, i64); 15] = [
        (5, 250),
        (10, 200),
        (50, 180),
        (100, 160),
        (250, 140),
        (500, 120),
        (1_000, 100),
        (2_500, 85),
        (5_000, 70),
        (10_000, 60),
        (15_000, 50),
        (20_000, 45),
        (30_000, 38),
        (40_000, 32),
        (50_000, 28),
    ];

    /// Derives the per-kilogram fee for a total volume.
    ///
    /// Pure and total: zero volume prices at the smallest bracket, and no
    /// volume can make this fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::services::fee_schedule::FeeSchedule;
    /// use recimat::domain::value_objects::Quantity;
    /// use rust_decimal::Decimal;
    ///
    /// // 6000 tons and 6000.999 tons sit in the same 1000-ton step.
    /// let a = FeeSchedule::fee_per_kg(Quantity::new(6_000_000.0).unwrap());
    /// let b = FeeSchedule::fee_per_kg(Quantity::new(6_000_999.0).unwrap());
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_decimal(), Decimal::new(238, 1));
    /// ```
    #[must_use]
    pub fn fee_per_kg(quantity: Quantity) -> FeePerKg {
        Self::fee_for_tons(quantity.tons())
    }

    fn fee_for_tons(tons: Decimal) -> FeePerKg {
        let raw = if tons < Decimal::from(LOW_TAIL_START_TONS) {
            Self::bracket_price(tons)
        } else if tons < Decimal::from(HIGH_TAIL_START_TONS) {
            let steps =
                ((tons - Decimal::from(LOW_TAIL_START_TONS)) / Decimal::ONE_THOUSAND).floor();
            Decimal::new(238, 1) - steps * Decimal::new(2, 1)
        } else {
            let steps =
                ((tons - Decimal::from(HIGH_TAIL_START_TONS)) / Decimal::ONE_THOUSAND).floor();
            (Decimal::new(125, 1) - steps * Decimal::new(1, 1)).max(Decimal::ONE)
        };
        FeePerKg::from_raw(raw.round_dp(2))
    }

    fn bracket_price(tons: Decimal) -> Decimal {
        for (bound_tenths, price) in Self::BRACKETS {
            if tons <= Decimal::new(bound_tenths, 1) {
                return Decimal::from(price);
            }
        }
        Decimal::from(25)
    }
}
