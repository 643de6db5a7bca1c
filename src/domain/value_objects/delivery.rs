//! # Delivery Frequency
//!
//! Value object for the delivery cadence of a proposal and the derived
//! per-delivery quantity.
//!
//! The number of delivery periods is never stored. It is recomputed from the
//! validity window by advancing a cursor date with frequency-specific steps
//! and counting iterations until the cursor passes the end of the window.
//! Every view that shows a per-delivery quantity derives it from the same
//! inputs through [`DeliveryFrequency::per_delivery_quantity`].
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use recimat::domain::value_objects::delivery::DeliveryFrequency;
//!
//! let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let until = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! assert_eq!(DeliveryFrequency::Monthly.delivery_periods(from, until), 3);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_objects::arithmetic::ArithmeticResult;
use crate::domain::value_objects::enums::ParseEnumError;
use crate::domain::value_objects::quantity::Quantity;

/// How often material is delivered over a proposal's validity window.
///
/// Wire values carry the Spanish labels used across the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[repr(u8)]
pub enum DeliveryFrequency {
    /// Single delivery covering the full quantity.
    #[default]
    #[serde(rename = "Única Vez")]
    OneTime = 0,
    /// One delivery per day.
    #[serde(rename = "Diario")]
    Daily = 1,
    /// One delivery per week.
    #[serde(rename = "Semanal")]
    Weekly = 2,
    /// One delivery every two weeks.
    #[serde(rename = "Quincenal")]
    Biweekly = 3,
    /// One delivery per calendar month.
    #[serde(rename = "Mensual")]
    Monthly = 4,
    /// One delivery per calendar quarter.
    #[serde(rename = "Trimestral")]
    Quarterly = 5,
    /// One delivery per calendar year.
    #[serde(rename = "Anual")]
    Annual = 6,
}

impl DeliveryFrequency {
    /// Returns the Spanish display label, identical to the wire value.
    #[must_use]
    pub const fn label_es(self) -> &'static str {
        match self {
            Self::OneTime => "Única Vez",
            Self::Daily => "Diario",
            Self::Weekly => "Semanal",
            Self::Biweekly => "Quincenal",
            Self::Monthly => "Mensual",
            Self::Quarterly => "Trimestral",
            Self::Annual => "Anual",
        }
    }

    /// Returns whether this frequency implies repeated deliveries.
    #[inline]
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::OneTime)
    }

    /// Advances the cursor date by one period.
    ///
    /// Daily, weekly, and biweekly steps add a fixed day count. Monthly and
    /// quarterly steps snap to the first day of a later month. Annual steps
    /// snap to January 1st of the next year. Returns `None` for
    /// [`Self::OneTime`] and when the date arithmetic leaves the supported
    /// calendar range.
    #[must_use]
    pub fn step(self, cursor: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::OneTime => None,
            Self::Daily => cursor.checked_add_days(Days::new(1)),
            Self::Weekly => cursor.checked_add_days(Days::new(7)),
            Self::Biweekly => cursor.checked_add_days(Days::new(14)),
            Self::Monthly => cursor
                .with_day(1)
                .and_then(|d| d.checked_add_months(Months::new(1))),
            Self::Quarterly => cursor
                .with_day(1)
                .and_then(|d| d.checked_add_months(Months::new(3))),
            Self::Annual => cursor
                .year()
                .checked_add(1)
                .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        }
    }

    /// Counts delivery periods inside the validity window.
    ///
    /// The cursor starts at `valid_from`; each iteration inside the window
    /// counts one period. An inverted window yields zero periods.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use recimat::domain::value_objects::delivery::DeliveryFrequency;
    ///
    /// let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let until = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    /// assert_eq!(DeliveryFrequency::Weekly.delivery_periods(from, until), 5);
    /// assert_eq!(DeliveryFrequency::OneTime.delivery_periods(from, until), 1);
    /// ```
    #[must_use]
    pub fn delivery_periods(self, valid_from: NaiveDate, valid_until: NaiveDate) -> u32 {
        let mut cursor = valid_from;
        let mut periods: u32 = 0;
        while cursor <= valid_until {
            periods = periods.saturating_add(1);
            match self.step(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        periods
    }

    /// Derives the quantity per delivery, rounded to two decimals.
    ///
    /// The divisor is clamped to at least one period so an empty window
    /// degrades to a single delivery of the full quantity.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error when the division fails.
    pub fn per_delivery_quantity(
        self,
        total: Quantity,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
    ) -> ArithmeticResult<Quantity> {
        let periods = self.delivery_periods(valid_from, valid_until).max(1);
        total.divided_by(periods)
    }
}

impl fmt::Display for DeliveryFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label_es())
    }
}

impl FromStr for DeliveryFrequency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "única vez" | "unica vez" => Ok(Self::OneTime),
            "diario" => Ok(Self::Daily),
            "semanal" => Ok(Self::Weekly),
            "quincenal" => Ok(Self::Biweekly),
            "mensual" => Ok(Self::Monthly),
            "trimestral" => Ok(Self::Quarterly),
            "anual" => Ok(Self::Annual),
            _ => Err(ParseEnumError::InvalidValue(
                "DeliveryFrequency",
                s.to_string(),
            )),
        }
    }
}
