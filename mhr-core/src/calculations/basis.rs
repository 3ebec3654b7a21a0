//! Time basis shared by every cost calculator.
//!
//! Monthly costs (rent, salaries, consumables) and annual quantities (machine
//! life) are converted to hourly figures through a single [`HourBasis`]. The
//! aggregator builds it once per calculation and hands the same value to each
//! calculator, so every component uses the same hours-per-month divisor.
//!
//! # Conventions
//!
//! | Quantity        | Formula                                      |
//! |-----------------|----------------------------------------------|
//! | hours per month | working hours per day × `days_per_month` (30) |
//! | hours per year  | working hours per day × `days_per_year` (365) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{guarded_div, safe_div};

/// Errors raised when a [`CostBasisConfig`] is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CostBasisConfigError {
    /// The number of working days in a month must be positive.
    #[error("days per month must be positive, got {0}")]
    InvalidDaysPerMonth(Decimal),

    /// The number of days in a year must be positive.
    #[error("days per year must be positive, got {0}")]
    InvalidDaysPerYear(Decimal),
}

/// Day-count conventions used to turn monthly and yearly figures into hours.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use mhr_core::calculations::CostBasisConfig;
///
/// let config = CostBasisConfig::default();
///
/// assert_eq!(config.days_per_month, dec!(30));
/// assert_eq!(config.days_per_year, dec!(365));
/// assert_eq!(config.validate(), Ok(()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostBasisConfig {
    /// Days per month used for every monthly-to-hourly conversion.
    pub days_per_month: Decimal,

    /// Days per year used to derive the total machine-life hours.
    pub days_per_year: Decimal,
}

impl Default for CostBasisConfig {
    fn default() -> Self {
        Self {
            days_per_month: Decimal::from(30),
            days_per_year: Decimal::from(365),
        }
    }
}

impl CostBasisConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`CostBasisConfigError`] if either day count is zero or negative.
    pub fn validate(&self) -> Result<(), CostBasisConfigError> {
        if self.days_per_month <= Decimal::ZERO {
            return Err(CostBasisConfigError::InvalidDaysPerMonth(
                self.days_per_month,
            ));
        }
        if self.days_per_year <= Decimal::ZERO {
            return Err(CostBasisConfigError::InvalidDaysPerYear(
                self.days_per_year,
            ));
        }
        Ok(())
    }
}

/// Working-time basis of one machine.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use mhr_core::calculations::{CostBasisConfig, HourBasis};
///
/// let basis = HourBasis::new(dec!(8), &CostBasisConfig::default());
///
/// assert_eq!(basis.hours_per_month(), dec!(240));
/// assert_eq!(basis.monthly_to_hourly(dec!(2400)), dec!(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBasis {
    pub working_hours_per_day: Decimal,
    pub days_per_month: Decimal,
    pub days_per_year: Decimal,
}

impl HourBasis {
    pub fn new(
        working_hours_per_day: Decimal,
        config: &CostBasisConfig,
    ) -> Self {
        Self {
            working_hours_per_day,
            days_per_month: config.days_per_month,
            days_per_year: config.days_per_year,
        }
    }

    /// The monthly-to-hourly divisor. Saturates instead of overflowing.
    pub fn hours_per_month(&self) -> Decimal {
        self.working_hours_per_day.saturating_mul(self.days_per_month)
    }

    pub fn hours_per_year(&self) -> Decimal {
        self.working_hours_per_day.saturating_mul(self.days_per_year)
    }

    /// `false` until the working hours per day have been entered.
    pub fn is_usable(&self) -> bool {
        self.hours_per_month() > Decimal::ZERO
    }

    /// Converts a monthly amount into an hourly one; zero while the basis is
    /// not usable.
    pub fn monthly_to_hourly(
        &self,
        monthly: Decimal,
    ) -> Decimal {
        safe_div(monthly, self.hours_per_month())
    }

    /// Like [`monthly_to_hourly`](Self::monthly_to_hourly), but `None` when
    /// the hourly figure does not fit in a `Decimal`.
    pub fn checked_monthly_to_hourly(
        &self,
        monthly: Decimal,
    ) -> Option<Decimal> {
        guarded_div(monthly, self.hours_per_month())
    }
}
