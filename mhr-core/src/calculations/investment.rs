//! Investment cost: depreciation and interest on the machine's capital.
//!
//! | Step | Formula |
//! |------|---------|
//! | Machine-life hours  | life (years) × hours per year |
//! | Depreciable value   | machine cost × (1 − scrap %) |
//! | Depreciation / hour | depreciable value ÷ machine-life hours |
//! | Interest / hour     | machine cost × interest % ÷ 12 ÷ hours per month |
//! | Investment / hour   | depreciation / hour + interest / hour |
//!
//! If the life of the machine or the working hours per day are not positive,
//! the whole component is zero.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use mhr_core::InvestmentInput;
//! use mhr_core::calculations::{CostBasisConfig, HourBasis, InvestmentCalculator};
//! use mhr_core::calculations::common::round_half_up;
//!
//! let input = InvestmentInput {
//!     machine_cost: dec!(1500000),
//!     life_of_machine_years: dec!(10),
//!     working_hours_per_day: dec!(8),
//!     balance_life_years: dec!(8),
//!     interest_rate_pct: dec!(12),
//!     scrap_rate_pct: dec!(10),
//! };
//! let basis = HourBasis::new(input.working_hours_per_day, &CostBasisConfig::default());
//!
//! let cost = InvestmentCalculator::calculate(&input, &basis);
//!
//! assert_eq!(cost.machine_life_hours, dec!(29200));
//! assert_eq!(cost.interest_per_hour, dec!(62.5));
//! assert_eq!(round_half_up(cost.hourly_cost), dec!(108.73));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::InvestmentInput;
use crate::calculations::HourBasis;
use crate::calculations::common::{guarded_div, overflowed, percent};

const MONTHS_PER_YEAR: i64 = 12;

/// Result of the investment calculation with its intermediate values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentCost {
    /// Total running hours over the machine's life.
    pub machine_life_hours: Decimal,

    /// Machine cost less its scrap value.
    pub depreciable_value: Decimal,

    /// Book value for the remaining (balance) life, straight-line.
    ///
    /// Reported for reference only; it does not enter the hourly rate.
    pub current_value_of_machine: Decimal,

    pub depreciation_per_hour: Decimal,
    pub interest_per_hour: Decimal,

    /// Depreciation plus interest, currency per hour.
    pub hourly_cost: Decimal,
}

/// Calculator for the investment component.
pub struct InvestmentCalculator;

impl InvestmentCalculator {
    pub fn calculate(
        input: &InvestmentInput,
        basis: &HourBasis,
    ) -> InvestmentCost {
        if input.life_of_machine_years <= Decimal::ZERO || !basis.is_usable() {
            debug!(
                life_of_machine_years = %input.life_of_machine_years,
                working_hours_per_day = %basis.working_hours_per_day,
                "Machine life or working hours not set; investment cost is zero"
            );
            return InvestmentCost::default();
        }

        Self::checked_calculate(input, basis).unwrap_or_else(|| overflowed("investment"))
    }

    fn checked_calculate(
        input: &InvestmentInput,
        basis: &HourBasis,
    ) -> Option<InvestmentCost> {
        let machine_life_hours = input
            .life_of_machine_years
            .checked_mul(basis.hours_per_year())?;
        let depreciable_value = Self::depreciable_value(input)?;
        let depreciation_per_hour = guarded_div(depreciable_value, machine_life_hours)?;
        let interest_per_hour = Self::interest_per_hour(input, basis)?;

        Some(InvestmentCost {
            machine_life_hours,
            depreciable_value,
            current_value_of_machine: Self::current_value(input)?,
            depreciation_per_hour,
            interest_per_hour,
            hourly_cost: depreciation_per_hour.checked_add(interest_per_hour)?,
        })
    }

    fn depreciable_value(input: &InvestmentInput) -> Option<Decimal> {
        let retained = Decimal::ONE.checked_sub(percent(input.scrap_rate_pct))?;
        input.machine_cost.checked_mul(retained)
    }

    /// Monthly interest on the full machine cost, spread over the month's hours.
    fn interest_per_hour(
        input: &InvestmentInput,
        basis: &HourBasis,
    ) -> Option<Decimal> {
        let monthly_interest = input
            .machine_cost
            .checked_mul(percent(input.interest_rate_pct))?
            / Decimal::from(MONTHS_PER_YEAR);
        basis.checked_monthly_to_hourly(monthly_interest)
    }

    /// Straight-line value for the balance life, clamped to `[0, life]`.
    fn current_value(input: &InvestmentInput) -> Option<Decimal> {
        let balance = input
            .balance_life_years
            .max(Decimal::ZERO)
            .min(input.life_of_machine_years);
        guarded_div(
            input.machine_cost.checked_mul(balance)?,
            input.life_of_machine_years,
        )
    }
}
