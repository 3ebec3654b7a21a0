//! Machine hour rate aggregation.
//!
//! The aggregator builds one [`HourBasis`] from the machine's working hours and
//! the configured day counts, runs every component calculator against it, and
//! blends the results:
//!
//! ```text
//! machine hour rate = (investment + space + power + consumables
//!                      + tool + wages + salary + other overheads)
//!                     × (1 + margin % ÷ 100)
//! ```
//!
//! The calculator holds only its configuration, so a single instance can be
//! shared across threads and called any number of times.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use mhr_core::{InvestmentInput, MachineInput};
//! use mhr_core::calculations::MachineHourRateCalculator;
//! use mhr_core::calculations::common::round_half_up;
//!
//! let input = MachineInput::builder()
//!     .investment(InvestmentInput {
//!         machine_cost: dec!(1500000),
//!         life_of_machine_years: dec!(10),
//!         working_hours_per_day: dec!(8),
//!         balance_life_years: dec!(8),
//!         interest_rate_pct: dec!(12),
//!         scrap_rate_pct: dec!(10),
//!     })
//!     .build();
//!
//! let result = MachineHourRateCalculator::default().calculate(&input);
//!
//! assert_eq!(round_half_up(result.output.machine_hour_rate), dec!(108.73));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{overflowed, percent};
use crate::calculations::{
    ConsumablesCalculator, ConsumablesCost, CostBasisConfig, CostBasisConfigError, HourBasis,
    InvestmentCalculator, InvestmentCost, LaborCalculator, LaborCost, PowerCalculator, PowerCost,
    SpaceCalculator, SpaceCost,
};
use crate::{MachineInput, MachineOutput};

/// Complete result of one machine hour rate calculation.
///
/// `output` is what callers store and display; the component results carry
/// the intermediate values behind each figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineHourRateResult {
    pub output: MachineOutput,
    pub basis: HourBasis,
    pub investment: InvestmentCost,
    pub space: SpaceCost,
    pub power: PowerCost,
    pub consumables: ConsumablesCost,
    pub labor: LaborCost,
}

/// Calculator for the blended machine hour rate.
#[derive(Debug, Clone, Default)]
pub struct MachineHourRateCalculator {
    config: CostBasisConfig,
}

impl MachineHourRateCalculator {
    /// Creates a calculator using the given day-count conventions.
    ///
    /// # Errors
    ///
    /// Returns [`CostBasisConfigError`] if either day count is not positive.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use mhr_core::calculations::{
    ///     CostBasisConfig, CostBasisConfigError, MachineHourRateCalculator,
    /// };
    ///
    /// let config = CostBasisConfig {
    ///     days_per_month: dec!(0),
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(
    ///     MachineHourRateCalculator::new(config).err(),
    ///     Some(CostBasisConfigError::InvalidDaysPerMonth(dec!(0)))
    /// );
    /// ```
    pub fn new(config: CostBasisConfig) -> Result<Self, CostBasisConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CostBasisConfig {
        &self.config
    }

    /// Derives every hourly cost component and the final rate.
    ///
    /// Never fails: inputs that leave a denominator at zero make the
    /// dependent component zero, and so does arithmetic that overflows.
    pub fn calculate(
        &self,
        input: &MachineInput,
    ) -> MachineHourRateResult {
        let basis = HourBasis::new(input.working_hours_per_day(), &self.config);

        let investment = InvestmentCalculator::calculate(&input.investment, &basis);
        let space = SpaceCalculator::calculate(&input.space, &basis);
        let power = PowerCalculator::calculate(&input.power);
        let consumables = ConsumablesCalculator::calculate(&input.consumables, &basis);
        let labor = LaborCalculator::calculate(
            &input.labor,
            &input.overheads,
            input.space.machine_count_in_factory,
            &basis,
        );

        let mut output = MachineOutput {
            investment_cost: investment.hourly_cost,
            space_cost: space.hourly_cost,
            power_cost: power.hourly_cost,
            consumables_cost: consumables.hourly_cost,
            tool_cost: labor.tool_cost,
            wages: labor.wages,
            salary: labor.salary,
            other_overheads: labor.other_overheads,
            profit: input.margin_pct,
            machine_hour_rate: Decimal::ZERO,
        };
        output.machine_hour_rate = output
            .checked_subtotal()
            .and_then(|subtotal| Self::apply_margin(subtotal, input.margin_pct))
            .unwrap_or_else(|| overflowed("machine hour rate"));

        debug!(
            hours_per_month = %basis.hours_per_month(),
            subtotal = %output.subtotal(),
            margin_pct = %input.margin_pct,
            machine_hour_rate = %output.machine_hour_rate,
            "Calculated machine hour rate"
        );

        MachineHourRateResult {
            output,
            basis,
            investment,
            space,
            power,
            consumables,
            labor,
        }
    }

    /// Shorthand for `calculate(input).output`.
    pub fn output(
        &self,
        input: &MachineInput,
    ) -> MachineOutput {
        self.calculate(input).output
    }

    fn apply_margin(
        subtotal: Decimal,
        margin_pct: Decimal,
    ) -> Option<Decimal> {
        subtotal.checked_mul(Decimal::ONE.checked_add(percent(margin_pct))?)
    }
}
