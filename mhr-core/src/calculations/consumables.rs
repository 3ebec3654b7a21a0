//! Consumables cost: coolant, waste, maintenance and sundries, per hour.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConsumablesInput;
use crate::calculations::HourBasis;
use crate::calculations::common::overflowed;

const MONTHS_PER_YEAR: i64 = 12;

/// Result of the consumables calculation with its monthly breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumablesCost {
    pub coolant_per_month: Decimal,
    pub waste_per_month: Decimal,

    /// Monthly maintenance plus one twelfth of the annual maintenance contract.
    pub maintenance_per_month: Decimal,

    pub other_per_month: Decimal,
    pub total_per_month: Decimal,
    pub hourly_cost: Decimal,
}

/// Calculator for the consumables component.
pub struct ConsumablesCalculator;

impl ConsumablesCalculator {
    pub fn calculate(
        input: &ConsumablesInput,
        basis: &HourBasis,
    ) -> ConsumablesCost {
        Self::checked_calculate(input, basis).unwrap_or_else(|| overflowed("consumables"))
    }

    fn checked_calculate(
        input: &ConsumablesInput,
        basis: &HourBasis,
    ) -> Option<ConsumablesCost> {
        let coolant_per_month = input
            .coolant_top_up_liters_per_month
            .checked_mul(input.coolant_cost_per_liter)?;
        let waste_per_month = input
            .waste_kg_per_month
            .checked_mul(input.waste_cost_per_kg)?;
        let maintenance_per_month = input
            .monthly_maintenance_cost
            .checked_add(input.annual_maintenance_cost / Decimal::from(MONTHS_PER_YEAR))?;
        let other_per_month = input.other_consumables_per_month;

        let total_per_month = coolant_per_month
            .checked_add(waste_per_month)?
            .checked_add(maintenance_per_month)?
            .checked_add(other_per_month)?;

        Some(ConsumablesCost {
            coolant_per_month,
            waste_per_month,
            maintenance_per_month,
            other_per_month,
            total_per_month,
            hourly_cost: basis.checked_monthly_to_hourly(total_per_month)?,
        })
    }
}
