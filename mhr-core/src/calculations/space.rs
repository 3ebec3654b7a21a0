//! Space cost: the share of factory rent occupied by one machine.
//!
//! The machine is charged for its own footprint plus an equal share of the
//! common space (aisles, stores) across every machine in the factory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SpaceInput;
use crate::calculations::HourBasis;
use crate::calculations::common::{guarded_div, overflowed};

/// Result of the space calculation with its intermediate values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceCost {
    /// Factory rent per square foot per month.
    pub rent_per_sq_ft: Decimal,

    /// This machine's share of the common space.
    pub common_space_share_sq_ft: Decimal,

    /// Machine footprint plus its common-space share.
    pub effective_space_sq_ft: Decimal,

    pub monthly_cost: Decimal,
    pub hourly_cost: Decimal,
}

/// Calculator for the space component.
pub struct SpaceCalculator;

impl SpaceCalculator {
    pub fn calculate(
        input: &SpaceInput,
        basis: &HourBasis,
    ) -> SpaceCost {
        if input.factory_space_sq_ft <= Decimal::ZERO {
            debug!(
                factory_space_sq_ft = %input.factory_space_sq_ft,
                "Factory space not set; rent per square foot is zero"
            );
        }
        Self::checked_calculate(input, basis).unwrap_or_else(|| overflowed("space"))
    }

    fn checked_calculate(
        input: &SpaceInput,
        basis: &HourBasis,
    ) -> Option<SpaceCost> {
        let rent_per_sq_ft = guarded_div(input.factory_rent_per_month, input.factory_space_sq_ft)?;

        let common_space_share_sq_ft =
            guarded_div(input.common_space_sq_ft, input.machine_count_in_factory)?;
        let effective_space_sq_ft = input
            .space_occupied_by_machine_sq_ft
            .checked_add(common_space_share_sq_ft)?;

        let monthly_cost = rent_per_sq_ft.checked_mul(effective_space_sq_ft)?;

        Some(SpaceCost {
            rent_per_sq_ft,
            common_space_share_sq_ft,
            effective_space_sq_ft,
            monthly_cost,
            hourly_cost: basis.checked_monthly_to_hourly(monthly_cost)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::CostBasisConfig;
    use crate::calculations::common::round_half_up;

    fn factory_input() -> SpaceInput {
        SpaceInput {
            factory_rent_per_month: dec!(50000),
            factory_space_sq_ft: dec!(5000),
            space_occupied_by_machine_sq_ft: dec!(100),
            machine_count_in_factory: dec!(10),
            common_space_sq_ft: dec!(1000),
        }
    }

    fn eight_hour_basis() -> HourBasis {
        HourBasis::new(dec!(8), &CostBasisConfig::default())
    }

    #[test]
    fn rent_per_sq_ft_is_rent_over_factory_space() {
        let cost = SpaceCalculator::calculate(&factory_input(), &eight_hour_basis());

        assert_eq!(cost.rent_per_sq_ft, dec!(10));
    }

    #[test]
    fn effective_space_adds_common_space_share() {
        let cost = SpaceCalculator::calculate(&factory_input(), &eight_hour_basis());

        assert_eq!(cost.common_space_share_sq_ft, dec!(100));
        assert_eq!(cost.effective_space_sq_ft, dec!(200));
    }

    #[test]
    fn hourly_cost_uses_monthly_hours() {
        let cost = SpaceCalculator::calculate(&factory_input(), &eight_hour_basis());

        assert_eq!(cost.monthly_cost, dec!(2000));
        assert_eq!(round_half_up(cost.hourly_cost), dec!(8.33));
    }

    #[test]
    fn zero_factory_space_gives_zero_cost() {
        let input = SpaceInput {
            factory_space_sq_ft: Decimal::ZERO,
            ..factory_input()
        };

        let cost = SpaceCalculator::calculate(&input, &eight_hour_basis());

        assert_eq!(cost.rent_per_sq_ft, Decimal::ZERO);
        assert_eq!(cost.hourly_cost, Decimal::ZERO);
    }

    #[test]
    fn zero_machine_count_drops_common_space_share() {
        let input = SpaceInput {
            machine_count_in_factory: Decimal::ZERO,
            ..factory_input()
        };

        let cost = SpaceCalculator::calculate(&input, &eight_hour_basis());

        assert_eq!(cost.common_space_share_sq_ft, Decimal::ZERO);
        assert_eq!(cost.effective_space_sq_ft, dec!(100));
        assert_eq!(cost.monthly_cost, dec!(1000));
    }

    #[test]
    fn unusable_basis_keeps_monthly_cost_but_zero_hourly() {
        let basis = HourBasis::new(Decimal::ZERO, &CostBasisConfig::default());

        let cost = SpaceCalculator::calculate(&factory_input(), &basis);

        assert_eq!(cost.monthly_cost, dec!(2000));
        assert_eq!(cost.hourly_cost, Decimal::ZERO);
    }

    #[test]
    fn overflowing_rent_gives_zero_cost() {
        let input = SpaceInput {
            factory_rent_per_month: Decimal::MAX,
            factory_space_sq_ft: dec!(1),
            ..factory_input()
        };

        let cost = SpaceCalculator::calculate(&input, &eight_hour_basis());

        assert_eq!(cost, SpaceCost::default());
    }
}
