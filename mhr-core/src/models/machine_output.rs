use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

/// Hourly cost components of one machine and the blended rate.
///
/// Every cost field is in currency per hour. `profit` is the margin
/// percentage that was applied, not an amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineOutput {
    pub investment_cost: Decimal,
    pub space_cost: Decimal,
    pub power_cost: Decimal,
    pub consumables_cost: Decimal,
    pub tool_cost: Decimal,
    pub wages: Decimal,
    pub salary: Decimal,
    pub other_overheads: Decimal,
    pub profit: Decimal,
    pub machine_hour_rate: Decimal,
}

impl MachineOutput {
    /// Sum of the hourly cost components before margin.
    ///
    /// Saturates at the `Decimal` bounds; see [`checked_subtotal`](Self::checked_subtotal).
    pub fn subtotal(&self) -> Decimal {
        self.components()
            .into_iter()
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of the hourly cost components, or `None` if it does not fit.
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.components()
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Margin amount per hour included in `machine_hour_rate`.
    pub fn margin_amount(&self) -> Decimal {
        self.machine_hour_rate.saturating_sub(self.subtotal())
    }

    fn components(&self) -> [Decimal; 8] {
        [
            self.investment_cost,
            self.space_cost,
            self.power_cost,
            self.consumables_cost,
            self.tool_cost,
            self.wages,
            self.salary,
            self.other_overheads,
        ]
    }

    /// Copy with every value rounded to two decimal places for display.
    ///
    /// The engine itself never rounds; call this only at the presentation
    /// boundary so rounding error does not compound across components.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use mhr_core::MachineOutput;
    ///
    /// let output = MachineOutput {
    ///     space_cost: dec!(8.333333),
    ///     machine_hour_rate: dec!(9.1666663),
    ///     ..Default::default()
    /// };
    ///
    /// let shown = output.rounded();
    /// assert_eq!(shown.space_cost, dec!(8.33));
    /// assert_eq!(shown.machine_hour_rate, dec!(9.17));
    /// ```
    pub fn rounded(&self) -> Self {
        Self {
            investment_cost: round_half_up(self.investment_cost),
            space_cost: round_half_up(self.space_cost),
            power_cost: round_half_up(self.power_cost),
            consumables_cost: round_half_up(self.consumables_cost),
            tool_cost: round_half_up(self.tool_cost),
            wages: round_half_up(self.wages),
            salary: round_half_up(self.salary),
            other_overheads: round_half_up(self.other_overheads),
            profit: round_half_up(self.profit),
            machine_hour_rate: round_half_up(self.machine_hour_rate),
        }
    }
}
