//! Input record for the machine hour rate engine.
//!
//! The record is filled one wizard step at a time, so every section and every
//! field defaults to zero. A record with only some sections present is still a
//! valid input: the calculators treat the missing values as zero and produce
//! zero-valued components for them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PowerSource;

/// Capital cost and life of the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentInput {
    pub machine_cost: Decimal,
    pub life_of_machine_years: Decimal,
    /// Hours the machine runs per working day. Also drives the
    /// monthly-to-hourly divisor shared by every other section.
    pub working_hours_per_day: Decimal,
    pub balance_life_years: Decimal,
    pub interest_rate_pct: Decimal,
    pub scrap_rate_pct: Decimal,
}

/// Factory rent and the floor space attributable to the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceInput {
    pub factory_rent_per_month: Decimal,
    pub factory_space_sq_ft: Decimal,
    pub space_occupied_by_machine_sq_ft: Decimal,
    pub machine_count_in_factory: Decimal,
    /// Aisles, stores and other space shared equally by every machine.
    pub common_space_sq_ft: Decimal,
}

/// Electrical loads around the machine and the tariffs available to price them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerInput {
    pub machine_power_kw: Decimal,
    pub motor_run_time_pct: Decimal,
    pub fan_power_w: Decimal,
    pub fan_count: Decimal,
    pub light_power_w: Decimal,
    pub light_count: Decimal,
    pub compressor_power_kw: Decimal,
    pub machines_sharing_compressor: Decimal,
    pub compressor_run_time_pct: Decimal,
    pub other_equipment_w: Decimal,
    pub utilization_pct: Decimal,
    /// Electricity-board reference tariff, per kWh.
    pub eb_unit_rate: Decimal,
    pub diesel_liters_per_hour: Decimal,
    pub diesel_cost_per_liter: Decimal,
    pub genset_power_kw: Decimal,
    /// Grid tariff actually paid, per kWh.
    pub electricity_unit_rate: Decimal,
    pub power_source: PowerSource,
}

/// Monthly consumable and maintenance spend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumablesInput {
    pub coolant_top_up_liters_per_month: Decimal,
    pub coolant_cost_per_liter: Decimal,
    pub waste_kg_per_month: Decimal,
    pub waste_cost_per_kg: Decimal,
    pub monthly_maintenance_cost: Decimal,
    pub annual_maintenance_cost: Decimal,
    pub other_consumables_per_month: Decimal,
}

/// Tooling spend and the salaries of the people working directly on the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborInput {
    pub tool_cost_per_month: Decimal,
    pub operator_salary_per_month: Decimal,
    pub helper_salary_per_month: Decimal,
    pub quality_inspector_salary_per_month: Decimal,
}

/// How many machines one person in each role looks after.
///
/// Values below one are treated as one when allocating a salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachinesHandled {
    pub operator: Decimal,
    pub helper: Decimal,
    pub quality_inspector: Decimal,
    pub production_supervisor: Decimal,
    pub quality_supervisor: Decimal,
    pub engineer: Decimal,
}

/// Indirect salaries and the sharing ratios of every role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverheadsInput {
    pub production_supervisor_salary_per_month: Decimal,
    pub quality_supervisor_salary_per_month: Decimal,
    pub engineer_salary_per_month: Decimal,
    pub manager_salary_per_month: Decimal,
    pub admin_staff_salary_per_month: Decimal,
    pub machines_handled: MachinesHandled,
}

/// Complete (or partially completed) input record for one machine.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use mhr_core::{InvestmentInput, MachineInput};
///
/// let input = MachineInput::builder()
///     .investment(InvestmentInput {
///         machine_cost: dec!(1500000),
///         life_of_machine_years: dec!(10),
///         working_hours_per_day: dec!(8),
///         ..Default::default()
///     })
///     .margin_pct(dec!(10))
///     .build();
///
/// assert_eq!(input.working_hours_per_day(), dec!(8));
/// assert_eq!(input.space, Default::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineInput {
    pub investment: InvestmentInput,
    pub space: SpaceInput,
    pub power: PowerInput,
    pub consumables: ConsumablesInput,
    pub labor: LaborInput,
    pub overheads: OverheadsInput,
    /// Profit margin applied on top of the summed hourly cost, in percent.
    pub margin_pct: Decimal,
}

impl MachineInput {
    /// Starts an empty record. Sections not supplied stay zeroed.
    pub fn builder() -> MachineInputBuilder {
        MachineInputBuilder::default()
    }

    pub fn working_hours_per_day(&self) -> Decimal {
        self.investment.working_hours_per_day
    }
}

/// Step-wise construction of a [`MachineInput`].
///
/// Each wizard step hands its section over independently; steps may arrive
/// in any order and any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct MachineInputBuilder {
    input: MachineInput,
}

impl MachineInputBuilder {
    /// Continues from an existing record, e.g. one loaded from storage.
    pub fn from_input(input: MachineInput) -> Self {
        Self { input }
    }

    pub fn investment(
        mut self,
        investment: InvestmentInput,
    ) -> Self {
        self.input.investment = investment;
        self
    }

    pub fn space(
        mut self,
        space: SpaceInput,
    ) -> Self {
        self.input.space = space;
        self
    }

    pub fn power(
        mut self,
        power: PowerInput,
    ) -> Self {
        self.input.power = power;
        self
    }

    pub fn consumables(
        mut self,
        consumables: ConsumablesInput,
    ) -> Self {
        self.input.consumables = consumables;
        self
    }

    pub fn labor(
        mut self,
        labor: LaborInput,
    ) -> Self {
        self.input.labor = labor;
        self
    }

    pub fn overheads(
        mut self,
        overheads: OverheadsInput,
    ) -> Self {
        self.input.overheads = overheads;
        self
    }

    pub fn margin_pct(
        mut self,
        margin_pct: Decimal,
    ) -> Self {
        self.input.margin_pct = margin_pct;
        self
    }

    /// Selects the tariff used for the power section without touching the
    /// other power fields.
    pub fn power_source(
        mut self,
        source: PowerSource,
    ) -> Self {
        self.input.power.power_source = source;
        self
    }

    pub fn build(self) -> MachineInput {
        self.input
    }
}
