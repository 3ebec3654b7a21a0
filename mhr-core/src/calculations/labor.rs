//! Labor and overhead allocation.
//!
//! Each role's monthly salary is converted to an hourly figure and divided by
//! the number of machines one person in that role looks after:
//!
//! ```text
//! role cost / hour = (salary per month ÷ hours per month) ÷ max(machines handled, 1)
//! ```
//!
//! | Group            | Roles |
//! |------------------|-------|
//! | Wages            | operator, helper, quality inspector |
//! | Salary           | production supervisor, quality supervisor, engineer |
//! | Other overheads  | manager, admin staff |
//!
//! Managers and admin staff serve the whole plant and have no sharing ratio of
//! their own; their salaries are spread over every machine in the factory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::HourBasis;
use crate::calculations::common::{guarded_div, overflowed, sharing_ratio};
use crate::{LaborInput, OverheadsInput};

/// Hourly cost of each role attributable to this machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleHourlyCosts {
    pub operator: Decimal,
    pub helper: Decimal,
    pub quality_inspector: Decimal,
    pub production_supervisor: Decimal,
    pub quality_supervisor: Decimal,
    pub engineer: Decimal,
    pub manager: Decimal,
    pub admin: Decimal,
}

/// Result of the labor and overhead allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborCost {
    pub roles: RoleHourlyCosts,
    pub tool_cost: Decimal,
    pub wages: Decimal,
    pub salary: Decimal,
    pub other_overheads: Decimal,
}

/// Allocator for tool, wage, salary and overhead costs.
pub struct LaborCalculator;

impl LaborCalculator {
    /// Allocates labor and overheads to one machine.
    ///
    /// `machine_count_in_factory` spreads the plant-wide manager and admin
    /// salaries; values below one are treated as one.
    pub fn calculate(
        labor: &LaborInput,
        overheads: &OverheadsInput,
        machine_count_in_factory: Decimal,
        basis: &HourBasis,
    ) -> LaborCost {
        if !basis.is_usable() {
            debug!("Working hours not set; labor and overhead costs are zero");
        }

        Self::checked_calculate(labor, overheads, machine_count_in_factory, basis)
            .unwrap_or_else(|| overflowed("labor"))
    }

    fn checked_calculate(
        labor: &LaborInput,
        overheads: &OverheadsInput,
        machine_count_in_factory: Decimal,
        basis: &HourBasis,
    ) -> Option<LaborCost> {
        let handled = &overheads.machines_handled;
        let plant_wide = sharing_ratio(machine_count_in_factory);

        let roles = RoleHourlyCosts {
            operator: Self::role_cost(labor.operator_salary_per_month, handled.operator, basis)?,
            helper: Self::role_cost(labor.helper_salary_per_month, handled.helper, basis)?,
            quality_inspector: Self::role_cost(
                labor.quality_inspector_salary_per_month,
                handled.quality_inspector,
                basis,
            )?,
            production_supervisor: Self::role_cost(
                overheads.production_supervisor_salary_per_month,
                handled.production_supervisor,
                basis,
            )?,
            quality_supervisor: Self::role_cost(
                overheads.quality_supervisor_salary_per_month,
                handled.quality_supervisor,
                basis,
            )?,
            engineer: Self::role_cost(
                overheads.engineer_salary_per_month,
                handled.engineer,
                basis,
            )?,
            manager: Self::role_cost(overheads.manager_salary_per_month, plant_wide, basis)?,
            admin: Self::role_cost(overheads.admin_staff_salary_per_month, plant_wide, basis)?,
        };

        Some(LaborCost {
            tool_cost: basis.checked_monthly_to_hourly(labor.tool_cost_per_month)?,
            wages: roles
                .operator
                .checked_add(roles.helper)?
                .checked_add(roles.quality_inspector)?,
            salary: roles
                .production_supervisor
                .checked_add(roles.quality_supervisor)?
                .checked_add(roles.engineer)?,
            other_overheads: roles.manager.checked_add(roles.admin)?,
            roles,
        })
    }

    fn role_cost(
        salary_per_month: Decimal,
        machines_handled: Decimal,
        basis: &HourBasis,
    ) -> Option<Decimal> {
        guarded_div(
            basis.checked_monthly_to_hourly(salary_per_month)?,
            sharing_ratio(machines_handled),
        )
    }
}
