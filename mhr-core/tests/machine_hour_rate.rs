//! End-to-end machine hour rate scenarios through the public API.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use mhr_core::calculations::MachineHourRateCalculator;
use mhr_core::calculations::common::round_half_up;
use mhr_core::{
    ConsumablesInput, InvestmentInput, LaborInput, MachineInput, MachinesHandled, OverheadsInput,
    PowerInput, PowerSource, SpaceInput,
};

fn cnc_lathe() -> MachineInput {
    MachineInput::builder()
        .investment(InvestmentInput {
            machine_cost: dec!(1500000),
            life_of_machine_years: dec!(10),
            working_hours_per_day: dec!(8),
            balance_life_years: dec!(8),
            interest_rate_pct: dec!(12),
            scrap_rate_pct: dec!(10),
        })
        .space(SpaceInput {
            factory_rent_per_month: dec!(50000),
            factory_space_sq_ft: dec!(5000),
            space_occupied_by_machine_sq_ft: dec!(100),
            machine_count_in_factory: dec!(10),
            common_space_sq_ft: dec!(1000),
        })
        .power(PowerInput {
            machine_power_kw: dec!(15),
            motor_run_time_pct: dec!(80),
            fan_power_w: dec!(75),
            fan_count: dec!(2),
            light_power_w: dec!(40),
            light_count: dec!(4),
            compressor_power_kw: dec!(7.5),
            machines_sharing_compressor: dec!(5),
            compressor_run_time_pct: dec!(60),
            other_equipment_w: dec!(500),
            utilization_pct: dec!(85),
            eb_unit_rate: dec!(7.5),
            diesel_liters_per_hour: dec!(3.5),
            diesel_cost_per_liter: dec!(85),
            genset_power_kw: dec!(100),
            electricity_unit_rate: dec!(8.5),
            power_source: PowerSource::Grid,
        })
        .consumables(ConsumablesInput {
            coolant_top_up_liters_per_month: dec!(20),
            coolant_cost_per_liter: dec!(150),
            waste_kg_per_month: dec!(50),
            waste_cost_per_kg: dec!(25),
            monthly_maintenance_cost: dec!(5000),
            annual_maintenance_cost: dec!(25000),
            other_consumables_per_month: dec!(2000),
        })
        .labor(LaborInput {
            tool_cost_per_month: dec!(8000),
            operator_salary_per_month: dec!(25000),
            helper_salary_per_month: dec!(18000),
            quality_inspector_salary_per_month: dec!(22000),
        })
        .overheads(OverheadsInput {
            production_supervisor_salary_per_month: dec!(45000),
            quality_supervisor_salary_per_month: dec!(40000),
            engineer_salary_per_month: dec!(50000),
            manager_salary_per_month: dec!(75000),
            admin_staff_salary_per_month: dec!(30000),
            machines_handled: MachinesHandled {
                operator: dec!(1),
                helper: dec!(2),
                quality_inspector: dec!(3),
                production_supervisor: dec!(10),
                quality_supervisor: dec!(15),
                engineer: dec!(20),
            },
        })
        .margin_pct(dec!(10))
        .build()
}

// =============================================================================
// Full machine scenarios
// =============================================================================

#[test]
fn cnc_lathe_components_round_to_expected_values() {
    let output = MachineHourRateCalculator::default()
        .output(&cnc_lathe())
        .rounded();

    assert_eq!(output.investment_cost, dec!(108.73));
    assert_eq!(output.space_cost, dec!(8.33));
    assert_eq!(output.power_cost, dec!(99.05));
    assert_eq!(output.consumables_cost, dec!(55.56));
    assert_eq!(output.tool_cost, dec!(33.33));
    assert_eq!(output.wages, dec!(172.22));
    assert_eq!(output.salary, dec!(40.28));
    assert_eq!(output.other_overheads, dec!(43.75));
    assert_eq!(output.profit, dec!(10.00));
    assert_eq!(output.machine_hour_rate, dec!(617.39));
}

#[test]
fn cnc_lathe_on_generator_power() {
    let mut input = cnc_lathe();
    input.power.power_source = PowerSource::Genset;

    let result = MachineHourRateCalculator::default().calculate(&input);

    assert_eq!(result.power.genset_unit_rate, Some(dec!(2.975)));
    assert_eq!(result.output.power_cost, dec!(34.6691625));
    assert_eq!(round_half_up(result.output.machine_hour_rate), dec!(546.56));
}

#[test]
fn rate_equals_sum_of_components_times_margin() {
    let output = MachineHourRateCalculator::default().output(&cnc_lathe());

    let sum = output.investment_cost
        + output.space_cost
        + output.power_cost
        + output.consumables_cost
        + output.tool_cost
        + output.wages
        + output.salary
        + output.other_overheads;

    assert_eq!(
        output.machine_hour_rate,
        sum * (Decimal::ONE + dec!(10) / Decimal::ONE_HUNDRED)
    );
}

// =============================================================================
// Single-component scenarios
// =============================================================================

#[test]
fn investment_scenario_has_no_other_contribution() {
    let input = MachineInput::builder()
        .investment(cnc_lathe().investment)
        .build();

    let result = MachineHourRateCalculator::default().calculate(&input);

    assert_eq!(round_half_up(result.investment.depreciation_per_hour), dec!(46.23));
    assert_eq!(result.investment.interest_per_hour, dec!(62.5));
    assert_eq!(round_half_up(result.output.machine_hour_rate), dec!(108.73));
    assert_eq!(result.output.subtotal(), result.output.investment_cost);
}

#[test]
fn grid_power_scenario_without_generator_data() {
    let input = MachineInput::builder()
        .power(PowerInput {
            machine_power_kw: dec!(15),
            motor_run_time_pct: dec!(80),
            utilization_pct: dec!(85),
            electricity_unit_rate: dec!(8.5),
            ..Default::default()
        })
        .build();

    let result = MachineHourRateCalculator::default().calculate(&input);

    assert_eq!(result.power.genset_unit_rate, None);
    assert_eq!(result.output.power_cost, dec!(86.7));
    assert_eq!(result.output.machine_hour_rate, dec!(86.7));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn zero_factory_space_gives_zero_space_cost() {
    let mut input = cnc_lathe();
    input.space.factory_space_sq_ft = Decimal::ZERO;

    let output = MachineHourRateCalculator::default().output(&input);

    assert_eq!(output.space_cost, Decimal::ZERO);
}

#[test]
fn zero_machine_life_gives_zero_investment_cost() {
    let mut input = cnc_lathe();
    input.investment.life_of_machine_years = Decimal::ZERO;

    let output = MachineHourRateCalculator::default().output(&input);

    assert_eq!(output.investment_cost, Decimal::ZERO);
    assert!(output.machine_hour_rate > Decimal::ZERO);
}

#[test]
fn margin_scales_zero_margin_rate_exactly() {
    let calculator = MachineHourRateCalculator::default();
    let base = calculator.output(&MachineInput {
        margin_pct: Decimal::ZERO,
        ..cnc_lathe()
    });

    for margin in [dec!(5), dec!(10), dec!(25), dec!(100)] {
        let output = calculator.output(&MachineInput {
            margin_pct: margin,
            ..cnc_lathe()
        });

        assert_eq!(
            output.machine_hour_rate,
            base.machine_hour_rate * (Decimal::ONE + margin / Decimal::ONE_HUNDRED)
        );
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let calculator = MachineHourRateCalculator::default();
    let input = cnc_lathe();

    let first = calculator.calculate(&input);
    let second = calculator.calculate(&input);

    assert_eq!(first, second);
}

#[test]
fn rate_is_non_negative_for_partial_inputs() {
    let calculator = MachineHourRateCalculator::default();
    let lathe = cnc_lathe();

    let partials = [
        MachineInput::default(),
        MachineInput::builder().space(lathe.space.clone()).build(),
        MachineInput::builder().power(lathe.power.clone()).build(),
        MachineInput::builder().labor(lathe.labor.clone()).build(),
        MachineInput::builder()
            .overheads(lathe.overheads.clone())
            .margin_pct(dec!(15))
            .build(),
    ];

    for input in &partials {
        let output = calculator.output(input);

        assert!(output.machine_hour_rate >= Decimal::ZERO);
    }
}

#[test]
fn missing_working_hours_zeroes_every_time_based_component() {
    let mut input = cnc_lathe();
    input.investment.working_hours_per_day = Decimal::ZERO;

    let output = MachineHourRateCalculator::default().output(&input);

    assert_eq!(output.investment_cost, Decimal::ZERO);
    assert_eq!(output.space_cost, Decimal::ZERO);
    assert_eq!(output.consumables_cost, Decimal::ZERO);
    assert_eq!(output.wages, Decimal::ZERO);
    // Power is already an hourly quantity.
    assert_eq!(output.power_cost, dec!(99.05475));
}

#[test]
fn step_by_step_record_leaves_missing_sections_zero() {
    let input = MachineInput::builder()
        .investment(InvestmentInput {
            working_hours_per_day: dec!(8),
            ..Default::default()
        })
        .power_source(PowerSource::Genset)
        .build();

    let result = MachineHourRateCalculator::default().calculate(&input);

    assert_eq!(result.basis.hours_per_month(), dec!(240));
    assert_eq!(result.power.source_applied, PowerSource::Grid);
    assert_eq!(result.output.machine_hour_rate, Decimal::ZERO);
}

// =============================================================================
// Out-of-range inputs
// =============================================================================

#[test]
fn oversized_inputs_zero_only_the_affected_components() {
    let mut input = cnc_lathe();
    input.power.fan_power_w = Decimal::MAX;
    input.power.fan_count = Decimal::MAX;
    input.consumables.coolant_top_up_liters_per_month = Decimal::MAX;
    input.consumables.coolant_cost_per_liter = Decimal::MAX;

    let output = MachineHourRateCalculator::default().output(&input);

    assert_eq!(output.power_cost, Decimal::ZERO);
    assert_eq!(output.consumables_cost, Decimal::ZERO);
    assert_eq!(round_half_up(output.investment_cost), dec!(108.73));
    assert_eq!(output.machine_hour_rate, output.subtotal() * dec!(1.1));
}
