//! Power cost: the electrical load drawn while the machine runs, priced at the
//! selected tariff.
//!
//! # Load Structure
//!
//! | Load        | Formula |
//! |-------------|---------|
//! | Machine     | machine kW × motor run time % |
//! | Auxiliary   | (fan W × fans + light W × lights + other W) ÷ 1000 |
//! | Compressor  | compressor kW × run time % ÷ max(machines sharing, 1) |
//! | Effective   | (machine + auxiliary + compressor) × utilization % |
//!
//! # Tariff Selection
//!
//! | [`PowerSource`]    | Rate used |
//! |--------------------|-----------|
//! | `Grid`             | `electricity_unit_rate` |
//! | `ElectricityBoard` | `eb_unit_rate` |
//! | `Genset`           | generator rate, or `electricity_unit_rate` if it cannot be derived |
//!
//! The generator rate is diesel litres per hour × cost per litre ÷ genset kW,
//! and exists only when all three inputs are positive.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use mhr_core::{PowerInput, PowerSource};
//! use mhr_core::calculations::PowerCalculator;
//!
//! let input = PowerInput {
//!     machine_power_kw: dec!(15),
//!     motor_run_time_pct: dec!(80),
//!     utilization_pct: dec!(85),
//!     electricity_unit_rate: dec!(8.5),
//!     ..Default::default()
//! };
//!
//! let cost = PowerCalculator::calculate(&input);
//!
//! assert_eq!(cost.effective_load_kw, dec!(10.2));
//! assert_eq!(cost.genset_unit_rate, None);
//! assert_eq!(cost.source_applied, PowerSource::Grid);
//! assert_eq!(cost.hourly_cost, dec!(86.7));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{guarded_div, overflowed, percent, sharing_ratio};
use crate::{PowerInput, PowerSource};

/// Result of the power calculation with its intermediate values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerCost {
    pub machine_load_kw: Decimal,
    pub auxiliary_load_kw: Decimal,
    pub compressor_load_kw: Decimal,

    /// Sum of the machine, auxiliary and compressor loads.
    pub total_load_kw: Decimal,

    /// Total load scaled by utilization: kWh drawn per operating hour.
    pub effective_load_kw: Decimal,

    /// Effective generator cost per kWh, when the diesel inputs allow it.
    pub genset_unit_rate: Option<Decimal>,

    /// Tariff that actually priced the load. Differs from the requested
    /// source when a generator rate was requested but could not be derived.
    pub source_applied: PowerSource,

    pub unit_rate_applied: Decimal,

    /// Effective load × applied rate, currency per hour.
    pub hourly_cost: Decimal,
}

/// Calculator for the power component.
///
/// Power is already an hourly quantity, so this calculator does not need the
/// monthly-to-hourly basis.
pub struct PowerCalculator;

impl PowerCalculator {
    pub fn calculate(input: &PowerInput) -> PowerCost {
        Self::checked_calculate(input).unwrap_or_else(|| overflowed("power"))
    }

    fn checked_calculate(input: &PowerInput) -> Option<PowerCost> {
        let machine_load_kw = input
            .machine_power_kw
            .checked_mul(percent(input.motor_run_time_pct))?;
        let auxiliary_load_kw = Self::auxiliary_load_kw(input)?;
        let compressor_load_kw = Self::compressor_load_kw(input)?;

        let total_load_kw = machine_load_kw
            .checked_add(auxiliary_load_kw)?
            .checked_add(compressor_load_kw)?;
        let effective_load_kw = total_load_kw.checked_mul(percent(input.utilization_pct))?;

        let genset_unit_rate = Self::genset_unit_rate(input);
        let (source_applied, unit_rate_applied) = Self::select_rate(input, genset_unit_rate);

        Some(PowerCost {
            machine_load_kw,
            auxiliary_load_kw,
            compressor_load_kw,
            total_load_kw,
            effective_load_kw,
            genset_unit_rate,
            source_applied,
            unit_rate_applied,
            hourly_cost: effective_load_kw.checked_mul(unit_rate_applied)?,
        })
    }

    /// Derives the generator's cost per kWh from its fuel burn.
    ///
    /// Returns `None` unless diesel consumption, diesel price and genset
    /// power are all positive, or when the rate does not fit in a `Decimal`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use mhr_core::PowerInput;
    /// use mhr_core::calculations::PowerCalculator;
    ///
    /// let input = PowerInput {
    ///     diesel_liters_per_hour: dec!(3.5),
    ///     diesel_cost_per_liter: dec!(85),
    ///     genset_power_kw: dec!(100),
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(PowerCalculator::genset_unit_rate(&input), Some(dec!(2.975)));
    /// ```
    pub fn genset_unit_rate(input: &PowerInput) -> Option<Decimal> {
        let all_positive = input.diesel_liters_per_hour > Decimal::ZERO
            && input.diesel_cost_per_liter > Decimal::ZERO
            && input.genset_power_kw > Decimal::ZERO;
        if !all_positive {
            return None;
        }

        input
            .diesel_liters_per_hour
            .checked_mul(input.diesel_cost_per_liter)?
            .checked_div(input.genset_power_kw)
    }

    fn auxiliary_load_kw(input: &PowerInput) -> Option<Decimal> {
        let fans = input.fan_power_w.checked_mul(input.fan_count)?;
        let lights = input.light_power_w.checked_mul(input.light_count)?;
        let watts = fans
            .checked_add(lights)?
            .checked_add(input.other_equipment_w)?;
        Some(watts / Decimal::ONE_THOUSAND)
    }

    fn compressor_load_kw(input: &PowerInput) -> Option<Decimal> {
        let running_kw = input
            .compressor_power_kw
            .checked_mul(percent(input.compressor_run_time_pct))?;
        guarded_div(running_kw, sharing_ratio(input.machines_sharing_compressor))
    }

    fn select_rate(
        input: &PowerInput,
        genset_unit_rate: Option<Decimal>,
    ) -> (PowerSource, Decimal) {
        match input.power_source {
            PowerSource::Grid => (PowerSource::Grid, input.electricity_unit_rate),
            PowerSource::ElectricityBoard => {
                if input.eb_unit_rate <= Decimal::ZERO {
                    debug!("Electricity board rate not set; power cost is zero");
                }
                (PowerSource::ElectricityBoard, input.eb_unit_rate)
            }
            PowerSource::Genset => match genset_unit_rate {
                Some(rate) => (PowerSource::Genset, rate),
                None => {
                    warn!(
                        diesel_liters_per_hour = %input.diesel_liters_per_hour,
                        diesel_cost_per_liter = %input.diesel_cost_per_liter,
                        genset_power_kw = %input.genset_power_kw,
                        "Genset rate cannot be derived; falling back to grid rate"
                    );
                    (PowerSource::Grid, input.electricity_unit_rate)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn lathe_input() -> PowerInput {
        PowerInput {
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
        }
    }

    /// Shared buffer the test subscriber writes formatted events into.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` under a WARN-level subscriber and returns what it logged.
    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);

        let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        (result, text)
    }

    // =========================================================================
    // Load tests
    // =========================================================================

    #[test]
    fn machine_load_applies_motor_run_time() {
        let cost = PowerCalculator::calculate(&lathe_input());

        assert_eq!(cost.machine_load_kw, dec!(12));
    }

    #[test]
    fn auxiliary_load_converts_watts_to_kilowatts() {
        let cost = PowerCalculator::calculate(&lathe_input());

        // (75 × 2 + 40 × 4 + 500) W
        assert_eq!(cost.auxiliary_load_kw, dec!(0.81));
    }

    #[test]
    fn compressor_load_is_shared_between_machines() {
        let cost = PowerCalculator::calculate(&lathe_input());

        // 7.5 kW × 60% ÷ 5
        assert_eq!(cost.compressor_load_kw, dec!(0.9));
    }

    #[test]
    fn compressor_with_zero_sharing_counts_as_one_machine() {
        let input = PowerInput {
            machines_sharing_compressor: Decimal::ZERO,
            ..lathe_input()
        };

        let cost = PowerCalculator::calculate(&input);

        assert_eq!(cost.compressor_load_kw, dec!(4.5));
    }

    #[test]
    fn effective_load_applies_utilization() {
        let cost = PowerCalculator::calculate(&lathe_input());

        assert_eq!(cost.total_load_kw, dec!(13.71));
        assert_eq!(cost.effective_load_kw, dec!(11.6535));
    }

    // =========================================================================
    // Genset rate tests
    // =========================================================================

    #[test]
    fn genset_rate_from_diesel_consumption() {
        assert_eq!(
            PowerCalculator::genset_unit_rate(&lathe_input()),
            Some(dec!(2.975))
        );
    }

    #[test]
    fn genset_rate_undefined_when_any_input_is_zero() {
        for input in [
            PowerInput {
                diesel_liters_per_hour: Decimal::ZERO,
                ..lathe_input()
            },
            PowerInput {
                diesel_cost_per_liter: Decimal::ZERO,
                ..lathe_input()
            },
            PowerInput {
                genset_power_kw: Decimal::ZERO,
                ..lathe_input()
            },
        ] {
            assert_eq!(PowerCalculator::genset_unit_rate(&input), None);
        }
    }

    // =========================================================================
    // Tariff selection tests
    // =========================================================================

    #[test]
    fn grid_source_uses_electricity_unit_rate() {
        let cost = PowerCalculator::calculate(&lathe_input());

        assert_eq!(cost.source_applied, PowerSource::Grid);
        assert_eq!(cost.unit_rate_applied, dec!(8.5));
        assert_eq!(cost.hourly_cost, dec!(99.05475));
    }

    #[test]
    fn grid_source_still_reports_genset_rate() {
        let cost = PowerCalculator::calculate(&lathe_input());

        assert_eq!(cost.genset_unit_rate, Some(dec!(2.975)));
    }

    #[test]
    fn electricity_board_source_uses_eb_rate() {
        let input = PowerInput {
            power_source: PowerSource::ElectricityBoard,
            ..lathe_input()
        };

        let cost = PowerCalculator::calculate(&input);

        assert_eq!(cost.source_applied, PowerSource::ElectricityBoard);
        assert_eq!(cost.hourly_cost, dec!(87.40125));
    }

    #[test]
    fn genset_source_uses_derived_rate() {
        let input = PowerInput {
            power_source: PowerSource::Genset,
            ..lathe_input()
        };

        let cost = PowerCalculator::calculate(&input);

        assert_eq!(cost.source_applied, PowerSource::Genset);
        assert_eq!(cost.unit_rate_applied, dec!(2.975));
        assert_eq!(cost.hourly_cost, dec!(34.6691625));
    }

    #[test]
    fn genset_source_without_diesel_data_falls_back_to_grid() {
        let input = PowerInput {
            power_source: PowerSource::Genset,
            diesel_liters_per_hour: Decimal::ZERO,
            diesel_cost_per_liter: Decimal::ZERO,
            genset_power_kw: Decimal::ZERO,
            ..lathe_input()
        };

        let (cost, logs) = capture_warnings(|| PowerCalculator::calculate(&input));

        assert_eq!(cost.genset_unit_rate, None);
        assert_eq!(cost.source_applied, PowerSource::Grid);
        assert_eq!(cost.unit_rate_applied, dec!(8.5));
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("falling back to grid rate"), "logs: {logs}");
    }

    #[test]
    fn genset_source_with_derived_rate_logs_nothing() {
        let input = PowerInput {
            power_source: PowerSource::Genset,
            ..lathe_input()
        };

        let (_, logs) = capture_warnings(|| PowerCalculator::calculate(&input));

        assert_eq!(logs, "");
    }

    #[test]
    fn genset_rate_overflow_falls_back_to_grid() {
        let input = PowerInput {
            power_source: PowerSource::Genset,
            diesel_liters_per_hour: Decimal::MAX,
            diesel_cost_per_liter: dec!(2),
            ..lathe_input()
        };

        let cost = PowerCalculator::calculate(&input);

        assert_eq!(cost.genset_unit_rate, None);
        assert_eq!(cost.source_applied, PowerSource::Grid);
        assert_eq!(cost.hourly_cost, dec!(99.05475));
    }

    // =========================================================================
    // Overflow tests
    // =========================================================================

    #[test]
    fn overflowing_auxiliary_load_gives_zero_cost() {
        let input = PowerInput {
            fan_power_w: Decimal::MAX,
            fan_count: Decimal::MAX,
            ..lathe_input()
        };

        let (cost, logs) = capture_warnings(|| PowerCalculator::calculate(&input));

        assert_eq!(cost.auxiliary_load_kw, Decimal::ZERO);
        assert_eq!(cost.hourly_cost, Decimal::ZERO);
        assert!(logs.contains("Arithmetic overflow; component is zero"), "logs: {logs}");
        assert!(logs.contains("power"), "logs: {logs}");
    }

    #[test]
    fn overflowing_hourly_cost_gives_zero_cost() {
        let input = PowerInput {
            electricity_unit_rate: Decimal::MAX,
            ..lathe_input()
        };

        let cost = PowerCalculator::calculate(&input);

        assert_eq!(cost, PowerCost::default());
    }

    #[test]
    fn grid_only_scenario_without_diesel_inputs() {
        let input = PowerInput {
            machine_power_kw: dec!(15),
            motor_run_time_pct: dec!(80),
            utilization_pct: dec!(85),
            electricity_unit_rate: dec!(8.5),
            ..Default::default()
        };

        let cost = PowerCalculator::calculate(&input);

        assert_eq!(cost.genset_unit_rate, None);
        assert_eq!(cost.hourly_cost, dec!(86.7));
    }

    #[test]
    fn empty_input_gives_zero_cost() {
        let cost = PowerCalculator::calculate(&PowerInput::default());

        assert_eq!(cost.hourly_cost, Decimal::ZERO);
        assert_eq!(cost.genset_unit_rate, None);
    }
}
