use std::io::Read;

use mhr_core::calculations::MachineHourRateCalculator;
use mhr_core::db::{SaveAction, save_machine};
use mhr_core::{
    ConsumablesInput, InvestmentInput, LaborInput, MachineInput, MachineRepository,
    MachinesHandled, OverheadsInput, PowerInput, PowerSource, RepositoryError, SpaceInput,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading machine data.
#[derive(Debug, Error)]
pub enum MachineCsvLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid power source '{value}' for machine '{machine_name}'")]
    InvalidPowerSource { machine_name: String, value: String },

    #[error("Row {0} has no machine name")]
    MissingName(usize),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for MachineCsvLoaderError {
    fn from(err: csv::Error) -> Self {
        MachineCsvLoaderError::CsvParse(err.to_string())
    }
}

/// One machine per CSV row.
///
/// Columns mirror the [`MachineInput`] fields. Missing columns and empty cells
/// read as zero, so a sheet may carry only the sections filled in so far.
/// `power_source` takes `grid`, `eb` or `genset` and defaults to `grid`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MachineCsvRecord {
    pub machine_name: String,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub machine_cost: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub life_of_machine_years: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub working_hours_per_day: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub balance_life_years: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub interest_rate_pct: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub scrap_rate_pct: Decimal,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub factory_rent_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub factory_space_sq_ft: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub space_occupied_by_machine_sq_ft: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub machine_count_in_factory: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub common_space_sq_ft: Decimal,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub machine_power_kw: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub motor_run_time_pct: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub fan_power_w: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub fan_count: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub light_power_w: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub light_count: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub compressor_power_kw: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub machines_sharing_compressor: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub compressor_run_time_pct: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub other_equipment_w: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub utilization_pct: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub eb_unit_rate: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub diesel_liters_per_hour: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub diesel_cost_per_liter: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub genset_power_kw: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub electricity_unit_rate: Decimal,
    pub power_source: String,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub coolant_top_up_liters_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub coolant_cost_per_liter: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub waste_kg_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub waste_cost_per_kg: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub monthly_maintenance_cost: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub annual_maintenance_cost: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub other_consumables_per_month: Decimal,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub tool_cost_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub operator_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub helper_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub quality_inspector_salary_per_month: Decimal,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub production_supervisor_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub quality_supervisor_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub engineer_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub manager_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub admin_staff_salary_per_month: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub operator_machines_handled: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub helper_machines_handled: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub quality_inspector_machines_handled: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub production_supervisor_machines_handled: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub quality_supervisor_machines_handled: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub engineer_machines_handled: Decimal,

    #[serde(deserialize_with = "decimal_or_zero")]
    pub margin_pct: Decimal,
}

fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Some(s) => s.trim().parse::<Decimal>().map_err(serde::de::Error::custom),
        None => Ok(Decimal::ZERO),
    }
}

impl MachineCsvRecord {
    /// Converts the flat row into a sectioned [`MachineInput`].
    pub fn to_input(&self) -> Result<MachineInput, MachineCsvLoaderError> {
        let power_source = if self.power_source.trim().is_empty() {
            PowerSource::default()
        } else {
            PowerSource::parse(&self.power_source).ok_or_else(|| {
                MachineCsvLoaderError::InvalidPowerSource {
                    machine_name: self.machine_name.clone(),
                    value: self.power_source.clone(),
                }
            })?
        };

        Ok(MachineInput {
            investment: InvestmentInput {
                machine_cost: self.machine_cost,
                life_of_machine_years: self.life_of_machine_years,
                working_hours_per_day: self.working_hours_per_day,
                balance_life_years: self.balance_life_years,
                interest_rate_pct: self.interest_rate_pct,
                scrap_rate_pct: self.scrap_rate_pct,
            },
            space: SpaceInput {
                factory_rent_per_month: self.factory_rent_per_month,
                factory_space_sq_ft: self.factory_space_sq_ft,
                space_occupied_by_machine_sq_ft: self.space_occupied_by_machine_sq_ft,
                machine_count_in_factory: self.machine_count_in_factory,
                common_space_sq_ft: self.common_space_sq_ft,
            },
            power: PowerInput {
                machine_power_kw: self.machine_power_kw,
                motor_run_time_pct: self.motor_run_time_pct,
                fan_power_w: self.fan_power_w,
                fan_count: self.fan_count,
                light_power_w: self.light_power_w,
                light_count: self.light_count,
                compressor_power_kw: self.compressor_power_kw,
                machines_sharing_compressor: self.machines_sharing_compressor,
                compressor_run_time_pct: self.compressor_run_time_pct,
                other_equipment_w: self.other_equipment_w,
                utilization_pct: self.utilization_pct,
                eb_unit_rate: self.eb_unit_rate,
                diesel_liters_per_hour: self.diesel_liters_per_hour,
                diesel_cost_per_liter: self.diesel_cost_per_liter,
                genset_power_kw: self.genset_power_kw,
                electricity_unit_rate: self.electricity_unit_rate,
                power_source,
            },
            consumables: ConsumablesInput {
                coolant_top_up_liters_per_month: self.coolant_top_up_liters_per_month,
                coolant_cost_per_liter: self.coolant_cost_per_liter,
                waste_kg_per_month: self.waste_kg_per_month,
                waste_cost_per_kg: self.waste_cost_per_kg,
                monthly_maintenance_cost: self.monthly_maintenance_cost,
                annual_maintenance_cost: self.annual_maintenance_cost,
                other_consumables_per_month: self.other_consumables_per_month,
            },
            labor: LaborInput {
                tool_cost_per_month: self.tool_cost_per_month,
                operator_salary_per_month: self.operator_salary_per_month,
                helper_salary_per_month: self.helper_salary_per_month,
                quality_inspector_salary_per_month: self.quality_inspector_salary_per_month,
            },
            overheads: OverheadsInput {
                production_supervisor_salary_per_month: self
                    .production_supervisor_salary_per_month,
                quality_supervisor_salary_per_month: self.quality_supervisor_salary_per_month,
                engineer_salary_per_month: self.engineer_salary_per_month,
                manager_salary_per_month: self.manager_salary_per_month,
                admin_staff_salary_per_month: self.admin_staff_salary_per_month,
                machines_handled: MachinesHandled {
                    operator: self.operator_machines_handled,
                    helper: self.helper_machines_handled,
                    quality_inspector: self.quality_inspector_machines_handled,
                    production_supervisor: self.production_supervisor_machines_handled,
                    quality_supervisor: self.quality_supervisor_machines_handled,
                    engineer: self.engineer_machines_handled,
                },
            },
            margin_pct: self.margin_pct,
        })
    }
}

/// Counts of machines written by [`MachineCsvLoader::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub created: usize,
    pub updated: usize,
}

impl LoadSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// Loader for machine data from CSV files.
///
/// Works through the [`MachineRepository`] trait, so any registered backend
/// can be the target.
pub struct MachineCsvLoader;

impl MachineCsvLoader {
    /// Parses machine rows from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MachineCsvRecord>, MachineCsvLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: MachineCsvRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Calculates each machine and stores it, keyed by machine name.
    ///
    /// A machine that already exists is updated in place, so loading the same
    /// file twice leaves the store unchanged apart from timestamps. Every row
    /// is validated before anything is written.
    pub async fn load<R: MachineRepository + ?Sized>(
        repo: &R,
        calculator: &MachineHourRateCalculator,
        records: &[MachineCsvRecord],
    ) -> Result<LoadSummary, MachineCsvLoaderError> {
        let mut machines = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let machine_name = record.machine_name.trim();
            if machine_name.is_empty() {
                // Header is line 1
                return Err(MachineCsvLoaderError::MissingName(index + 2));
            }
            machines.push((machine_name.to_string(), record.to_input()?));
        }

        let mut summary = LoadSummary::default();

        for (machine_name, input) in machines {
            let (_, action) = save_machine(repo, calculator, &machine_name, input).await?;
            match action {
                SaveAction::Created => summary.created += 1,
                SaveAction::Updated => summary.updated += 1,
            }
        }

        info!(
            created = summary.created,
            updated = summary.updated,
            "Loaded machines"
        );
        Ok(summary)
    }
}
