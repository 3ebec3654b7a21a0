use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mhr_core::{
    ConsumablesInput, InvestmentInput, LaborInput, MachineInput, MachineOutput, MachineRecord,
    MachineRepository, MachinesHandled, NewMachineRecord, OverheadsInput, PowerInput, PowerSource,
    RepositoryError, SpaceInput,
};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

/// Input columns in bind order, paired with their values.
fn input_columns(input: &MachineInput) -> [(&'static str, Decimal); 50] {
    let investment = &input.investment;
    let space = &input.space;
    let power = &input.power;
    let consumables = &input.consumables;
    let labor = &input.labor;
    let overheads = &input.overheads;
    let handled = &overheads.machines_handled;

    [
        ("machine_cost", investment.machine_cost),
        ("life_of_machine_years", investment.life_of_machine_years),
        ("working_hours_per_day", investment.working_hours_per_day),
        ("balance_life_years", investment.balance_life_years),
        ("interest_rate_pct", investment.interest_rate_pct),
        ("scrap_rate_pct", investment.scrap_rate_pct),
        ("factory_rent_per_month", space.factory_rent_per_month),
        ("factory_space_sq_ft", space.factory_space_sq_ft),
        ("space_occupied_by_machine_sq_ft", space.space_occupied_by_machine_sq_ft),
        ("machine_count_in_factory", space.machine_count_in_factory),
        ("common_space_sq_ft", space.common_space_sq_ft),
        ("machine_power_kw", power.machine_power_kw),
        ("motor_run_time_pct", power.motor_run_time_pct),
        ("fan_power_w", power.fan_power_w),
        ("fan_count", power.fan_count),
        ("light_power_w", power.light_power_w),
        ("light_count", power.light_count),
        ("compressor_power_kw", power.compressor_power_kw),
        ("machines_sharing_compressor", power.machines_sharing_compressor),
        ("compressor_run_time_pct", power.compressor_run_time_pct),
        ("other_equipment_w", power.other_equipment_w),
        ("utilization_pct", power.utilization_pct),
        ("eb_unit_rate", power.eb_unit_rate),
        ("diesel_liters_per_hour", power.diesel_liters_per_hour),
        ("diesel_cost_per_liter", power.diesel_cost_per_liter),
        ("genset_power_kw", power.genset_power_kw),
        ("electricity_unit_rate", power.electricity_unit_rate),
        ("coolant_top_up_liters_per_month", consumables.coolant_top_up_liters_per_month),
        ("coolant_cost_per_liter", consumables.coolant_cost_per_liter),
        ("waste_kg_per_month", consumables.waste_kg_per_month),
        ("waste_cost_per_kg", consumables.waste_cost_per_kg),
        ("monthly_maintenance_cost", consumables.monthly_maintenance_cost),
        ("annual_maintenance_cost", consumables.annual_maintenance_cost),
        ("other_consumables_per_month", consumables.other_consumables_per_month),
        ("tool_cost_per_month", labor.tool_cost_per_month),
        ("operator_salary_per_month", labor.operator_salary_per_month),
        ("helper_salary_per_month", labor.helper_salary_per_month),
        ("quality_inspector_salary_per_month", labor.quality_inspector_salary_per_month),
        ("production_supervisor_salary_per_month", overheads.production_supervisor_salary_per_month),
        ("quality_supervisor_salary_per_month", overheads.quality_supervisor_salary_per_month),
        ("engineer_salary_per_month", overheads.engineer_salary_per_month),
        ("manager_salary_per_month", overheads.manager_salary_per_month),
        ("admin_staff_salary_per_month", overheads.admin_staff_salary_per_month),
        ("operator_machines_handled", handled.operator),
        ("helper_machines_handled", handled.helper),
        ("quality_inspector_machines_handled", handled.quality_inspector),
        ("production_supervisor_machines_handled", handled.production_supervisor),
        ("quality_supervisor_machines_handled", handled.quality_supervisor),
        ("engineer_machines_handled", handled.engineer),
        ("margin_pct", input.margin_pct),
    ]
}

const OUTPUT_COLUMNS: [&str; 10] = [
    "investment_cost",
    "space_cost",
    "power_cost",
    "consumables_cost",
    "tool_cost",
    "wages",
    "salary",
    "other_overheads",
    "profit",
    "machine_hour_rate",
];

fn output_values(output: Option<&MachineOutput>) -> [Option<f64>; 10] {
    match output {
        Some(o) => [
            o.investment_cost,
            o.space_cost,
            o.power_cost,
            o.consumables_cost,
            o.tool_cost,
            o.wages,
            o.salary,
            o.other_overheads,
            o.profit,
            o.machine_hour_rate,
        ]
        .map(|value| Some(decimal_to_f64(value))),
        None => [None; 10],
    }
}

fn value_columns() -> Vec<&'static str> {
    let mut columns = vec!["power_source"];
    columns.extend(input_columns(&MachineInput::default()).map(|(name, _)| name));
    columns.extend(OUTPUT_COLUMNS);
    columns
}

fn select_sql() -> String {
    format!(
        "SELECT id, machine_name, {}, created_at, updated_at FROM machines",
        value_columns().join(", ")
    )
}

fn insert_sql() -> String {
    let columns = value_columns();
    // machine_name, the value columns, created_at and updated_at
    let placeholders = vec!["?"; columns.len() + 3].join(", ");
    format!(
        "INSERT INTO machines (machine_name, {}, created_at, updated_at) VALUES ({placeholders})",
        columns.join(", ")
    )
}

fn update_sql() -> String {
    let assignments: Vec<String> = value_columns()
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect();
    format!(
        "UPDATE machines SET machine_name = ?, {}, updated_at = ? WHERE id = ?",
        assignments.join(", ")
    )
}

fn database_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connects to a sqlx SQLite URL such as `sqlite://machines.db` or
    /// `sqlite::memory:`. Database files are created if missing.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so the pool must hold on to exactly one.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;

        debug!(%database_url, "Connected to SQLite database");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_machine_input(row: &SqliteRow) -> Result<MachineInput, RepositoryError> {
    let power_source: String = row
        .try_get("power_source")
        .map_err(|e| RepositoryError::Database(format!("Failed to get power_source: {e}")))?;
    let power_source = PowerSource::parse(&power_source).ok_or_else(|| {
        RepositoryError::Database(format!("Unknown power source '{power_source}'"))
    })?;

    Ok(MachineInput {
        investment: InvestmentInput {
            machine_cost: get_decimal(row, "machine_cost")?,
            life_of_machine_years: get_decimal(row, "life_of_machine_years")?,
            working_hours_per_day: get_decimal(row, "working_hours_per_day")?,
            balance_life_years: get_decimal(row, "balance_life_years")?,
            interest_rate_pct: get_decimal(row, "interest_rate_pct")?,
            scrap_rate_pct: get_decimal(row, "scrap_rate_pct")?,
        },
        space: SpaceInput {
            factory_rent_per_month: get_decimal(row, "factory_rent_per_month")?,
            factory_space_sq_ft: get_decimal(row, "factory_space_sq_ft")?,
            space_occupied_by_machine_sq_ft: get_decimal(row, "space_occupied_by_machine_sq_ft")?,
            machine_count_in_factory: get_decimal(row, "machine_count_in_factory")?,
            common_space_sq_ft: get_decimal(row, "common_space_sq_ft")?,
        },
        power: PowerInput {
            machine_power_kw: get_decimal(row, "machine_power_kw")?,
            motor_run_time_pct: get_decimal(row, "motor_run_time_pct")?,
            fan_power_w: get_decimal(row, "fan_power_w")?,
            fan_count: get_decimal(row, "fan_count")?,
            light_power_w: get_decimal(row, "light_power_w")?,
            light_count: get_decimal(row, "light_count")?,
            compressor_power_kw: get_decimal(row, "compressor_power_kw")?,
            machines_sharing_compressor: get_decimal(row, "machines_sharing_compressor")?,
            compressor_run_time_pct: get_decimal(row, "compressor_run_time_pct")?,
            other_equipment_w: get_decimal(row, "other_equipment_w")?,
            utilization_pct: get_decimal(row, "utilization_pct")?,
            eb_unit_rate: get_decimal(row, "eb_unit_rate")?,
            diesel_liters_per_hour: get_decimal(row, "diesel_liters_per_hour")?,
            diesel_cost_per_liter: get_decimal(row, "diesel_cost_per_liter")?,
            genset_power_kw: get_decimal(row, "genset_power_kw")?,
            electricity_unit_rate: get_decimal(row, "electricity_unit_rate")?,
            power_source,
        },
        consumables: ConsumablesInput {
            coolant_top_up_liters_per_month: get_decimal(row, "coolant_top_up_liters_per_month")?,
            coolant_cost_per_liter: get_decimal(row, "coolant_cost_per_liter")?,
            waste_kg_per_month: get_decimal(row, "waste_kg_per_month")?,
            waste_cost_per_kg: get_decimal(row, "waste_cost_per_kg")?,
            monthly_maintenance_cost: get_decimal(row, "monthly_maintenance_cost")?,
            annual_maintenance_cost: get_decimal(row, "annual_maintenance_cost")?,
            other_consumables_per_month: get_decimal(row, "other_consumables_per_month")?,
        },
        labor: LaborInput {
            tool_cost_per_month: get_decimal(row, "tool_cost_per_month")?,
            operator_salary_per_month: get_decimal(row, "operator_salary_per_month")?,
            helper_salary_per_month: get_decimal(row, "helper_salary_per_month")?,
            quality_inspector_salary_per_month: get_decimal(
                row,
                "quality_inspector_salary_per_month",
            )?,
        },
        overheads: OverheadsInput {
            production_supervisor_salary_per_month: get_decimal(
                row,
                "production_supervisor_salary_per_month",
            )?,
            quality_supervisor_salary_per_month: get_decimal(
                row,
                "quality_supervisor_salary_per_month",
            )?,
            engineer_salary_per_month: get_decimal(row, "engineer_salary_per_month")?,
            manager_salary_per_month: get_decimal(row, "manager_salary_per_month")?,
            admin_staff_salary_per_month: get_decimal(row, "admin_staff_salary_per_month")?,
            machines_handled: MachinesHandled {
                operator: get_decimal(row, "operator_machines_handled")?,
                helper: get_decimal(row, "helper_machines_handled")?,
                quality_inspector: get_decimal(row, "quality_inspector_machines_handled")?,
                production_supervisor: get_decimal(row, "production_supervisor_machines_handled")?,
                quality_supervisor: get_decimal(row, "quality_supervisor_machines_handled")?,
                engineer: get_decimal(row, "engineer_machines_handled")?,
            },
        },
        margin_pct: get_decimal(row, "margin_pct")?,
    })
}

/// The output is stored as a unit; a NULL rate means it was never calculated.
fn row_to_machine_output(row: &SqliteRow) -> Result<Option<MachineOutput>, RepositoryError> {
    let Some(machine_hour_rate) = get_optional_decimal(row, "machine_hour_rate")? else {
        return Ok(None);
    };

    Ok(Some(MachineOutput {
        investment_cost: get_decimal(row, "investment_cost")?,
        space_cost: get_decimal(row, "space_cost")?,
        power_cost: get_decimal(row, "power_cost")?,
        consumables_cost: get_decimal(row, "consumables_cost")?,
        tool_cost: get_decimal(row, "tool_cost")?,
        wages: get_decimal(row, "wages")?,
        salary: get_decimal(row, "salary")?,
        other_overheads: get_decimal(row, "other_overheads")?,
        profit: get_decimal(row, "profit")?,
        machine_hour_rate,
    }))
}

fn row_to_machine_record(row: &SqliteRow) -> Result<MachineRecord, RepositoryError> {
    Ok(MachineRecord {
        id: row.try_get("id").map_err(database_error)?,
        machine_name: row.try_get("machine_name").map_err(database_error)?,
        input: row_to_machine_input(row)?,
        output: row_to_machine_output(row)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {e}")))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {e}")))?,
    })
}

#[async_trait]
impl MachineRepository for SqliteRepository {
    async fn create_machine(
        &self,
        machine: NewMachineRecord,
    ) -> Result<MachineRecord, RepositoryError> {
        let now = Utc::now();
        let sql = insert_sql();

        let mut query = sqlx::query(&sql)
            .bind(&machine.machine_name)
            .bind(machine.input.power.power_source.as_str());
        for (_, value) in input_columns(&machine.input) {
            query = query.bind(decimal_to_f64(value));
        }
        for value in output_values(machine.output.as_ref()) {
            query = query.bind(value);
        }

        let result = query
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        let id = result.last_insert_rowid();
        info!(id, machine_name = %machine.machine_name, "Created machine");
        self.get_machine(id).await
    }

    async fn get_machine(
        &self,
        id: i64,
    ) -> Result<MachineRecord, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", select_sql()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_machine_record(&row)
    }

    async fn get_machine_by_name(
        &self,
        machine_name: &str,
    ) -> Result<MachineRecord, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE machine_name = ?", select_sql()))
            .bind(machine_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_machine_record(&row)
    }

    async fn update_machine(
        &self,
        machine: &MachineRecord,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let sql = update_sql();

        let mut query = sqlx::query(&sql)
            .bind(&machine.machine_name)
            .bind(machine.input.power.power_source.as_str());
        for (_, value) in input_columns(&machine.input) {
            query = query.bind(decimal_to_f64(value));
        }
        for value in output_values(machine.output.as_ref()) {
            query = query.bind(value);
        }

        let result = query
            .bind(now)
            .bind(machine.id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id = machine.id, machine_name = %machine.machine_name, "Updated machine");
        Ok(())
    }

    async fn delete_machine(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM machines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id, "Deleted machine");
        Ok(())
    }

    async fn list_machines(&self) -> Result<Vec<MachineRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{} ORDER BY updated_at DESC, id DESC", select_sql()))
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.iter().map(row_to_machine_record).collect()
    }
}
