use mhr_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a decimal column stored as INTEGER or REAL. NULL reads as zero, so
/// columns added to older databases behave like unset inputs.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{column}' not found: {e}")))?;

    let type_name = value_ref.type_info().name().to_string();

    match type_name.as_str() {
        "INTEGER" => {
            let value: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get INTEGER from '{column}': {e}"))
            })?;
            Ok(Decimal::from(value))
        }
        "REAL" => {
            let value: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get REAL from '{column}': {e}"))
            })?;
            Decimal::try_from(value).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {value} to Decimal: {e}"))
            })
        }
        "NULL" => Ok(Decimal::ZERO),
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{other}' for column '{column}'"
        ))),
    }
}

/// Like [`get_decimal`], but NULL reads as `None`.
pub fn get_optional_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{column}' not found: {e}")))?;

    if value_ref.is_null() {
        return Ok(None);
    }

    get_decimal(row, column).map(Some)
}

pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
