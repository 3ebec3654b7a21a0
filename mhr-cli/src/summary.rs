//! Plain-text rendering of results. All rounding to two places happens here.

use std::fmt;

use mhr_core::calculations::common::round_half_up;
use mhr_core::{MachineOutput, MachineRecord};

/// Component breakdown of one machine hour rate.
pub struct RateSummary<'a> {
    pub machine_name: Option<&'a str>,
    pub output: &'a MachineOutput,
}

impl fmt::Display for RateSummary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let shown = self.output.rounded();

        if let Some(name) = self.machine_name {
            writeln!(f, "{name}")?;
        }
        let rows = [
            ("Investment", shown.investment_cost),
            ("Space", shown.space_cost),
            ("Power", shown.power_cost),
            ("Consumables", shown.consumables_cost),
            ("Tools", shown.tool_cost),
            ("Wages", shown.wages),
            ("Salary", shown.salary),
            ("Other overheads", shown.other_overheads),
        ];
        for (label, value) in rows {
            writeln!(f, "  {label:<18}{value:>12.2}")?;
        }
        writeln!(
            f,
            "  {:<18}{:>12.2}",
            "Subtotal",
            round_half_up(self.output.subtotal())
        )?;
        writeln!(f, "  {:<18}{:>11.2}%", "Profit margin", shown.profit)?;
        write!(
            f,
            "  {:<18}{:>12.2}",
            "Machine hour rate", shown.machine_hour_rate
        )
    }
}

/// One line per stored machine, most recently updated first.
pub struct MachineTable<'a>(pub &'a [MachineRecord]);

impl fmt::Display for MachineTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No machines saved.");
        }

        write!(f, "{:>4}  {:<30}{:>12}  {}", "ID", "Machine", "Rate/h", "Updated")?;
        for record in self.0 {
            let rate = match &record.output {
                Some(output) => format!("{:.2}", output.rounded().machine_hour_rate),
                None => "-".to_string(),
            };
            write!(
                f,
                "\n{:>4}  {:<30}{:>12}  {}",
                record.id,
                record.machine_name,
                rate,
                record.updated_at.format("%Y-%m-%d %H:%M")
            )?;
        }
        Ok(())
    }
}
