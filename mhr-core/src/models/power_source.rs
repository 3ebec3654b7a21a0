use serde::{Deserialize, Serialize};

/// Which unit rate prices the electrical load of a machine.
///
/// Plants quote three different rates: the grid tariff actually paid, the
/// electricity-board reference tariff, and the effective rate of a diesel
/// generator. The caller picks one explicitly; [`PowerSource::Grid`] is the
/// default for records that never set it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    #[default]
    Grid,
    #[serde(alias = "eb")]
    ElectricityBoard,
    Genset,
}

impl PowerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::ElectricityBoard => "eb",
            Self::Genset => "genset",
        }
    }

    /// Parses the short code used in storage and CSV files.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(Self::Grid),
            "eb" | "electricity_board" => Some(Self::ElectricityBoard),
            "genset" | "generator" => Some(Self::Genset),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Grid => "Grid electricity",
            Self::ElectricityBoard => "Electricity board (reference)",
            Self::Genset => "Diesel generator",
        }
    }
}
