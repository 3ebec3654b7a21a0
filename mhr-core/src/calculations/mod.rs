//! Cost calculators for the machine hour rate.
//!
//! Each component has its own calculator returning a result struct with the
//! intermediate values; [`MachineHourRateCalculator`] runs them all against a
//! shared [`HourBasis`] and blends the total with the profit margin.

mod basis;
mod consumables;
mod investment;
mod labor;
mod power;
mod rate;
mod space;

pub mod common;

pub use basis::{CostBasisConfig, CostBasisConfigError, HourBasis};
pub use consumables::{ConsumablesCalculator, ConsumablesCost};
pub use investment::{InvestmentCalculator, InvestmentCost};
pub use labor::{LaborCalculator, LaborCost, RoleHourlyCosts};
pub use power::{PowerCalculator, PowerCost};
pub use rate::{MachineHourRateCalculator, MachineHourRateResult};
pub use space::{SpaceCalculator, SpaceCost};
