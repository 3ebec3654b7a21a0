mod machine_input;
mod machine_output;
mod machine_record;
mod power_source;

pub use machine_input::{
    ConsumablesInput, InvestmentInput, LaborInput, MachineInput, MachineInputBuilder,
    MachinesHandled, OverheadsInput, PowerInput, SpaceInput,
};
pub use machine_output::MachineOutput;
pub use machine_record::{MachineRecord, NewMachineRecord};
pub use power_source::PowerSource;
