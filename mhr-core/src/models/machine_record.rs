use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MachineInput, MachineOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub id: i64,
    pub machine_name: String,

    // User-provided values, one section per wizard step
    pub input: MachineInput,

    // Calculated values; absent until the record has been computed once
    pub output: Option<MachineOutput>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new machines (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMachineRecord {
    pub machine_name: String,
    pub input: MachineInput,
    pub output: Option<MachineOutput>,
}
