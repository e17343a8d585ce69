//! Robot-wide cleaning modality.

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    Vacuum,
    Mop,
    VacuumAndMop,
}

/// The currently active operation mode. There is only one slot per robot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationModeAttribute {
    value: OperationMode,
}

impl OperationModeAttribute {
    pub const TYPE_NAME: &'static str = "operation_mode";

    pub fn new(value: OperationMode) -> Self {
        Self { value }
    }

    pub fn value(&self) -> OperationMode {
        self.value
    }
}
