//! Viomi wire constants.

use crate::attributes::OperationMode;
use crate::error::{Result, RobotError};
use strum::FromRepr;

/// Operation mode as sent with `set_mop` and reported as `is_mop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum ViomiOperationMode {
    Vacuum = 0,
    Mixed = 1,
    Mop = 2,
}

impl ViomiOperationMode {
    /// Parse a raw `is_mop` value. Unknown values are reported, not defaulted.
    pub fn from_wire(raw: u64) -> Result<Self> {
        u8::try_from(raw)
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| RobotError::UnknownOperationMode(raw.to_string()))
    }
}

impl From<ViomiOperationMode> for OperationMode {
    fn from(mode: ViomiOperationMode) -> Self {
        match mode {
            ViomiOperationMode::Vacuum => OperationMode::Vacuum,
            ViomiOperationMode::Mixed => OperationMode::VacuumAndMop,
            ViomiOperationMode::Mop => OperationMode::Mop,
        }
    }
}

/// Path planning pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ViomiMovementMode {
    NormalCleaning = 0,
    /// Y-shaped mopping pattern
    MopMoves = 1,
    Outline = 2,
    ZonedCleanOrMopping = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ViomiOperation {
    Stop = 0,
    Start = 1,
}

/// Kind of a zone record in `set_zone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ViomiArea {
    Normal = 0,
}

/// `arrange_room` operation type for merging two rooms
pub const ARRANGE_ROOM_MERGE: u8 = 2;
