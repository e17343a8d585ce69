//! Operation and movement mode derivation from attached hardware.
//!
//! Pure functions; the only inputs are the attachment flags and the requested
//! action shape.

use super::common::{ViomiMovementMode, ViomiOperationMode};
use crate::attributes::{AttachmentType, AttributeClass, AttributeQuery};
use crate::state::AttributeStore;

/// Which hardware modules are currently attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attachments {
    pub dustbin: bool,
    pub waterbox: bool,
    pub mop: bool,
}

impl Attachments {
    /// Read attachment flags from the store. A module counts as attached only
    /// if its attribute exists and reports `attached`.
    pub fn from_store(store: &AttributeStore) -> Self {
        let attached = |attachment_type: AttachmentType| {
            store
                .get_first_matching(
                    &AttributeQuery::class(AttributeClass::Attachment).with_type(attachment_type),
                )
                .and_then(|a| a.as_attachment())
                .is_some_and(|a| a.attached())
        };

        Self {
            dustbin: attached(AttachmentType::Dustbin),
            waterbox: attached(AttachmentType::Watertank),
            mop: attached(AttachmentType::Mop),
        }
    }
}

/// Mop dominates; mixed mode needs mop, water box and dustbin together.
pub fn derive_operation_mode(attachments: Attachments) -> ViomiOperationMode {
    if attachments.mop {
        if attachments.waterbox && attachments.dustbin {
            return ViomiOperationMode::Mixed;
        }
        return ViomiOperationMode::Mop;
    }
    ViomiOperationMode::Vacuum
}

/// Outline overrides the operation mode entirely.
///
/// The match is exhaustive: a new operation mode without a movement mapping
/// does not compile. Raw device values go through
/// [`ViomiOperationMode::from_wire`], which reports unknown modes.
pub fn derive_movement_mode(
    operation_mode: ViomiOperationMode,
    outline: bool,
) -> ViomiMovementMode {
    if outline {
        return ViomiMovementMode::Outline;
    }

    match operation_mode {
        ViomiOperationMode::Mixed => ViomiMovementMode::MopMoves,
        // Water-only tank cannot do mop moves
        ViomiOperationMode::Mop => ViomiMovementMode::ZonedCleanOrMopping,
        ViomiOperationMode::Vacuum => ViomiMovementMode::NormalCleaning,
    }
}
