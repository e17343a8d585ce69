//! Removable hardware modules (dustbin, water tank, mop pad).

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    Dustbin,
    Watertank,
    Mop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentAttribute {
    #[serde(rename = "type")]
    attachment_type: AttachmentType,
    attached: bool,
}

impl AttachmentAttribute {
    pub fn new(attachment_type: AttachmentType, attached: bool) -> Self {
        Self {
            attachment_type,
            attached,
        }
    }

    pub fn attachment_type(&self) -> AttachmentType {
        self.attachment_type
    }

    pub fn attached(&self) -> bool {
        self.attached
    }
}
