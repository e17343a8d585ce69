//! Typed robot state attributes.
//!
//! Every fact the bridge knows about a robot is stored as an [`AttributeValue`].
//! Values are partitioned by [`AttributeClass`] and, within a class, by a type
//! and an optional sub-type. The `(class, type, sub_type)` triple is the key
//! the [`AttributeStore`](crate::state::AttributeStore) matches on.
//!
//! Attribute values are immutable. A change is expressed by building a new
//! value and upserting it over the old one.

pub mod attachment;
pub mod cleanup_statistics;
pub mod consumable;
pub mod operation_mode;

pub use attachment::{AttachmentAttribute, AttachmentType};
pub use cleanup_statistics::{CleanupStatisticType, LatestCleanupStatisticsAttribute};
pub use consumable::{
    ConsumableAttribute, ConsumableRemaining, ConsumableSubType, ConsumableType, ConsumableUnit,
};
pub use operation_mode::{OperationMode, OperationModeAttribute};

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, IntoStaticStr};

/// Attribute class discriminant.
///
/// The serialized name is used verbatim in MQTT topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum AttributeClass {
    #[strum(serialize = "ConsumableStateAttribute")]
    Consumable,
    #[strum(serialize = "AttachmentStateAttribute")]
    Attachment,
    #[strum(serialize = "OperationModeStateAttribute")]
    OperationMode,
    #[strum(serialize = "LatestCleanupStatisticsAttribute")]
    LatestCleanupStatistics,
}

/// A single typed fact about robot state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__class")]
pub enum AttributeValue {
    #[serde(rename = "ConsumableStateAttribute")]
    Consumable(ConsumableAttribute),
    #[serde(rename = "AttachmentStateAttribute")]
    Attachment(AttachmentAttribute),
    #[serde(rename = "OperationModeStateAttribute")]
    OperationMode(OperationModeAttribute),
    #[serde(rename = "LatestCleanupStatisticsAttribute")]
    LatestCleanupStatistics(LatestCleanupStatisticsAttribute),
}

impl AttributeValue {
    pub fn class(&self) -> AttributeClass {
        match self {
            AttributeValue::Consumable(_) => AttributeClass::Consumable,
            AttributeValue::Attachment(_) => AttributeClass::Attachment,
            AttributeValue::OperationMode(_) => AttributeClass::OperationMode,
            AttributeValue::LatestCleanupStatistics(_) => AttributeClass::LatestCleanupStatistics,
        }
    }

    /// Wire name of the attribute type (e.g. `brush`, `dustbin`, `area`).
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Consumable(a) => a.consumable_type().into(),
            AttributeValue::Attachment(a) => a.attachment_type().into(),
            AttributeValue::OperationMode(_) => OperationModeAttribute::TYPE_NAME,
            AttributeValue::LatestCleanupStatistics(a) => a.statistic_type().into(),
        }
    }

    /// Wire name of the sub-type, for classes that have one.
    pub fn sub_type_name(&self) -> Option<&'static str> {
        match self {
            AttributeValue::Consumable(a) => Some(a.sub_type().into()),
            _ => None,
        }
    }

    /// Query matching exactly this attribute's `(class, type, sub_type)` slot.
    pub fn key(&self) -> AttributeQuery {
        AttributeQuery {
            class: self.class(),
            attribute_type: Some(self.type_name()),
            sub_type: self.sub_type_name(),
        }
    }

    pub fn matches(&self, query: &AttributeQuery) -> bool {
        if self.class() != query.class {
            return false;
        }
        if let Some(t) = query.attribute_type
            && t != self.type_name()
        {
            return false;
        }
        if let Some(s) = query.sub_type
            && Some(s) != self.sub_type_name()
        {
            return false;
        }
        true
    }

    /// JSON payload published on the attribute's state topic.
    ///
    /// Consumables publish the bare remaining amount; the unit travels in the
    /// discovery config.
    pub fn state_payload(&self) -> Value {
        match self {
            AttributeValue::Consumable(a) => serde_json::json!(a.remaining().value),
            AttributeValue::Attachment(a) => Value::Bool(a.attached()),
            AttributeValue::OperationMode(a) => {
                let mode: &'static str = a.value().into();
                Value::String(mode.to_string())
            }
            AttributeValue::LatestCleanupStatistics(a) => serde_json::json!(a.value()),
        }
    }

    pub fn as_consumable(&self) -> Option<&ConsumableAttribute> {
        match self {
            AttributeValue::Consumable(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_attachment(&self) -> Option<&AttachmentAttribute> {
        match self {
            AttributeValue::Attachment(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_operation_mode(&self) -> Option<&OperationModeAttribute> {
        match self {
            AttributeValue::OperationMode(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_cleanup_statistic(&self) -> Option<&LatestCleanupStatisticsAttribute> {
        match self {
            AttributeValue::LatestCleanupStatistics(a) => Some(a),
            _ => None,
        }
    }
}

impl From<ConsumableAttribute> for AttributeValue {
    fn from(a: ConsumableAttribute) -> Self {
        AttributeValue::Consumable(a)
    }
}

impl From<AttachmentAttribute> for AttributeValue {
    fn from(a: AttachmentAttribute) -> Self {
        AttributeValue::Attachment(a)
    }
}

impl From<OperationModeAttribute> for AttributeValue {
    fn from(a: OperationModeAttribute) -> Self {
        AttributeValue::OperationMode(a)
    }
}

impl From<LatestCleanupStatisticsAttribute> for AttributeValue {
    fn from(a: LatestCleanupStatisticsAttribute) -> Self {
        AttributeValue::LatestCleanupStatistics(a)
    }
}

/// Predicate over the `(class, type, sub_type)` key.
///
/// `None` for type or sub-type matches anything within the class.
///
/// # Example
/// ```ignore
/// let query = AttributeQuery::class(AttributeClass::Consumable)
///     .with_type(ConsumableType::Brush)
///     .with_sub_type(ConsumableSubType::Main);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeQuery {
    pub class: AttributeClass,
    pub attribute_type: Option<&'static str>,
    pub sub_type: Option<&'static str>,
}

impl AttributeQuery {
    pub fn class(class: AttributeClass) -> Self {
        Self {
            class,
            attribute_type: None,
            sub_type: None,
        }
    }

    pub fn with_type(mut self, attribute_type: impl Into<&'static str>) -> Self {
        self.attribute_type = Some(attribute_type.into());
        self
    }

    pub fn with_sub_type(mut self, sub_type: impl Into<&'static str>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_brush(minutes: u32) -> AttributeValue {
        ConsumableAttribute::new(
            ConsumableType::Brush,
            ConsumableSubType::Main,
            ConsumableRemaining::minutes(minutes),
        )
        .into()
    }

    #[test]
    fn test_key_names() {
        let attr = main_brush(10);
        assert_eq!(attr.class(), AttributeClass::Consumable);
        assert_eq!(attr.type_name(), "brush");
        assert_eq!(attr.sub_type_name(), Some("main"));
        assert_eq!(attr.class().to_string(), "ConsumableStateAttribute");
    }

    #[test]
    fn test_matches_partial_query() {
        let attr = main_brush(10);

        assert!(attr.matches(&AttributeQuery::class(AttributeClass::Consumable)));
        assert!(attr.matches(
            &AttributeQuery::class(AttributeClass::Consumable).with_type(ConsumableType::Brush)
        ));
        assert!(!attr.matches(
            &AttributeQuery::class(AttributeClass::Consumable)
                .with_type(ConsumableType::Brush)
                .with_sub_type(ConsumableSubType::SideRight)
        ));
        assert!(!attr.matches(
            &AttributeQuery::class(AttributeClass::Consumable).with_type(ConsumableType::Filter)
        ));
        assert!(!attr.matches(&AttributeQuery::class(AttributeClass::Attachment)));
    }

    #[test]
    fn test_class_without_sub_type_ignores_sub_type_in_key() {
        let attr: AttributeValue = AttachmentAttribute::new(AttachmentType::Mop, true).into();
        let key = attr.key();
        assert_eq!(key.sub_type, None);
        assert!(attr.matches(&key));
    }

    #[test]
    fn test_state_payloads() {
        assert_eq!(
            main_brush(600).state_payload(),
            serde_json::json!(600)
        );

        let mode: AttributeValue = OperationModeAttribute::new(OperationMode::VacuumAndMop).into();
        assert_eq!(mode.state_payload(), serde_json::json!("vacuum_and_mop"));

        let stat: AttributeValue =
            LatestCleanupStatisticsAttribute::new(CleanupStatisticType::Duration, 1800).into();
        assert_eq!(stat.state_payload(), serde_json::json!(1800));
    }

    #[test]
    fn test_serialize_carries_class_tag() {
        let attr: AttributeValue = AttachmentAttribute::new(AttachmentType::Dustbin, true).into();
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["__class"], "AttachmentStateAttribute");
        assert_eq!(json["type"], "dustbin");
        assert_eq!(json["attached"], true);
    }
}
