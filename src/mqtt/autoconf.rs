//! Home Assistant discovery descriptors for robot attributes.
//!
//! Topic layout:
//! - config: `<autoconf_prefix>/sensor/<id>/<Class>_<sub_id>/config`
//! - state:  `<topic_prefix>/<id>/<Class>_<sub_id>/state`

use crate::attributes::{
    AttachmentType, AttributeClass, AttributeValue, CleanupStatisticType, ConsumableSubType,
    ConsumableType, ConsumableUnit,
};
use crate::config::RobotModel;
use serde::Serialize;

/// Device block embedded in every discovery payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSpecification {
    pub identifiers: Vec<String>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: String,
}

impl DeviceSpecification {
    pub fn new(identifier: &str, model: RobotModel) -> Self {
        let model_name: &'static str = model.into();
        Self {
            identifiers: vec![identifier.to_string()],
            name: identifier.to_string(),
            manufacturer: model.manufacturer().to_string(),
            model: model_name.to_string(),
            sw_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoconfOptions {
    pub topic_prefix: String,
    pub autoconf_prefix: String,
    pub identifier: String,
    /// The single last-will topic of this device
    pub availability_topic: String,
    pub device: DeviceSpecification,
}

impl AutoconfOptions {
    pub fn new(
        topic_prefix: impl Into<String>,
        autoconf_prefix: impl Into<String>,
        identifier: impl Into<String>,
        device: DeviceSpecification,
    ) -> Self {
        let topic_prefix = topic_prefix.into();
        let identifier = identifier.into();
        Self {
            availability_topic: availability_topic(&topic_prefix, &identifier),
            topic_prefix,
            autoconf_prefix: autoconf_prefix.into(),
            identifier,
            device,
        }
    }
}

pub fn availability_topic(topic_prefix: &str, identifier: &str) -> String {
    format!("{}/{}/status", topic_prefix, identifier)
}

/// Discovery config payload. Non-applicable fields are empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoconfPayload {
    pub availability_topic: String,
    pub device: DeviceSpecification,
    pub name: String,
    pub state_topic: String,
    pub unique_id: String,
    pub unit_of_measurement: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoconfData {
    pub topic: String,
    pub payload: AutoconfPayload,
}

/// Name, unit and icon shown for one attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Presentation {
    name: &'static str,
    unit: &'static str,
    icon: &'static str,
}

const fn presentation(name: &'static str, unit: &'static str, icon: &'static str) -> Presentation {
    Presentation { name, unit, icon }
}

fn consumable_presentation(consumable_type: ConsumableType) -> Presentation {
    match consumable_type {
        ConsumableType::Brush => presentation("Brush", "", "mdi:brush"),
        ConsumableType::Filter => presentation("Filter", "", "mdi:air-filter"),
        ConsumableType::Mop => presentation("Mop", "", "mdi:water"),
    }
}

fn consumable_unit(unit: ConsumableUnit) -> &'static str {
    match unit {
        ConsumableUnit::Minutes => "Minutes",
        ConsumableUnit::Percent => "%",
    }
}

fn sub_type_label(sub_type: ConsumableSubType) -> Option<&'static str> {
    match sub_type {
        ConsumableSubType::None => None,
        ConsumableSubType::Main => Some("Main"),
        ConsumableSubType::SideRight => Some("Right side"),
        ConsumableSubType::SideLeft => Some("Left side"),
    }
}

fn attachment_presentation(attachment_type: AttachmentType) -> Presentation {
    match attachment_type {
        AttachmentType::Dustbin => presentation("Dustbin", "", "mdi:delete"),
        AttachmentType::Watertank => presentation("Water tank", "", "mdi:cup-water"),
        AttachmentType::Mop => presentation("Mop attachment", "", "mdi:square-rounded"),
    }
}

fn cleanup_statistic_presentation(statistic_type: CleanupStatisticType) -> Option<Presentation> {
    match statistic_type {
        CleanupStatisticType::Area => Some(presentation("Area", "", "mdi:progress-wrench")),
        CleanupStatisticType::Duration => {
            Some(presentation("Duration", "Seconds", "mdi:progress-clock"))
        }
        CleanupStatisticType::Count => None,
    }
}

/// Icon for types without a table entry.
fn generic_icon(class: AttributeClass) -> &'static str {
    match class {
        AttributeClass::Consumable => "mdi:wrench",
        AttributeClass::Attachment => "mdi:puzzle",
        AttributeClass::OperationMode => "mdi:cog",
        AttributeClass::LatestCleanupStatistics => "mdi:progress-wrench",
    }
}

/// Display name, unit and icon for an attribute.
fn present(attribute: &AttributeValue) -> (String, &'static str, &'static str) {
    let found = match attribute {
        AttributeValue::Consumable(a) => {
            let p = consumable_presentation(a.consumable_type());
            let name = match sub_type_label(a.sub_type()) {
                Some(label) => format!("{} {}", label, p.name.to_lowercase()),
                None => p.name.to_string(),
            };
            return (name, consumable_unit(a.remaining().unit), p.icon);
        }
        AttributeValue::Attachment(a) => Some(attachment_presentation(a.attachment_type())),
        AttributeValue::OperationMode(_) => {
            Some(presentation("Operation mode", "", "mdi:developer-board"))
        }
        AttributeValue::LatestCleanupStatistics(a) => {
            cleanup_statistic_presentation(a.statistic_type())
        }
    };

    match found {
        Some(p) => (p.name.to_string(), p.unit, p.icon),
        None => (
            attribute.type_name().to_string(),
            "",
            generic_icon(attribute.class()),
        ),
    }
}

/// Topic-safe identifier of the attribute's slot within its class.
pub fn sub_identifier(attribute: &AttributeValue) -> String {
    let none: &'static str = ConsumableSubType::None.into();
    match attribute.sub_type_name() {
        Some(sub_type) if sub_type != none => {
            format!("{}_{}", attribute.type_name(), sub_type)
        }
        _ => attribute.type_name().to_string(),
    }
}

fn object_id(attribute: &AttributeValue) -> String {
    format!("{}_{}", attribute.class(), sub_identifier(attribute))
}

pub fn state_topic(attribute: &AttributeValue, options: &AutoconfOptions) -> String {
    format!(
        "{}/{}/{}/state",
        options.topic_prefix,
        options.identifier,
        object_id(attribute)
    )
}

/// Build the discovery descriptor of one attribute.
pub fn describe(attribute: &AttributeValue, options: &AutoconfOptions) -> AutoconfData {
    let (name, unit, icon) = present(attribute);
    let object_id = object_id(attribute);

    AutoconfData {
        topic: format!(
            "{}/sensor/{}/{}/config",
            options.autoconf_prefix, options.identifier, object_id
        ),
        payload: AutoconfPayload {
            availability_topic: options.availability_topic.clone(),
            device: options.device.clone(),
            name,
            state_topic: state_topic(attribute, options),
            unique_id: format!("{}_{}", options.identifier, object_id),
            unit_of_measurement: unit.to_string(),
            icon: icon.to_string(),
        },
    }
}
