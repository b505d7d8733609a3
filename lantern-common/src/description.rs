use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::Deserialize;

/// Device description served by the gateway when a client first learns
/// about an entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub name: CompactString,
    #[serde(rename = "type")]
    pub type_tag: CompactString,
    pub href: CompactString,
    #[serde(default)]
    pub floorplan_x: Option<f64>,
    #[serde(default)]
    pub floorplan_y: Option<f64>,
    #[serde(default)]
    pub properties: BTreeMap<CompactString, PropertyDescriptor>,
}

/// One named, independently readable/writable attribute of a device.
///
/// A descriptor without an `href` describes a value the device reports
/// but exposes no resource for; such properties are never displayed or
/// written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    #[serde(default)]
    pub href: Option<CompactString>,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(default)]
    pub unit: Option<CompactString>,
    #[serde(default)]
    pub choices: Option<Vec<CompactString>>,
    #[serde(default)]
    pub friendly_name: Option<CompactString>,
}

/// Declared type of a property as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    Boolean,
    Number,
    Choice,
    Label,
    StillImage,
    #[serde(untagged)]
    Other(CompactString),
}
