//! Tagged registry mapping a description's type tag to the capability
//! set the entity composes. Unknown tags build a bare entity that
//! stores values but derives nothing.

use crate::capability::{CapabilitySet, ColorTemperature, Door, Imaging, Level, Power};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    OnOffSwitch,
    TemperatureLight,
    DimmableTemperatureLight,
    Camera,
    GarageDoor,
    Unknown,
}

impl DeviceKind {
    pub fn from_tag(tag: &str) -> DeviceKind {
        match tag {
            "onOffSwitch" => DeviceKind::OnOffSwitch,
            "temperatureLight" => DeviceKind::TemperatureLight,
            "dimmableTemperatureLight" => DeviceKind::DimmableTemperatureLight,
            "camera" => DeviceKind::Camera,
            "garageDoor" => DeviceKind::GarageDoor,
            other => {
                tracing::debug!(tag = other, "unrecognized device type");
                DeviceKind::Unknown
            }
        }
    }

    pub fn capabilities(self) -> CapabilitySet {
        match self {
            DeviceKind::OnOffSwitch => CapabilitySet {
                power: Some(Power::default()),
                ..Default::default()
            },
            DeviceKind::TemperatureLight => CapabilitySet {
                power: Some(Power::default()),
                temperature: Some(ColorTemperature::default()),
                ..Default::default()
            },
            DeviceKind::DimmableTemperatureLight => CapabilitySet {
                power: Some(Power::default()),
                temperature: Some(ColorTemperature::default()),
                level: Some(Level::default()),
                ..Default::default()
            },
            DeviceKind::Camera => CapabilitySet {
                imaging: Some(Imaging::default()),
                ..Default::default()
            },
            DeviceKind::GarageDoor => CapabilitySet {
                door: Some(Door::default()),
                ..Default::default()
            },
            DeviceKind::Unknown => CapabilitySet::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_to_kinds() {
        assert_eq!(DeviceKind::from_tag("onOffSwitch"), DeviceKind::OnOffSwitch);
        assert_eq!(DeviceKind::from_tag("garageDoor"), DeviceKind::GarageDoor);
        assert_eq!(DeviceKind::from_tag("thermostat"), DeviceKind::Unknown);
    }

    #[test]
    fn garage_door_derives_its_door_state() {
        use lantern_common::Value;

        use crate::{capability::DoorState, detail::NullRenderer};

        let mut set = DeviceKind::GarageDoor.capabilities();
        let descriptor =
            serde_json::from_value(serde_json::json!({ "href": "/p/open", "type": "boolean" }))
                .unwrap();

        set.apply("open", &descriptor, &Value::Bool(true), &mut NullRenderer::default())
            .unwrap();

        assert_eq!(set.door.as_ref().unwrap().state(), Some(DoorState::Open));
    }

    #[test]
    fn dimmable_light_composes_three_capabilities() {
        let set = DeviceKind::DimmableTemperatureLight.capabilities();

        assert!(set.power.is_some());
        assert!(set.temperature.is_some());
        assert!(set.level.is_some());
        assert!(set.door.is_none());
        assert!(set.imaging.is_none());
    }
}
