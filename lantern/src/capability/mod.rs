//! Capability modules: composable slices of derived display state.
//!
//! Each concrete device kind is a set of capabilities rather than a
//! subclass chain. A capability declares which descriptors it tracks
//! (by property name or declared kind), receives every applied update
//! for those, and exposes typed accessors. All of its state is derived;
//! the property store stays the single source of truth.

use std::collections::BTreeMap;

use compact_str::{CompactString, format_compact};
use lantern_common::{PropertyDescriptor, Value, ValueError};

use crate::detail::Renderer;

mod door;
mod imaging;
mod level;
mod power;
mod temperature;

pub use door::{Door, DoorState};
pub use imaging::{Imaging, decode_image};
pub use level::Level;
pub use power::Power;
pub use temperature::ColorTemperature;

/// The capabilities one entity composes. Which members are present is
/// decided by the device-kind registry at construction.
#[derive(Debug, Default)]
pub struct CapabilitySet {
    pub power: Option<Power>,
    pub level: Option<Level>,
    pub temperature: Option<ColorTemperature>,
    pub door: Option<Door>,
    pub imaging: Option<Imaging>,
}

impl CapabilitySet {
    /// Whether any composed capability consumes this descriptor.
    pub fn tracks(&self, name: &str, descriptor: &PropertyDescriptor) -> bool {
        (self.power.is_some() && Power::tracks(name, descriptor))
            || (self.level.is_some() && Level::tracks(name, descriptor))
            || (self.temperature.is_some() && ColorTemperature::tracks(name, descriptor))
            || (self.door.is_some() && Door::tracks(name, descriptor))
            || (self.imaging.is_some() && Imaging::tracks(name, descriptor))
    }

    /// Property resources the entity needs for its bulk pull: every
    /// tracked descriptor that exposes one.
    pub fn pull_targets<'a>(
        &self,
        descriptors: &'a BTreeMap<CompactString, PropertyDescriptor>,
    ) -> Vec<(&'a str, &'a str)> {
        descriptors
            .iter()
            .filter(|(name, descriptor)| self.tracks(name, descriptor))
            .filter_map(|(name, descriptor)| {
                descriptor.href.as_deref().map(|href| (name.as_str(), href))
            })
            .collect()
    }

    /// Route one applied update to every capability tracking it.
    pub fn apply(
        &mut self,
        name: &str,
        descriptor: &PropertyDescriptor,
        value: &Value,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ValueError> {
        if let Some(power) = self.power.as_mut() {
            if Power::tracks(name, descriptor) {
                power.apply(value);
            }
        }

        if let Some(level) = self.level.as_mut() {
            if Level::tracks(name, descriptor) {
                level.apply(value);
            }
        }

        if let Some(temperature) = self.temperature.as_mut() {
            if ColorTemperature::tracks(name, descriptor) {
                temperature.apply(value);
            }
        }

        if let Some(door) = self.door.as_mut() {
            if Door::tracks(name, descriptor) {
                door.apply(value);
            }
        }

        if let Some(imaging) = self.imaging.as_mut() {
            if Imaging::tracks(name, descriptor) {
                imaging.apply(descriptor, value, renderer)?;
            }
        }

        Ok(())
    }

    /// Compact label for the tile view: the rounded level percentage
    /// while a dimmable entity is on, otherwise plain on/off.
    pub fn tile_label(&self) -> Option<CompactString> {
        let on = self.power.as_ref().and_then(Power::is_on)?;

        if on {
            if let Some(percent) = self.level.as_ref().and_then(Level::percent) {
                return Some(format_compact!("{}%", percent.round()));
            }
        }

        Some(if on { "on" } else { "off" }.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::detail::NullRenderer;

    fn descriptor(kind: &str) -> PropertyDescriptor {
        serde_json::from_value(json!({ "href": "/p/x", "type": kind })).unwrap()
    }

    #[test]
    fn updates_route_to_tracking_members_only() {
        let mut set = CapabilitySet {
            power: Some(Power::default()),
            level: Some(Level::default()),
            ..Default::default()
        };
        let mut renderer = NullRenderer::default();

        set.apply("on", &descriptor("boolean"), &Value::Bool(true), &mut renderer).unwrap();
        set.apply("level", &descriptor("number"), &Value::Number(40.0), &mut renderer).unwrap();
        // nothing tracks this one
        set.apply("open", &descriptor("boolean"), &Value::Bool(true), &mut renderer).unwrap();

        assert_eq!(set.power.as_ref().unwrap().is_on(), Some(true));
        assert_eq!(set.level.as_ref().unwrap().percent(), Some(40.0));
        assert!(!set.tracks("open", &descriptor("boolean")));
    }

    #[test]
    fn tile_label_shows_percent_only_while_on() {
        let mut set = CapabilitySet {
            power: Some(Power::default()),
            level: Some(Level::default()),
            ..Default::default()
        };
        let mut renderer = NullRenderer::default();

        assert_eq!(set.tile_label(), None);

        set.apply("on", &descriptor("boolean"), &Value::Bool(true), &mut renderer).unwrap();
        set.apply("level", &descriptor("number"), &Value::Number(54.6), &mut renderer).unwrap();
        assert_eq!(set.tile_label().unwrap(), "55%");

        set.apply("on", &descriptor("boolean"), &Value::Bool(false), &mut renderer).unwrap();
        assert_eq!(set.tile_label().unwrap(), "off");
    }

    #[test]
    fn pull_targets_cover_tracked_descriptors_with_resources() {
        let set = CapabilitySet {
            power: Some(Power::default()),
            temperature: Some(ColorTemperature::default()),
            ..Default::default()
        };

        let descriptors: BTreeMap<CompactString, PropertyDescriptor> = serde_json::from_value(
            json!({
                "on":          { "href": "/p/on", "type": "boolean" },
                "temperature": { "href": "/p/temperature", "type": "string" },
                "level":       { "href": "/p/level", "type": "number" },
                "rssi":        { "type": "number" },
            }),
        )
        .unwrap();

        let targets = set.pull_targets(&descriptors);
        assert_eq!(targets, vec![("on", "/p/on"), ("temperature", "/p/temperature")]);
    }
}
