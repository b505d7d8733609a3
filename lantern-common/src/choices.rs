//! Canonical UI representation of choice-valued properties.
//!
//! A descriptor may embed its own `choices` and `friendlyName`; those
//! always win. Otherwise a built-in table keyed by property name covers
//! the camera properties gateways commonly omit metadata for.

use compact_str::CompactString;

use crate::PropertyDescriptor;

/// Resolved label and allowed values for one choice property.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChoiceSpec {
    pub label: CompactString,
    pub values: Vec<CompactString>,
}

const RESOLUTIONS: &[&str] =
    &["320x240", "640x480", "800x600", "1024x768", "1296x972", "1640x1232", "3280x2464"];

const FRAMERATES: &[&str] = &[
    "0.0", "0.1", "0.5", "1.0", "2.0", "3.0", "4.0", "5.0", "6.0", "7.0", "8.0", "9.0", "10.0",
    "15.0", "20.0", "30.0",
];

const EXPOSURE_MODES: &[&str] = &[
    "off",
    "auto",
    "night",
    "nightpreview",
    "backlight",
    "spotlight",
    "sports",
    "snow",
    "beach",
    "verylong",
    "fixedfps",
    "antishake",
    "fireworks",
];

fn builtin(name: &str) -> Option<(&'static str, &'static [&'static str])> {
    match name {
        "resolution" => Some(("Resolution", RESOLUTIONS)),
        "framerate" => Some(("Framerate", FRAMERATES)),
        "exposureMode" => Some(("Exposure", EXPOSURE_MODES)),
        _ => None,
    }
}

/// Resolve the display spec for a choice property. Descriptor-embedded
/// metadata takes precedence over the built-in table; names known to
/// neither resolve to an empty spec.
pub fn resolve(name: &str, descriptor: &PropertyDescriptor) -> ChoiceSpec {
    let fallback = builtin(name);

    let label = descriptor
        .friendly_name
        .clone()
        .or_else(|| fallback.map(|(label, _)| label.into()))
        .unwrap_or_default();

    let values = descriptor
        .choices
        .clone()
        .or_else(|| fallback.map(|(_, values)| values.iter().map(|v| (*v).into()).collect()))
        .unwrap_or_default();

    ChoiceSpec { label, values }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builtin_fallback() {
        let descriptor: PropertyDescriptor =
            serde_json::from_value(json!({ "href": "/p/resolution", "type": "choice" })).unwrap();

        let spec = resolve("resolution", &descriptor);
        assert_eq!(spec.label, "Resolution");
        assert_eq!(spec.values, RESOLUTIONS.iter().map(|v| (*v).into()).collect::<Vec<CompactString>>());
    }

    #[test]
    fn framerate_has_sixteen_steps() {
        let descriptor: PropertyDescriptor =
            serde_json::from_value(json!({ "href": "/p/framerate", "type": "choice" })).unwrap();

        assert_eq!(resolve("framerate", &descriptor).values.len(), 16);
    }

    #[test]
    fn descriptor_metadata_wins_over_builtin() {
        let descriptor: PropertyDescriptor = serde_json::from_value(json!({
            "href": "/p/resolution",
            "type": "choice",
            "choices": ["160x120"],
            "friendlyName": "Picture size",
        }))
        .unwrap();

        let spec = resolve("resolution", &descriptor);
        assert_eq!(spec.label, "Picture size");
        assert_eq!(spec.values, vec![CompactString::from("160x120")]);
    }

    #[test]
    fn embedded_choices_without_label_still_use_builtin_label() {
        let descriptor: PropertyDescriptor = serde_json::from_value(json!({
            "href": "/p/exposureMode",
            "type": "choice",
            "choices": ["auto", "night"],
        }))
        .unwrap();

        let spec = resolve("exposureMode", &descriptor);
        assert_eq!(spec.label, "Exposure");
        assert_eq!(spec.values.len(), 2);
    }

    #[test]
    fn unknown_names_resolve_empty() {
        let descriptor: PropertyDescriptor =
            serde_json::from_value(json!({ "href": "/p/whiteBalance", "type": "choice" })).unwrap();

        assert_eq!(resolve("whiteBalance", &descriptor), ChoiceSpec::default());
    }
}
