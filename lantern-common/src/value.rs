use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use compact_str::{CompactString, ToCompactString};

use crate::{PropertyDescriptor, PropertyKind};

/// A property value held in the store, decoded from wire JSON per the
/// property's declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(CompactString),
    Data(Vec<u8>),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValueError {
    #[error("a {kind:?} property cannot hold {got}")]
    Mismatch { kind: PropertyKind, got: &'static str },
    #[error("cannot parse '{0}' as a number")]
    NotANumber(CompactString),
    #[error("unrecognized image unit '{0}'")]
    ImageUnit(CompactString),
    #[error("bad base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image properties are not writable")]
    ImageWrite,
}

impl Value {
    /// Decode a raw wire value arriving from a pull response or a push
    /// frame.
    pub fn decode(
        descriptor: &PropertyDescriptor,
        raw: &serde_json::Value,
    ) -> Result<Value, ValueError> {
        match &descriptor.kind {
            PropertyKind::Boolean => match raw {
                serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(mismatch(descriptor, other)),
            },
            PropertyKind::Number => match raw.as_f64() {
                Some(n) => Ok(Value::Number(n)),
                None => Err(mismatch(descriptor, raw)),
            },
            PropertyKind::Choice | PropertyKind::Label | PropertyKind::Other(_) => match raw {
                serde_json::Value::String(s) => Ok(Value::Text(s.as_str().into())),
                other => Err(mismatch(descriptor, other)),
            },
            PropertyKind::StillImage => decode_image_payload(descriptor, raw),
        }
    }

    /// Coerce caller-supplied input for a write, per the declared kind.
    /// Sliders and selectors hand over strings; numeric properties parse
    /// them.
    pub fn coerce(
        descriptor: &PropertyDescriptor,
        input: &serde_json::Value,
    ) -> Result<Value, ValueError> {
        match (&descriptor.kind, input) {
            (PropertyKind::Boolean, serde_json::Value::Bool(b)) => Ok(Value::Bool(*b)),
            (PropertyKind::Boolean, serde_json::Value::String(s)) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(mismatch(descriptor, input)),
            },
            (PropertyKind::Number, raw) => match raw.as_f64() {
                Some(n) => Ok(Value::Number(n)),
                None => match raw {
                    serde_json::Value::String(s) => s
                        .trim()
                        .parse()
                        .map(Value::Number)
                        .map_err(|_| ValueError::NotANumber(s.to_compact_string())),
                    other => Err(mismatch(descriptor, other)),
                },
            },
            (
                PropertyKind::Choice | PropertyKind::Label | PropertyKind::Other(_),
                serde_json::Value::String(s),
            ) => Ok(Value::Text(s.as_str().into())),
            (PropertyKind::StillImage, _) => Err(ValueError::ImageWrite),
            _ => Err(mismatch(descriptor, input)),
        }
    }

    /// The wire JSON representation used in write bodies.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Value::Bool(b) => serde_json::Value::from(*b),
            Value::Number(n) => serde_json::Value::from(*n),
            Value::Text(s) => serde_json::Value::from(s.as_str()),
            Value::Data(bytes) => serde_json::Value::from(BASE64.encode(bytes)),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Data(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Image payloads decode per the descriptor's unit hint: `bytes` carries
/// binary data (a JSON byte array, or a base64 string some services emit
/// for binary-in-JSON), `base64` stays textual and is wrapped as an
/// inline data reference at display time.
fn decode_image_payload(
    descriptor: &PropertyDescriptor,
    raw: &serde_json::Value,
) -> Result<Value, ValueError> {
    match descriptor.unit.as_deref() {
        Some("bytes") => match raw {
            serde_json::Value::Array(items) => {
                let bytes = items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .and_then(|n| u8::try_from(n).ok())
                            .ok_or_else(|| mismatch(descriptor, raw))
                    })
                    .collect::<Result<Vec<u8>, _>>()?;
                Ok(Value::Data(bytes))
            }
            serde_json::Value::String(s) => Ok(Value::Data(BASE64.decode(s)?)),
            other => Err(mismatch(descriptor, other)),
        },
        Some("base64") => match raw {
            serde_json::Value::String(s) => Ok(Value::Text(s.as_str().into())),
            other => Err(mismatch(descriptor, other)),
        },
        Some(unit) => Err(ValueError::ImageUnit(unit.to_compact_string())),
        None => Err(ValueError::ImageUnit("".into())),
    }
}

fn mismatch(descriptor: &PropertyDescriptor, raw: &serde_json::Value) -> ValueError {
    let got = match raw {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    };

    ValueError::Mismatch { kind: descriptor.kind.clone(), got }
}
