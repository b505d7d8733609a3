use lantern_common::{PropertyDescriptor, Value};

/// Something that can be on or off.
#[derive(Debug, Default)]
pub struct Power {
    on: Option<bool>,
}

impl Power {
    pub(crate) fn tracks(name: &str, _descriptor: &PropertyDescriptor) -> bool {
        name == "on"
    }

    pub(crate) fn apply(&mut self, value: &Value) {
        if let Some(on) = value.as_bool() {
            self.on = Some(on);
        }
    }

    /// `None` until the first update arrives.
    pub fn is_on(&self) -> Option<bool> {
        self.on
    }
}
