use compact_str::CompactString;
use lantern_common::{PropertyDescriptor, Value};

/// Color temperature of a light, kept as the raw token the device
/// reports plus a warm/cool classification for the view.
#[derive(Debug, Default)]
pub struct ColorTemperature {
    token: Option<CompactString>,
}

impl ColorTemperature {
    pub(crate) fn tracks(name: &str, _descriptor: &PropertyDescriptor) -> bool {
        name == "temperature"
    }

    pub(crate) fn apply(&mut self, value: &Value) {
        if let Some(token) = value.as_str() {
            self.token = Some(token.into());
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Tokens parse as hexadecimal; anything below 3000 reads warm.
    pub fn is_warm(&self) -> Option<bool> {
        let token = self.token.as_deref()?;
        let parsed = u32::from_str_radix(token.trim_start_matches('#'), 16).ok()?;

        Some(parsed < 3000)
    }
}
