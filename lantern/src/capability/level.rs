use lantern_common::{PropertyDescriptor, Value};

/// Independent dimming level, as a percentage.
#[derive(Debug, Default)]
pub struct Level {
    percent: Option<f64>,
}

impl Level {
    pub(crate) fn tracks(name: &str, _descriptor: &PropertyDescriptor) -> bool {
        name == "level"
    }

    pub(crate) fn apply(&mut self, value: &Value) {
        if let Some(level) = value.as_f64() {
            self.percent = Some(level.clamp(0.0, 100.0));
        }
    }

    pub fn percent(&self) -> Option<f64> {
        self.percent
    }
}
