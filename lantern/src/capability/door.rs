use lantern_common::{PropertyDescriptor, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

/// A door that reports whether it stands open.
#[derive(Debug, Default)]
pub struct Door {
    open: Option<bool>,
}

impl Door {
    pub(crate) fn tracks(name: &str, _descriptor: &PropertyDescriptor) -> bool {
        name == "open"
    }

    pub(crate) fn apply(&mut self, value: &Value) {
        if let Some(open) = value.as_bool() {
            self.open = Some(open);
        }
    }

    pub fn is_open(&self) -> Option<bool> {
        self.open
    }

    /// Which door icon the view shows.
    pub fn state(&self) -> Option<DoorState> {
        self.open.map(|open| if open { DoorState::Open } else { DoorState::Closed })
    }
}
