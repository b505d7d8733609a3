use core::{fmt::Display, ops::Deref};

use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Serialize};

pub mod choices;

mod description;
mod value;
pub use description::*;
pub use value::*;

/// Identity of one remote device, derived from the last segment of its
/// base resource path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(CompactString);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last non-empty path segment of a resource locator, or `None`
    /// for a bare origin.
    pub fn from_path(path: &str) -> Option<Self> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .map(EntityId::from)
    }
}

impl<T: AsRef<str>> From<T> for EntityId {
    fn from(value: T) -> Self {
        EntityId(value.as_ref().to_compact_string())
    }
}

impl Deref for EntityId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_serde() {
        assert_eq!(
            serde_json::to_string(&EntityId::from("garage-door")).unwrap(),
            r#""garage-door""#
        );

        assert_eq!(
            serde_json::from_str::<EntityId>(r#""garage-door""#).unwrap(),
            EntityId::from("garage-door")
        );
    }

    #[test]
    fn entity_id_from_path() {
        assert_eq!(EntityId::from_path("/things/lamp-1").unwrap(), EntityId::from("lamp-1"));
        assert_eq!(EntityId::from_path("/things/lamp-1/").unwrap(), EntityId::from("lamp-1"));
        assert_eq!(EntityId::from_path("/"), None);
    }
}
