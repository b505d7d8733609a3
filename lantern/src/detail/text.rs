use compact_str::{CompactString, ToCompactString};
use lantern_common::Value;

use crate::{
    detail::{Detail, Fragment, NodeId, Renderer},
    store::PropertyStore,
};

/// Read-only text bound to a label property.
pub struct TextDetail {
    name: CompactString,
    unit: Option<CompactString>,
    node: Option<NodeId>,
}

impl TextDetail {
    pub fn new(name: &str, unit: Option<CompactString>) -> Self {
        Self { name: name.to_compact_string(), unit, node: None }
    }
}

impl Detail for TextDetail {
    fn property(&self) -> &str {
        &self.name
    }

    fn fragment(&self, store: &PropertyStore) -> Fragment {
        Fragment::Text {
            label: self.name.clone(),
            value: store.get(&self.name).and_then(Value::as_str).map(CompactString::from),
            unit: self.unit.clone(),
        }
    }

    fn attach(&mut self, node: NodeId) {
        self.node = Some(node);
    }

    fn update(&mut self, store: &PropertyStore, renderer: &mut dyn Renderer) {
        if let Some(node) = self.node {
            renderer.apply(node, &self.fragment(store));
        }
    }
}
