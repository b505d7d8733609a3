use compact_str::{CompactString, ToCompactString};
use lantern_common::Value;

use crate::{
    detail::{Detail, Fragment, NodeId, Renderer},
    store::PropertyStore,
};

/// Slider bound to a numeric property, displayed as a percentage.
pub struct SliderDetail {
    name: CompactString,
    node: Option<NodeId>,
}

impl SliderDetail {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_compact_string(), node: None }
    }
}

impl Detail for SliderDetail {
    fn property(&self) -> &str {
        &self.name
    }

    fn fragment(&self, store: &PropertyStore) -> Fragment {
        Fragment::Slider {
            percent: store
                .get(&self.name)
                .and_then(Value::as_f64)
                .map(|level| level.clamp(0.0, 100.0)),
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
