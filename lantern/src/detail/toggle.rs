use compact_str::{CompactString, ToCompactString};
use lantern_common::Value;

use crate::{
    detail::{Detail, Fragment, NodeId, Renderer},
    store::PropertyStore,
};

/// On/off switch bound to a boolean property.
pub struct ToggleDetail {
    name: CompactString,
    node: Option<NodeId>,
}

impl ToggleDetail {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_compact_string(), node: None }
    }
}

impl Detail for ToggleDetail {
    fn property(&self) -> &str {
        &self.name
    }

    fn fragment(&self, store: &PropertyStore) -> Fragment {
        Fragment::Toggle { on: store.get(&self.name).and_then(Value::as_bool) }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{detail::testing::RecordingRenderer, store::UpdateSource};

    #[test]
    fn update_is_a_noop_before_attach() {
        let mut binding = ToggleDetail::new("on");
        let mut renderer = RecordingRenderer::default();
        let store = PropertyStore::default();

        binding.update(&store, &mut renderer);
        assert_eq!(renderer.total_applies(), 0);
    }

    #[test]
    fn update_is_idempotent() {
        let mut binding = ToggleDetail::new("on");
        let mut renderer = RecordingRenderer::default();
        let mut store = PropertyStore::default();
        store.apply("on", Value::Bool(true), UpdateSource::Pull);

        let node = renderer.mount(&binding.fragment(&store));
        binding.attach(node);

        binding.update(&store, &mut renderer);
        binding.update(&store, &mut renderer);

        let applied = renderer.applied_to(node);
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], applied[1]);
        assert_eq!(applied[1], Fragment::Toggle { on: Some(true) });
    }
}
