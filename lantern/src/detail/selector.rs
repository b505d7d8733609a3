use compact_str::{CompactString, ToCompactString};
use lantern_common::{Value, choices::ChoiceSpec};

use crate::{
    detail::{Detail, Fragment, NodeId, Renderer},
    store::PropertyStore,
};

/// Choice selector bound to an enumerable property, fed by the resolved
/// label and allowed values.
pub struct SelectorDetail {
    name: CompactString,
    spec: ChoiceSpec,
    node: Option<NodeId>,
}

impl SelectorDetail {
    pub fn new(name: &str, spec: ChoiceSpec) -> Self {
        Self { name: name.to_compact_string(), spec, node: None }
    }

    pub fn spec(&self) -> &ChoiceSpec {
        &self.spec
    }
}

impl Detail for SelectorDetail {
    fn property(&self) -> &str {
        &self.name
    }

    fn fragment(&self, store: &PropertyStore) -> Fragment {
        Fragment::Selector {
            label: self.spec.label.clone(),
            values: self.spec.values.clone(),
            selected: store.get(&self.name).and_then(Value::as_str).map(CompactString::from),
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
