use compact_str::{CompactString, ToCompactString};

use crate::{
    capability::decode_image,
    detail::{Detail, Fragment, NodeId, Renderer},
    store::PropertyStore,
};

/// Viewer bound to a still-image property.
///
/// Binary payloads become renderer-owned display objects; the viewer
/// re-decodes only when the stored value's revision moves, so repeated
/// updates neither leak nor churn handles.
pub struct ImageDetail {
    name: CompactString,
    unit: Option<CompactString>,
    node: Option<NodeId>,
    source: Option<super::ImageSource>,
    seen: u64,
}

impl ImageDetail {
    pub fn new(name: &str, unit: Option<CompactString>) -> Self {
        Self { name: name.to_compact_string(), unit, node: None, source: None, seen: 0 }
    }
}

impl Detail for ImageDetail {
    fn property(&self) -> &str {
        &self.name
    }

    fn fragment(&self, _store: &PropertyStore) -> Fragment {
        Fragment::Image { source: self.source.clone() }
    }

    fn attach(&mut self, node: NodeId) {
        self.node = Some(node);
    }

    fn update(&mut self, store: &PropertyStore, renderer: &mut dyn Renderer) {
        let Some(node) = self.node else {
            return;
        };

        let revision = store.revision(&self.name);
        if revision != self.seen {
            self.seen = revision;

            if let Some(value) = store.get(&self.name) {
                if let Err(e) =
                    decode_image(self.unit.as_deref(), value, &mut self.source, renderer)
                {
                    tracing::warn!(property = %self.name, "image decode failed: {e}");
                }
            }
        }

        renderer.apply(node, &Fragment::Image { source: self.source.clone() });
    }
}

#[cfg(test)]
mod tests {
    use lantern_common::Value;

    use super::*;
    use crate::{
        detail::{ImageSource, testing::RecordingRenderer},
        store::UpdateSource,
    };

    #[test]
    fn base64_viewer_embeds_the_payload() {
        let mut binding = ImageDetail::new("stillImage", Some("base64".into()));
        let mut renderer = RecordingRenderer::default();
        let mut store = PropertyStore::default();
        store.apply("stillImage", Value::Text("QQ==".into()), UpdateSource::Push);

        let node = renderer.mount(&binding.fragment(&store));
        binding.attach(node);
        binding.update(&store, &mut renderer);

        assert_eq!(
            renderer.applied_to(node),
            &[Fragment::Image {
                source: Some(ImageSource::DataUri("data:image/jpeg;base64, QQ==".into())),
            }]
        );
    }

    #[test]
    fn repeated_updates_reuse_the_handle() {
        let mut binding = ImageDetail::new("stillImage", Some("bytes".into()));
        let mut renderer = RecordingRenderer::default();
        let mut store = PropertyStore::default();
        store.apply("stillImage", Value::Data(vec![1, 2, 3]), UpdateSource::Pull);

        let node = renderer.mount(&binding.fragment(&store));
        binding.attach(node);

        binding.update(&store, &mut renderer);
        binding.update(&store, &mut renderer);

        // one decode, identical fragments
        assert_eq!(renderer.created.len(), 1);
        assert!(renderer.released.is_empty());
        let applied = renderer.applied_to(node);
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], applied[1]);

        // a fresh payload swaps the handle and releases the old one
        store.apply("stillImage", Value::Data(vec![4, 5, 6]), UpdateSource::Push);
        binding.update(&store, &mut renderer);

        assert_eq!(renderer.created.len(), 2);
        assert_eq!(renderer.released.len(), 1);
    }
}
