//! Detail bindings: one small stateful component per externally-visible
//! property, subscribing to the property store.
//!
//! Bindings are pure observers; they never hold authoritative state.
//! The concrete view layer sits behind [`Renderer`]: the core describes
//! what to show as [`Fragment`] values and the renderer materializes
//! them however it likes (DOM, SVG, terminal). A binding is inert until
//! its fragment has been mounted and [`Detail::attach`] called with the
//! resulting node.

use compact_str::CompactString;
use lantern_common::{PropertyDescriptor, PropertyKind, choices};

use crate::store::PropertyStore;

mod image;
mod selector;
mod slider;
mod text;
mod toggle;

pub use image::ImageDetail;
pub use selector::SelectorDetail;
pub use slider::SliderDetail;
pub use text::TextDetail;
pub use toggle::ToggleDetail;

/// Identifier of a mounted view fragment, issued by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Opaque handle to a displayable image object owned by the renderer.
/// Handles are allocated per decoded binary payload and must be
/// released when replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Where an image viewer points: a renderer-owned object, or an inline
/// data reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Handle(ImageHandle),
    DataUri(String),
}

/// What a binding wants shown. Plain data; no markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Toggle {
        on: Option<bool>,
    },
    Text {
        label: CompactString,
        value: Option<CompactString>,
        unit: Option<CompactString>,
    },
    Selector {
        label: CompactString,
        values: Vec<CompactString>,
        selected: Option<CompactString>,
    },
    Slider {
        percent: Option<f64>,
    },
    Image {
        source: Option<ImageSource>,
    },
}

/// The external view layer the core calls into.
pub trait Renderer: Send {
    /// Materialize a fragment in the view tree.
    fn mount(&mut self, fragment: &Fragment) -> NodeId;

    /// Replace a mounted fragment's content.
    fn apply(&mut self, node: NodeId, fragment: &Fragment);

    /// Turn a binary image payload into a displayable object.
    fn create_image(&mut self, bytes: &[u8]) -> ImageHandle;

    /// Release a previously created image object.
    fn release_image(&mut self, handle: ImageHandle);
}

/// Renderer for passive modes: mounts are counted, nothing is drawn.
#[derive(Debug, Default)]
pub struct NullRenderer {
    nodes: u64,
    images: u64,
}

impl Renderer for NullRenderer {
    fn mount(&mut self, _fragment: &Fragment) -> NodeId {
        self.nodes += 1;
        NodeId(self.nodes)
    }

    fn apply(&mut self, _node: NodeId, _fragment: &Fragment) {}

    fn create_image(&mut self, _bytes: &[u8]) -> ImageHandle {
        self.images += 1;
        ImageHandle(self.images)
    }

    fn release_image(&mut self, _handle: ImageHandle) {}
}

/// One binding per property, chosen by declared kind.
pub trait Detail: Send {
    /// Name of the bound property.
    fn property(&self) -> &str;

    /// Current fragment, recomputed from the store.
    fn fragment(&self, store: &PropertyStore) -> Fragment;

    fn attach(&mut self, node: NodeId);

    /// Refresh the mounted fragment from the store. Idempotent, and a
    /// safe no-op before attachment.
    fn update(&mut self, store: &PropertyStore, renderer: &mut dyn Renderer);
}

/// Binding factory keyed by declared kind. Properties without an href
/// and kinds with no display get none.
pub fn binding_for(name: &str, descriptor: &PropertyDescriptor) -> Option<Box<dyn Detail>> {
    descriptor.href.as_ref()?;

    match &descriptor.kind {
        PropertyKind::Boolean => Some(Box::new(ToggleDetail::new(name))),
        PropertyKind::Number => Some(Box::new(SliderDetail::new(name))),
        PropertyKind::Label => Some(Box::new(TextDetail::new(name, descriptor.unit.clone()))),
        PropertyKind::Choice => {
            Some(Box::new(SelectorDetail::new(name, choices::resolve(name, descriptor))))
        }
        PropertyKind::StillImage => {
            Some(Box::new(ImageDetail::new(name, descriptor.unit.clone())))
        }
        PropertyKind::Other(_) => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;

    use super::*;

    /// Test renderer recording every call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingRenderer {
        next_node: u64,
        next_image: u64,
        pub mounted: Vec<Fragment>,
        pub applied: BTreeMap<u64, Vec<Fragment>>,
        pub created: Vec<ImageHandle>,
        pub released: Vec<ImageHandle>,
    }

    impl RecordingRenderer {
        pub fn applied_to(&self, node: NodeId) -> &[Fragment] {
            self.applied.get(&node.0).map(Vec::as_slice).unwrap_or(&[])
        }

        pub fn total_applies(&self) -> usize {
            self.applied.values().map(Vec::len).sum()
        }
    }

    impl Renderer for RecordingRenderer {
        fn mount(&mut self, fragment: &Fragment) -> NodeId {
            self.next_node += 1;
            self.mounted.push(fragment.clone());
            NodeId(self.next_node)
        }

        fn apply(&mut self, node: NodeId, fragment: &Fragment) {
            self.applied.entry(node.0).or_default().push(fragment.clone());
        }

        fn create_image(&mut self, _bytes: &[u8]) -> ImageHandle {
            self.next_image += 1;
            let handle = ImageHandle(self.next_image);
            self.created.push(handle.clone());
            handle
        }

        fn release_image(&mut self, handle: ImageHandle) {
            self.released.push(handle);
        }
    }
}
