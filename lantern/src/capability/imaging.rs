use lantern_common::{PropertyDescriptor, PropertyKind, Value, ValueError};

use crate::detail::{ImageSource, Renderer};

/// Camera-style imaging: claims every choice, label and still-image
/// descriptor (so they are pulled and displayed) and keeps the current
/// center-view image decoded. Choice and label values need nothing
/// derived; they are read straight from the store by their bindings.
#[derive(Debug, Default)]
pub struct Imaging {
    image: Option<ImageSource>,
}

impl Imaging {
    pub(crate) fn tracks(_name: &str, descriptor: &PropertyDescriptor) -> bool {
        matches!(
            descriptor.kind,
            PropertyKind::Choice | PropertyKind::Label | PropertyKind::StillImage
        )
    }

    pub(crate) fn apply(
        &mut self,
        descriptor: &PropertyDescriptor,
        value: &Value,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ValueError> {
        if descriptor.kind == PropertyKind::StillImage {
            decode_image(descriptor.unit.as_deref(), value, &mut self.image, renderer)?;
        }

        Ok(())
    }

    pub fn still_image(&self) -> Option<&ImageSource> {
        self.image.as_ref()
    }
}

/// Turn a stored image value into a displayable source, per the
/// descriptor's unit hint.
///
/// `bytes`: a fresh display object is allocated from the renderer and
/// the slot's previous handle released. `base64`: the payload is
/// wrapped as an inline data reference. Any other unit is an error and
/// leaves the slot untouched.
pub fn decode_image(
    unit: Option<&str>,
    value: &Value,
    slot: &mut Option<ImageSource>,
    renderer: &mut dyn Renderer,
) -> Result<(), ValueError> {
    match unit {
        Some("bytes") => {
            let bytes = value
                .as_bytes()
                .ok_or(ValueError::Mismatch { kind: PropertyKind::StillImage, got: "text" })?;

            if let Some(ImageSource::Handle(prior)) = slot.take() {
                renderer.release_image(prior);
            }
            *slot = Some(ImageSource::Handle(renderer.create_image(bytes)));

            Ok(())
        }
        Some("base64") => {
            let payload = value
                .as_str()
                .ok_or(ValueError::Mismatch { kind: PropertyKind::StillImage, got: "binary" })?;

            *slot = Some(ImageSource::DataUri(format!("data:image/jpeg;base64, {payload}")));

            Ok(())
        }
        Some(unit) => Err(ValueError::ImageUnit(unit.into())),
        None => Err(ValueError::ImageUnit("".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::testing::RecordingRenderer;

    #[test]
    fn base64_payload_becomes_a_data_reference() {
        let mut renderer = RecordingRenderer::default();
        let mut slot = None;

        decode_image(Some("base64"), &Value::Text("QQ==".into()), &mut slot, &mut renderer)
            .unwrap();

        assert_eq!(slot, Some(ImageSource::DataUri("data:image/jpeg;base64, QQ==".into())));
        assert!(renderer.created.is_empty());
    }

    #[test]
    fn binary_payload_allocates_fresh_and_releases_prior() {
        let mut renderer = RecordingRenderer::default();
        let mut slot = None;

        decode_image(Some("bytes"), &Value::Data(vec![1, 2]), &mut slot, &mut renderer).unwrap();
        let first = match slot.clone().unwrap() {
            ImageSource::Handle(handle) => handle,
            other => panic!("expected a handle, got {other:?}"),
        };

        decode_image(Some("bytes"), &Value::Data(vec![3, 4]), &mut slot, &mut renderer).unwrap();
        let second = match slot.clone().unwrap() {
            ImageSource::Handle(handle) => handle,
            other => panic!("expected a handle, got {other:?}"),
        };

        assert_ne!(first, second);
        assert_eq!(renderer.created.len(), 2);
        assert_eq!(renderer.released, vec![first]);
    }

    #[test]
    fn unknown_unit_is_an_error_and_leaves_the_slot_alone() {
        let mut renderer = RecordingRenderer::default();
        let mut slot = Some(ImageSource::DataUri("data:image/jpeg;base64, QQ==".into()));

        let err = decode_image(Some("hex"), &Value::Text("ff".into()), &mut slot, &mut renderer)
            .unwrap_err();

        assert_eq!(err, ValueError::ImageUnit("hex".into()));
        assert!(slot.is_some());
        assert!(renderer.released.is_empty());
    }
}
