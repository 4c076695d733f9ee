// assets/provider.rs
//
// Asset-provider capability. Decoding and ownership of pixel/audio data stay
// on the host side; the engine only ever sees opaque handles plus the natural
// dimensions it needs for layout and painting.

use glam::Vec2;

use crate::api::error::EngineResult;

/// Opaque handle to a decoded image owned by the host asset system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Opaque handle to a decoded audio clip owned by the host asset system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioId(pub u32);

/// A decoded image handle together with its natural dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSource {
    pub image: ImageId,
    /// Natural width and height of the decoded image.
    pub size: Vec2,
}

impl ImageSource {
    pub fn new(image: ImageId, width: f32, height: f32) -> Self {
        Self {
            image,
            size: Vec2::new(width, height),
        }
    }
}

/// Capability: resolve string identifiers to decoded assets.
pub trait AssetProvider {
    /// Resolves an identifier to a decoded image with natural dimensions.
    fn image(&mut self, path: &str) -> EngineResult<ImageSource>;

    /// Resolves an identifier to a decoded audio clip.
    fn audio(&mut self, path: &str) -> EngineResult<AudioId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_source_carries_natural_size() {
        let src = ImageSource::new(ImageId(3), 64.0, 32.0);
        assert_eq!(src.image, ImageId(3));
        assert_eq!(src.size, Vec2::new(64.0, 32.0));
    }
}
