// assets/sheet.rs
//
// Sprite sheets: rectangular regions carved out of one decoded image, by
// hand (slice/cut) or as a uniform grid. Regions are referenced by index.

use glam::Vec2;

use crate::api::error::{EngineError, EngineResult};
use crate::api::types::{NodeId, Rect};
use crate::assets::provider::ImageSource;
use crate::components::node::Node;
use crate::components::visual::{SpriteRegion, Visual};
use crate::core::scene::Scene;

/// A decoded image plus an ordered list of carved regions.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    source: ImageSource,
    regions: Vec<Rect>,
}

impl SpriteSheet {
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            regions: Vec::new(),
        }
    }

    /// The backing image.
    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Carves a new region and returns its index.
    pub fn slice(&mut self, x: f32, y: f32, w: f32, h: f32) -> usize {
        self.regions.push(Rect::new(x, y, w, h));
        self.regions.len() - 1
    }

    /// Carves a region and returns it directly.
    pub fn cut(&mut self, x: f32, y: f32, w: f32, h: f32) -> SpriteRegion {
        let index = self.slice(x, y, w, h);
        SpriteRegion {
            image: self.source,
            src: self.regions[index],
        }
    }

    /// Divides the sheet into `cols × rows` cells with an optional border
    /// around each cell, carving them in row-major order.
    pub fn grid(mut self, cols: u32, rows: u32, border: f32) -> Self {
        let b2 = 2.0 * border;
        let w = (self.source.size.x / cols as f32 - b2).floor();
        let h = (self.source.size.y / rows as f32 - b2).floor();

        for r in 0..rows {
            for c in 0..cols {
                self.slice(
                    c as f32 * (w + b2) + border,
                    r as f32 * (h + b2) + border,
                    w,
                    h,
                );
            }
        }
        self
    }

    /// Returns the region at `index` as a drawable sprite.
    pub fn region(&self, index: usize) -> EngineResult<SpriteRegion> {
        let src = self.regions.get(index).copied().ok_or_else(|| {
            EngineError::InvalidSource(format!(
                "sprite index {index} out of range (sheet has {})",
                self.regions.len()
            ))
        })?;
        Ok(SpriteRegion {
            image: self.source,
            src,
        })
    }

    /// All carved regions, in index order.
    pub fn regions(&self) -> impl Iterator<Item = SpriteRegion> + '_ {
        self.regions.iter().map(|src| SpriteRegion {
            image: self.source,
            src: *src,
        })
    }

    /// Builds a flipbook clip: one frame per listed region, sized to the
    /// largest region, rewound to frame 0.
    pub fn clip(&self, scene: &mut Scene, indices: &[usize]) -> EngineResult<NodeId> {
        let clip = scene.spawn(Node::clip());
        let mut max = Vec2::ZERO;

        for (i, index) in indices.iter().enumerate() {
            let region = self.region(*index)?;
            max = max.max(region.src.size());

            if i > 0 {
                scene.add_frame(clip)?;
            }
            let sprite = scene.spawn(Node::leaf(Visual::Sprite(region)));
            scene.add_node(clip, sprite)?;
        }

        if let Some(node) = scene.get_mut(clip) {
            node.resize(max.x, max.y);
        }
        scene.go_to_frame(clip, 0)?;
        Ok(clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::provider::ImageId;

    fn sheet() -> SpriteSheet {
        SpriteSheet::new(ImageSource::new(ImageId(9), 64.0, 32.0))
    }

    #[test]
    fn slice_and_region_round_trip() {
        let mut sheet = sheet();
        let index = sheet.slice(16.0, 0.0, 16.0, 16.0);
        let region = sheet.region(index).unwrap();
        assert_eq!(region.src, Rect::new(16.0, 0.0, 16.0, 16.0));
        assert_eq!(region.image.image, ImageId(9));
    }

    #[test]
    fn bad_index_is_invalid_source() {
        let sheet = sheet();
        assert!(matches!(
            sheet.region(0),
            Err(EngineError::InvalidSource(_))
        ));
    }

    #[test]
    fn grid_carves_row_major_cells() {
        let sheet = sheet().grid(4, 2, 0.0);
        assert_eq!(sheet.len(), 8);
        assert_eq!(sheet.region(0).unwrap().src, Rect::new(0.0, 0.0, 16.0, 16.0));
        // Second row starts at index 4.
        assert_eq!(
            sheet.region(4).unwrap().src,
            Rect::new(0.0, 16.0, 16.0, 16.0)
        );
        assert_eq!(
            sheet.region(7).unwrap().src,
            Rect::new(48.0, 16.0, 16.0, 16.0)
        );
    }

    #[test]
    fn grid_border_insets_cells() {
        let sheet = SpriteSheet::new(ImageSource::new(ImageId(1), 40.0, 20.0)).grid(2, 1, 2.0);
        assert_eq!(sheet.region(0).unwrap().src, Rect::new(2.0, 2.0, 16.0, 16.0));
        assert_eq!(
            sheet.region(1).unwrap().src,
            Rect::new(22.0, 2.0, 16.0, 16.0)
        );
    }

    #[test]
    fn clip_builds_one_frame_per_region() {
        let sheet = sheet().grid(4, 1, 0.0);
        let mut scene = Scene::new();
        let clip = sheet.clip(&mut scene, &[0, 1, 2]).unwrap();

        let state = scene.get(clip).unwrap().clip_state().unwrap();
        assert_eq!(state.frame_count(), 3);
        assert_eq!(state.current_frame(), 0);
        // Sized to the largest (uniform) region.
        assert_eq!(
            scene.get(clip).unwrap().size,
            Some(Vec2::new(16.0, 32.0))
        );
    }
}
