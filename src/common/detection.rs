use serde::{Deserialize, Serialize};
use crate::common::DetBox;

/// One detection as it flows from the per-image label files into the
/// merged submission: frame identity, class, box in COCO pixel form and
/// the detector's confidence. `img_width`/`img_height` carry the source
/// image size so later stages can re-check bounds without touching disk.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub image_id: i64,
    pub category_id: u32,
    pub bbox: DetBox,
    pub score: f32,
    pub img_width: u32,
    pub img_height: u32,
}

impl Detection {
    pub fn new(image_id: i64, category_id: u32, bbox: DetBox, score: f32) -> Self {
        Self {
            image_id,
            category_id,
            bbox,
            score,
            img_width: 0,
            img_height: 0,
        }
    }

    /// Sets the source image size.
    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.img_width = width;
        self.img_height = height;
        self
    }

    /// Sets the confidence score of the detection.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Computes the intersection area between this detection and another.
    pub fn intersect(&self, other: &Detection) -> f32 {
        self.bbox.intersect(&other.bbox)
    }

    /// Computes the union area between this detection and another.
    pub fn union(&self, other: &Detection) -> f32 {
        self.bbox.union(&other.bbox)
    }
}
