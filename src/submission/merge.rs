//! Cross-scale deduplication. Running inference on the same camera at
//! several image sizes yields near-identical boxes for the same object;
//! this pass keeps the highest-scoring one of each duplicate cluster.

use std::collections::HashMap;

use crate::common::Detection;

pub trait Dedup {
    fn iou(&self, other: &Self) -> f32;
    fn score(&self) -> f32;
}

impl Dedup for Detection {
    /// Computes the intersection over union (IoU) between this bounding box and another.
    fn iou(&self, other: &Self) -> f32 {
        self.intersect(other) / self.union(other)
    }

    /// Returns the confidence score of the bounding box.
    fn score(&self) -> f32 {
        self.score
    }
}

/// Greedy highest-score-first suppression within one frame/class group.
fn suppress<T: Dedup>(mut group: Vec<T>, iou_threshold: f32) -> Vec<T> {
    group.sort_by(|a, b| b.score().total_cmp(&a.score()));

    let mut kept: Vec<T> = Vec::with_capacity(group.len());
    for candidate in group {
        if kept.iter().all(|winner| winner.iou(&candidate) < iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

/// Deduplicates detections across inference scales. Detections are
/// grouped by `(image_id, category_id)`; within a group, any box whose
/// IoU with an already-kept higher-scoring box reaches `iou_threshold`
/// is dropped. A threshold of `1.0` (or more) disables merging.
///
/// Surviving records are returned unchanged, ordered by frame, class and
/// descending score.
pub fn merge_detections(detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if iou_threshold >= 1.0 {
        return detections;
    }

    let before = detections.len();
    let mut groups: HashMap<(i64, u32), Vec<Detection>> = HashMap::new();
    for det in detections {
        groups
            .entry((det.image_id, det.category_id))
            .or_default()
            .push(det);
    }

    let mut keys: Vec<(i64, u32)> = groups.keys().copied().collect();
    keys.sort_unstable();

    let mut merged = Vec::with_capacity(before);
    for key in keys {
        let group = groups.remove(&key).unwrap_or_default();
        merged.extend(suppress(group, iou_threshold));
    }

    log::info!(
        "merge kept {} of {} detections (iou threshold {})",
        merged.len(),
        before,
        iou_threshold
    );
    merged
}
