//! Submission sanity checks: box bounds, score range, class range and
//! frame coverage. Collects everything wrong instead of failing on the
//! first finding, so one pass gives the full picture.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::Result;

use crate::common::FrameId;
use crate::formats::SubmissionEntry;
use crate::submission::collect_images;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub checked: usize,
    /// Indices of entries whose image_id matches no known frame.
    pub unknown_frames: Vec<usize>,
    /// Indices of entries whose box leaves the image bounds.
    pub out_of_bounds: Vec<usize>,
    /// Indices of entries with a score outside `[0, 1]`.
    pub bad_scores: Vec<usize>,
    /// Indices of entries with a category id outside the class count.
    pub bad_categories: Vec<usize>,
    /// Frame ids present in the image set but absent from the submission.
    pub empty_frames: Vec<i64>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_frames.is_empty()
            && self.out_of_bounds.is_empty()
            && self.bad_scores.is_empty()
            && self.bad_categories.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "checked {} entries: {} unknown frames, {} out-of-bounds boxes, \
             {} bad scores, {} bad categories, {} frames without detections",
            self.checked,
            self.unknown_frames.len(),
            self.out_of_bounds.len(),
            self.bad_scores.len(),
            self.bad_categories.len(),
            self.empty_frames.len()
        )
    }
}

/// Validates submission entries against the evaluation image set.
///
/// `images_dir` is walked for images to learn each frame's id and pixel
/// size; `num_classes` bounds the valid category ids.
pub fn validate(
    entries: &[SubmissionEntry],
    images_dir: &Path,
    num_classes: u32,
) -> Result<ValidationReport> {
    let mut frame_sizes: HashMap<i64, (u32, u32)> = HashMap::new();
    for image in collect_images(images_dir)? {
        let frame = FrameId::from_path(&image)?;
        let size = image::image_dimensions(&image)?;
        frame_sizes.insert(frame.id()?, size);
    }

    let mut report = ValidationReport {
        checked: entries.len(),
        ..Default::default()
    };

    let mut seen_frames: BTreeSet<i64> = BTreeSet::new();
    for (idx, entry) in entries.iter().enumerate() {
        seen_frames.insert(entry.image_id);

        let (img_w, img_h) = match frame_sizes.get(&entry.image_id) {
            Some(size) => *size,
            None => {
                report.unknown_frames.push(idx);
                continue;
            }
        };

        // i64 arithmetic, extreme coordinates must not overflow here.
        let [x, y, w, h] = entry.bbox.map(i64::from);
        if x < 0 || y < 0 || w < 0 || h < 0 || x + w > i64::from(img_w) || y + h > i64::from(img_h)
        {
            report.out_of_bounds.push(idx);
        }
        if !(0.0..=1.0).contains(&entry.score) {
            report.bad_scores.push(idx);
        }
        if entry.category_id >= num_classes {
            report.bad_categories.push(idx);
        }
    }

    report.empty_frames = frame_sizes
        .keys()
        .filter(|id| !seen_frames.contains(*id))
        .copied()
        .collect();
    report.empty_frames.sort_unstable();

    Ok(report)
}
