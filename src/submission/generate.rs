//! Turns per-image YOLO prediction labels into submission detections.
//!
//! The prediction directory holds one subtree per inference run (one per
//! image size), each with the predicted images and a `labels/` directory
//! of YOLO `.txt` files next to them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::common::{Detection, FrameId};
use crate::formats::{read_label_file, BoxFormat};
use crate::utils;

/// Options for building a submission out of a prediction directory.
#[derive(Debug, Clone)]
pub struct GenOptions {
    pub predict_dir: PathBuf,
    pub format: BoxFormat,
    pub enlarge_ratio: f32,
    pub merge_iou: f32,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            predict_dir: PathBuf::new(),
            format: BoxFormat::Yolo,
            enlarge_ratio: 0.0,
            merge_iou: 0.7,
        }
    }
}

impl GenOptions {
    pub fn new(predict_dir: &Path) -> Self {
        Self {
            predict_dir: predict_dir.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: BoxFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_enlarge_ratio(mut self, ratio: f32) -> Self {
        self.enlarge_ratio = ratio;
        self
    }

    /// IoU above which two same-class boxes on the same frame are
    /// considered duplicates of each other. `1.0` disables merging.
    pub fn with_merge_iou(mut self, iou: f32) -> Self {
        self.merge_iou = iou;
        self
    }
}

/// Recursively collects every image file under `dir`, sorted by path so
/// the output ordering is stable across runs.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    collect_images_into(dir, &mut images)?;
    images.sort();
    Ok(images)
}

fn collect_images_into(dir: &Path, images: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_images_into(&path, images)?;
        } else if utils::is_image_file(&path) {
            images.push(path);
        }
    }
    Ok(())
}

/// Locates the label file matching `image_path`, probing
/// `labels/{stem}.txt` under up to four ancestor directories. Run
/// layouts differ between the detectors, so the labels directory can sit
/// next to the image or a few levels up.
pub fn find_label_file(image_path: &Path) -> Option<PathBuf> {
    let stem = image_path.file_stem()?;
    let mut label_name = stem.to_os_string();
    label_name.push(".txt");

    for ancestor in image_path.ancestors().skip(1).take(4) {
        let candidate = ancestor.join("labels").join(&label_name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Converts one predicted image's labels into detections. Images with no
/// label file produce no detections.
pub fn process_image(image_path: &Path, opts: &GenOptions) -> Result<Vec<Detection>> {
    let label_file = match find_label_file(image_path) {
        Some(file) => file,
        None => {
            log::debug!("no label file for {}", image_path.display());
            return Ok(Vec::new());
        }
    };

    let (img_width, img_height) = image::image_dimensions(image_path)
        .with_context(|| format!("reading image header {}", image_path.display()))?;
    let image_id = FrameId::from_path(image_path)?.id()?;
    let labels = read_label_file(&label_file)?;

    let mut detections = Vec::with_capacity(labels.len());
    for label in labels {
        let mut bbox = opts.format.to_coco(label.coords, img_width, img_height);
        if opts.enlarge_ratio != 0.0 {
            bbox = bbox.enlarge(opts.enlarge_ratio);
        }
        detections.push(
            Detection::new(image_id, label.class_id, bbox, label.conf)
                .with_image_size(img_width, img_height),
        );
    }
    Ok(detections)
}

/// Walks the prediction directory and builds the raw (unmerged)
/// detection list. Per-image work is farmed out to the rayon pool; the
/// result keeps the sorted image order.
pub fn generate(opts: &GenOptions) -> Result<Vec<Detection>> {
    anyhow::ensure!(
        opts.predict_dir.is_dir(),
        "prediction directory does not exist: {}",
        opts.predict_dir.display()
    );

    let now = Instant::now();
    let images = collect_images(&opts.predict_dir)?;
    log::info!(
        "found {} prediction images under {}",
        images.len(),
        opts.predict_dir.display()
    );

    let per_image: Vec<Vec<Detection>> = images
        .par_iter()
        .map(|image| process_image(image, opts))
        .collect::<Result<_>>()?;

    let detections: Vec<Detection> = per_image.into_iter().flatten().collect();
    log::info!(
        "collected {} detections from {} images in {:.2?}",
        detections.len(),
        images.len(),
        now.elapsed()
    );
    Ok(detections)
}
