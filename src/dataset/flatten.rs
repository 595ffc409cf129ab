//! Flattens the per-camera dataset into one `images/` directory, the
//! layout CycleGAN training expects.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils;

const SPLITS: [&str; 2] = ["train", "val"];

fn split_images(source_data: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for split in SPLITS {
        let split_dir = source_data.join(split);
        if !split_dir.is_dir() {
            continue;
        }
        for camera in fs::read_dir(&split_dir)
            .with_context(|| format!("reading {}", split_dir.display()))?
        {
            let images_dir = camera?.path().join("images");
            if !images_dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&images_dir)? {
                let path = entry?.path();
                if utils::is_image_file(&path) {
                    images.push(path);
                }
            }
        }
    }
    images.sort();
    Ok(images)
}

/// Copies every `train/*/images/*` and `val/*/images/*` file into
/// `{source_data}/images/`. The copy is skipped when the target already
/// holds one file per source image. Returns the number of files copied.
pub fn flatten_images(source_data: &Path) -> Result<usize> {
    let images = split_images(source_data)?;
    anyhow::ensure!(
        !images.is_empty(),
        "no per-camera images under {}",
        source_data.display()
    );

    let dest = source_data.join("images");
    if dest.is_dir() {
        let existing = fs::read_dir(&dest)?.count();
        if existing >= images.len() {
            log::info!("{} already holds {existing} images, skipping", dest.display());
            return Ok(0);
        }
    } else {
        fs::create_dir_all(&dest)?;
    }

    let mut copied = 0;
    for image in &images {
        let name = image
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("image without a file name: {}", image.display()))?;
        fs::copy(image, dest.join(name))
            .with_context(|| format!("copying {}", image.display()))?;
        copied += 1;
    }
    log::info!("copied {copied} images into {}", dest.display());
    Ok(copied)
}
