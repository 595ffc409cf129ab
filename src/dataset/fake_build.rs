//! Builds the synthesized ("fake") nighttime dataset out of CycleGAN
//! results: the source tree layout is mirrored, each synthesized image
//! lands next to a copy of its source frame's labels and annotations,
//! all under `{stem}_fake` names so the two datasets can be trained on
//! together without collisions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const SPLITS: [&str; 2] = ["train", "val"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FakeBuildStats {
    pub images: usize,
    pub labels: usize,
    pub annotations: usize,
    /// Source frames for which CycleGAN produced no output.
    pub missing: usize,
}

/// Options for assembling a fake dataset, builder style.
#[derive(Debug, Clone)]
pub struct FakeBuildOptions {
    /// Style-transfer run name, e.g. `a2e` or `a2n`.
    pub name: String,
    pub source_dataset: PathBuf,
    pub fake_images_path: PathBuf,
}

impl FakeBuildOptions {
    pub fn new(name: &str, source_dataset: &Path, fake_images_path: &Path) -> Self {
        Self {
            name: name.to_string(),
            source_dataset: source_dataset.to_path_buf(),
            fake_images_path: fake_images_path.to_path_buf(),
        }
    }

    /// Where CycleGAN's test step left the synthesized images.
    fn results_dir(&self) -> PathBuf {
        self.fake_images_path
            .join(&self.name)
            .join("test_latest/images")
    }

    /// Output root for the assembled dataset.
    pub fn dest_dir(&self) -> PathBuf {
        self.fake_images_path.join(format!("fisheye8k_{}", self.name))
    }
}

fn fake_file_name(name: &str, marker: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    Some(format!("{stem}{marker}.{ext}"))
}

/// Assembles the fake dataset. Missing synthesized images are logged and
/// counted, not fatal; a camera folder other than `images`, `labels` or
/// `annotations` is ignored.
pub fn build_fake(opts: &FakeBuildOptions) -> Result<FakeBuildStats> {
    let results_dir = opts.results_dir();
    anyhow::ensure!(
        results_dir.is_dir(),
        "no CycleGAN results under {}",
        results_dir.display()
    );

    let src = &opts.source_dataset;
    let dest = opts.dest_dir();
    let mut stats = FakeBuildStats::default();

    for split in SPLITS {
        let split_dir = src.join(split);
        if !split_dir.is_dir() {
            continue;
        }
        for camera in fs::read_dir(&split_dir)
            .with_context(|| format!("reading {}", split_dir.display()))?
        {
            let camera = camera?.path();
            let camera_name = camera
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("camera dir without a name"))?
                .to_os_string();

            for folder in fs::read_dir(&camera)? {
                let folder = folder?.path();
                let kind = match folder.file_name().and_then(|n| n.to_str()) {
                    Some(name) if matches!(name, "images" | "labels" | "annotations") => {
                        name.to_string()
                    }
                    _ => continue,
                };
                let out_dir = dest.join(split).join(&camera_name).join(&kind);
                fs::create_dir_all(&out_dir)?;

                for entry in fs::read_dir(&folder)? {
                    let entry = entry?.path();
                    let name = match entry.file_name().and_then(|n| n.to_str()) {
                        Some(name) => name,
                        None => continue,
                    };
                    let fake_name = match fake_file_name(name, "_fake") {
                        Some(fake_name) => fake_name,
                        None => continue,
                    };

                    match kind.as_str() {
                        // The synthesized frame comes from the results
                        // directory, not the source tree.
                        "images" => {
                            let fake_src = results_dir.join(&fake_name);
                            if !fake_src.is_file() {
                                log::warn!("no synthesized image for {name}");
                                stats.missing += 1;
                                continue;
                            }
                            fs::copy(&fake_src, out_dir.join(&fake_name))
                                .with_context(|| format!("copying {}", fake_src.display()))?;
                            stats.images += 1;
                        }
                        "labels" => {
                            fs::copy(&entry, out_dir.join(&fake_name))?;
                            stats.labels += 1;
                        }
                        "annotations" => {
                            fs::copy(&entry, out_dir.join(&fake_name))?;
                            stats.annotations += 1;
                        }
                        _ => unreachable!(),
                    }
                }
            }
        }
    }

    log::info!(
        "fake dataset at {}: {} images, {} labels, {} annotations, {} missing",
        dest.display(),
        stats.images,
        stats.labels,
        stats.annotations,
        stats.missing
    );
    Ok(stats)
}
