use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::common::Detection;

/// One record of the challenge submission file. Box coordinates are
/// truncated to whole pixels, which is what the evaluator ingests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    pub image_id: i64,
    pub category_id: u32,
    pub bbox: [i32; 4],
    pub score: f32,
}

impl From<&Detection> for SubmissionEntry {
    fn from(det: &Detection) -> Self {
        let (x, y, w, h) = det.bbox.as_xywh_i32();
        Self {
            image_id: det.image_id,
            category_id: det.category_id,
            bbox: [x, y, w, h],
            score: det.score,
        }
    }
}

/// Appends a `.json` extension when the given output path lacks one.
pub fn resolve_output_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => path.to_path_buf(),
        _ => {
            let mut with_ext = path.as_os_str().to_os_string();
            with_ext.push(".json");
            PathBuf::from(with_ext)
        }
    }
}

/// Writes the submission as a flat JSON array, creating parent
/// directories as needed.
pub fn write_submission(path: &Path, entries: &[SubmissionEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file = fs::File::create(path)
        .with_context(|| format!("creating submission file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, entries)?;
    writer
        .flush()
        .with_context(|| format!("flushing submission file {}", path.display()))?;
    Ok(())
}

/// Reads a submission JSON array back from disk.
pub fn read_submission(path: &Path) -> Result<Vec<SubmissionEntry>> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening submission file {}", path.display()))?;
    let entries = serde_json::from_reader(BufReader::new(file))?;
    Ok(entries)
}
