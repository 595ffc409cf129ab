use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::utils;

/// One line of a YOLO-style `.txt` label file: `class cx cy w h [conf]`,
/// coordinates normalized to the image size. Ground-truth files carry no
/// confidence column; those lines get a score of 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLine {
    pub class_id: u32,
    pub coords: [f32; 4],
    pub conf: f32,
}

/// Reads a YOLO label file. Lines with fewer than five fields are
/// skipped rather than treated as errors, matching how the prediction
/// tooling tolerates stray blank lines.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelLine>> {
    let lines = utils::file_to_vec(path)
        .with_context(|| format!("reading label file {}", path.display()))?;

    let mut labels = Vec::with_capacity(lines.len());
    for line in &lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            continue;
        }

        let parsed = parse_fields(&fields)
            .with_context(|| format!("bad label line {line:?} in {}", path.display()))?;
        labels.push(parsed);
    }
    Ok(labels)
}

fn parse_fields(fields: &[&str]) -> Result<LabelLine> {
    let class_id: u32 = fields[0].parse()?;
    let mut coords = [0f32; 4];
    for (slot, field) in coords.iter_mut().zip(&fields[1..5]) {
        *slot = field.parse()?;
    }
    let conf: f32 = match fields.get(5) {
        Some(field) => field.parse()?,
        None => 1.0,
    };
    Ok(LabelLine { class_id, coords, conf })
}

/// Writes a YOLO label file, one detection per line with the confidence
/// column included.
pub fn write_label_file(path: &Path, labels: &[LabelLine]) -> Result<()> {
    let mut out = String::new();
    for label in labels {
        writeln!(
            out,
            "{} {} {} {} {} {}",
            label.class_id,
            label.coords[0],
            label.coords[1],
            label.coords[2],
            label.coords[3],
            label.conf
        )?;
    }
    fs::write(path, out).with_context(|| format!("writing label file {}", path.display()))?;
    Ok(())
}
