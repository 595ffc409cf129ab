use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use regex::Regex;

/// Time-of-day scene tag embedded in Fisheye8K image names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    #[default] Morning,
    Afternoon,
    Evening,
    Night,
}

impl Scene {
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "M" => Some(Scene::Morning),
            "A" => Some(Scene::Afternoon),
            "E" => Some(Scene::Evening),
            "N" => Some(Scene::Night),
            _ => None,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Scene::Morning => "M",
            Scene::Afternoon => "A",
            Scene::Evening => "E",
            Scene::Night => "N",
        }
    }

    /// Position in the `[M, A, E, N]` ordering, the digit used when
    /// composing the numeric frame id.
    pub fn index(&self) -> u32 {
        match self {
            Scene::Morning => 0,
            Scene::Afternoon => 1,
            Scene::Evening => 2,
            Scene::Night => 3,
        }
    }
}

/// Identity of one evaluation frame, parsed from image file names of the
/// form `camera{N}_{scene}_{frame}` (e.g. `camera13_A_318.png`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId {
    pub camera: u32,
    pub scene: Scene,
    pub frame: u32,
}

fn stem_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^camera(\d+)_([MAEN])_(\d+)$").expect("frame id pattern")
    })
}

impl FrameId {
    /// Parses a frame id from a file stem such as `camera13_A_318`.
    ///
    /// Leading zeros in the frame index are dropped (`camera13_A_0318`
    /// and `camera13_A_318` name the same frame).
    pub fn from_stem(stem: &str) -> Result<Self> {
        let caps = stem_pattern()
            .captures(stem)
            .ok_or_else(|| anyhow!("not a fisheye8k image name: {stem:?}"))?;

        let camera: u32 = caps[1].parse()?;
        let scene = Scene::from_letter(&caps[2])
            .ok_or_else(|| anyhow!("unknown scene letter in {stem:?}"))?;
        let frame: u32 = caps[3].parse()?;

        Ok(Self { camera, scene, frame })
    }

    /// Parses a frame id from an image path, using only the file stem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("path has no usable file stem: {}", path.display()))?;
        Self::from_stem(stem)
    }

    /// Numeric id used by the challenge evaluator: the decimal
    /// concatenation of camera index, scene index and frame index.
    /// Camera/frame indices wide enough to overflow the id space are
    /// errors, the same as unparseable names.
    pub fn id(&self) -> Result<i64> {
        let digits = format!("{}{}{}", self.camera, self.scene.index(), self.frame);
        digits
            .parse()
            .map_err(|_| anyhow!("frame id {digits} does not fit the evaluator id space"))
    }

    /// File stem this frame id corresponds to.
    pub fn stem(&self) -> String {
        format!("camera{}_{}_{}", self.camera, self.scene.letter(), self.frame)
    }
}
