//! Pipeline configuration. The training and inference work is done by
//! external codebases (CycleGAN/pix2pix, YOLO-World, YOLOR); this crate
//! only sequences them, so a stage is just a program invocation with its
//! arguments, working directory and environment.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One external-tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl StageConfig {
    pub fn new(name: &str, program: &str) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: Vec::new(),
            cwd: None,
            env: HashMap::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_cwd(mut self, cwd: &Path) -> Self {
        self.cwd = Some(cwd.to_path_buf());
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

/// Top-level pipeline layout: where the dataset, pretrained weights and
/// experiment runs live, plus the ordered stage list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    /// Pretrained weight files.
    pub zoo_dir: PathBuf,
    /// Training checkpoints and prediction outputs, per experiment.
    pub run_dir: PathBuf,
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    /// Builds a config rooted under the platform cache directory. The
    /// `DATA_DIR` environment variable overrides the dataset location.
    pub fn new() -> Result<Self> {
        let root = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("no cache directory on this platform"))?
            .join("fisheye8k");

        let data_dir = match std::env::var_os("DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => root.join("data"),
        };

        Ok(Self {
            data_dir,
            zoo_dir: root.join("zoo"),
            run_dir: root.join("run"),
            stages: Vec::new(),
        })
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = dir.to_path_buf();
        self
    }

    pub fn with_stage(mut self, stage: StageConfig) -> Self {
        self.stages.push(stage);
        self
    }

    /// The canonical Fisheye8K stage sequence: style-transfer training
    /// and export, pseudo-labeling, then detector training and
    /// prediction at each image size.
    pub fn with_default_stages(mut self, image_sizes: &[u32]) -> Self {
        let data = self.data_dir.display().to_string();
        let run = self.run_dir.display().to_string();
        let zoo = self.zoo_dir.display().to_string();

        let dataroot = format!("{data}/images");
        self.stages.push(
            StageConfig::new("style-transfer-train", "python")
                .with_args([
                    "train.py",
                    "--dataroot",
                    dataroot.as_str(),
                    "--name",
                    "a2n",
                    "--model",
                    "cycle_gan",
                ])
                .with_cwd(Path::new("cyclegan_pix2pix")),
        );
        self.stages.push(
            StageConfig::new("style-transfer-export", "python")
                .with_args([
                    "test.py",
                    "--dataroot",
                    dataroot.as_str(),
                    "--name",
                    "a2n",
                    "--model",
                    "test",
                    "--no_dropout",
                ])
                .with_cwd(Path::new("cyclegan_pix2pix")),
        );

        let test_images = format!("{data}/test");
        let world_weights = format!("{zoo}/yolo_world_x.pth");
        let pseudo_out = format!("{run}/pseudo_labels");
        self.stages.push(
            StageConfig::new("pseudo-label", "python")
                .with_args([
                    "demo/image_demo.py",
                    test_images.as_str(),
                    world_weights.as_str(),
                    "--out-dir",
                    pseudo_out.as_str(),
                ])
                .with_cwd(Path::new("yolo_world")),
        );

        for size in image_sizes {
            let size_arg = size.to_string();
            let weights = format!("{zoo}/yolor_d6.pt");
            let project = format!("{run}/train");
            let exp_name = format!("yolor_d6_{size}");
            self.stages.push(
                StageConfig::new(&format!("train-{size}"), "python")
                    .with_args([
                        "train.py",
                        "--img-size",
                        size_arg.as_str(),
                        "--weights",
                        weights.as_str(),
                        "--project",
                        project.as_str(),
                        "--name",
                        exp_name.as_str(),
                    ])
                    .with_cwd(Path::new("yolor")),
            );
        }
        for size in image_sizes {
            let size_arg = size.to_string();
            let weights = format!("{run}/train/yolor_d6_{size}/weights/best.pt");
            let output = format!("{run}/predict/yolor_d6_{size}");
            self.stages.push(
                StageConfig::new(&format!("predict-{size}"), "python")
                    .with_args([
                        "detect.py",
                        "--img-size",
                        size_arg.as_str(),
                        "--weights",
                        weights.as_str(),
                        "--source",
                        test_images.as_str(),
                        "--save-txt",
                        "--save-conf",
                        "--output",
                        output.as_str(),
                    ])
                    .with_cwd(Path::new("yolor")),
            );
        }
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing pipeline config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("writing pipeline config {}", path.display()))?;
        Ok(())
    }
}
