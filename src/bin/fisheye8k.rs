use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fisheye8k::dataset::{build_fake, flatten_images, FakeBuildOptions};
use fisheye8k::formats::{read_submission, resolve_output_path, write_submission, BoxFormat};
use fisheye8k::pipeline::{run_pipeline, PipelineConfig};
use fisheye8k::submission::{validate, GenOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fisheye8K detection pipeline tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge per-resolution prediction labels into one submission JSON.
    GenSubmission {
        /// Directory holding the prediction runs.
        #[arg(long, value_name = "DIR")]
        predict_dir: PathBuf,

        /// Output .json file. Defaults to <predict-dir>/results.json.
        #[arg(long, value_name = "FILE")]
        output_file: Option<PathBuf>,

        /// Enlarge bounding box ratio (0.0 - 1.0).
        #[arg(long, default_value = "0.0", value_name = "RATIO")]
        enlarge_ratio: f32,

        /// Bounding box format of the label files: yolo, voc or coco.
        #[arg(long, default_value = "yolo", value_name = "FORMAT")]
        format: String,

        /// IoU threshold for cross-scale deduplication; 1.0 disables it.
        #[arg(long, default_value = "0.7", value_name = "THRESHOLD")]
        merge_iou: f32,
    },

    /// Sanity-check a submission file against the evaluation images.
    Validate {
        #[arg(long, value_name = "FILE")]
        results: PathBuf,

        #[arg(long, value_name = "DIR")]
        images_dir: PathBuf,

        /// Number of object classes in the challenge.
        #[arg(long, default_value = "5", value_name = "COUNT")]
        num_classes: u32,
    },

    /// Flatten train/val per-camera images for style-transfer training.
    FlattenImages {
        #[arg(long, value_name = "DIR")]
        source_data: PathBuf,
    },

    /// Assemble the synthesized nighttime dataset from CycleGAN results.
    BuildFake {
        /// Style-transfer run name (a2e, a2n).
        #[arg(long, default_value = "a2e", value_name = "NAME")]
        name: String,

        #[arg(long, value_name = "DIR")]
        source_dataset: PathBuf,

        #[arg(long, default_value = "./results", value_name = "DIR")]
        fake_images_path: PathBuf,
    },

    /// Run the external training/inference stages.
    Run {
        /// Pipeline config JSON; omitted, runs the default stage set.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Stage names to run; empty means all stages in order.
        #[arg(value_name = "STAGE")]
        stages: Vec<String>,
    },

    /// Write the default pipeline config to a file for editing.
    InitConfig {
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Detector image sizes, one train and one predict stage each.
        #[arg(long, value_delimiter = ',', default_value = "1280,1536,1920")]
        image_sizes: Vec<u32>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::GenSubmission {
            predict_dir,
            output_file,
            enlarge_ratio,
            format,
            merge_iou,
        } => {
            anyhow::ensure!(
                (0.0..=1.0).contains(&enlarge_ratio),
                "enlarge ratio must be within [0, 1], got {enlarge_ratio}"
            );
            let format = BoxFormat::from_str(&format)
                .ok_or_else(|| anyhow::anyhow!("unknown box format {format:?}"))?;

            let opts = GenOptions::new(&predict_dir)
                .with_format(format)
                .with_enlarge_ratio(enlarge_ratio)
                .with_merge_iou(merge_iou);
            let entries = fisheye8k::generate_submission_entries(&opts)?;

            let output = output_file.unwrap_or_else(|| predict_dir.join("results"));
            let output = resolve_output_path(&output);
            write_submission(&output, &entries)?;
            println!("{} detections written to {}", entries.len(), output.display());
        }

        Command::Validate {
            results,
            images_dir,
            num_classes,
        } => {
            let entries = read_submission(&results)?;
            let report = validate(&entries, &images_dir, num_classes)?;
            println!("{}", report.summary());
            if !report.is_clean() {
                anyhow::bail!("submission failed validation");
            }
        }

        Command::FlattenImages { source_data } => {
            let copied = flatten_images(&source_data)?;
            println!("copied {copied} images");
        }

        Command::BuildFake {
            name,
            source_dataset,
            fake_images_path,
        } => {
            let opts = FakeBuildOptions::new(&name, &source_dataset, &fake_images_path);
            let stats = build_fake(&opts)?;
            println!(
                "fake dataset at {}: {} images, {} labels, {} annotations ({} missing)",
                opts.dest_dir().display(),
                stats.images,
                stats.labels,
                stats.annotations,
                stats.missing
            );
        }

        Command::Run { config, stages } => {
            let config = match config {
                Some(path) => PipelineConfig::load(&path)?,
                None => PipelineConfig::new()?.with_default_stages(&[1280, 1536, 1920]),
            };
            run_pipeline(&config, &stages)?;
        }

        Command::InitConfig { output, image_sizes } => {
            let config = PipelineConfig::new()?.with_default_stages(&image_sizes);
            config.save(&output)?;
            println!("pipeline config written to {}", output.display());
        }
    }

    Ok(())
}
