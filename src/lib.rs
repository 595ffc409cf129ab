mod utils;
pub mod common;
pub mod dataset;
pub mod formats;
pub mod pipeline;
pub mod submission;

use crate::common::Detection;
use crate::formats::SubmissionEntry;
use crate::submission::{generate, merge_detections, GenOptions};

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Builds the merged detection list for a prediction directory: walk,
/// convert, enlarge, then deduplicate across inference scales.
pub fn generate_submission(opts: &GenOptions) -> Result<Vec<Detection>> {
    let detections = generate(opts)?;
    Ok(merge_detections(detections, opts.merge_iou))
}

/// Same as [`generate_submission`], already converted to the integer
/// records the submission file stores.
pub fn generate_submission_entries(opts: &GenOptions) -> Result<Vec<SubmissionEntry>> {
    let detections = generate_submission(opts)?;
    Ok(detections.iter().map(SubmissionEntry::from).collect())
}
