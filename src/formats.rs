mod bbox_format;
mod submission_file;
mod yolo_labels;

pub use bbox_format::*;
pub use submission_file::*;
pub use yolo_labels::*;
