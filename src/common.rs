mod det_box;
mod detection;
mod frame_id;

pub use det_box::*;
pub use detection::*;
pub use frame_id::*;
