mod generate;
mod merge;
mod validate;

pub use generate::*;
pub use merge::*;
pub use validate::*;
