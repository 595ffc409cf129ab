mod fake_build;
mod flatten;

pub use fake_build::*;
pub use flatten::*;
