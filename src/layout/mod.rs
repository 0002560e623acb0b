// Layout: per-slot sizing and the strip layout pass

pub mod engine;
pub mod sizing;

pub use engine::{LayoutEngine, LayoutPass};
pub use sizing::fit_source;
