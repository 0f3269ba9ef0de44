pub mod stats;
pub mod vector;

pub use stats::StatsHelper;
pub use vector::{reflect, safe_normal};
