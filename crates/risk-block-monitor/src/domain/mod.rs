pub mod cache;
pub mod fork_detection;

pub use cache::HeaderCache;
pub use fork_detection::{detect_mismatch, find_fork_point, ForkReport, HeightComparison};
