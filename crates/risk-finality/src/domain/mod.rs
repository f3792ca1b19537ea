pub mod finality_tracker;

pub use finality_tracker::FinalityTracker;
