pub mod handler;

pub use handler::{ReorgHandler, ReorgRecord, ReorgStats};
