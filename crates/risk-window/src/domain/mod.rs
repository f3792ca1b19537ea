pub mod transitions;
pub mod window;
pub mod window_id;

pub use transitions::{can_transition_to_final, can_transition_to_provisional};
pub use window::{add_event, generate_snapshot};
pub use window_id::window_bounds;
