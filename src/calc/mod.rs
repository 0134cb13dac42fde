pub mod cycle;
pub mod layout;

pub use cycle::{advance_index, next_index, previous_index};
pub use layout::CardMetrics;
