pub mod allocator;
pub mod batch;
pub mod session;
pub mod totals;

pub use allocator::{allocate, allocate_or_empty};
pub use batch::{allocate_all, TripInput};
pub use session::TripSession;
pub use totals::{billable_weight, compute_trip_totals};
