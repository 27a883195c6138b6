pub mod sequence;
pub mod trips;

pub use sequence::{format_trip_number, DailySequence, SequenceSource};
pub use trips::TripRegistry;
