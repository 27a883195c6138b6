pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use error::RateioError;
pub use models::{Allocation, HeaderParameters, InvoiceRecord, TripTotals};
pub use service::{allocate, compute_trip_totals, TripSession};
pub use store::{DailySequence, TripRegistry};
