pub mod decimal;
pub mod header;
pub mod invoice;
pub mod result;
pub mod totals;

pub use decimal::within_input_bounds;
pub use header::HeaderParameters;
pub use invoice::{AllocatedInvoice, InvoiceAllocation, InvoiceRecord};
pub use result::Allocation;
pub use totals::TripTotals;
