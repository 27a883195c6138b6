use rayon::prelude::*;
use serde::Deserialize;

use crate::error::RateioError;
use crate::models::{Allocation, HeaderParameters, InvoiceRecord};
use crate::service::allocator::allocate_or_empty;

/// 一个独立行程的输入快照
#[derive(Debug, Clone, Deserialize)]
pub struct TripInput {
    #[serde(default)]
    pub header: HeaderParameters,
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
}

/// 并行计算多个互不相关的行程, 结果顺序与输入一致
///
/// 每个行程只读自己的输入, 无需任何协调。
pub fn allocate_all(trips: &[TripInput]) -> Vec<Result<Allocation, RateioError>> {
    let results: Vec<Result<Allocation, RateioError>> = trips
        .par_iter()
        .map(|trip| allocate_or_empty(&trip.invoices, &trip.header))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::info!(
        "Batch allocation finished: {} trips, {} failed",
        trips.len(),
        failed
    );
    results
}
