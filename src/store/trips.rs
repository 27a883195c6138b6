use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::RateioError;
use crate::models::{Allocation, HeaderParameters, InvoiceRecord};
use crate::service::TripSession;
use crate::store::sequence::{format_trip_number, SequenceSource};

/// 行程会话注册表 (内存)
///
/// 每次修改只持有该行程所在分片的锁, 不同行程的编辑互不阻塞。
pub struct TripRegistry {
    trips: DashMap<String, TripSession>,
    sequence: Arc<dyn SequenceSource>,
}

impl TripRegistry {
    pub fn new(sequence: Arc<dyn SequenceSource>) -> Self {
        Self {
            trips: DashMap::new(),
            sequence,
        }
    }

    /// 新建行程, 编号取自注入的序列
    pub fn create(&self, date: NaiveDate, header: HeaderParameters) -> Result<TripSession, RateioError> {
        header.validate()?;
        let trip_number = format_trip_number(date, self.sequence.next(date)?);
        let session = TripSession::new(trip_number.clone(), header)?;
        self.trips.insert(trip_number.clone(), session.clone());
        tracing::info!("Trip {} created", trip_number);
        Ok(session)
    }

    pub fn get(&self, trip_number: &str) -> Result<TripSession, RateioError> {
        self.trips
            .get(trip_number)
            .map(|s| s.value().clone())
            .ok_or_else(|| RateioError::TripNotFound(trip_number.to_string()))
    }

    pub fn remove(&self, trip_number: &str) -> Result<(), RateioError> {
        self.trips
            .remove(trip_number)
            .map(|_| tracing::info!("Trip {} removed", trip_number))
            .ok_or_else(|| RateioError::TripNotFound(trip_number.to_string()))
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn add_invoice(&self, trip_number: &str, invoice: InvoiceRecord) -> Result<Allocation, RateioError> {
        let invoice_id = invoice.id.clone();
        self.with_session(trip_number, |session| {
            let allocation = session.add_invoice(invoice)?.clone();
            tracing::info!(
                "Trip {}: invoice {} added, {} invoices, grand total {}",
                trip_number,
                invoice_id,
                session.invoice_count(),
                allocation.totals.grand_total.round(2)
            );
            Ok(allocation)
        })
    }

    pub fn remove_invoice(&self, trip_number: &str, invoice_id: &str) -> Result<Allocation, RateioError> {
        self.with_session(trip_number, |session| {
            let allocation = session.remove_invoice(invoice_id)?.clone();
            tracing::info!(
                "Trip {}: invoice {} removed, {} invoices left",
                trip_number,
                invoice_id,
                session.invoice_count()
            );
            Ok(allocation)
        })
    }

    /// 批量导入, 返回 (导入数量, 重算结果)
    pub fn import_batch(
        &self,
        trip_number: &str,
        invoices: Vec<InvoiceRecord>,
    ) -> Result<(usize, Allocation), RateioError> {
        let requested = invoices.len();
        self.with_session(trip_number, |session| {
            let imported = session.import_batch(invoices)?;
            tracing::info!(
                "Trip {}: imported {}/{} invoices",
                trip_number,
                imported,
                requested
            );
            Ok((imported, session.allocation().clone()))
        })
    }

    pub fn update_header(&self, trip_number: &str, header: HeaderParameters) -> Result<Allocation, RateioError> {
        self.with_session(trip_number, |session| {
            let allocation = session.update_header(header)?.clone();
            tracing::info!("Trip {}: header updated, recomputed", trip_number);
            Ok(allocation)
        })
    }

    fn with_session<T>(
        &self,
        trip_number: &str,
        f: impl FnOnce(&mut TripSession) -> Result<T, RateioError>,
    ) -> Result<T, RateioError> {
        let mut entry = self
            .trips
            .get_mut(trip_number)
            .ok_or_else(|| RateioError::TripNotFound(trip_number.to_string()))?;
        let result = f(entry.value_mut());
        if let Err(e) = &result {
            tracing::warn!("Trip {}: change rejected: {}", trip_number, e);
        }
        result
    }
}
