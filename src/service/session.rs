use indexmap::IndexMap;

use crate::error::RateioError;
use crate::models::{Allocation, HeaderParameters, InvoiceRecord};
use crate::service::allocator::allocate_or_empty;

/// 行程会话: 持有抬头参数和有序发票集合
///
/// 任何新增、删除、批量导入或修改抬头都会对整个发票集合全量重算,
/// 从不增量修补。每次修改先构造候选状态, 重算成功后才提交,
/// 失败时会话保持原状。
#[derive(Debug, Clone)]
pub struct TripSession {
    trip_number: String,
    header: HeaderParameters,
    invoices: IndexMap<String, InvoiceRecord>,
    allocation: Allocation,
}

impl TripSession {
    pub fn new(trip_number: impl Into<String>, header: HeaderParameters) -> Result<Self, RateioError> {
        header.validate()?;
        Ok(Self {
            trip_number: trip_number.into(),
            header,
            invoices: IndexMap::new(),
            allocation: Allocation::empty(),
        })
    }

    pub fn trip_number(&self) -> &str {
        &self.trip_number
    }

    pub fn header(&self) -> &HeaderParameters {
        &self.header
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn invoices(&self) -> impl Iterator<Item = &InvoiceRecord> {
        self.invoices.values()
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    pub fn add_invoice(&mut self, invoice: InvoiceRecord) -> Result<&Allocation, RateioError> {
        if self.invoices.contains_key(&invoice.id) {
            return Err(RateioError::DuplicateInvoice(invoice.id));
        }
        let mut candidate = self.invoices.clone();
        candidate.insert(invoice.id.clone(), invoice);
        self.commit(self.header.clone(), candidate)
    }

    pub fn remove_invoice(&mut self, invoice_id: &str) -> Result<&Allocation, RateioError> {
        if !self.invoices.contains_key(invoice_id) {
            return Err(RateioError::InvoiceNotFound(invoice_id.to_string()));
        }
        let mut candidate = self.invoices.clone();
        // 保持其余发票的原有顺序
        candidate.shift_remove(invoice_id);
        self.commit(self.header.clone(), candidate)
    }

    /// 批量导入, 已存在的发票 (包括同批次内重复的) 被跳过
    ///
    /// 整批要么全部生效要么全部不生效。返回实际导入的数量。
    pub fn import_batch(&mut self, batch: Vec<InvoiceRecord>) -> Result<usize, RateioError> {
        let mut candidate = self.invoices.clone();
        let mut imported = 0;
        for invoice in batch {
            if candidate.contains_key(&invoice.id) {
                tracing::debug!(
                    "Trip {}: invoice {} already present, skipping",
                    self.trip_number,
                    invoice.id
                );
                continue;
            }
            candidate.insert(invoice.id.clone(), invoice);
            imported += 1;
        }
        self.commit(self.header.clone(), candidate)?;
        Ok(imported)
    }

    pub fn update_header(&mut self, header: HeaderParameters) -> Result<&Allocation, RateioError> {
        let candidate = self.invoices.clone();
        self.commit(header, candidate)
    }

    fn commit(
        &mut self,
        header: HeaderParameters,
        invoices: IndexMap<String, InvoiceRecord>,
    ) -> Result<&Allocation, RateioError> {
        let records: Vec<InvoiceRecord> = invoices.values().cloned().collect();
        let allocation = allocate_or_empty(&records, &header)?;

        self.header = header;
        self.invoices = invoices;
        self.allocation = allocation;
        Ok(&self.allocation)
    }
}
