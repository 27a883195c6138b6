use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use super::{AllocatedInvoice, TripTotals};

/// 分摊结果: 行程汇总 + 每张发票的派生字段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub total_weight: BigDecimal, // 实际累计重量 (非计费重量)
    pub totals: TripTotals,
    pub invoices: Vec<AllocatedInvoice>,
}

impl Allocation {
    /// 无发票时调用方应得到的全零结果
    pub fn empty() -> Self {
        Self {
            total_weight: BigDecimal::zero(),
            totals: TripTotals::zero(),
            invoices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// 展示用舍入副本, 引擎内部始终保持全精度
    pub fn rounded(&self, scale: i64) -> Self {
        Self {
            total_weight: self.total_weight.clone(),
            totals: self.totals.rounded(scale),
            invoices: self
                .invoices
                .iter()
                .map(|inv| AllocatedInvoice {
                    invoice: inv.invoice.clone(),
                    allocation: inv.allocation.rounded(scale),
                })
                .collect(),
        }
    }
}
