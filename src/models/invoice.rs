use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 运输发票 (每张货运单据一条)
///
/// 引擎只读取 `id` 和 `weight`, 其余字段原样透传。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: String,
    pub weight: BigDecimal,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub invoice_number: Option<String>,
}

impl InvoiceRecord {
    pub fn new(id: impl Into<String>, weight: BigDecimal) -> Self {
        Self {
            id: id.into(),
            weight,
            client: None,
            issue_date: None,
            invoice_number: None,
        }
    }
}

/// 单张发票的分摊结果 (每次全量重算)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAllocation {
    pub weight_share: BigDecimal,
    pub allocated_freight_by_weight: BigDecimal,
    pub allocated_express: BigDecimal,
    pub allocated_toll: BigDecimal,
    pub allocated_palletizing: BigDecimal,
    pub allocated_transfer_freight: BigDecimal,
    pub allocated_pickup: BigDecimal,
    pub allocated_tax: BigDecimal,
    pub freight_to_apportion: BigDecimal, // 运费 + 加急
    pub total_charge: BigDecimal,         // 运费 + 加急 + 打托 + 过路费 + 税
}

impl InvoiceAllocation {
    pub fn rounded(&self, scale: i64) -> Self {
        Self {
            weight_share: self.weight_share.round(scale),
            allocated_freight_by_weight: self.allocated_freight_by_weight.round(scale),
            allocated_express: self.allocated_express.round(scale),
            allocated_toll: self.allocated_toll.round(scale),
            allocated_palletizing: self.allocated_palletizing.round(scale),
            allocated_transfer_freight: self.allocated_transfer_freight.round(scale),
            allocated_pickup: self.allocated_pickup.round(scale),
            allocated_tax: self.allocated_tax.round(scale),
            freight_to_apportion: self.freight_to_apportion.round(scale),
            total_charge: self.total_charge.round(scale),
        }
    }
}

/// 原始发票 + 派生字段 (原始记录不被修改)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocatedInvoice {
    #[serde(flatten)]
    pub invoice: InvoiceRecord,
    #[serde(flatten)]
    pub allocation: InvoiceAllocation,
}
