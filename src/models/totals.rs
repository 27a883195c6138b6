use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// 行程级汇总 (纯派生, 不单独修改)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripTotals {
    pub freight_by_weight: BigDecimal,
    pub toll_total: BigDecimal,
    pub express_total: BigDecimal,
    pub tax_total: BigDecimal,
    pub grand_total: BigDecimal,
}

impl TripTotals {
    /// 空行程的全零状态
    pub fn zero() -> Self {
        Self {
            freight_by_weight: BigDecimal::zero(),
            toll_total: BigDecimal::zero(),
            express_total: BigDecimal::zero(),
            tax_total: BigDecimal::zero(),
            grand_total: BigDecimal::zero(),
        }
    }

    pub fn rounded(&self, scale: i64) -> Self {
        Self {
            freight_by_weight: self.freight_by_weight.round(scale),
            toll_total: self.toll_total.round(scale),
            express_total: self.express_total.round(scale),
            tax_total: self.tax_total.round(scale),
            grand_total: self.grand_total.round(scale),
        }
    }
}
