use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::error::RateioError;
use crate::models::decimal::{within_input_bounds, MAX_INPUT_SCALE};

/// 行程抬头参数 (每个行程/单据设置一次)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderParameters {
    pub freight_rate_per_ton: BigDecimal,      // 每吨运价 (每 1000 重量单位)
    pub minimum_billable_weight: BigDecimal,   // 最低计费重量
    pub tax_rate_percent: BigDecimal,          // 含税税率 [0, 100)
    pub express_surcharge_percent: BigDecimal, // 加急附加费率
    pub toll_flat: BigDecimal,
    pub palletizing_fee_flat: BigDecimal,
    pub transfer_freight_flat: BigDecimal,
    pub pickup_fee_flat: BigDecimal,
}

impl HeaderParameters {
    /// 校验参数域: 精度有界, 全部非负, 税率严格小于 100
    pub fn validate(&self) -> Result<(), RateioError> {
        let fields = [
            ("freight_rate_per_ton", &self.freight_rate_per_ton),
            ("minimum_billable_weight", &self.minimum_billable_weight),
            ("tax_rate_percent", &self.tax_rate_percent),
            ("express_surcharge_percent", &self.express_surcharge_percent),
            ("toll_flat", &self.toll_flat),
            ("palletizing_fee_flat", &self.palletizing_fee_flat),
            ("transfer_freight_flat", &self.transfer_freight_flat),
            ("pickup_fee_flat", &self.pickup_fee_flat),
        ];
        for (name, value) in fields {
            if !within_input_bounds(value) {
                return Err(RateioError::InvalidParameter(format!(
                    "{} exceeds supported precision (at most {} decimal places)",
                    name, MAX_INPUT_SCALE
                )));
            }
            if *value < BigDecimal::zero() {
                return Err(RateioError::InvalidParameter(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        // 含税反算除以 (100 - 税率)
        if self.tax_rate_percent >= BigDecimal::from(100) {
            return Err(RateioError::InvalidParameter(format!(
                "tax_rate_percent must be below 100, got {}",
                self.tax_rate_percent
            )));
        }

        Ok(())
    }
}
