use bigdecimal::{BigDecimal, Zero};

use crate::error::RateioError;
use crate::models::decimal::MAX_INPUT_SCALE;
use crate::models::{within_input_bounds, HeaderParameters, TripTotals};

/// 计费重量: 实际累计重量低于合同最低重量时按最低重量计费
pub fn billable_weight(total_weight: &BigDecimal, params: &HeaderParameters) -> BigDecimal {
    if *total_weight < params.minimum_billable_weight {
        params.minimum_billable_weight.clone()
    } else {
        total_weight.clone()
    }
}

/// 行程汇总计算
///
/// 税率定义为含税价格的百分比, 税额按反算 (gross-up) 求得:
/// `tax = base / (100 - rate) * 100 - base`, 即 `tax == rate% * (base + tax)`。
/// 同样的输入总是得到相同的输出。
pub fn compute_trip_totals(
    total_weight: &BigDecimal,
    params: &HeaderParameters,
) -> Result<TripTotals, RateioError> {
    if !within_input_bounds(total_weight) {
        return Err(RateioError::InvalidParameter(format!(
            "trip weight exceeds supported precision (at most {} decimal places)",
            MAX_INPUT_SCALE
        )));
    }
    trip_totals(total_weight, params)
}

/// 分摊器传入的是已校验发票重量之和, 不再做输入精度检查
pub(crate) fn trip_totals(
    total_weight: &BigDecimal,
    params: &HeaderParameters,
) -> Result<TripTotals, RateioError> {
    if *total_weight <= BigDecimal::zero() {
        return Err(RateioError::InvalidParameter(format!(
            "trip weight must be positive, got {}",
            total_weight
        )));
    }
    params.validate()?;

    let hundred = BigDecimal::from(100);

    // 1. 最低计费重量
    let billable = billable_weight(total_weight, params);

    // 2. 按重量运费 (运价按每 1000 单位)
    let freight_by_weight = &params.freight_rate_per_ton / BigDecimal::from(1000) * &billable;

    // 3. 过路费在行程层面不随重量变化
    let toll_total = params.toll_flat.clone();

    // 4. 加急附加费
    let express_total = &freight_by_weight * &params.express_surcharge_percent / &hundred;

    // 5-6. 含税反算
    let tax_base = &freight_by_weight + &toll_total + &express_total;
    let tax_total = if params.tax_rate_percent.is_zero() {
        BigDecimal::zero()
    } else {
        &tax_base / (&hundred - &params.tax_rate_percent) * &hundred - &tax_base
    };

    // 7. 合计
    let grand_total = &freight_by_weight + &toll_total + &express_total + &tax_total;

    Ok(TripTotals {
        freight_by_weight,
        toll_total,
        express_total,
        tax_total,
        grand_total,
    })
}
