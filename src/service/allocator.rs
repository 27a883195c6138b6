use bigdecimal::{BigDecimal, Zero};

use crate::error::RateioError;
use crate::models::decimal::MAX_INPUT_SCALE;
use crate::models::{
    within_input_bounds, AllocatedInvoice, Allocation, HeaderParameters, InvoiceAllocation,
    InvoiceRecord,
};
use crate::service::totals::trip_totals;

/// 按重量占比分摊 (rateio)
///
/// 先用实际累计重量计算行程汇总, 再把每项汇总和每项固定费用按
/// `weight / total_real_weight` 分摊到每张发票。
///
/// 注意: 分母始终是**实际**累计重量, 即使最低计费重量抬高了行程汇总。
/// 这样 `Σ weight_share == 1`, 各发票分摊额之和恰好等于行程汇总,
/// 最低重量的补足部分由所有发票按比例共同承担。不要改成计费重量。
///
/// 所有校验在生成任何输出之前完成。
pub fn allocate(
    invoices: &[InvoiceRecord],
    params: &HeaderParameters,
) -> Result<Allocation, RateioError> {
    if invoices.is_empty() {
        return Err(RateioError::EmptyInvoiceSet);
    }
    for inv in invoices {
        // 先检查精度, 再做任何比较或求和
        if !within_input_bounds(&inv.weight) {
            return Err(RateioError::InvalidWeight {
                id: inv.id.clone(),
                reason: format!(
                    "exceeds supported precision (at most {} decimal places)",
                    MAX_INPUT_SCALE
                ),
            });
        }
        if inv.weight <= BigDecimal::zero() {
            return Err(RateioError::InvalidWeight {
                id: inv.id.clone(),
                reason: format!("must be positive, got {}", inv.weight),
            });
        }
    }

    // 1. 实际累计重量
    let total_weight = invoices
        .iter()
        .fold(BigDecimal::zero(), |acc, inv| acc + &inv.weight);

    // 2. 行程汇总 (内部应用最低计费重量)
    let totals = trip_totals(&total_weight, params)?;

    // 3-5. 逐张分摊
    let allocated = invoices
        .iter()
        .map(|inv| {
            let share = &inv.weight / &total_weight;

            let freight = &totals.freight_by_weight * &share;
            let express = &totals.express_total * &share;
            let toll = &totals.toll_total * &share;
            let tax = &totals.tax_total * &share;
            let palletizing = &params.palletizing_fee_flat * &share;
            let transfer_freight = &params.transfer_freight_flat * &share;
            let pickup = &params.pickup_fee_flat * &share;

            let freight_to_apportion = &freight + &express;
            let total_charge = &freight_to_apportion + &palletizing + &toll + &tax;

            AllocatedInvoice {
                invoice: inv.clone(),
                allocation: InvoiceAllocation {
                    weight_share: share,
                    allocated_freight_by_weight: freight,
                    allocated_express: express,
                    allocated_toll: toll,
                    allocated_palletizing: palletizing,
                    allocated_transfer_freight: transfer_freight,
                    allocated_pickup: pickup,
                    allocated_tax: tax,
                    freight_to_apportion,
                    total_charge,
                },
            }
        })
        .collect();

    Ok(Allocation {
        total_weight,
        totals,
        invoices: allocated,
    })
}

/// 调用方的空集合短路: 没有发票时返回全零结果而不是错误
pub fn allocate_or_empty(
    invoices: &[InvoiceRecord],
    params: &HeaderParameters,
) -> Result<Allocation, RateioError> {
    if invoices.is_empty() {
        params.validate()?;
        return Ok(Allocation::empty());
    }
    allocate(invoices, params)
}
