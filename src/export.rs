//! 分摊结果 CSV 导出
use bigdecimal::BigDecimal;

use crate::error::RateioError;
use crate::models::Allocation;

const HEADER: [&str; 15] = [
    "invoice_id",
    "invoice_number",
    "client",
    "issue_date",
    "weight",
    "weight_share",
    "freight_by_weight",
    "express",
    "toll",
    "palletizing",
    "transfer_freight",
    "pickup",
    "tax",
    "freight_to_apportion",
    "total_charge",
];

/// 每张发票一行, 最后一行为行程汇总 (`TOTAL`)
pub fn allocation_to_csv(allocation: &Allocation, scale: i64) -> Result<String, RateioError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;

    let fmt = |v: &BigDecimal| v.round(scale).with_scale(scale).to_string();

    for row in &allocation.invoices {
        let inv = &row.invoice;
        let a = &row.allocation;
        wtr.write_record([
            inv.id.clone(),
            inv.invoice_number.clone().unwrap_or_default(),
            inv.client.clone().unwrap_or_default(),
            inv.issue_date.map(|d| d.to_string()).unwrap_or_default(),
            inv.weight.to_string(),
            fmt(&a.weight_share),
            fmt(&a.allocated_freight_by_weight),
            fmt(&a.allocated_express),
            fmt(&a.allocated_toll),
            fmt(&a.allocated_palletizing),
            fmt(&a.allocated_transfer_freight),
            fmt(&a.allocated_pickup),
            fmt(&a.allocated_tax),
            fmt(&a.freight_to_apportion),
            fmt(&a.total_charge),
        ])?;
    }

    let t = &allocation.totals;
    wtr.write_record([
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        String::new(),
        allocation.total_weight.to_string(),
        String::new(),
        fmt(&t.freight_by_weight),
        fmt(&t.express_total),
        fmt(&t.toll_total),
        String::new(),
        String::new(),
        String::new(),
        fmt(&t.tax_total),
        fmt(&(&t.freight_by_weight + &t.express_total)),
        fmt(&t.grand_total),
    ])?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| RateioError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| RateioError::Export(e.to_string()))
}
