//! 引擎错误类型
//!
//! - [`InvalidParameter`] 抬头参数非法 (税率 >= 100、负数费用) 或行程重量非正
//! - [`EmptyInvoiceSet`] 分摊时发票集合为空
//! - [`InvalidWeight`] 某张发票重量 <= 0 或精度超出范围
//!
//! 其余变体属于调用方层 (行程会话、注册表、导出)。
//!
//!  [`InvalidParameter`]: RateioError::InvalidParameter
//!  [`EmptyInvoiceSet`]: RateioError::EmptyInvoiceSet
//!  [`InvalidWeight`]: RateioError::InvalidWeight
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateioError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invoice set is empty")]
    EmptyInvoiceSet,
    #[error("Invalid weight for invoice \"{id}\": {reason}")]
    InvalidWeight { id: String, reason: String },
    #[error("\"{0}\" trip not found!")]
    TripNotFound(String),
    #[error("\"{0}\" invoice not found!")]
    InvoiceNotFound(String),
    #[error("\"{0}\" invoice already present!")]
    DuplicateInvoice(String),
    #[error("Trip sequence exhausted for {0}")]
    SequenceExhausted(String),
    #[error("Export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for RateioError {
    fn from(e: csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}
