use chrono::NaiveDate;
use dashmap::DashMap;

use crate::error::RateioError;

/// 单据编号序列来源 (由调用方注入)
///
/// 可替换为持久化序列, 以支持多实例部署。
pub trait SequenceSource: Send + Sync {
    /// 返回指定日期的下一个序号, 每天从 1 开始; 序号用尽时报错, 不回绕
    fn next(&self, date: NaiveDate) -> Result<u32, RateioError>;
}

/// 进程内按日计数器
#[derive(Debug, Default)]
pub struct DailySequence {
    counters: DashMap<NaiveDate, u32>,
}

impl DailySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化的最后一个序号恢复
    pub fn seed(&self, date: NaiveDate, last: u32) {
        self.counters.insert(date, last);
    }
}

impl SequenceSource for DailySequence {
    fn next(&self, date: NaiveDate) -> Result<u32, RateioError> {
        let mut entry = self.counters.entry(date).or_insert(0);
        let next = entry
            .checked_add(1)
            .ok_or_else(|| RateioError::SequenceExhausted(date.to_string()))?;
        *entry = next;
        Ok(next)
    }
}

/// 行程编号: YYYYMMDD-NNNN
pub fn format_trip_number(date: NaiveDate, seq: u32) -> String {
    format!("{}-{:04}", date.format("%Y%m%d"), seq)
}
