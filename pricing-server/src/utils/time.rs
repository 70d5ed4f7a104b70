//! 时间工具 — 业务时区时钟
//!
//! 动态定价按营业时区的小时计算，定价规则本身只接收小时数，
//! 时钟在 handler 层读取。

use chrono::{FixedOffset, Offset, Timelike, Utc};

/// 营业时区时钟
///
/// `fixed_hour` 用于测试，设置后 [`BusinessClock::hour`] 始终返回该值。
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    offset: FixedOffset,
    fixed_hour: Option<u32>,
}

impl BusinessClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            fixed_hour: None,
        }
    }

    /// 固定小时的时钟 (0-23，超出范围取模)
    pub fn fixed(hour: u32) -> Self {
        Self {
            offset: Utc.fix(),
            fixed_hour: Some(hour % 24),
        }
    }

    /// 当前营业时区小时 (0-23)
    pub fn hour(&self) -> u32 {
        match self.fixed_hour {
            Some(hour) => hour,
            None => Utc::now().with_timezone(&self.offset).hour(),
        }
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}
