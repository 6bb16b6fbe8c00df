use serde::Serialize;
use std::sync::Arc;

use crate::error::{ScrapeError, ScrapeResult};
use crate::time::parse_time;

/// 频道信息
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChannelRecord {
    /// 频道名称，可能是任意文字
    pub name: String,
    /// 频道页面的绝对地址
    pub page_address: String,
    /// 频道图标的绝对地址
    pub icon_address: String,
}

impl ChannelRecord {
    pub fn new(
        name: impl Into<String>,
        page_address: impl Into<String>,
        icon_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            page_address: page_address.into(),
            icon_address: icon_address.into(),
        }
    }
}

/// 一天的分钟数
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// 节目单条目
///
/// 只能通过 [`ProgramEntry::new`] 构造，时间格式不合法时不会产生条目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramEntry {
    name: String,
    time_text: String,
    hour: u8,
    minute: u8,
}

impl ProgramEntry {
    pub fn new(name: impl Into<String>, time_text: impl Into<String>) -> ScrapeResult<Self> {
        let time_text = time_text.into();
        let (hour, minute) = parse_time(&time_text)?;

        Ok(Self {
            name: name.into(),
            time_text,
            hour,
            minute,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 原始时间文本，`HH:MM`
    pub fn time_text(&self) -> &str {
        &self.time_text
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// 以分钟表示的开始时间；`next_day` 为真时加上一整天
    pub fn compact_time(&self, next_day: bool) -> u32 {
        let minutes = self.hour as u32 * 60 + self.minute as u32;
        if next_day {
            minutes + MINUTES_PER_DAY
        } else {
            minutes
        }
    }
}

/// 一次抓取的结果，是引擎传给监听者的唯一值
pub type ScrapeOutcome<T> = std::result::Result<Arc<T>, ScrapeError>;
