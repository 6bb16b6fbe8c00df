//! 节目时间线
//!
//! 节目单按页面顺序排列，默认是一天内的时间顺序，最多跨一次午夜。

use serde::Serialize;

use common::{MINUTES_PER_DAY, ProgramEntry};

/// 节目相对当前时间的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShowState {
    Passed,
    Showing,
    Future,
}

impl std::fmt::Display for ShowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Showing => write!(f, "now"),
            Self::Future => write!(f, "upcoming"),
        }
    }
}

/// 每个节目的状态，以及正在播出的节目下标
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Timeline {
    pub states: Vec<ShowState>,
    pub showing: Option<usize>,
}

/// 计算节目单在 `hour:minute` 时刻的时间线
pub fn timeline(programs: &[ProgramEntry], hour: u32, minute: u32) -> Timeline {
    let Some(first) = programs.first() else {
        return Timeline::default();
    };

    let mut now = hour * 60 + minute;

    // 第一个节目比现在还晚，说明已经过了午夜
    if first.compact_time(false) > now {
        now += MINUTES_PER_DAY;
    }

    let mut states = vec![ShowState::Passed; programs.len()];
    let mut showing = None;
    let mut next_day = false;

    for i in 1..programs.len() {
        next_day |= programs[i].compact_time(false) < programs[i - 1].compact_time(false);

        if showing.is_some() {
            states[i] = ShowState::Future;
        } else if now >= programs[i].compact_time(next_day) {
            states[i] = ShowState::Passed;
        } else {
            showing = Some(i - 1);
            states[i - 1] = ShowState::Showing;
            states[i] = ShowState::Future;
        }
    }

    // 没有找到，说明最后一个节目正在播出
    if showing.is_none() {
        let last = programs.len() - 1;
        states[last] = ShowState::Showing;
        showing = Some(last);
    }

    Timeline { states, showing }
}
