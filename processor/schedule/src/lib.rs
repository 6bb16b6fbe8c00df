//! 节目单提取模块
//!
//! # 模块结构
//!
//! - [`timeline`] - 根据当前时间标记已播 / 正在播 / 未播的节目

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use common::{Document, Extractor, ProgramEntry, ScrapeError, ScrapeResult, selector};

pub mod timeline;

pub use timeline::{ShowState, Timeline, timeline};

/// 节目单容器的 class
pub const CONTAINER_CLASS: &str = "epg_prog";
/// 节目时间元素的 class
pub const TIME_CLASS: &str = "time";
/// 节目名称元素的 class
pub const NAME_CLASS: &str = "prname2";

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| selector(&format!(".{}", CONTAINER_CLASS)));
static ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static TIME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector(&format!(".{}", TIME_CLASS)));
static NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector(&format!(".{}", NAME_CLASS)));

/// 节目单提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgramScheduleExtractor;

impl ProgramScheduleExtractor {
    /// 解析单个节目，信息缺失或时间格式错误时返回 `None`
    fn parse_program(item: ElementRef<'_>) -> Option<ProgramEntry> {
        let time = item.select(&TIME_SELECTOR).next();
        let name = item.select(&NAME_SELECTOR).next();

        let (Some(time), Some(name)) = (time, name) else {
            log::warn!("Some information about the program is missing");
            return None;
        };

        let time = element_text(time);
        let name = element_text(name);

        match ProgramEntry::new(name, time) {
            Ok(program) => Some(program),
            Err(e) => {
                log::warn!("Skipping program: {}", e);
                None
            }
        }
    }
}

impl Extractor for ProgramScheduleExtractor {
    type Output = Vec<ProgramEntry>;

    fn name(&self) -> &'static str {
        "ChannelProgram"
    }

    fn extract(&self, document: &Document) -> ScrapeResult<Vec<ProgramEntry>> {
        let html = document.html();

        let container = html
            .select(&CONTAINER_SELECTOR)
            .next()
            .ok_or_else(|| ScrapeError::structural("no program table was found"))?;

        let programs: Vec<ProgramEntry> = container
            .select(&ITEM_SELECTOR)
            .filter_map(Self::parse_program)
            .collect();

        log::debug!("Parsed {} programs from {}", programs.len(), document.url);
        Ok(programs)
    }
}

/// 元素的全部文本，空白折叠为单个空格
fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
