//! 频道列表提取模块
//!
//! 从门户首页解析频道列表。频道容器缺失时整个提取失败；
//! 单个频道缺少链接或图标时跳过该频道，不影响其他频道。

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use common::{BASE_URL, ChannelRecord, Document, Extractor, ScrapeError, ScrapeResult, join_base, selector};

mod tests;

/// 频道列表容器的 class
///
/// 只取第一个带此 class 的元素作为容器，它的每个直接子元素是一个频道；
/// 其余同 class 的元素不会被当作频道。
pub const CONTAINER_CLASS: &str = "all_tv";

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| selector(&format!(".{}", CONTAINER_CLASS)));
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static ICON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("img"));

const LINK_ATTR: &str = "href";
const ICON_ATTR: &str = "src";

/// 频道列表提取器
#[derive(Debug, Clone)]
pub struct ChannelListExtractor {
    base_url: String,
}

impl Default for ChannelListExtractor {
    fn default() -> Self {
        Self::new(BASE_URL)
    }
}

impl ChannelListExtractor {
    /// `base_url` 既是频道列表页地址，也是拼接相对地址的根
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// 频道列表页地址
    pub fn index_url(&self) -> &str {
        &self.base_url
    }

    /// 解析单个频道，缺少必要信息时返回 `None`
    fn parse_channel(&self, element: ElementRef<'_>) -> Option<ChannelRecord> {
        let name = own_text(element);

        let Some(link) = element
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr(LINK_ATTR))
        else {
            log::debug!("Found channel element without link: {}", element.html());
            return None;
        };

        let Some(icon) = element
            .select(&ICON_SELECTOR)
            .next()
            .and_then(|img| img.value().attr(ICON_ATTR))
        else {
            log::debug!("Found channel element without icon: {}", element.html());
            return None;
        };

        Some(ChannelRecord::new(
            name,
            join_base(&self.base_url, link),
            join_base(&self.base_url, icon),
        ))
    }
}

impl Extractor for ChannelListExtractor {
    type Output = Vec<ChannelRecord>;

    fn name(&self) -> &'static str {
        "ChannelList"
    }

    fn extract(&self, document: &Document) -> ScrapeResult<Vec<ChannelRecord>> {
        let html = document.html();

        let container = html.select(&CONTAINER_SELECTOR).next().ok_or_else(|| {
            log::error!("Scraping didn't find the channel list container");
            ScrapeError::structural(format!("no element with class {:?}", CONTAINER_CLASS))
        })?;

        let channels: Vec<ChannelRecord> = container
            .child_elements()
            .filter_map(|element| self.parse_channel(element))
            .collect();

        log::debug!("Parsed {} channels from {}", channels.len(), document.url);
        Ok(channels)
    }
}

/// 元素自身的文本（不含子元素中的文本），空白折叠为单个空格
pub fn own_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect();

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按名称查找频道，忽略大小写
pub fn find_by_name<'a>(channels: &'a [ChannelRecord], name: &str) -> Option<&'a ChannelRecord> {
    let wanted = name.trim().to_lowercase();
    channels.iter().find(|c| c.name.to_lowercase() == wanted)
}
