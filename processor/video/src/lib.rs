//! 视频地址提取模块
//!
//! 频道页面中的播放器脚本包含一个混淆过的地址和两个参数，
//! 本模块找到该脚本、取出这三个值、解码并拼出最终的播放地址。
//!
//! # 模块结构
//!
//! - [`decode`] - 混淆地址的解码
//! - [`keys`] - 播放器密钥配置

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

use common::{Document, Extractor, ScrapeError, ScrapeResult, selector};

pub mod decode;
pub mod keys;

pub use decode::{decode_pass, deobfuscate, encode_key, encode_keys, fill_placeholders};
pub use keys::{KEYS_ENV_VAR, PlayerKeys};

/// 播放器初始化脚本的标记
pub const SCRIPT_MARKER: &str = "Playerjs";

const PATTERN_KODK: &str = r#"var kodk="([^"]*)";"#;
const PATTERN_KOS: &str = r#"var kos="([^"]*)";"#;
const PATTERN_PLAYERJS: &str = r#"var player=new Playerjs\(\{id:"preroll",file:"([^"]*)"\}\);"#;

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("script"));
static KODK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATTERN_KODK).expect("Invalid kodk regex pattern"));
static KOS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATTERN_KOS).expect("Invalid kos regex pattern"));
static PLAYERJS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATTERN_PLAYERJS).expect("Invalid Playerjs regex pattern"));

/// 视频地址提取器
#[derive(Clone)]
pub struct VideoUrlExtractor {
    encoded_keys: Vec<String>,
}

impl std::fmt::Debug for VideoUrlExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoUrlExtractor")
            .field("keys", &self.encoded_keys.len())
            .finish()
    }
}

impl VideoUrlExtractor {
    pub fn new(keys: &PlayerKeys) -> Self {
        if keys.is_empty() {
            log::warn!("No player keys configured, decoding will most likely fail");
        }

        Self {
            encoded_keys: encode_keys(keys.as_slice()),
        }
    }

    /// 找到负责播放器的脚本
    pub fn find_player_script(document: &Document) -> ScrapeResult<String> {
        let html = document.html();

        html.select(&SCRIPT_SELECTOR)
            .map(|script| script.text().collect::<String>())
            .find(|text| text.contains(SCRIPT_MARKER))
            .ok_or_else(|| {
                ScrapeError::structural("couldn't find script responsible for the video")
            })
    }

    /// 从脚本中取出地址及参数并解码
    pub fn resolve_script(&self, script: &str) -> ScrapeResult<String> {
        let kodk = capture_single(script, &KODK_REGEX)?;
        let kos = capture_single(script, &KOS_REGEX)?;
        let payload = capture_single(script, &PLAYERJS_REGEX)?;

        let address = deobfuscate(payload, &self.encoded_keys)?;
        Ok(fill_placeholders(&address, kodk, kos))
    }
}

impl Extractor for VideoUrlExtractor {
    type Output = String;

    fn name(&self) -> &'static str {
        "ChannelVideoURL"
    }

    fn extract(&self, document: &Document) -> ScrapeResult<String> {
        let script = Self::find_player_script(document)?;
        let address = self.resolve_script(&script)?;
        log::debug!("Resolved video address for {}", document.url);
        Ok(address)
    }
}

/// 用只有一个捕获组的正则匹配文本，返回该捕获组
pub fn capture_single<'t>(text: &'t str, regex: &Regex) -> ScrapeResult<&'t str> {
    // captures_len 包含整体匹配的第 0 组
    if regex.captures_len() != 2 {
        return Err(ScrapeError::format(format!(
            "pattern must capture exactly one group: {}",
            regex.as_str()
        )));
    }

    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ScrapeError::format(format!("no text matches pattern: {}", regex.as_str())))
}
