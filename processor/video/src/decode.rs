//! PlayerJS 链接解码
//!
//! 播放器把视频地址做了两次 "base64 + 插入密钥" 的混淆，
//! 解码时每一轮都要去掉前两个字符、按**倒序**移除编码后的密钥，再做 base64 解码。
//! 参见 <https://playerjs.com/docs/en=encodingbase64>

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::{DecodePaddingMode, Engine as _};

use common::{ScrapeError, ScrapeResult};

/// 解码轮数
pub const DECODE_PASSES: usize = 2;

/// 每轮开头需要丢弃的字符数
const PREFIX_LEN: usize = 2;

/// 解码时 padding 可有可无，最后一个字符多余的低位忽略
const DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// 地址中的占位符
pub const PLACEHOLDER_KODK: &str = "{v1}";
pub const PLACEHOLDER_KOS: &str = "{v2}";

/// 密钥在混淆串中的形式：`"F" + base64(key)`
pub fn encode_key(key: &str) -> String {
    format!("F{}", STANDARD.encode(key.as_bytes()))
}

pub fn encode_keys<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    keys.iter().map(|k| encode_key(k.as_ref())).collect()
}

/// 单轮解码
pub fn decode_pass(payload: &str, encoded_keys: &[String]) -> ScrapeResult<String> {
    if payload.chars().count() < PREFIX_LEN {
        return Err(ScrapeError::format(format!(
            "obfuscated payload is shorter than {} characters",
            PREFIX_LEN
        )));
    }
    let offset = payload
        .char_indices()
        .nth(PREFIX_LEN)
        .map_or(payload.len(), |(i, _)| i);

    let mut stripped = payload[offset..].to_string();
    for key in encoded_keys.iter().rev() {
        stripped = stripped.replace(key.as_str(), "");
    }

    let bytes = DECODER
        .decode(stripped.as_bytes())
        .map_err(|e| ScrapeError::format(format!("decoding the payload didn't yield base64: {}", e)))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 完整解码：连续解码两轮
pub fn deobfuscate(payload: &str, encoded_keys: &[String]) -> ScrapeResult<String> {
    (0..DECODE_PASSES).try_fold(payload.to_string(), |current, _| {
        decode_pass(&current, encoded_keys)
    })
}

/// 把占位符替换为页面中取到的参数
pub fn fill_placeholders(address: &str, kodk: &str, kos: &str) -> String {
    address
        .replace(PLACEHOLDER_KODK, kodk)
        .replace(PLACEHOLDER_KOS, kos)
}
