//! 播放器密钥配置
//!
//! 密钥由外部提供，顺序有意义。任何时候都不输出密钥明文。

use anyhow::{Context, Result};
use std::path::Path;

use common::get_env_var;

/// 存放密钥 JSON 数组的环境变量
pub const KEYS_ENV_VAR: &str = "VIKSTV_KEYS";

/// 按配置顺序排列的播放器密钥
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PlayerKeys {
    keys: Vec<String>,
}

impl std::fmt::Debug for PlayerKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerKeys")
            .field("count", &self.keys.len())
            .finish()
    }
}

impl PlayerKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// 从 JSON 字符串数组解析
    pub fn from_json(text: &str) -> Result<Self> {
        let keys: Vec<String> =
            serde_json::from_str(text).context("keys must be a JSON array of strings")?;
        Ok(Self { keys })
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read keys file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid keys file {}", path.display()))
    }

    /// 从环境变量读取，缺失或格式错误时返回空密钥
    pub fn from_env() -> Self {
        let Some(text) = get_env_var(KEYS_ENV_VAR) else {
            log::error!("Keys not found: {} is not set", KEYS_ENV_VAR);
            return Self::default();
        };

        Self::from_json(&text).unwrap_or_else(|e| {
            log::error!("Keys not loaded from {}: {:#}", KEYS_ENV_VAR, e);
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }
}
