//! 共用类型与工具
//!
//! 包含数据模型、错误类型、节目时间解析、页面获取以及提取器接口，
//! 引擎和各个提取器都依赖这里的定义。
use scraper::Selector;

pub mod error;
pub mod fetch;
pub mod models;
pub mod time;

pub use error::*;
pub use fetch::{DEFAULT_TIMEOUT, Document, Fetcher, HttpFetcher};
pub use models::*;
pub use time::parse_time;

/// 门户站点的根地址
pub const BASE_URL: &str = "http://ip.viks.tv";
pub const GENERAL_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 获取环境变量的值
pub fn get_env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// 把相对地址拼接到根地址上
///
/// 站点给出的都是以 `/` 开头的相对路径，直接拼接即可，不做规范化。
pub fn join_base(base: &str, path: &str) -> String {
    format!("{}{}", base, path)
}

/// 编译固定的 CSS 选择器
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("Invalid selector {:?}: {}", css, e))
}

/// 页面提取器：把获取到的页面转换为结果
///
/// 提取器是无状态的，可以在任意线程上调用。
pub trait Extractor: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    /// 提取器名称，用于日志
    fn name(&self) -> &'static str;

    fn extract(&self, document: &Document) -> ScrapeResult<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_var() {
        unsafe {
            std::env::set_var("VIKSTV_TEST_VAR", "test_value");
        }
        assert_eq!(get_env_var("VIKSTV_TEST_VAR"), Some("test_value".to_string()));
        assert_eq!(get_env_var("VIKSTV_MISSING_VAR"), None);
    }

    #[test]
    fn test_join_base() {
        let test_cases = vec![
            (BASE_URL, "/447-tet_11.html", "http://ip.viks.tv/447-tet_11.html"),
            (
                BASE_URL,
                "/posts/2022-08/1659824773_tet.png",
                "http://ip.viks.tv/posts/2022-08/1659824773_tet.png",
            ),
            ("http://example.com", "", "http://example.com"),
        ];

        for (base, path, expected) in test_cases {
            assert_eq!(join_base(base, path), expected);
        }
    }
}
