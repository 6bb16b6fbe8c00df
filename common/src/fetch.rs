//! 页面获取
//!
//! [`Fetcher`] 只负责把地址变成页面文本，解析 DOM 交给各个提取器。

use scraper::Html;
use std::time::Duration;
use url::Url;

use crate::GENERAL_UA;
use crate::error::TransportError;

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 已获取的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: String,
    pub body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// 把页面文本解析为 HTML 文档
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// 页面获取器
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, TransportError>;
}

/// 基于 reqwest 的页面获取器
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    ignore_content_type: bool,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(GENERAL_UA)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Io(e.to_string()))?;

        Ok(Self {
            client,
            ignore_content_type: true,
        })
    }

    /// 是否接受任意内容类型（默认接受）
    pub fn ignore_content_type(mut self, ignore: bool) -> Self {
        self.ignore_content_type = ignore;
        self
    }
}

/// 判断内容类型是否为可解析的文本页面
pub fn is_supported_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.starts_with("text/") || content_type.contains("html") || content_type.contains("xml")
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, TransportError> {
        let parsed = Url::parse(url)?;

        log::debug!("Fetching page: {}", parsed);
        let response = self.client.get(parsed).send().await.map_err(|e| {
            log::warn!("Request to {} failed: {}", url, e);
            TransportError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Request to {} returned HTTP {}", url, status);
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if !self.ignore_content_type {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|ct| ct.to_str().ok())
                .unwrap_or("application/octet-stream")
                .to_string();

            if !is_supported_content_type(&content_type) {
                log::warn!("Unsupported content type from {}: {}", url, content_type);
                return Err(TransportError::UnsupportedContentType(content_type));
            }
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        log::debug!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(Document::new(final_url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_content_types() {
        assert!(is_supported_content_type("text/html; charset=utf-8"));
        assert!(is_supported_content_type("TEXT/PLAIN"));
        assert!(is_supported_content_type("application/xhtml+xml"));
        assert!(!is_supported_content_type("image/png"));
        assert!(!is_supported_content_type("application/octet-stream"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_url() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(TransportError::MalformedUrl(_))));
    }

    #[test]
    fn test_document_html() {
        let document = Document::new("http://example.com", "<p class=\"x\">hi</p>");
        let html = document.html();
        let selector = scraper::Selector::parse("p.x").unwrap();
        assert_eq!(html.select(&selector).count(), 1);
    }

    /// 本地 HTTP 服务，对每个连接都返回一张 PNG 响应
    async fn serve_png() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let response = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc";
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}/icon.png", address)
    }

    #[tokio::test]
    async fn test_content_type_check() {
        let url = serve_png().await;

        let document = HttpFetcher::new().unwrap().fetch(&url).await.unwrap();
        assert_eq!(document.body, "abc");

        let strict = HttpFetcher::new().unwrap().ignore_content_type(false);
        let result = strict.fetch(&url).await;
        assert_eq!(
            result,
            Err(TransportError::UnsupportedContentType("image/png".to_string()))
        );
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn test_fetch_live_index() {
        let fetcher = HttpFetcher::new().unwrap();
        let document = fetcher.fetch(crate::BASE_URL).await.unwrap();
        println!("Fetched {} bytes from {}", document.body.len(), document.url);
        assert!(!document.body.is_empty());
    }
}
