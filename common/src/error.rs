//! 抓取过程的错误类型定义

/// 传输层错误（网络 / 协议）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 地址格式错误
    MalformedUrl(String),
    /// 服务器返回非成功状态码
    HttpStatus { status: u16, url: String },
    /// 不支持的内容类型
    UnsupportedContentType(String),
    /// 请求超时
    Timeout(String),
    /// 其他 I/O 错误
    Io(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedUrl(url) => write!(f, "malformed url: {}", url),
            Self::HttpStatus { status, url } => write!(f, "HTTP error {} fetching {}", status, url),
            Self::UnsupportedContentType(ct) => write!(f, "unsupported content type: {}", ct),
            Self::Timeout(msg) => write!(f, "request timed out: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout(error.to_string());
        }
        if let Some(status) = error.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                url: error.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if error.is_builder() {
            return Self::MalformedUrl(error.to_string());
        }
        Self::Io(error.to_string())
    }
}

impl From<url::ParseError> for TransportError {
    fn from(error: url::ParseError) -> Self {
        Self::MalformedUrl(error.to_string())
    }
}

/// 一次抓取（请求 + 提取）可能产生的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// 获取页面失败
    Transport(TransportError),
    /// 页面中缺少必需的容器 / 元素
    Structural(String),
    /// 值存在但格式不符
    Format(String),
    /// 提取器异常中止（panic）
    Aborted(String),
}

impl ScrapeError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "fetch failed: {}", e),
            Self::Structural(msg) => write!(f, "page structure not recognised: {}", msg),
            Self::Format(msg) => write!(f, "unexpected format: {}", msg),
            Self::Aborted(msg) => write!(f, "extractor aborted: {}", msg),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for ScrapeError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
