use std::fmt::{self, Display};

pub mod lpr_api;
pub mod push;

#[derive(Debug)]
pub enum ApiError {
    /// 网络/传输错误
    Http(reqwest::Error),
    /// 非 2xx 返回
    Status(u16, String),
    Json(serde_json::Error),
    /// 推送通道协议错误
    Protocol(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "http error, {}", e),
            ApiError::Status(code, body) => write!(f, "http status {}, {}", code, body),
            ApiError::Json(e) => write!(f, "json error, {}", e),
            ApiError::Protocol(s) => write!(f, "protocol error, {}", s),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Json(e)
    }
}
