#![allow(dead_code)]

use std::fmt::{self, Debug, Display};

use lpr_base::api::ApiError;

#[derive(Debug)]
pub struct AppError {
    pub msg: String
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn new(s: &str) -> Self {
        AppError {
            msg: s.to_string()
        }
    }

    pub fn from_debug<T>(t: T) -> Self
        where T: Debug {
        AppError { msg: format!("{:?}", t) }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError {
            msg: format!("{}", e),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError {
            msg: format!("{}", e),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError {
            msg: format!("{}", e),
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(e: tera::Error) -> Self {
        // tera 的错误链里才有具体原因
        let mut msg = format!("{}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(s) = source {
            msg.push_str(&format!(", {}", s));
            source = s.source();
        }
        AppError { msg }
    }
}

impl From<actix::MailboxError> for AppError {
    fn from(e: actix::MailboxError) -> Self {
        AppError {
            msg: format!("{}", e),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError {
            msg: format!("{}", e),
        }
    }
}
