use std::fs::File;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const SOCKET_IO_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

#[derive(Serialize, Deserialize, Debug)]
pub struct AppCfgVersion {
    pub product: String,
    pub ver: String,
    pub api_ver: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AppCfgLog {
    pub file: String,
    pub level: String,
    pub lib_level: String,
}

/// 识别/配置服务
#[derive(Serialize, Deserialize, Debug)]
pub struct AppCfgUpstream {
    pub api_url: String,

    /// 为空时由 api_url 推导
    #[serde(default)]
    pub event_url: String,

    pub request_timeout_secs: u64,

    /// 推送通道断开后重连间隔
    pub reconnect_secs: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AppCfgDash {
    /// 启动/停止后等待确认事件的超时, 0 表示一直等待
    pub loading_timeout_secs: u64,

    pub views: String,
    pub static_dir: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AppCfg {
    pub version: AppCfgVersion,
    pub log: AppCfgLog,

    pub http_port: u16,

    pub upstream: AppCfgUpstream,
    pub dash: AppCfgDash,
}

impl AppCfg {
    pub fn load(path: &str) -> AppResult<AppCfg> {
        let f = File::open(path)?;
        let cfg = serde_json::from_reader(f)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        let api_url = &self.upstream.api_url;
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::new(&format!("invalid upstream.api_url: {}", api_url)));
        }

        let event_url = &self.upstream.event_url;
        if !event_url.starts_with("ws://") && !event_url.starts_with("wss://") {
            return Err(AppError::new(&format!("invalid upstream.event_url: {}", event_url)));
        }

        if self.http_port == 0 {
            return Err(AppError::new("invalid http_port"));
        }
        Ok(())
    }

    pub fn replace_var(&mut self) {
        if self.upstream.event_url.trim().is_empty() {
            self.upstream.event_url = derive_event_url(&self.upstream.api_url);
        }
    }
}

/// http://h:3000 -> ws://h:3000/socket.io/?EIO=4&transport=websocket
fn derive_event_url(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}{}", base, SOCKET_IO_PATH)
}
