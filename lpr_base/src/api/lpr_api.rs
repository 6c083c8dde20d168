use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::model::cadastro::UserRecord;
use crate::model::camera::{CameraConfig, Mg3000ChannelConfig, ProcessStatus, StartRecognitionReq, StopRecognitionReq};
use crate::model::detection::{ActiveChannel, DetectionEvent};
use crate::util::utils;

use super::{ApiError, ApiResult};

/// 写操作的返回, 例如 {"message": "Process started"}
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// 识别/配置服务的 REST 接口
#[derive(Clone)]
pub struct LprApi {
    base_url: String,
    client: reqwest::Client,
}

impl LprApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(LprApi {
            base_url: base_url.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn plates(&self) -> ApiResult<Vec<UserRecord>> {
        self.get_json("/plates").await
    }

    pub async fn process_status(&self) -> ApiResult<ProcessStatus> {
        self.get_json("/process-status").await
    }

    pub async fn settings(&self) -> ApiResult<Vec<CameraConfig>> {
        self.get_json("/settings").await
    }

    pub async fn mg3000_config(&self) -> ApiResult<Vec<Mg3000ChannelConfig>> {
        self.get_json("/mg3000-config").await
    }

    /// 4个通道一起提交
    pub async fn save_mg3000_config(&self, list: &[Mg3000ChannelConfig]) -> ApiResult<ApiMessage> {
        self.post_json("/save-mg3000-config", list).await
    }

    pub async fn start_recognition(&self, req: &StartRecognitionReq) -> ApiResult<ApiMessage> {
        self.post_json("/start-recognition", req).await
    }

    pub async fn stop_recognition(&self, ip: &str) -> ApiResult<ApiMessage> {
        let req = StopRecognitionReq {
            ip: ip.to_string(),
        };
        self.post_json("/stop-recognition", &req).await
    }

    pub async fn active_channels(&self) -> ApiResult<Vec<ActiveChannel>> {
        self.get_json("/active-channels").await
    }

    /// 该通道最近的事件(最多20条)
    pub async fn events(&self, channel: u32) -> ApiResult<Vec<DetectionEvent>> {
        self.get_json(&format!("/events/{}", channel)).await
    }

    //-------------------------------------
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = utils::join_url(&self.base_url, path);
        debug!("LprApi, get {}", url);

        let res = self.client.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Status(status.as_u16(), body));
        }

        Ok(res.json::<T>().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
        where B: Serialize + ?Sized,
              T: DeserializeOwned + Default {
        let url = utils::join_url(&self.base_url, path);
        debug!("LprApi, post {}", url);

        let res = self.client.post(&url).json(body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}
