use std::time::Duration;

use tokio::sync::watch::Receiver;

use lpr_base::api::lpr_api::LprApi;

use crate::app_cfg::AppCfg;
use crate::error::AppResult;

pub struct AppCtx {
    pub cfg: AppCfg,
    pub exit_rx: Receiver<i64>,

    pub api: LprApi,
}

impl AppCtx {
    pub fn new(cfg: AppCfg, rx: Receiver<i64>) -> AppResult<Self> {
        let timeout = Duration::from_secs(cfg.upstream.request_timeout_secs);
        let api = LprApi::new(&cfg.upstream.api_url, timeout)?;

        Ok(AppCtx {
            cfg,
            exit_rx: rx,
            api,
        })
    }
}
