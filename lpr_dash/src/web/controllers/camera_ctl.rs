use actix_web::web;
use log::{debug, error, info};

use lpr_base::api::lpr_api::{ApiMessage, LprApi};
use lpr_base::model::camera::StartRecognitionReq;
use lpr_base::model::returndata::{self, ReturnDataType};

use crate::dash::camera::Pending;
use crate::dash::session::CameraCommand;
use crate::error::{AppError, AppResult};
use crate::services::ws::{CameraClick, CameraRequestFailed};
use crate::web::AppState;

/// 播放按钮, 结果通过推送的 process-started / process-stopped 确认
pub async fn toggle(app_state: web::Data<AppState>, index: web::Path<usize>) -> ReturnDataType<String> {
    let index = index.into_inner();

    let cmd = match app_state.worker.send(CameraClick { index }).await {
        Ok(Some(v)) => v,
        Ok(None) => {
            debug!("camera_ctl, click {} ignored", index);
            return returndata::fail("camera busy or not found");
        }
        Err(e) => {
            error!("error, camera_ctl, {}", e);
            return returndata::fail(&e.to_string());
        }
    };

    match send_command(&app_state.ctx.api, &cmd).await {
        Ok(msg) => {
            info!("camera_ctl, {:?} {}, {:?}", cmd.pending, cmd.ip, msg.message);
            returndata::success_str(msg.message.as_deref().unwrap_or(""))
        }
        Err(e) => {
            error!("error, camera_ctl, {:?} {}, {}", cmd.pending, cmd.ip, e);
            let msg = e.to_string();
            app_state.worker.do_send(CameraRequestFailed(cmd));
            returndata::fail(&msg)
        }
    }
}

/// 按下标重新取摄像头配置, 再发送 start / stop
async fn send_command(api: &LprApi, cmd: &CameraCommand) -> AppResult<ApiMessage> {
    let cameras = api.settings().await?;
    let camera = cameras.get(cmd.index)
        .ok_or_else(|| AppError::new(&format!("camera {} not found", cmd.index)))?;

    let msg = match cmd.pending {
        Pending::Start => api.start_recognition(&StartRecognitionReq::from(camera)).await?,
        Pending::Stop => api.stop_recognition(&camera.equip_add).await?,
    };
    Ok(msg)
}
