use std::collections::HashMap;

use actix_web::web;
use log::{error, info};

use lpr_base::model::returndata::{self, ReturnDataType};

use crate::dash::mg3000;
use crate::services::ws::Mg3000Saved;
use crate::web::AppState;

/// 保存 mg3000 的 4 个通道, 提示通过 snackbar 推送
pub async fn save(app_state: web::Data<AppState>, form: web::Form<HashMap<String, String>>) -> ReturnDataType<String> {
    let list = mg3000::from_form(&form);

    match app_state.ctx.api.save_mg3000_config(&list).await {
        Ok(msg) => {
            info!("mg3000_ctl, saved, {:?}", msg.message);
            app_state.worker.do_send(Mg3000Saved { list, ok: true });
            returndata::success_str("")
        }
        Err(e) => {
            error!("error, mg3000_ctl, save, {}", e);
            app_state.worker.do_send(Mg3000Saved { list, ok: false });
            returndata::fail(&e.to_string())
        }
    }
}
