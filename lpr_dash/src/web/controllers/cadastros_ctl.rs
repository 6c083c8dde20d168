use actix_web::web;
use log::{debug, error};
use serde::Deserialize;

use lpr_base::model::returndata::{self, ReturnDataType};

use crate::dash::cadastros::CadastroFilter;
use crate::services::ws::{CadastrosAction, CadastrosCmd};
use crate::web::AppState;

#[derive(Deserialize, Debug)]
pub struct FilterFormData {
    pub name: Option<String>,
    pub group: Option<String>,
    pub unit: Option<String>,
}

async fn send_cmd(app_state: &AppState, cmd: CadastrosCmd) -> ReturnDataType<bool> {
    debug!("cadastros_ctl, {:?}", cmd);

    match app_state.worker.send(CadastrosAction(cmd)).await {
        Ok(v) => returndata::success(v),
        Err(e) => {
            error!("error, cadastros_ctl, {}", e);
            returndata::fail(&e.to_string())
        }
    }
}

pub async fn filter(app_state: web::Data<AppState>, form: web::Form<FilterFormData>) -> ReturnDataType<bool> {
    let form = form.into_inner();
    let filter = CadastroFilter {
        name: form.name.unwrap_or_default(),
        group: form.group.unwrap_or_default(),
        unit: form.unit.unwrap_or_default(),
    };

    send_cmd(&app_state, CadastrosCmd::Filter(filter)).await
}

pub async fn clear(app_state: web::Data<AppState>) -> ReturnDataType<bool> {
    send_cmd(&app_state, CadastrosCmd::Clear).await
}

pub async fn toggle(app_state: web::Data<AppState>, index: web::Path<usize>) -> ReturnDataType<bool> {
    send_cmd(&app_state, CadastrosCmd::Toggle(index.into_inner())).await
}
