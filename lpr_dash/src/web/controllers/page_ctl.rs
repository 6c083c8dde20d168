use actix_web::{HttpResponse, Result, web};
use log::{debug, error};

use lpr_base::api::ApiResult;
use lpr_base::api::lpr_api::LprApi;

use crate::dash::session::Page;
use crate::error::AppResult;
use crate::services::ws::{CurrentView, LoadView, ViewData};
use crate::web::AppState;

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html;charset=utf-8").body(body)
}

fn render_result(res: AppResult<String>) -> HttpResponse {
    match res {
        Ok(v) => html_response(v),
        Err(e) => {
            error!("error, page_ctl, {}", e);
            HttpResponse::InternalServerError().content_type("text/html;charset=utf-8").body("template error")
        }
    }
}

/// 整体框架, 默认显示 cadastros
pub async fn index(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(render_result(app_state.views.layout(Page::Cadastros)))
}

pub async fn current(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let res = match app_state.worker.send(CurrentView).await {
        Ok(v) => v,
        Err(e) => Err(e.into()),
    };
    Ok(render_result(res))
}

/// 切换页面, 先取数据再交给 worker
pub async fn view(app_state: web::Data<AppState>, page: web::Path<String>) -> Result<HttpResponse> {
    let page = match Page::from_name(&page) {
        Some(v) => v,
        None => return Ok(HttpResponse::NotFound().finish()),
    };

    let data = load_view_data(&app_state.ctx.api, page).await;
    let res = match app_state.worker.send(LoadView { page, data }).await {
        Ok(v) => v,
        Err(e) => Err(e.into()),
    };
    Ok(render_result(res))
}

async fn load_view_data(api: &LprApi, page: Page) -> ViewData {
    let res = match page {
        Page::Cadastros => load_cadastros(api).await,
        Page::Settings => load_settings(api).await,
        Page::Control => load_control(api).await,
    };

    match res {
        Ok(v) => v,
        Err(e) => {
            error!("error, page_ctl, load {}, {}", page.name(), e);
            ViewData::Failed
        }
    }
}

async fn load_cadastros(api: &LprApi) -> ApiResult<ViewData> {
    let (records, status) = futures::try_join!(api.plates(), api.process_status())?;
    debug!("page_ctl, cadastros, records: {}", records.len());

    Ok(ViewData::Cadastros {
        records,
        running_ips: status.running_ips,
    })
}

async fn load_settings(api: &LprApi) -> ApiResult<ViewData> {
    let (cameras, status, mg3000) = futures::try_join!(
        api.settings(), api.process_status(), api.mg3000_config())?;
    debug!("page_ctl, settings, cameras: {}", cameras.len());

    Ok(ViewData::Settings {
        cameras,
        running_ips: status.running_ips,
        mg3000,
    })
}

/// 某个通道的历史取不到时, 该通道表格为空
async fn load_control(api: &LprApi) -> ApiResult<ViewData> {
    let channels = api.active_channels().await?;

    let fetches = channels.iter().map(|ch| async move {
        (ch.number, api.events(ch.number).await)
    });

    let mut histories = Vec::with_capacity(channels.len());
    for (number, res) in futures::future::join_all(fetches).await {
        match res {
            Ok(list) => histories.push((number, list)),
            Err(e) => error!("error, page_ctl, events channel {}, {}", number, e),
        }
    }

    Ok(ViewData::Control {
        channels,
        histories,
    })
}
