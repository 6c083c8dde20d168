use std::sync::Arc;

use actix::Addr;

use crate::app_ctx::AppCtx;
use crate::dash::render::Views;
use crate::services::ws::worker::DashWorker;

pub mod server;
pub mod router;
pub mod controllers;

pub struct AppState {
    pub ctx: Arc<AppCtx>,
    pub worker: Addr<DashWorker>,

    pub views: Views,
}

impl AppState {
    pub fn new(ctx: Arc<AppCtx>, worker: Addr<DashWorker>, views: Views) -> Self {
        AppState {
            ctx,
            worker,
            views,
        }
    }
}
