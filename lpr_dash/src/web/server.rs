use std::sync::Arc;
use std::time::Instant;

use actix::Addr;
use actix_web::{App, HttpServer, rt, web};
use actix_web::dev::Service;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Logger;
use log::{error, info};
use tokio::sync::watch::Receiver;
use tokio::task::JoinHandle as TkJoinHandle;

use crate::app_ctx::AppCtx;
use crate::dash::render::Views;
use crate::error::AppResult;
use crate::services::{Service as CfService, wait_exit};
use crate::services::ws::agent::WsAgent;
use crate::services::ws::worker::DashWorker;
use crate::web::AppState;

use super::router;

pub struct WebServer {
    ctx: Arc<AppCtx>,
    worker: Addr<DashWorker>,
    agent: Addr<WsAgent>,
}

impl WebServer {
    pub fn new(ctx: Arc<AppCtx>, worker: Addr<DashWorker>, agent: Addr<WsAgent>) -> Self {
        WebServer {
            ctx,
            worker,
            agent,
        }
    }

    async fn serve(self, rx: Receiver<i64>) -> AppResult<()> {
        let mut exit_rx = rx;
        let addr = format!("0.0.0.0:{}", self.ctx.cfg.http_port);
        let static_dir = self.ctx.cfg.dash.static_dir.clone();

        let views = Views::new(&self.ctx.cfg.dash.views)?;
        let state = web::Data::new(AppState::new(self.ctx.clone(), self.worker, views));
        let agent = web::Data::new(self.agent);

        let server = HttpServer::new(move || {
            let dir = static_dir.clone();
            App::new().app_data(state.clone())
                .app_data(agent.clone())
                .configure(move |cfg| router::config(cfg, &dir))
                .wrap(Logger::default())
                .wrap_fn(|req, srv| {
                    let ts_start = Instant::now();

                    let fut = srv.call(req);
                    async move {
                        let mut res = fut.await?;
                        let ts_use = ts_start.elapsed().as_millis() as u64;
                        res.headers_mut().insert(
                            HeaderName::from_static("x-lpr-use"),
                            HeaderValue::from(ts_use),
                        );
                        Ok(res)
                    }
                })
        }).disable_signals().bind(&addr)?.run();
        info!("WebServer, listen on {}", addr);

        let handle = server.handle();
        rt::spawn(async move {
            wait_exit(&mut exit_rx).await;
            info!("WebServer recv exit ...");
            handle.stop(true).await;
        });

        server.await?;
        Ok(())
    }
}

impl CfService for WebServer {
    fn run(self, rx: Receiver<i64>) -> TkJoinHandle<()> {
        rt::spawn(async move {
            if let Err(e) = self.serve(rx).await {
                error!("error, WebServer, {}", e);
            }
            info!("WebServer, webserver stopped.");
        })
    }
}
