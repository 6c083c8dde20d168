pub mod signal_proc;
pub mod event_sub;
pub mod ws;

use std::sync::Arc;
use std::vec::Vec;

use log::info;
use tokio::sync::watch::Receiver;
use tokio::task::JoinHandle as TkJoinHandle;

use crate::app_ctx::AppCtx;

/// 退出信号的值
pub const EXIT_SIGNAL: i64 = 100;

pub trait Service {
    fn run(self, rx: Receiver<i64>) -> TkJoinHandle<()>;
}

pub struct ServiceRepo {
    app_ctx: Arc<AppCtx>,
    handlers: Vec<TkJoinHandle<()>>,
}

impl ServiceRepo {
    pub fn new(app_ctx: Arc<AppCtx>) -> Self {
        ServiceRepo {
            app_ctx,
            handlers: Vec::new(),
        }
    }

    pub fn start_service(&mut self, s: impl Service) {
        let rx = self.app_ctx.exit_rx.clone();
        self.handlers.push(s.run(rx));
    }

    pub async fn join(self) {
        for h in self.handlers {
            let _ = h.await;
            info!("repo  handle joined.")
        }
    }
}

/// 等待退出信号, 发送端关闭也算退出
pub async fn wait_exit(rx: &mut Receiver<i64>) {
    loop {
        if *rx.borrow() == EXIT_SIGNAL {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
