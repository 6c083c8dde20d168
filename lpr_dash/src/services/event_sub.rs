use std::sync::Arc;
use std::time::Duration;

use actix::Recipient;
use actix_web::rt;
use awc::ws;
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::watch::Receiver;
use tokio::task::JoinHandle as TkJoinHandle;

use lpr_base::api::push::{self, Frame, PushEvent};

use crate::app_ctx::AppCtx;
use crate::error::{AppError, AppResult};
use crate::services::{Service, wait_exit};
use crate::services::ws::PushMessage;

/// 收到一帧之后要做的事
#[derive(Debug, PartialEq)]
pub enum FrameAction {
    Reply(&'static str),
    Deliver(PushEvent),
    Close,
    Ignore,
}

/// 订阅识别服务的推送, 转给 DashWorker
/// 断开后按 reconnect_secs 重连
pub struct EventSubSvc {
    ctx: Arc<AppCtx>,
    worker: Recipient<PushMessage>,
}

impl EventSubSvc {
    pub fn new(ctx: Arc<AppCtx>, worker: Recipient<PushMessage>) -> Self {
        EventSubSvc {
            ctx,
            worker,
        }
    }

    async fn subscribe(&self) -> AppResult<()> {
        let url = self.ctx.cfg.upstream.event_url.as_str();
        info!("EventSubSvc, connect {}", url);

        let (resp, mut conn) = awc::Client::new()
            .ws(url)
            .connect()
            .await
            .map_err(AppError::from_debug)?;
        info!("EventSubSvc, connected, status: {}", resp.status());

        while let Some(frame) = conn.next().await {
            let frame = frame.map_err(AppError::from_debug)?;

            let action = match frame {
                ws::Frame::Text(bytes) => on_text(&String::from_utf8_lossy(&bytes))?,
                ws::Frame::Ping(bytes) => {
                    conn.send(ws::Message::Pong(bytes)).await.map_err(AppError::from_debug)?;
                    FrameAction::Ignore
                }
                ws::Frame::Close(reason) => {
                    info!("EventSubSvc, server closed, {:?}", reason);
                    FrameAction::Close
                }
                _ => FrameAction::Ignore,
            };

            match action {
                FrameAction::Reply(text) => {
                    conn.send(ws::Message::Text(text.into())).await.map_err(AppError::from_debug)?;
                }
                FrameAction::Deliver(ev) => self.worker.do_send(PushMessage(ev)),
                FrameAction::Close => return Ok(()),
                FrameAction::Ignore => {}
            }
        }

        Ok(())
    }
}

/// 处理一帧文本, 不认识的事件和格式错误的内容只记日志
pub fn on_text(text: &str) -> AppResult<FrameAction> {
    let action = match push::parse_frame(text) {
        Frame::Open(v) => {
            debug!("EventSubSvc, open: {}", v);
            FrameAction::Reply(push::SIO_CONNECT)
        }
        Frame::Ping => FrameAction::Reply(push::EIO_PONG),
        Frame::Connected => {
            info!("EventSubSvc, namespace connected");
            FrameAction::Ignore
        }
        Frame::Close | Frame::Disconnected => FrameAction::Close,
        Frame::ConnectError(v) => {
            return Err(AppError::new(&format!("connect error: {}", v)));
        }
        Frame::Event { name, payload } => {
            match PushEvent::decode(&name, payload) {
                Ok(Some(ev)) => FrameAction::Deliver(ev),
                Ok(None) => {
                    warn!("EventSubSvc, unknown event: {}", name);
                    FrameAction::Ignore
                }
                Err(e) => {
                    error!("error, EventSubSvc, decode {}, {}", name, e);
                    FrameAction::Ignore
                }
            }
        }
        Frame::Pong | Frame::Noop => FrameAction::Ignore,
        Frame::Unknown(v) => {
            debug!("EventSubSvc, unknown frame: {}", v);
            FrameAction::Ignore
        }
    };
    Ok(action)
}

impl Service for EventSubSvc {
    fn run(self, rx: Receiver<i64>) -> TkJoinHandle<()> {
        let mut exit_rx = rx;
        let reconnect = Duration::from_secs(self.ctx.cfg.upstream.reconnect_secs.max(1));

        // awc 不是 Send, 跑在 actix 的本地任务里
        rt::spawn(async move {
            loop {
                tokio::select! {
                    _ = wait_exit(&mut exit_rx) => {
                        info!("EventSubSvc recv exit");
                        break;
                    }
                    res = self.subscribe() => {
                        match res {
                            Ok(_) => info!("EventSubSvc, connection closed"),
                            Err(e) => error!("error, EventSubSvc, {}", e),
                        }
                    }
                }

                tokio::select! {
                    _ = wait_exit(&mut exit_rx) => {
                        info!("EventSubSvc recv exit");
                        break;
                    }
                    _ = tokio::time::sleep(reconnect) => {
                        debug!("EventSubSvc, reconnect");
                    }
                }
            }
            info!("EventSubSvc exit.");
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_io_handshake() {
        assert_eq!(on_text(r#"0{"sid":"abc","pingInterval":25000}"#).unwrap(), FrameAction::Reply("40"));
        assert_eq!(on_text("2").unwrap(), FrameAction::Reply("3"));
        assert_eq!(on_text("40").unwrap(), FrameAction::Ignore);
        assert_eq!(on_text("41").unwrap(), FrameAction::Close);
        assert_eq!(on_text("1").unwrap(), FrameAction::Close);
        assert!(on_text(r#"44{"message":"not authorized"}"#).is_err());
    }

    #[test]
    fn events_are_delivered() {
        let action = on_text(r#"42["process-stopped",{"ip":"10.0.0.3"}]"#).unwrap();
        assert_eq!(action, FrameAction::Deliver(PushEvent::ProcessStopped { ip: "10.0.0.3".to_string() }));

        let action = on_text(r#"{"event":"process-started","data":{"ip":"10.0.0.4"}}"#).unwrap();
        assert_eq!(action, FrameAction::Deliver(PushEvent::ProcessStarted { ip: "10.0.0.4".to_string() }));
    }

    #[test]
    fn unknown_and_malformed_are_ignored() {
        assert_eq!(on_text(r#"42["camera-moved",{}]"#).unwrap(), FrameAction::Ignore);
        assert_eq!(on_text(r#"42["process-started",{"addr":1}]"#).unwrap(), FrameAction::Ignore);
        assert_eq!(on_text("garbage").unwrap(), FrameAction::Ignore);
    }
}
