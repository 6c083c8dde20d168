use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web_actors::ws;
use log::{debug, info};

use super::{SessionConnect, SessionDisconnect, WsMessage};
use super::agent::WsAgent;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

/// 浏览器的 websocket 连接, 只接收 patch
pub struct WsSession {
    pub id: usize,
    pub hb: Instant,
    pub room: String,
    pub addr: Addr<WsAgent>,
}

impl WsSession {
    pub fn new(room: &str, addr: Addr<WsAgent>) -> Self {
        WsSession {
            id: 0,
            hb: Instant::now(),
            room: room.to_string(),
            addr,
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                info!("WS, session:{} heartbeat failed, disconnecting", act.id);
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hb(ctx);

        let addr = ctx.address();
        self.addr
            .send(SessionConnect {
                addr: addr.recipient(),
                room: self.room.clone(),
                id: 0,
            })
            .into_actor(self)
            .then(|res, act, ctx| {
                match res {
                    Ok(id) => act.id = id,
                    _ => ctx.stop(),
                }
                fut::ready(())
            })
            .wait(ctx);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.addr.do_send(SessionDisconnect { id: self.id });
        Running::Stop
    }
}

impl Handler<WsMessage> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: WsMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(v) => v,
            Err(e) => {
                debug!("WS, session:{} protocol error, {:?}", self.id, e);
                ctx.stop();
                return;
            }
        };

        match msg {
            ws::Message::Ping(msg) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            ws::Message::Pong(_) => {
                self.hb = Instant::now();
            }
            ws::Message::Text(text) => {
                // 浏览器只发心跳
                self.hb = Instant::now();
                debug!("WS, session:{} text: {}", self.id, text);
            }
            ws::Message::Binary(_) => {
                debug!("WS, session:{} binary ignored", self.id);
            }
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            ws::Message::Continuation(_) => {
                ctx.stop();
            }
            ws::Message::Nop => {}
        }
    }
}
