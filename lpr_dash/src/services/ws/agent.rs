use std::collections::{HashMap, HashSet};

use actix::prelude::*;
use log::{debug, error};
use rand::{self, Rng, rngs::ThreadRng};

use super::{DASH_ROOM, DeliverMessage, RegisterMessage, SessionConnect, SessionDisconnect, WsMessage};
use super::worker::DashWorker;

pub struct WsAgent {
    sessions: HashMap<usize, Recipient<WsMessage>>,
    rooms: HashMap<String, HashSet<usize>>,
    rng: ThreadRng,

    pub addr: Addr<DashWorker>,
}

impl WsAgent {
    pub fn new(addr: Addr<DashWorker>) -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(DASH_ROOM.to_string(), HashSet::new());

        WsAgent {
            sessions: HashMap::new(),
            rooms,
            rng: rand::thread_rng(),
            addr,
        }
    }

    fn broadcast_message(&self, room: &str, message: &str) {
        if let Some(sessions) = self.rooms.get(room) {
            for id in sessions {
                if let Some(addr) = self.sessions.get(id) {
                    debug!("WS, do_send, id:{}", id);
                    addr.do_send(WsMessage(message.to_owned()));
                }
            }
        }
    }

    fn deliver_message(&self, id: usize, message: &str) {
        if let Some(addr) = self.sessions.get(&id) {
            addr.do_send(WsMessage(message.to_string()));
        } else {
            error!("error, WS, session:{} not found", id);
        }
    }

    // 0 保留给群发
    fn next_id(&mut self) -> usize {
        loop {
            let id = self.rng.gen::<usize>();
            if id != 0 && !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Actor for WsAgent {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let addr = ctx.address();
        self.addr.do_send(RegisterMessage {
            addr: addr.recipient(),
        });
    }
}

/// 注册 session, 分配随机 id
impl Handler<SessionConnect> for WsAgent {
    type Result = usize;

    fn handle(&mut self, msg: SessionConnect, _: &mut Context<Self>) -> Self::Result {
        let id = self.next_id();
        self.sessions.insert(id, msg.addr.clone());

        self.rooms
            .entry(msg.room.clone())
            .or_insert_with(HashSet::new)
            .insert(id);

        debug!("WS, id:{} connected, room: {}, total: {}", id, msg.room, self.session_count());

        // 通知 worker 发送快照
        self.addr.do_send(SessionConnect {
            addr: msg.addr,
            room: msg.room,
            id,
        });

        id
    }
}

impl Handler<SessionDisconnect> for WsAgent {
    type Result = ();

    fn handle(&mut self, msg: SessionDisconnect, _: &mut Context<Self>) {
        if self.sessions.remove(&msg.id).is_some() {
            for sessions in self.rooms.values_mut() {
                sessions.remove(&msg.id);
            }
        }
        debug!("WS, id:{} disconnected. total: {}", msg.id, self.session_count());
    }
}

impl Handler<DeliverMessage> for WsAgent {
    type Result = ();

    fn handle(&mut self, msg: DeliverMessage, _: &mut Context<Self>) {
        if msg.id == 0 {
            self.broadcast_message(&msg.room, &msg.msg);
        } else {
            self.deliver_message(msg.id, &msg.msg);
        }
    }
}
