pub mod session;
pub mod agent;
pub mod worker;

use actix::prelude::*;

use lpr_base::api::push::PushEvent;
use lpr_base::model::cadastro::UserRecord;
use lpr_base::model::camera::{CameraConfig, Mg3000ChannelConfig};
use lpr_base::model::detection::{ActiveChannel, DetectionEvent};

use crate::dash::cadastros::CadastroFilter;
use crate::dash::session::{CameraCommand, Page};
use crate::error::AppResult;

/// 浏览器连接的房间
pub const DASH_ROOM: &str = "dash";

#[derive(Message)]
#[rtype(result = "()")]
pub struct WsMessage(pub String);

#[derive(Message)]
#[rtype(usize)]
pub struct SessionConnect {
    pub addr: Recipient<WsMessage>,
    pub room: String,
    pub id: usize,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct SessionDisconnect {
    pub id: usize,
}

/// worker发送给agent
/// 群发 (id = 0)
/// 指定 session id
#[derive(Message)]
#[rtype(result = "()")]
pub struct DeliverMessage {
    pub msg: String,
    pub room: String,
    /// client id, id=0 broadcast
    pub id: usize,
}

/// agent 发送给 worker
#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterMessage {
    pub addr: Recipient<DeliverMessage>,
}

//------------------- worker -------------------
/// 控制器获取到的页面数据
pub enum ViewData {
    Cadastros {
        records: Vec<UserRecord>,
        running_ips: Vec<String>,
    },
    Settings {
        cameras: Vec<CameraConfig>,
        running_ips: Vec<String>,
        mg3000: Vec<Mg3000ChannelConfig>,
    },
    Control {
        channels: Vec<ActiveChannel>,
        histories: Vec<(u32, Vec<DetectionEvent>)>,
    },
    Failed,
}

/// 切换页面, 返回页面内容
#[derive(Message)]
#[rtype(result = "AppResult<String>")]
pub struct LoadView {
    pub page: Page,
    pub data: ViewData,
}

/// 当前页面内容, 浏览器重连时使用
#[derive(Message)]
#[rtype(result = "AppResult<String>")]
pub struct CurrentView;

#[derive(Debug, Clone)]
pub enum CadastrosCmd {
    Filter(CadastroFilter),
    Clear,
    Toggle(usize),
}

/// 返回 false 表示当前不在 cadastros 页面或者行不可见
#[derive(Message)]
#[rtype(result = "bool")]
pub struct CadastrosAction(pub CadastrosCmd);

#[derive(Message)]
#[rtype(result = "Option<CameraCommand>")]
pub struct CameraClick {
    pub index: usize,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct CameraRequestFailed(pub CameraCommand);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Mg3000Saved {
    pub list: Vec<Mg3000ChannelConfig>,
    pub ok: bool,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct PushMessage(pub PushEvent);
