use std::collections::HashSet;

use serde::Serialize;

use lpr_base::model::camera::{CameraConfig, Mg3000ChannelConfig};

use super::mg3000;

/// 密码固定显示8个星号
pub const PASSWORD_MASK: &str = "********";

/// 正在运行识别的摄像头地址
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningSet(HashSet<String>);

impl RunningSet {
    pub fn new() -> Self {
        RunningSet(HashSet::new())
    }

    pub fn replace<I: IntoIterator<Item=String>>(&mut self, ips: I) {
        self.0 = ips.into_iter().collect();
    }

    pub fn insert(&mut self, ip: &str) {
        self.0.insert(ip.to_string());
    }

    pub fn remove(&mut self, ip: &str) {
        self.0.remove(ip);
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.0.contains(ip)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Start,
    Stop,
}

/// stopped -> loading(start) -> running -> loading(stop) -> stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Stopped,
    Loading(Pending),
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlInput {
    /// 用户点击 play/stop
    Click,
    /// process-started
    Started,
    /// process-error
    StartError,
    /// process-stopped
    Stopped,
    /// start/stop 请求本身失败
    RequestFailed,
    /// 等待确认超时后按 process-status 的结果修正
    Reconcile(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Green,
    Red,
    Yellow,
}

impl Indicator {
    pub fn css(&self) -> &'static str {
        match self {
            Indicator::Green => "green",
            Indicator::Red => "red",
            Indicator::Yellow => "yellow",
        }
    }
}

impl ControlState {
    pub fn from_running(running: bool) -> Self {
        if running {
            ControlState::Running
        } else {
            ControlState::Stopped
        }
    }

    /// 确认事件在任何状态下都生效, 点击只在非 loading 状态下生效
    pub fn next(self, input: ControlInput) -> ControlState {
        use ControlState::*;

        match (self, input) {
            (Stopped, ControlInput::Click) => Loading(Pending::Start),
            (Running, ControlInput::Click) => Loading(Pending::Stop),
            (Loading(_), ControlInput::Click) => self,

            (_, ControlInput::Started) => Running,
            (_, ControlInput::StartError) => Stopped,
            (_, ControlInput::Stopped) => Stopped,

            (Loading(_), ControlInput::RequestFailed) => Stopped,
            (_, ControlInput::RequestFailed) => self,

            (Loading(_), ControlInput::Reconcile(running)) => ControlState::from_running(running),
            (_, ControlInput::Reconcile(_)) => self,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ControlState::Loading(_))
    }

    pub fn indicator(&self) -> Indicator {
        match self {
            ControlState::Stopped => Indicator::Red,
            ControlState::Loading(_) => Indicator::Yellow,
            ControlState::Running => Indicator::Green,
        }
    }

    /// 按钮的 data-status
    pub fn status(&self) -> &'static str {
        match self {
            ControlState::Stopped => "stopped",
            ControlState::Loading(_) => "loading",
            ControlState::Running => "running",
        }
    }

    /// (feather 图标, title)
    pub fn button(&self) -> (&'static str, &'static str) {
        match self {
            ControlState::Stopped => ("play", "Play"),
            ControlState::Running => ("square", "Stop"),
            ControlState::Loading(Pending::Start) => ("loader", "Iniciando..."),
            ControlState::Loading(Pending::Stop) => ("loader", "Parando..."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraRow {
    pub config: CameraConfig,
    pub state: ControlState,
    /// 进入 loading 时的序号, 用于判断超时是否仍然有效
    pub loading_seq: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CameraRowView {
    pub index: usize,
    pub equip_type: String,
    pub channel: &'static str,
    pub address: String,
    pub user: String,
    pub password: &'static str,
    pub indicator: &'static str,
    pub status: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub disabled: bool,
}

pub struct SettingsView {
    cameras: Vec<CameraRow>,
    mg3000: Vec<Mg3000ChannelConfig>,
    seq: u64,
}

impl SettingsView {
    pub fn new(cameras: Vec<CameraConfig>, running: &RunningSet, mg3000: &[Mg3000ChannelConfig]) -> Self {
        let cameras = cameras.into_iter().map(|config| {
            let state = ControlState::from_running(running.contains(&config.equip_add));
            CameraRow {
                config,
                state,
                loading_seq: 0,
            }
        }).collect();

        SettingsView {
            cameras,
            mg3000: mg3000::slots(mg3000),
            seq: 0,
        }
    }

    pub fn cameras(&self) -> &[CameraRow] {
        &self.cameras
    }

    pub fn camera(&self, index: usize) -> Option<&CameraRow> {
        self.cameras.get(index)
    }

    pub fn mg3000(&self) -> &[Mg3000ChannelConfig] {
        &self.mg3000
    }

    pub fn set_mg3000(&mut self, list: &[Mg3000ChannelConfig]) {
        self.mg3000 = mg3000::slots(list);
    }

    /// 第一个地址匹配的行
    pub fn find_by_ip(&self, ip: &str) -> Option<usize> {
        self.cameras.iter().position(|x| x.config.equip_add == ip)
    }

    /// 点击 play/stop, 返回 (动作, loading 序号)
    /// loading 中或者下标无效时返回 None
    pub fn click(&mut self, index: usize) -> Option<(Pending, u64)> {
        self.seq += 1;
        let seq = self.seq;

        let row = self.cameras.get_mut(index)?;
        if row.state.is_loading() {
            return None;
        }

        row.state = row.state.next(ControlInput::Click);
        row.loading_seq = seq;
        match row.state {
            ControlState::Loading(pending) => Some((pending, seq)),
            _ => None,
        }
    }

    /// 返回状态是否有变化
    pub fn apply(&mut self, index: usize, input: ControlInput) -> bool {
        match self.cameras.get_mut(index) {
            Some(row) => {
                let next = row.state.next(input);
                let changed = next != row.state;
                row.state = next;
                changed
            }
            None => false,
        }
    }

    pub fn apply_ip(&mut self, ip: &str, input: ControlInput) -> Option<usize> {
        let index = self.find_by_ip(ip)?;
        self.apply(index, input);
        Some(index)
    }

    /// process-status 刷新了 RunningSet, loading 中的行不动
    /// 返回有变化的行
    pub fn sync_running(&mut self, running: &RunningSet) -> Vec<usize> {
        let mut changed = Vec::new();
        for (i, row) in self.cameras.iter_mut().enumerate() {
            if row.state.is_loading() {
                continue;
            }
            let next = ControlState::from_running(running.contains(&row.config.equip_add));
            if next != row.state {
                row.state = next;
                changed.push(i);
            }
        }
        changed
    }

    /// 仍在等待同一次点击的确认
    pub fn still_loading(&self, index: usize, seq: u64) -> bool {
        match self.cameras.get(index) {
            Some(row) => row.state.is_loading() && row.loading_seq == seq,
            None => false,
        }
    }

    pub fn row_view(&self, index: usize) -> Option<CameraRowView> {
        let row = self.cameras.get(index)?;
        let (icon, title) = row.state.button();

        Some(CameraRowView {
            index,
            equip_type: row.config.equip_type_label().to_string(),
            channel: row.config.channel_label(),
            address: row.config.equip_add.clone(),
            user: row.config.equip_user.clone(),
            password: PASSWORD_MASK,
            indicator: row.state.indicator().css(),
            status: row.state.status(),
            icon,
            title,
            disabled: row.state.is_loading(),
        })
    }

    pub fn row_views(&self) -> Vec<CameraRowView> {
        (0..self.cameras.len()).filter_map(|i| self.row_view(i)).collect()
    }
}
