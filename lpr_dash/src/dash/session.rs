use log::{debug, error, info};

use lpr_base::model::cadastro::UserRecord;
use lpr_base::model::camera::{CameraConfig, Mg3000ChannelConfig};
use lpr_base::model::detection::{ActiveChannel, DetectionEvent};

use super::bridge::Effect;
use super::cadastros::CadastrosView;
use super::camera::{ControlInput, Pending, RunningSet, SettingsView};
use super::control::ControlView;
use super::notify::{Notifier, SnackKind};

pub const MSG_STARTING: &str = "Iniciando o serviço, por favor aguarde...";
pub const MSG_START_FAILED: &str = "Não foi possível iniciar o reconhecimento.";
pub const MSG_STOP_FAILED: &str = "Não foi possível parar o reconhecimento.";
pub const MSG_SAVE_OK: &str = "Configurações salvas com sucesso!";
pub const MSG_SAVE_FAILED: &str = "Não foi possível salvar as configurações.";
pub const MSG_SETTINGS_INACTIVE: &str = "A página de configurações não está mais ativa. Abra-a novamente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Cadastros,
    Settings,
    Control,
}

impl Page {
    pub fn from_name(name: &str) -> Option<Page> {
        match name {
            "cadastros" => Some(Page::Cadastros),
            "configuracoes" => Some(Page::Settings),
            "controle" => Some(Page::Control),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::Cadastros => "cadastros",
            Page::Settings => "configuracoes",
            Page::Control => "controle",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Cadastros => "Cadastros",
            Page::Settings => "Configurações",
            Page::Control => "Controle",
        }
    }

    /// 首次加载失败时整页显示的信息
    pub fn load_error(&self) -> &'static str {
        match self {
            Page::Cadastros => "Erro ao carregar cadastros. Tente novamente mais tarde.",
            Page::Settings => "Erro ao carregar configurações. Tente novamente mais tarde.",
            Page::Control => "Erro ao carregar a página de controle.",
        }
    }
}

pub enum View {
    None,
    Cadastros(CadastrosView),
    Settings(SettingsView),
    Control(ControlView),
}

/// 点击 play/stop 后要发出的请求
#[derive(Debug, Clone, PartialEq)]
pub struct CameraCommand {
    pub index: usize,
    pub pending: Pending,
    pub seq: u64,
    pub ip: String,
}

/// 整个面板的状态, 只在 DashWorker 里修改
pub struct DashSession {
    view: View,
    running: RunningSet,
    notifier: Notifier,
}

impl Default for DashSession {
    fn default() -> Self {
        DashSession::new()
    }
}

impl DashSession {
    pub fn new() -> Self {
        DashSession {
            view: View::None,
            running: RunningSet::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn page(&self) -> Option<Page> {
        match self.view {
            View::None => None,
            View::Cadastros(_) => Some(Page::Cadastros),
            View::Settings(_) => Some(Page::Settings),
            View::Control(_) => Some(Page::Control),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn running(&self) -> &RunningSet {
        &self.running
    }

    pub fn running_mut(&mut self) -> &mut RunningSet {
        &mut self.running
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn cadastros(&self) -> Option<&CadastrosView> {
        match &self.view {
            View::Cadastros(v) => Some(v),
            _ => None,
        }
    }

    pub fn cadastros_mut(&mut self) -> Option<&mut CadastrosView> {
        match &mut self.view {
            View::Cadastros(v) => Some(v),
            _ => None,
        }
    }

    pub fn settings(&self) -> Option<&SettingsView> {
        match &self.view {
            View::Settings(v) => Some(v),
            _ => None,
        }
    }

    pub fn settings_mut(&mut self) -> Option<&mut SettingsView> {
        match &mut self.view {
            View::Settings(v) => Some(v),
            _ => None,
        }
    }

    pub fn control(&self) -> Option<&ControlView> {
        match &self.view {
            View::Control(v) => Some(v),
            _ => None,
        }
    }

    pub fn control_mut(&mut self) -> Option<&mut ControlView> {
        match &mut self.view {
            View::Control(v) => Some(v),
            _ => None,
        }
    }

    //------------------- 加载页面 -------------------
    pub fn load_cadastros(&mut self, records: Vec<UserRecord>, running_ips: Vec<String>) {
        info!("session, load cadastros, records: {}", records.len());
        self.running.replace(running_ips);
        self.view = View::Cadastros(CadastrosView::new(records));
    }

    pub fn load_settings(&mut self, cameras: Vec<CameraConfig>, running_ips: Vec<String>, mg3000: &[Mg3000ChannelConfig]) {
        info!("session, load settings, cameras: {}", cameras.len());
        self.running.replace(running_ips);
        self.view = View::Settings(SettingsView::new(cameras, &self.running, mg3000));
    }

    /// histories: 每个通道的历史记录, 获取失败的通道不在里面
    pub fn load_control(&mut self, channels: &[ActiveChannel], histories: Vec<(u32, Vec<DetectionEvent>)>) {
        info!("session, load control, channels: {}", channels.len());
        let mut view = ControlView::new(channels);

        for (channel, events) in histories.iter() {
            let count = view.backfill(events);
            debug!("session, backfill channel: {}, {}/{}", channel, count, events.len());
        }

        self.view = View::Control(view);
    }

    pub fn load_failed(&mut self, page: Page) -> &'static str {
        error!("error, session, load {} failed", page.name());
        self.view = View::None;
        page.load_error()
    }

    //------------------- 摄像头 play/stop -------------------
    /// loading 中点击或者不在配置页面时返回 None
    pub fn camera_click(&mut self, index: usize) -> Option<(CameraCommand, Vec<Effect>)> {
        let settings = match self.settings_mut() {
            Some(v) => v,
            None => {
                debug!("session, camera click {}, settings not loaded", index);
                return None;
            }
        };

        let (pending, seq) = settings.click(index)?;
        let ip = settings.camera(index)?.config.equip_add.clone();

        let cmd = CameraCommand {
            index,
            pending,
            seq,
            ip,
        };
        let effects = vec![
            Effect::CameraRow(index),
            Effect::Notify(SnackKind::Info, MSG_STARTING.to_string()),
        ];
        Some((cmd, effects))
    }

    /// start/stop 请求失败, 或者重新获取配置失败
    pub fn camera_request_failed(&mut self, cmd: &CameraCommand) -> Vec<Effect> {
        let msg = match cmd.pending {
            Pending::Start => MSG_START_FAILED,
            Pending::Stop => MSG_STOP_FAILED,
        };
        let mut effects = Vec::with_capacity(2);

        if let Some(settings) = self.settings_mut() {
            if settings.still_loading(cmd.index, cmd.seq) {
                settings.apply(cmd.index, ControlInput::RequestFailed);
                effects.push(Effect::CameraRow(cmd.index));
            }
        }

        effects.push(Effect::Notify(SnackKind::Error, msg.to_string()));
        effects
    }

    pub fn camera_still_loading(&self, cmd: &CameraCommand) -> bool {
        match self.settings() {
            Some(v) => v.still_loading(cmd.index, cmd.seq),
            None => false,
        }
    }

    /// 等待确认超时, 按 process-status 的结果修正
    /// running_ips 为 None 表示查询也失败了, 按 stopped 处理
    pub fn camera_reconcile(&mut self, cmd: &CameraCommand, running_ips: Option<Vec<String>>) -> Vec<Effect> {
        if !self.camera_still_loading(cmd) {
            return Vec::new();
        }

        let running = match running_ips {
            Some(ips) => {
                self.running.replace(ips);
                self.running.contains(&cmd.ip)
            }
            None => false,
        };

        let mut effects = Vec::with_capacity(2);
        if let Some(settings) = self.settings_mut() {
            settings.apply(cmd.index, ControlInput::Reconcile(running));
            effects.push(Effect::CameraRow(cmd.index));
        }

        let msg = if running {
            format!("Sem confirmação da câmera {}, reconhecimento em execução.", cmd.ip)
        } else {
            format!("Sem confirmação da câmera {}, reconhecimento parado.", cmd.ip)
        };
        effects.push(Effect::Notify(SnackKind::Error, msg));
        effects
    }

    //------------------- mg3000 -------------------
    pub fn mg3000_saved(&mut self, list: &[Mg3000ChannelConfig]) -> Vec<Effect> {
        if let Some(settings) = self.settings_mut() {
            settings.set_mg3000(list);
        }
        vec![Effect::Notify(SnackKind::Success, MSG_SAVE_OK.to_string())]
    }

    pub fn mg3000_save_failed(&self) -> Vec<Effect> {
        vec![Effect::Notify(SnackKind::Error, MSG_SAVE_FAILED.to_string())]
    }
}
