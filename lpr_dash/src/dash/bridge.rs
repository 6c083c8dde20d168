use log::{debug, error, info, warn};

use lpr_base::api::push::{ProcessStatusInfo, PushEvent};
use lpr_base::model::detection::DetectionEvent;

use super::camera::ControlInput;
use super::notify::SnackKind;
use super::session::DashSession;

pub const MSG_PROCESS_ERROR: &str = "Erro ao iniciar o reconhecimento.";

/// 状态变化后需要刷新的页面片段
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CameraRow(usize),
    ChannelTable(u32),
    Marquee,
    Notify(SnackKind, String),
}

pub fn process_error_message(error_type: Option<&str>) -> String {
    let suffix = match error_type {
        Some("connection_timeout") => " Connection Timeout!",
        Some("credentials_unauthorized") => " Credenciais não autorizadas!",
        _ => "",
    };
    format!("{}{}", MSG_PROCESS_ERROR, suffix)
}

/// 运行数量的概要, process-status 只给了 runningIPs 时显示
pub fn running_summary(count: usize) -> String {
    match count {
        0 => "Nenhuma câmera em execução.".to_string(),
        1 => "1 câmera em execução.".to_string(),
        n => format!("{} câmeras em execução.", n),
    }
}

pub fn dispatch(session: &mut DashSession, ev: PushEvent) -> Vec<Effect> {
    match ev {
        PushEvent::PlateFound(detection) => on_plate_found(session, &detection),
        PushEvent::ProcessStatus(status) => on_process_status(session, status),
        PushEvent::ProcessStarted { ip } => on_process_started(session, &ip),
        PushEvent::ProcessError { ip, error_type } => on_process_error(session, &ip, error_type.as_deref()),
        PushEvent::ProcessStopped { ip } => on_process_stopped(session, &ip),
        PushEvent::PlateNotFound { ip, plate } => {
            info!("bridge, plate not found, ip: {}, plate: {}", ip, plate);
            Vec::new()
        }
    }
}

fn on_plate_found(session: &mut DashSession, detection: &DetectionEvent) -> Vec<Effect> {
    let control = match session.control_mut() {
        Some(v) => v,
        None => {
            debug!("bridge, plate-found channel: {}, control view not loaded", detection.channel_number);
            return Vec::new();
        }
    };

    match control.insert(detection) {
        Ok(channel) => vec![Effect::ChannelTable(channel)],
        Err(e) => {
            error!("error, bridge, plate-found, {}", e);
            Vec::new()
        }
    }
}

fn on_process_status(session: &mut DashSession, status: ProcessStatusInfo) -> Vec<Effect> {
    let mut effects = Vec::new();

    if let Some(ips) = status.running_ips {
        session.running_mut().replace(ips);
        let running = session.running().clone();
        if let Some(settings) = session.settings_mut() {
            for i in settings.sync_running(&running) {
                effects.push(Effect::CameraRow(i));
            }
        }
    }

    let text = match status.message {
        Some(v) => v,
        None => running_summary(session.running().len()),
    };
    if let Some(control) = session.control_mut() {
        control.set_marquee(&text);
        effects.push(Effect::Marquee);
    }

    effects
}

/// 没有对应行的地址只更新 RunningSet, 不提示
fn apply_confirmation(session: &mut DashSession, ip: &str, input: ControlInput, notify: Effect) -> Vec<Effect> {
    let index = match session.settings_mut() {
        Some(settings) => settings.apply_ip(ip, input),
        None => None,
    };

    match index {
        Some(i) => vec![Effect::CameraRow(i), notify],
        None => {
            debug!("bridge, {:?} for ip: {}, no camera row", input, ip);
            Vec::new()
        }
    }
}

fn on_process_started(session: &mut DashSession, ip: &str) -> Vec<Effect> {
    info!("bridge, process started, ip: {}", ip);
    session.running_mut().insert(ip);

    let msg = format!("Reconhecimento iniciado para a câmera {}.", ip);
    apply_confirmation(session, ip, ControlInput::Started, Effect::Notify(SnackKind::Info, msg))
}

fn on_process_error(session: &mut DashSession, ip: &str, error_type: Option<&str>) -> Vec<Effect> {
    warn!("bridge, process error, ip: {}, type: {:?}", ip, error_type);
    session.running_mut().remove(ip);

    let msg = process_error_message(error_type);
    apply_confirmation(session, ip, ControlInput::StartError, Effect::Notify(SnackKind::Error, msg))
}

fn on_process_stopped(session: &mut DashSession, ip: &str) -> Vec<Effect> {
    info!("bridge, process stopped, ip: {}", ip);
    session.running_mut().remove(ip);

    let msg = format!("Reconhecimento parado para a câmera {}.", ip);
    apply_confirmation(session, ip, ControlInput::Stopped, Effect::Notify(SnackKind::Info, msg))
}
