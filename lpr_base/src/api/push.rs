//! 推送通道: Socket.IO v4 (Engine.IO v4, websocket transport)
//!
//! 服务端帧:
//!   0{"sid":..}        open
//!   2                  ping, 回复 3
//!   40{"sid":..}       namespace 已连接
//!   42["plate-found",{..}]
//!   42/ns,7["name",{..}]  带 namespace 和 ack id
//! 也接受普通 JSON: {"event":"plate-found","data":{..}}

use serde::Deserialize;
use serde_json::Value;

use crate::model::detection::DetectionEvent;

use super::{ApiError, ApiResult};

/// 连接后发送, 加入默认 namespace
pub const SIO_CONNECT: &str = "40";
/// 回复 ping
pub const EIO_PONG: &str = "3";

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Open(Value),
    Close,
    Ping,
    Pong,
    Noop,
    Connected,
    Disconnected,
    ConnectError(Value),
    Event { name: String, payload: Value },
    Unknown(String),
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

pub fn parse_frame(text: &str) -> Frame {
    if text.starts_with('{') {
        return match serde_json::from_str::<Envelope>(text) {
            Ok(env) => Frame::Event { name: env.event, payload: env.data },
            Err(_) => Frame::Unknown(text.to_string()),
        };
    }

    let mut chars = text.chars();
    let kind = chars.next();
    let rest = chars.as_str();

    match kind {
        Some('0') => Frame::Open(serde_json::from_str(rest).unwrap_or(Value::Null)),
        Some('1') => Frame::Close,
        Some('2') => Frame::Ping,
        Some('3') => Frame::Pong,
        Some('6') => Frame::Noop,
        Some('4') => parse_sio(rest),
        _ => Frame::Unknown(text.to_string()),
    }
}

fn parse_sio(text: &str) -> Frame {
    let mut chars = text.chars();
    let kind = chars.next();
    let rest = chars.as_str();

    match kind {
        Some('0') => Frame::Connected,
        Some('1') => Frame::Disconnected,
        Some('2') => parse_sio_event(rest).unwrap_or_else(|| Frame::Unknown(text.to_string())),
        Some('4') => Frame::ConnectError(serde_json::from_str(strip_namespace(rest)).unwrap_or(Value::Null)),
        // ack
        Some('3') => Frame::Noop,
        _ => Frame::Unknown(text.to_string()),
    }
}

fn strip_namespace(s: &str) -> &str {
    if s.starts_with('/') {
        match s.find(',') {
            Some(i) => &s[i + 1..],
            None => "",
        }
    } else {
        s
    }
}

fn parse_sio_event(s: &str) -> Option<Frame> {
    let s = strip_namespace(s);
    // ack id
    let s = s.trim_start_matches(|c: char| c.is_ascii_digit());

    let arr: Vec<Value> = serde_json::from_str(s).ok()?;
    let mut it = arr.into_iter();
    let name = match it.next()? {
        Value::String(v) => v,
        _ => return None,
    };
    let payload = it.next().unwrap_or(Value::Null);

    Some(Frame::Event { name, payload })
}


//------------------- events -------------------
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    PlateFound,
    ProcessStatus,
    ProcessStarted,
    ProcessError,
    ProcessStopped,
    PlateNotFound,
}

impl EventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "plate-found" => Some(EventKind::PlateFound),
            "process-status" => Some(EventKind::ProcessStatus),
            "process-started" => Some(EventKind::ProcessStarted),
            "process-error" => Some(EventKind::ProcessError),
            "process-stopped" => Some(EventKind::ProcessStopped),
            "plate-not-found" => Some(EventKind::PlateNotFound),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::PlateFound => "plate-found",
            EventKind::ProcessStatus => "process-status",
            EventKind::ProcessStarted => "process-started",
            EventKind::ProcessError => "process-error",
            EventKind::ProcessStopped => "process-stopped",
            EventKind::PlateNotFound => "plate-not-found",
        }
    }
}

/// process-status 的内容, 字符串或者 {message, runningIPs}
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessStatusInfo {
    pub message: Option<String>,
    pub running_ips: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    PlateFound(DetectionEvent),
    ProcessStatus(ProcessStatusInfo),
    ProcessStarted { ip: String },
    ProcessError { ip: String, error_type: Option<String> },
    ProcessStopped { ip: String },
    PlateNotFound { ip: String, plate: String },
}

#[derive(Deserialize)]
struct IpPayload {
    ip: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorPayload {
    ip: String,
    #[serde(default)]
    error_type: Option<String>,
}

#[derive(Deserialize)]
struct NotFoundPayload {
    #[serde(default)]
    ip: String,
    #[serde(default)]
    plate: String,
}

#[derive(Deserialize)]
struct StatusPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "runningIPs", default)]
    running_ips: Option<Vec<String>>,
}

impl PushEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PushEvent::PlateFound(_) => EventKind::PlateFound,
            PushEvent::ProcessStatus(_) => EventKind::ProcessStatus,
            PushEvent::ProcessStarted { .. } => EventKind::ProcessStarted,
            PushEvent::ProcessError { .. } => EventKind::ProcessError,
            PushEvent::ProcessStopped { .. } => EventKind::ProcessStopped,
            PushEvent::PlateNotFound { .. } => EventKind::PlateNotFound,
        }
    }

    /// Ok(None): 不认识的事件名
    pub fn decode(name: &str, payload: Value) -> ApiResult<Option<PushEvent>> {
        let kind = match EventKind::from_name(name) {
            Some(v) => v,
            None => return Ok(None),
        };

        let ev = match kind {
            EventKind::PlateFound => PushEvent::PlateFound(serde_json::from_value(payload)?),
            EventKind::ProcessStatus => PushEvent::ProcessStatus(decode_status(payload)?),
            EventKind::ProcessStarted => {
                let p: IpPayload = serde_json::from_value(payload)?;
                PushEvent::ProcessStarted { ip: p.ip }
            }
            EventKind::ProcessError => {
                let p: ErrorPayload = serde_json::from_value(payload)?;
                PushEvent::ProcessError { ip: p.ip, error_type: p.error_type }
            }
            EventKind::ProcessStopped => {
                let p: IpPayload = serde_json::from_value(payload)?;
                PushEvent::ProcessStopped { ip: p.ip }
            }
            EventKind::PlateNotFound => {
                let p: NotFoundPayload = serde_json::from_value(payload)?;
                PushEvent::PlateNotFound { ip: p.ip, plate: p.plate }
            }
        };
        Ok(Some(ev))
    }
}

fn decode_status(payload: Value) -> ApiResult<ProcessStatusInfo> {
    match payload {
        Value::String(s) => Ok(ProcessStatusInfo {
            message: Some(s),
            running_ips: None,
        }),
        v @ Value::Object(_) => {
            let p: StatusPayload = serde_json::from_value(v)?;
            Ok(ProcessStatusInfo {
                message: p.message,
                running_ips: p.running_ips,
            })
        }
        other => Err(ApiError::Protocol(format!("invalid process-status payload: {}", other))),
    }
}
