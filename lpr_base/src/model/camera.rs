use serde::{Deserialize, Serialize};

pub const DEFAULT_EQUIP_TYPE: &str = "Câmera IP";
pub const MG3000_CHANNELS: u8 = 4;

/// GET /settings 返回的摄像头配置
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    #[serde(default)]
    pub equip_type: Option<String>,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub equip_add: String,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub equip_user: String,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub equip_pass: String,

    /// chan1 .. chan4
    #[serde(default)]
    pub channel_occupied: Option<String>,
}

impl CameraConfig {
    pub fn equip_type_label(&self) -> &str {
        match self.equip_type {
            Some(ref v) if !v.is_empty() => v.as_str(),
            _ => DEFAULT_EQUIP_TYPE,
        }
    }

    /// chan1..chan4 -> "1".."4", 其他 "N/A"
    pub fn channel_label(&self) -> &'static str {
        match self.channel_occupied.as_deref() {
            Some("chan1") => "1",
            Some("chan2") => "2",
            Some("chan3") => "3",
            Some("chan4") => "4",
            _ => "N/A",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mg3000ChannelConfig {
    pub channel: u8,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub mg3000_address: String,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub receptor_address: String,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub port_address: String,
}

impl Mg3000ChannelConfig {
    pub fn empty(channel: u8) -> Self {
        Mg3000ChannelConfig {
            channel,
            ..Default::default()
        }
    }
}

/// GET /process-status
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProcessStatus {
    #[serde(rename = "runningIPs", default, deserialize_with = "super::de_null_default")]
    pub running_ips: Vec<String>,
}

/// POST /start-recognition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StartRecognitionReq {
    pub ip: String,
    pub user: String,
    pub password: String,
}

impl From<&CameraConfig> for StartRecognitionReq {
    fn from(c: &CameraConfig) -> Self {
        StartRecognitionReq {
            ip: c.equip_add.clone(),
            user: c.equip_user.clone(),
            password: c.equip_pass.clone(),
        }
    }
}

/// POST /stop-recognition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StopRecognitionReq {
    pub ip: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_tag_mapping() {
        let mut c = CameraConfig::default();
        assert_eq!(c.channel_label(), "N/A");
        for (tag, label) in [("chan1", "1"), ("chan2", "2"), ("chan3", "3"), ("chan4", "4")] {
            c.channel_occupied = Some(tag.to_string());
            assert_eq!(c.channel_label(), label);
        }
        c.channel_occupied = Some("chan5".to_string());
        assert_eq!(c.channel_label(), "N/A");
    }

    #[test]
    fn decode_settings_and_default_type() {
        let s = r#"{"equipAdd":"10.0.0.8","equipUser":"admin","equipPass":"x","channelOccupied":"chan2"}"#;
        let c: CameraConfig = serde_json::from_str(s).unwrap();
        assert_eq!(c.equip_add, "10.0.0.8");
        assert_eq!(c.equip_type_label(), DEFAULT_EQUIP_TYPE);
        assert_eq!(c.channel_label(), "2");

        let req = StartRecognitionReq::from(&c);
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"ip":"10.0.0.8","user":"admin","password":"x"}"#);
    }

    #[test]
    fn decode_settings_with_null_fields() {
        let s = r#"[{"equipType":null,"channel":"1","equipAdd":"10.0.0.9","equipUser":null,"equipPass":null,"channelOccupied":null}]"#;
        let list: Vec<CameraConfig> = serde_json::from_str(s).unwrap();
        assert_eq!(list[0].equip_add, "10.0.0.9");
        assert_eq!(list[0].equip_user, "");
        assert_eq!(list[0].equip_pass, "");
        assert_eq!(list[0].equip_type_label(), DEFAULT_EQUIP_TYPE);
        assert_eq!(list[0].channel_label(), "N/A");

        let list: Vec<Mg3000ChannelConfig> =
            serde_json::from_str(r#"[{"channel":2,"mg3000Address":null,"receptorAddress":"r","portAddress":null}]"#).unwrap();
        assert_eq!(list[0].mg3000_address, "");
        assert_eq!(list[0].receptor_address, "r");

        let status: ProcessStatus = serde_json::from_str(r#"{"runningIPs":null}"#).unwrap();
        assert!(status.running_ips.is_empty());
    }

    #[test]
    fn mg3000_wire_names() {
        let cfg = Mg3000ChannelConfig {
            channel: 3,
            mg3000_address: "1".to_string(),
            receptor_address: "2".to_string(),
            port_address: "3".to_string(),
        };
        assert_eq!(serde_json::to_string(&cfg).unwrap(),
                   r#"{"channel":3,"mg3000Address":"1","receptorAddress":"2","portAddress":"3"}"#);

        let status: ProcessStatus = serde_json::from_str(r#"{"runningIPs":["10.0.0.8"]}"#).unwrap();
        assert_eq!(status.running_ips, vec!["10.0.0.8".to_string()]);
    }
}
