use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// GET /active-channels
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveChannel {
    pub number: u32,

    #[serde(default)]
    pub camera_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "super::de_null_default")]
    pub plate: String,
}

/// plate-found 事件, 以及 GET /events/{channel} 的历史记录
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    pub channel_number: u32,

    /// 原样显示, 服务端可能给字符串或数字
    #[serde(default, deserialize_with = "de_display_string")]
    pub timestamp: String,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub customer_info: CustomerInfo,
}

fn de_display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where D: Deserializer<'de> {
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_event_with_string_timestamp() {
        let s = r#"{"channelNumber":2,"timestamp":"18/10/2026 10:00:01",
            "customerInfo":{"name":"Ana","group":"Bloco A","unit":"101","make":"Fiat",
            "model":"Uno","color":"Prata","plate":"ABC1234"}}"#;
        let ev: DetectionEvent = serde_json::from_str(s).unwrap();
        assert_eq!(ev.channel_number, 2);
        assert_eq!(ev.timestamp, "18/10/2026 10:00:01");
        assert_eq!(ev.customer_info.plate, "ABC1234");
        assert_eq!(ev.customer_info.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn decode_event_with_numeric_timestamp_and_missing_info() {
        let ev: DetectionEvent = serde_json::from_str(r#"{"channelNumber":1,"timestamp":1729245601000}"#).unwrap();
        assert_eq!(ev.timestamp, "1729245601000");
        assert_eq!(ev.customer_info, CustomerInfo::default());
    }

    #[test]
    fn decode_event_with_null_fields() {
        let s = r#"{"channelNumber":1,"timestamp":null,
            "customerInfo":{"name":null,"group":null,"make":null,"plate":null}}"#;
        let ev: DetectionEvent = serde_json::from_str(s).unwrap();
        assert_eq!(ev.timestamp, "");
        assert_eq!(ev.customer_info.plate, "");
        assert_eq!(ev.customer_info.name, None);

        let ev: DetectionEvent = serde_json::from_str(r#"{"channelNumber":3,"customerInfo":null}"#).unwrap();
        assert_eq!(ev.customer_info, CustomerInfo::default());
    }

    #[test]
    fn decode_active_channels() {
        let list: Vec<ActiveChannel> =
            serde_json::from_str(r#"[{"number":1,"cameraName":"Portaria"},{"number":3}]"#).unwrap();
        assert_eq!(list[0].camera_name.as_deref(), Some("Portaria"));
        assert_eq!(list[1].number, 3);
        assert_eq!(list[1].camera_name, None);
    }
}
