use std::collections::HashMap;

use lpr_base::model::camera::{Mg3000ChannelConfig, MG3000_CHANNELS};

/// 固定4个通道, 按通道号排序, 没有配置的通道为空
pub fn slots(list: &[Mg3000ChannelConfig]) -> Vec<Mg3000ChannelConfig> {
    (1..=MG3000_CHANNELS).map(|channel| {
        list.iter()
            .find(|x| x.channel == channel)
            .cloned()
            .unwrap_or_else(|| Mg3000ChannelConfig::empty(channel))
    }).collect()
}

pub fn field_name(prefix: &str, channel: u8) -> String {
    format!("{}_{}", prefix, channel)
}

/// 表单字段 mg3000Address_1 .. portAddress_4
/// 不管是否修改, 总是提交全部4个通道
pub fn from_form(fields: &HashMap<String, String>) -> Vec<Mg3000ChannelConfig> {
    let get = |prefix: &str, channel: u8| -> String {
        fields.get(&field_name(prefix, channel))
            .map(|x| x.trim().to_string())
            .unwrap_or_default()
    };

    (1..=MG3000_CHANNELS).map(|channel| Mg3000ChannelConfig {
        channel,
        mg3000_address: get("mg3000Address", channel),
        receptor_address: get("receptorAddress", channel),
        port_address: get("portAddress", channel),
    }).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_fill_missing_channels() {
        let list = vec![
            Mg3000ChannelConfig {
                channel: 3,
                mg3000_address: "10.1.1.3".to_string(),
                receptor_address: "2".to_string(),
                port_address: "7".to_string(),
            },
            Mg3000ChannelConfig::empty(9),
        ];
        let s = slots(&list);
        assert_eq!(s.len(), 4);
        assert_eq!(s.iter().map(|x| x.channel).collect::<Vec<u8>>(), vec![1, 2, 3, 4]);
        assert_eq!(s[2].mg3000_address, "10.1.1.3");
        assert_eq!(s[0], Mg3000ChannelConfig::empty(1));
    }

    #[test]
    fn form_always_has_four_rows() {
        let mut fields = HashMap::new();
        fields.insert("mg3000Address_2".to_string(), " 10.1.1.2 ".to_string());
        fields.insert("portAddress_2".to_string(), "5".to_string());

        let list = from_form(&fields);
        assert_eq!(list.len(), 4);
        assert_eq!(list[1].mg3000_address, "10.1.1.2");
        assert_eq!(list[1].port_address, "5");
        assert_eq!(list[1].receptor_address, "");
        assert_eq!(list[3], Mg3000ChannelConfig::empty(4));

        let body = serde_json::to_value(&list).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert_eq!(body[0]["channel"], 1);
        assert_eq!(body[1]["mg3000Address"], "10.1.1.2");
    }
}
