use serde::{Deserialize, Serialize};

/// GET /plates 返回的一条用户记录
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    #[serde(rename = "userName", default, deserialize_with = "super::de_null_default")]
    pub name: String,

    #[serde(rename = "grupo", default, deserialize_with = "super::de_null_default")]
    pub group: String,

    #[serde(rename = "unid", default, deserialize_with = "super::de_null_default")]
    pub unit: String,

    #[serde(default, deserialize_with = "super::de_null_default")]
    pub devices: Vec<Device>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    #[serde(default, deserialize_with = "super::de_null_default")]
    pub make: String,
    #[serde(default, deserialize_with = "super::de_null_default")]
    pub model: String,
    #[serde(default, deserialize_with = "super::de_null_default")]
    pub color: String,
    #[serde(default, deserialize_with = "super::de_null_default")]
    pub plate: String,

    /// true: Ativo
    #[serde(default, deserialize_with = "super::de_null_default")]
    pub status: bool,
}

impl UserRecord {
    /// "ABC1234 / XYZ9876", 没有车辆时为 "Nenhuma"
    pub fn plate_list(&self) -> String {
        if self.devices.is_empty() {
            return "Nenhuma".to_string();
        }
        self.devices.iter()
            .map(|x| x.plate.as_str())
            .collect::<Vec<&str>>()
            .join(" / ")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_wire_names() {
        let s = r#"[{"userName":"Ana","grupo":"Bloco A","unid":"101",
            "devices":[{"make":"Fiat","model":"Uno","color":"Prata","plate":"ABC1234","status":true},
                       {"plate":"XYZ9K87"}]}]"#;
        let list: Vec<UserRecord> = serde_json::from_str(s).unwrap();
        assert_eq!(list[0].name, "Ana");
        assert_eq!(list[0].group, "Bloco A");
        assert_eq!(list[0].unit, "101");
        assert_eq!(list[0].devices.len(), 2);
        assert!(list[0].devices[0].status);
        assert!(!list[0].devices[1].status);
        assert_eq!(list[0].devices[1].make, "");
    }

    #[test]
    fn decode_null_fields_as_empty() {
        let s = r#"[{"userName":"Ana","grupo":null,"unid":null,
            "devices":[{"make":null,"model":"Uno","color":null,"plate":"ABC1234","status":true},
                       {"make":"Fiat","plate":null,"status":null}]},
            {"userName":null,"grupo":"Bloco B","unid":"202","devices":null}]"#;
        let list: Vec<UserRecord> = serde_json::from_str(s).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].group, "");
        assert_eq!(list[0].devices[0].make, "");
        assert_eq!(list[0].devices[0].model, "Uno");
        assert!(list[0].devices[0].status);
        assert_eq!(list[0].devices[1].plate, "");
        assert!(!list[0].devices[1].status);
        assert_eq!(list[1].name, "");
        assert!(list[1].devices.is_empty());
    }

    #[test]
    fn plate_list_joins_or_nenhuma() {
        let mut user = UserRecord::default();
        assert_eq!(user.plate_list(), "Nenhuma");

        user.devices.push(Device { plate: "ABC1234".to_string(), ..Default::default() });
        user.devices.push(Device { plate: "XYZ9K87".to_string(), ..Default::default() });
        assert_eq!(user.plate_list(), "ABC1234 / XYZ9K87");
    }
}
