use serde::{Deserialize, Deserializer};

pub mod returndata;
pub mod cadastro;
pub mod camera;
pub mod detection;

/// 字段为 null 时和缺失一样, 取默认值
pub fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where D: Deserializer<'de>,
          T: Default + Deserialize<'de> {
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
