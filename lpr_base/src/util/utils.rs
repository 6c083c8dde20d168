use std::path::Path;

use tokio::fs::DirBuilder;

//-------------------- util --------------------------
pub async fn prepare_dir(path: impl AsRef<Path>) -> std::io::Result<()> {
    DirBuilder::new().recursive(true).create(path).await
}

/// 日志文件所在目录
pub async fn prepare_parent_dir(file: impl AsRef<Path>) -> std::io::Result<()> {
    match file.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => prepare_dir(dir).await,
        _ => Ok(()),
    }
}


//----------- web utils --------------
/// trim字符串，如果字符串为空，返回 default
pub fn unwrap_option_string(str: &Option<String>, default: &str) -> String {
    if let Some(x) = str {
        let value = x.trim();
        if !value.is_empty() {
            return value.to_string();
        }
    }

    default.to_string()
}

/// 字符串替换 ${name} 变量
pub fn replace_var(s: &str, name: &str, value: &str) -> String {
    s.replace(&format!("${{{}}}", name), value)
}

/// 拼接 base url 和 path，避免出现 // 或缺少 /
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_option_string_uses_default() {
        assert_eq!(unwrap_option_string(&None, "Câmera"), "Câmera");
        assert_eq!(unwrap_option_string(&Some("".to_string()), "Câmera"), "Câmera");
        assert_eq!(unwrap_option_string(&Some("Portaria".to_string()), "Câmera"), "Portaria");
    }

    #[test]
    fn replace_var_and_join_url() {
        assert_eq!(replace_var("http://127.0.0.1:${http_port}/x", "http_port", "8080"), "http://127.0.0.1:8080/x");
        assert_eq!(join_url("http://h:3000/", "/plates"), "http://h:3000/plates");
        assert_eq!(join_url("http://h:3000", "events/2"), "http://h:3000/events/2");
    }
}
