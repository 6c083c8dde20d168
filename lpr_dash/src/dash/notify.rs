use std::time::Duration;

use serde::Serialize;

/// 显示时间
pub const SNACK_TTL: Duration = Duration::from_millis(3000);
/// 淡出时间
pub const SNACK_FADE: Duration = Duration::from_millis(500);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnackKind {
    Info,
    Success,
    Error,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snack {
    pub id: u64,
    pub kind: SnackKind,
    pub message: String,
    pub fading: bool,
}

/// 只有一个位置, 新消息直接顶掉旧消息
#[derive(Debug, Default)]
pub struct Notifier {
    next_id: u64,
    current: Option<Snack>,
    fading: Vec<Snack>,
}

impl Notifier {
    pub fn new() -> Self {
        Notifier::default()
    }

    /// 返回 (新消息 id, 被顶掉的消息 id)
    /// 被顶掉的消息进入淡出, SNACK_FADE 之后 remove
    pub fn show(&mut self, kind: SnackKind, message: &str) -> (u64, Option<u64>) {
        self.next_id += 1;
        let id = self.next_id;

        let superseded = self.current.take().map(|mut old| {
            old.fading = true;
            let old_id = old.id;
            self.fading.push(old);
            old_id
        });

        self.current = Some(Snack {
            id,
            kind,
            message: message.to_string(),
            fading: false,
        });

        (id, superseded)
    }

    /// SNACK_TTL 到期, 已被顶掉的返回 false
    pub fn expire(&mut self, id: u64) -> bool {
        match self.current.take() {
            Some(mut snack) if snack.id == id => {
                snack.fading = true;
                self.fading.push(snack);
                true
            }
            other => {
                self.current = other;
                false
            }
        }
    }

    /// 淡出结束, 从页面删除
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.fading.len();
        self.fading.retain(|x| x.id != id);
        before != self.fading.len()
    }

    pub fn current(&self) -> Option<&Snack> {
        self.current.as_ref()
    }

    /// 淡出中的在前, 当前消息在最后
    pub fn snacks(&self) -> Vec<&Snack> {
        self.fading.iter().chain(self.current.iter()).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_expire_then_remove() {
        let mut n = Notifier::new();
        let (id, old) = n.show(SnackKind::Success, "ok");
        assert_eq!(old, None);
        assert_eq!(n.current().unwrap().message, "ok");

        assert!(n.expire(id));
        assert!(n.current().is_none());
        assert_eq!(n.snacks().len(), 1);
        assert!(n.snacks()[0].fading);

        assert!(n.remove(id));
        assert!(n.snacks().is_empty());
        assert!(!n.remove(id));
    }

    #[test]
    fn latest_call_wins() {
        let mut n = Notifier::new();
        let (first, _) = n.show(SnackKind::Info, "a");
        let (second, old) = n.show(SnackKind::Error, "b");
        assert_eq!(old, Some(first));

        let snacks = n.snacks();
        assert_eq!(snacks.len(), 2);
        assert!(snacks[0].fading);
        assert_eq!(snacks[1].id, second);
        assert!(!snacks[1].fading);

        // 旧消息的定时器到期不影响新消息
        assert!(!n.expire(first));
        assert_eq!(n.current().unwrap().id, second);

        n.remove(first);
        assert_eq!(n.snacks().len(), 1);
        assert!(n.expire(second));
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(SnackKind::Success).unwrap(), "success");
    }
}
