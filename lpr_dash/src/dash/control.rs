use std::collections::VecDeque;
use std::fmt::{self, Display};

use log::error;
use serde::Serialize;

use lpr_base::model::detection::{ActiveChannel, DetectionEvent};
use lpr_base::util::utils;

use super::plate_svg;

/// 每个通道表格最多保留的行数
pub const CHANNEL_HISTORY: usize = 20;
pub const INITIAL_MARQUEE: &str = "Processo em execução...";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DetectionRow {
    pub name: String,
    pub group: String,
    pub unit: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub plate: String,
    pub plate_svg: String,
    pub timestamp: String,
    /// 最新一条, 高亮显示
    pub current: bool,
}

impl DetectionRow {
    pub fn from_event(ev: &DetectionEvent) -> Self {
        let info = &ev.customer_info;
        DetectionRow {
            name: utils::unwrap_option_string(&info.name, "Desconhecido"),
            group: utils::unwrap_option_string(&info.group, ""),
            unit: utils::unwrap_option_string(&info.unit, ""),
            make: utils::unwrap_option_string(&info.make, ""),
            model: utils::unwrap_option_string(&info.model, ""),
            color: utils::unwrap_option_string(&info.color, ""),
            plate: info.plate.clone(),
            plate_svg: plate_svg::render_plate_svg(&info.plate),
            timestamp: ev.timestamp.clone(),
            current: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelTable {
    pub number: u32,
    pub title: String,
    rows: VecDeque<DetectionRow>,
}

impl ChannelTable {
    pub fn new(channel: &ActiveChannel) -> Self {
        let camera = utils::unwrap_option_string(&channel.camera_name, "Câmera");
        ChannelTable {
            number: channel.number,
            title: format!("Canal {} - {}", channel.number, camera),
            rows: VecDeque::with_capacity(CHANNEL_HISTORY + 1),
        }
    }

    /// 新行插到最前面, 去掉上一行的 current 标记, 超过 20 行丢弃最旧的
    pub fn push(&mut self, ev: &DetectionEvent) {
        if let Some(prev) = self.rows.front_mut() {
            prev.current = false;
        }
        self.rows.push_front(DetectionRow::from_event(ev));
        self.rows.truncate(CHANNEL_HISTORY);
    }

    pub fn rows(&self) -> impl Iterator<Item=&DetectionRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownChannel(pub u32);

impl Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table for channel {} not found", self.0)
    }
}

pub struct ControlView {
    marquee: String,
    tables: Vec<ChannelTable>,
}

impl ControlView {
    pub fn new(channels: &[ActiveChannel]) -> Self {
        let mut tables: Vec<ChannelTable> = Vec::with_capacity(channels.len());
        for ch in channels.iter() {
            if tables.iter().all(|x| x.number != ch.number) {
                tables.push(ChannelTable::new(ch));
            }
        }

        ControlView {
            marquee: INITIAL_MARQUEE.to_string(),
            tables,
        }
    }

    pub fn marquee(&self) -> &str {
        &self.marquee
    }

    pub fn set_marquee(&mut self, text: &str) {
        self.marquee = text.to_string();
    }

    pub fn tables(&self) -> &[ChannelTable] {
        &self.tables
    }

    pub fn table(&self, number: u32) -> Option<&ChannelTable> {
        self.tables.iter().find(|x| x.number == number)
    }

    /// 按事件自带的通道号路由
    pub fn insert(&mut self, ev: &DetectionEvent) -> Result<u32, UnknownChannel> {
        let number = ev.channel_number;
        match self.tables.iter_mut().find(|x| x.number == number) {
            Some(table) => {
                table.push(ev);
                Ok(number)
            }
            None => Err(UnknownChannel(number)),
        }
    }

    /// 历史记录按返回顺序逐条插入, 通道不存在的记录记日志后跳过
    /// 返回插入的条数
    pub fn backfill(&mut self, events: &[DetectionEvent]) -> usize {
        let mut count = 0;
        for ev in events.iter() {
            match self.insert(ev) {
                Ok(_) => count += 1,
                Err(e) => error!("error, control, backfill, {}", e),
            }
        }
        count
    }
}


#[cfg(test)]
mod tests {
    use lpr_base::model::detection::CustomerInfo;

    use super::*;

    fn event(channel: u32, n: usize) -> DetectionEvent {
        DetectionEvent {
            channel_number: channel,
            timestamp: format!("t{}", n),
            customer_info: CustomerInfo {
                name: Some(format!("user{}", n)),
                plate: "ABC1234".to_string(),
                ..Default::default()
            },
        }
    }

    fn channels() -> Vec<ActiveChannel> {
        vec![
            ActiveChannel { number: 1, camera_name: Some("Portaria".to_string()) },
            ActiveChannel { number: 2, camera_name: None },
        ]
    }

    #[test]
    fn titles() {
        let view = ControlView::new(&channels());
        assert_eq!(view.tables()[0].title, "Canal 1 - Portaria");
        assert_eq!(view.tables()[1].title, "Canal 2 - Câmera");
        assert_eq!(view.marquee(), INITIAL_MARQUEE);
    }

    #[test]
    fn twenty_five_events_keep_twenty_newest_first() {
        let mut view = ControlView::new(&channels());
        for n in 0..25 {
            assert_eq!(view.insert(&event(1, n)), Ok(1));
        }

        let table = view.table(1).unwrap();
        assert_eq!(table.len(), CHANNEL_HISTORY);

        let rows: Vec<&DetectionRow> = table.rows().collect();
        assert_eq!(rows[0].timestamp, "t24");
        assert_eq!(rows[19].timestamp, "t5");
        assert_eq!(rows.iter().filter(|r| r.current).count(), 1);
        assert!(rows[0].current);

        assert!(view.table(2).unwrap().is_empty());
    }

    #[test]
    fn unknown_channel_is_rejected() {
        let mut view = ControlView::new(&channels());
        assert_eq!(view.insert(&event(7, 0)), Err(UnknownChannel(7)));
        assert!(view.tables().iter().all(|t| t.is_empty()));
    }

    #[test]
    fn row_defaults_and_plate_svg() {
        let ev = DetectionEvent {
            channel_number: 2,
            timestamp: "10:00".to_string(),
            customer_info: CustomerInfo { plate: "ABC1234".to_string(), ..Default::default() },
        };
        let row = DetectionRow::from_event(&ev);
        assert_eq!(row.name, "Desconhecido");
        assert_eq!(row.group, "");
        assert!(row.plate_svg.contains("letters/A.svg"));
    }

    #[test]
    fn backfill_puts_last_event_on_top() {
        let mut view = ControlView::new(&channels());
        assert_eq!(view.backfill(&[event(2, 1), event(2, 2), event(2, 3)]), 3);
        let top = view.table(2).unwrap().rows().next().unwrap();
        assert_eq!(top.timestamp, "t3");
    }

    #[test]
    fn backfill_skips_stray_event_and_keeps_the_rest() {
        let mut view = ControlView::new(&channels());
        assert_eq!(view.backfill(&[event(1, 1), event(9, 2), event(1, 3)]), 2);

        let rows: Vec<&DetectionRow> = view.table(1).unwrap().rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, "t3");
        assert_eq!(rows[1].timestamp, "t1");
    }

    #[test]
    fn duplicate_channels_make_one_table() {
        let mut list = channels();
        list.push(ActiveChannel { number: 1, camera_name: Some("Outra".to_string()) });
        let view = ControlView::new(&list);
        assert_eq!(view.tables().len(), 2);
    }
}
