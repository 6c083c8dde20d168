use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use lpr_base::model::cadastro::UserRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expand {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CadastroFilter {
    pub name: String,
    pub group: String,
    pub unit: String,
}

impl CadastroFilter {
    /// 没有选择 grupo 时 unidade 下拉框不可用
    pub fn unit_enabled(&self) -> bool {
        !self.group.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.group.is_empty() && self.unit.is_empty()
    }

    pub fn matches(&self, user: &UserRecord) -> bool {
        let name_match = user.name.to_lowercase().contains(&self.name.to_lowercase());
        let group_match = self.group.is_empty() || user.group == self.group;
        let unit_match = !self.unit_enabled() || self.unit.is_empty() || user.unit == self.unit;

        name_match && group_match && unit_match
    }
}

pub type GroupUnits = BTreeMap<String, BTreeSet<String>>;

pub fn group_units(records: &[UserRecord]) -> GroupUnits {
    let mut map = GroupUnits::new();
    for user in records.iter() {
        map.entry(user.group.clone())
            .or_insert_with(BTreeSet::new)
            .insert(user.unit.clone());
    }
    map
}

/// 返回满足条件的记录下标, 保持原顺序
pub fn filter_records(records: &[UserRecord], filter: &CadastroFilter) -> Vec<usize> {
    records.iter()
        .enumerate()
        .filter(|(_, x)| filter.matches(x))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DeviceView {
    pub make: String,
    pub model: String,
    pub color: String,
    pub plate: String,
    pub status: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RowView {
    pub index: usize,
    pub name: String,
    pub group: String,
    pub unit: String,
    pub plates: String,
    pub expanded: bool,
    pub devices: Vec<DeviceView>,
}

pub struct CadastrosView {
    records: Vec<UserRecord>,
    group_units: GroupUnits,
    filter: CadastroFilter,
    visible: Vec<usize>,
    expand: Vec<Expand>,
}

impl CadastrosView {
    pub fn new(records: Vec<UserRecord>) -> Self {
        let group_units = group_units(&records);
        let visible = (0..records.len()).collect();
        let expand = vec![Expand::Collapsed; records.len()];

        CadastrosView {
            records,
            group_units,
            filter: CadastroFilter::default(),
            visible,
            expand,
        }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn filter(&self) -> &CadastroFilter {
        &self.filter
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn groups(&self) -> Vec<&str> {
        self.group_units.keys().map(|x| x.as_str()).collect()
    }

    pub fn units_for(&self, group: &str) -> Vec<&str> {
        match self.group_units.get(group) {
            Some(units) => units.iter().map(|x| x.as_str()).collect(),
            None => Vec::new(),
        }
    }

    /// 当前 grupo 的 unidade 列表
    pub fn units(&self) -> Vec<&str> {
        self.units_for(&self.filter.group)
    }

    /// 表单提交的完整过滤条件
    /// grupo 变化时 unidade 被重置, 返回 true 表示需要刷新 unidade 下拉框
    pub fn apply_filter(&mut self, mut filter: CadastroFilter) -> bool {
        let group_changed = filter.group != self.filter.group;
        if group_changed || !filter.unit_enabled() {
            filter.unit.clear();
        }

        self.filter = filter;
        self.refilter();
        group_changed
    }

    pub fn set_name_filter(&mut self, name: &str) {
        let mut filter = self.filter.clone();
        filter.name = name.to_string();
        self.apply_filter(filter);
    }

    pub fn select_group(&mut self, group: &str) {
        let mut filter = self.filter.clone();
        filter.group = group.to_string();
        self.apply_filter(filter);
    }

    pub fn select_unit(&mut self, unit: &str) {
        let mut filter = self.filter.clone();
        filter.unit = unit.to_string();
        self.apply_filter(filter);
    }

    pub fn clear_filter(&mut self) {
        self.filter = CadastroFilter::default();
        self.refilter();
    }

    /// 展开/收起, 只对当前可见的行有效
    pub fn toggle(&mut self, index: usize) -> Option<Expand> {
        if !self.visible.contains(&index) {
            return None;
        }

        let next = match self.expand[index] {
            Expand::Collapsed => Expand::Expanded,
            Expand::Expanded => Expand::Collapsed,
        };
        self.expand[index] = next;
        Some(next)
    }

    pub fn expand_state(&self, index: usize) -> Option<Expand> {
        self.expand.get(index).copied()
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.visible.iter().map(|&i| {
            let user = &self.records[i];
            let expanded = self.expand[i] == Expand::Expanded;
            let devices = if expanded {
                user.devices.iter().map(|d| DeviceView {
                    make: d.make.clone(),
                    model: d.model.clone(),
                    color: d.color.clone(),
                    plate: d.plate.clone(),
                    status: if d.status { "Ativo" } else { "Inativo" },
                }).collect()
            } else {
                Vec::new()
            };

            RowView {
                index: i,
                name: user.name.clone(),
                group: user.group.clone(),
                unit: user.unit.clone(),
                plates: user.plate_list(),
                expanded,
                devices,
            }
        }).collect()
    }

    // 重新过滤后所有行都是收起状态
    fn refilter(&mut self) {
        self.visible = filter_records(&self.records, &self.filter);
        for v in self.expand.iter_mut() {
            *v = Expand::Collapsed;
        }
    }
}


#[cfg(test)]
mod tests {
    use lpr_base::model::cadastro::Device;

    use super::*;

    fn user(name: &str, group: &str, unit: &str, plates: &[&str]) -> UserRecord {
        UserRecord {
            name: name.to_string(),
            group: group.to_string(),
            unit: unit.to_string(),
            devices: plates.iter().map(|p| Device {
                make: "Fiat".to_string(),
                model: "Uno".to_string(),
                color: "Prata".to_string(),
                plate: p.to_string(),
                status: true,
            }).collect(),
        }
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            user("Ana Souza", "Bloco B", "202", &["ABC1234"]),
            user("Bruno Lima", "Bloco A", "101", &["XYZ9K87", "DEF5678"]),
            user("Carla Dias", "Bloco A", "103", &[]),
            user("anaLU", "Bloco B", "201", &["GHI4321"]),
            user("Diego", "Bloco A", "101", &["JKL0001"]),
        ]
    }

    #[test]
    fn groups_and_units_are_sorted_sets() {
        let view = CadastrosView::new(sample());
        assert_eq!(view.groups(), vec!["Bloco A", "Bloco B"]);
        assert_eq!(view.units_for("Bloco A"), vec!["101", "103"]);
        assert_eq!(view.units_for("Bloco B"), vec!["201", "202"]);
        assert!(view.units_for("Bloco Z").is_empty());
        assert!(view.units().is_empty());
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let records = sample();
        let all = filter_records(&records, &CadastroFilter::default());
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let records = sample();
        let f = CadastroFilter { name: "ANA".to_string(), ..Default::default() };
        assert_eq!(filter_records(&records, &f), vec![0, 3]);
    }

    #[test]
    fn stepwise_filter_equals_combined() {
        let records = sample();
        let combined = CadastroFilter {
            name: "i".to_string(),
            group: "Bloco A".to_string(),
            unit: "101".to_string(),
        };
        let all_at_once = filter_records(&records, &combined);

        let step1: Vec<usize> = filter_records(&records, &CadastroFilter { name: "i".to_string(), ..Default::default() });
        let step2: Vec<usize> = step1.into_iter().filter(|&i| records[i].group == "Bloco A").collect();
        let step3: Vec<usize> = step2.into_iter().filter(|&i| records[i].unit == "101").collect();

        assert_eq!(all_at_once, step3);
        assert_eq!(all_at_once, vec![1, 4]);
    }

    #[test]
    fn unit_ignored_while_disabled() {
        let records = sample();
        let f = CadastroFilter { unit: "101".to_string(), ..Default::default() };
        assert!(!f.unit_enabled());
        assert_eq!(filter_records(&records, &f).len(), records.len());
    }

    #[test]
    fn group_change_resets_unit() {
        let mut view = CadastrosView::new(sample());
        view.select_group("Bloco A");
        view.select_unit("101");
        assert_eq!(view.visible(), &[1, 4]);

        let changed = view.apply_filter(CadastroFilter {
            name: String::new(),
            group: "Bloco B".to_string(),
            unit: "101".to_string(),
        });
        assert!(changed);
        assert_eq!(view.filter().unit, "");
        assert_eq!(view.units(), vec!["201", "202"]);
        assert_eq!(view.visible(), &[0, 3]);

        view.clear_filter();
        assert!(view.filter().is_empty());
        assert_eq!(view.visible().len(), 5);
    }

    #[test]
    fn expand_then_collapse_restores_rows() {
        let mut view = CadastrosView::new(sample());
        let before = view.rows();

        assert_eq!(view.toggle(1), Some(Expand::Expanded));
        let expanded = view.rows();
        assert_eq!(expanded[1].devices.len(), 2);
        assert_eq!(expanded[1].devices[0].status, "Ativo");

        assert_eq!(view.toggle(1), Some(Expand::Collapsed));
        assert_eq!(view.rows(), before);
    }

    #[test]
    fn toggle_hidden_row_is_ignored_and_filter_collapses() {
        let mut view = CadastrosView::new(sample());
        view.toggle(0);
        view.set_name_filter("bruno");
        assert_eq!(view.expand_state(0), Some(Expand::Collapsed));
        assert_eq!(view.toggle(0), None);
        assert_eq!(view.toggle(99), None);
        assert_eq!(view.toggle(1), Some(Expand::Expanded));
    }

    #[test]
    fn rows_show_plate_list() {
        let view = CadastrosView::new(sample());
        let rows = view.rows();
        assert_eq!(rows[1].plates, "XYZ9K87 / DEF5678");
        assert_eq!(rows[2].plates, "Nenhuma");
        assert!(rows.iter().all(|r| r.devices.is_empty()));
    }
}
