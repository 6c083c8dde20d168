use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppResult;

use super::cadastros::CadastrosView;
use super::camera::SettingsView;
use super::control::{ChannelTable, ControlView};
use super::notify::Notifier;
use super::session::{DashSession, Page, View};

pub const TARGET_MAIN: &str = "main-content";
pub const TARGET_CADASTROS_ROWS: &str = "cadastros-rows";
pub const TARGET_UNIT_FILTER: &str = "unit-filter";
pub const TARGET_MARQUEE: &str = "status-marquee";
pub const TARGET_SNACKBAR: &str = "snackbar";

pub fn camera_row_target(index: usize) -> String {
    format!("camera-row-{}", index)
}

pub fn channel_table_target(number: u32) -> String {
    format!("table-body-{}", number)
}

/// 推给浏览器的页面片段, 替换 target 元素的内容
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Patch {
    pub target: String,
    pub html: String,
}

impl Patch {
    pub fn new(target: &str, html: String) -> Self {
        Patch {
            target: target.to_string(),
            html,
        }
    }
}

#[derive(Serialize)]
struct ChannelView<'a> {
    number: u32,
    title: &'a str,
    target: String,
    body: String,
}

/// tera 模板, .tpl 也做 html 转义
pub struct Views {
    tmpl: Tera,
}

impl Views {
    pub fn new(glob: &str) -> AppResult<Self> {
        let mut tmpl = Tera::new(glob)?;
        tmpl.autoescape_on(vec![".tpl"]);
        Ok(Views { tmpl })
    }

    fn render(&self, name: &str, ctx: &Context) -> AppResult<String> {
        let html = self.tmpl.render(name, ctx)?;
        Ok(html)
    }

    pub fn layout(&self, page: Page) -> AppResult<String> {
        let mut ctx = Context::new();
        ctx.insert("page", page.name());
        ctx.insert("title", page.title());
        self.render("main.tpl", &ctx)
    }

    /// 当前页面的完整内容
    pub fn view(&self, session: &DashSession) -> AppResult<String> {
        match session.view() {
            View::None => Ok(String::new()),
            View::Cadastros(v) => self.cadastros(v),
            View::Settings(v) => self.settings(v),
            View::Control(v) => self.control(v),
        }
    }

    pub fn view_error(&self, page: Page) -> AppResult<String> {
        let mut ctx = Context::new();
        ctx.insert("title", page.title());
        ctx.insert("message", page.load_error());
        self.render("view_error.tpl", &ctx)
    }

    //------------------- cadastros -------------------
    pub fn cadastros(&self, view: &CadastrosView) -> AppResult<String> {
        let mut ctx = self.unit_context(view);
        ctx.insert("title", Page::Cadastros.title());
        ctx.insert("groups", &view.groups());
        ctx.insert("rows", &view.rows());
        self.render("cadastros.tpl", &ctx)
    }

    pub fn cadastros_rows(&self, view: &CadastrosView) -> AppResult<String> {
        let mut ctx = Context::new();
        ctx.insert("rows", &view.rows());
        self.render("cadastros_rows.tpl", &ctx)
    }

    pub fn unit_options(&self, view: &CadastrosView) -> AppResult<String> {
        let ctx = self.unit_context(view);
        self.render("unit_options.tpl", &ctx)
    }

    fn unit_context(&self, view: &CadastrosView) -> Context {
        let filter = view.filter();
        let mut ctx = Context::new();
        ctx.insert("name_filter", &filter.name);
        ctx.insert("group_filter", &filter.group);
        ctx.insert("unit_filter", &filter.unit);
        ctx.insert("unit_enabled", &filter.unit_enabled());
        ctx.insert("units", &view.units());
        ctx
    }

    //------------------- configurações -------------------
    pub fn settings(&self, view: &SettingsView) -> AppResult<String> {
        let mut ctx = Context::new();
        ctx.insert("title", Page::Settings.title());
        ctx.insert("cameras", &view.row_views());
        ctx.insert("mg3000", view.mg3000());
        self.render("settings.tpl", &ctx)
    }

    pub fn camera_row(&self, view: &SettingsView, index: usize) -> AppResult<Option<String>> {
        let row = match view.row_view(index) {
            Some(v) => v,
            None => return Ok(None),
        };

        let mut ctx = Context::new();
        ctx.insert("camera", &row);
        self.render("camera_row.tpl", &ctx).map(Some)
    }

    //------------------- controle -------------------
    pub fn control(&self, view: &ControlView) -> AppResult<String> {
        let mut channels = Vec::with_capacity(view.tables().len());
        for t in view.tables().iter() {
            channels.push(ChannelView {
                number: t.number,
                title: &t.title,
                target: channel_table_target(t.number),
                body: self.channel_rows(t)?,
            });
        }

        let mut ctx = Context::new();
        ctx.insert("title", Page::Control.title());
        ctx.insert("marquee", view.marquee());
        ctx.insert("channels", &channels);
        self.render("control.tpl", &ctx)
    }

    pub fn channel_rows(&self, table: &ChannelTable) -> AppResult<String> {
        let rows: Vec<_> = table.rows().collect();
        let mut ctx = Context::new();
        ctx.insert("rows", &rows);
        self.render("channel_rows.tpl", &ctx)
    }

    pub fn marquee(&self, view: &ControlView) -> AppResult<String> {
        let mut ctx = Context::new();
        ctx.insert("marquee", view.marquee());
        self.render("marquee.tpl", &ctx)
    }

    //------------------- snackbar -------------------
    pub fn snackbar(&self, notifier: &Notifier) -> AppResult<String> {
        let mut ctx = Context::new();
        ctx.insert("snacks", &notifier.snacks());
        self.render("snacks.tpl", &ctx)
    }
}


#[cfg(test)]
mod tests {
    use lpr_base::model::cadastro::{Device, UserRecord};
    use lpr_base::model::camera::CameraConfig;
    use lpr_base::model::detection::{ActiveChannel, CustomerInfo, DetectionEvent};

    use super::super::notify::SnackKind;
    use super::*;

    fn views() -> Views {
        let glob = format!("{}/views/**/*.tpl", env!("CARGO_MANIFEST_DIR"));
        Views::new(&glob).unwrap()
    }

    fn records() -> Vec<UserRecord> {
        vec![
            UserRecord {
                name: "Ana <b>".to_string(),
                group: "Bloco A".to_string(),
                unit: "101".to_string(),
                devices: vec![Device {
                    make: "Fiat".to_string(),
                    model: "Uno".to_string(),
                    color: "Prata".to_string(),
                    plate: "ABC1234".to_string(),
                    status: false,
                }],
            },
            UserRecord {
                name: "Bruno".to_string(),
                group: "Bloco B".to_string(),
                unit: "202".to_string(),
                devices: vec![],
            },
        ]
    }

    #[test]
    fn layout_and_error() {
        let v = views();
        let html = v.layout(Page::Cadastros).unwrap();
        assert!(html.contains(r#"id="main-content""#));
        assert!(html.contains(r#"id="snackbar""#));

        let html = v.view_error(Page::Settings).unwrap();
        assert!(html.contains("Erro ao carregar configurações. Tente novamente mais tarde."));
    }

    #[test]
    fn cadastros_markup() {
        let v = views();
        let mut view = CadastrosView::new(records());
        let html = v.cadastros(&view).unwrap();
        assert!(html.contains("Ana &lt;b&gt;"));
        assert!(html.contains("Nenhuma"));
        assert!(html.contains("Selecione uma Unidade"));
        assert!(html.contains("Selecione um Grupo"));
        assert!(html.contains(">Bloco B</option>"));

        view.toggle(0);
        let rows = v.cadastros_rows(&view).unwrap();
        assert!(rows.contains("Inativo"));

        view.select_group("Bloco A");
        let units = v.unit_options(&view).unwrap();
        assert!(units.contains("Todas as Unidades"));
        assert!(units.contains(">101</option>"));
        assert!(!units.contains("disabled"));
    }

    #[test]
    fn settings_markup() {
        let v = views();
        let cameras = vec![CameraConfig {
            equip_add: "10.0.0.1".to_string(),
            equip_user: "admin".to_string(),
            equip_pass: "supersecret".to_string(),
            channel_occupied: Some("chan3".to_string()),
            ..Default::default()
        }];
        let view = SettingsView::new(cameras, &Default::default(), &[]);
        let html = v.settings(&view).unwrap();
        assert!(html.contains("********"));
        assert!(!html.contains("supersecret"));
        assert!(html.contains(r#"id="camera-row-0""#));
        assert!(html.contains(r#"name="portAddress_4""#));

        let row = v.camera_row(&view, 0).unwrap().unwrap();
        assert!(row.contains("red"));
        assert!(row.contains(r#"data-status="stopped""#));
        assert!(v.camera_row(&view, 3).unwrap().is_none());
    }

    #[test]
    fn control_markup() {
        let v = views();
        let mut view = ControlView::new(&[ActiveChannel { number: 2, camera_name: Some("Portão".to_string()) }]);
        view.insert(&DetectionEvent {
            channel_number: 2,
            timestamp: "10:00".to_string(),
            customer_info: CustomerInfo { plate: "ABC1234".to_string(), ..Default::default() },
        }).unwrap();

        let html = v.control(&view).unwrap();
        assert!(html.contains("Canal 2 - Portão"));
        assert!(html.contains(r#"id="table-body-2""#));
        assert!(html.contains("Processo em execução..."));
        // svg 不转义
        assert!(html.contains("<svg "));
        assert!(html.contains("current-access"));
        assert!(html.contains("Desconhecido"));
    }

    #[test]
    fn snackbar_markup() {
        let v = views();
        let mut n = Notifier::new();
        n.show(SnackKind::Info, "primeira");
        n.show(SnackKind::Error, "segunda");
        let html = v.snackbar(&n).unwrap();
        assert!(html.contains("fade-out"));
        assert!(html.contains("snack-error"));
        assert!(html.contains("segunda"));
    }
}
