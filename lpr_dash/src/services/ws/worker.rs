use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use log::{debug, error, info, warn};

use crate::app_ctx::AppCtx;
use crate::dash::bridge::{self, Effect};
use crate::dash::notify::{SNACK_FADE, SNACK_TTL, SnackKind};
use crate::dash::render::{self, Patch, Views};
use crate::dash::session::{CameraCommand, DashSession, MSG_SETTINGS_INACTIVE};
use crate::error::AppResult;
use crate::services::ws::{CadastrosAction, CadastrosCmd, CameraClick, CameraRequestFailed, CurrentView, DASH_ROOM,
                          DeliverMessage, LoadView, Mg3000Saved, PushMessage, RegisterMessage, SessionConnect, ViewData};

/// 面板状态都在这里, 一次处理一个消息
pub struct DashWorker {
    ctx: Arc<AppCtx>,
    views: Views,
    session: DashSession,
    agent_addr: Option<Recipient<DeliverMessage>>,
}

impl Actor for DashWorker {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("DashWorker started.");
    }
}

impl DashWorker {
    pub fn new(ctx: Arc<AppCtx>, views: Views) -> Self {
        DashWorker {
            ctx,
            views,
            session: DashSession::new(),
            agent_addr: None,
        }
    }

    fn deliver_msg(&self, msg: DeliverMessage) {
        match self.agent_addr {
            Some(ref addr) => addr.do_send(msg),
            None => debug!("DashWorker, agent not registered, drop message"),
        }
    }

    fn deliver_patch(&self, patch: &Patch, id: usize) {
        let content = match serde_json::to_string(patch) {
            Ok(v) => v,
            Err(e) => {
                error!("error, DashWorker, serde_json::to_string, {:?}", e);
                return;
            }
        };

        self.deliver_msg(DeliverMessage {
            msg: content,
            room: DASH_ROOM.to_string(),
            id,
        });
    }

    fn broadcast(&self, target: &str, html: AppResult<String>) {
        match html {
            Ok(html) => self.deliver_patch(&Patch::new(target, html), 0),
            Err(e) => error!("error, DashWorker, render {}, {}", target, e),
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>, ctx: &mut Context<Self>) {
        for effect in effects {
            match effect {
                Effect::CameraRow(index) => {
                    if let Some(settings) = self.session.settings() {
                        match self.views.camera_row(settings, index) {
                            Ok(Some(html)) => self.deliver_patch(&Patch::new(&render::camera_row_target(index), html), 0),
                            Ok(None) => debug!("DashWorker, camera row {} not found", index),
                            Err(e) => error!("error, DashWorker, render camera row, {}", e),
                        }
                    }
                }
                Effect::ChannelTable(number) => {
                    if let Some(table) = self.session.control().and_then(|c| c.table(number)) {
                        let html = self.views.channel_rows(table);
                        self.broadcast(&render::channel_table_target(number), html);
                    }
                }
                Effect::Marquee => {
                    if let Some(control) = self.session.control() {
                        let html = self.views.marquee(control);
                        self.broadcast(render::TARGET_MARQUEE, html);
                    }
                }
                Effect::Notify(kind, msg) => self.notify(kind, &msg, ctx),
            }
        }
    }

    //------------------- snackbar -------------------
    fn notify(&mut self, kind: SnackKind, msg: &str, ctx: &mut Context<Self>) {
        let (id, superseded) = self.session.notifier_mut().show(kind, msg);
        debug!("DashWorker, snack {}: {}", id, msg);

        if let Some(old) = superseded {
            ctx.run_later(SNACK_FADE, move |act, _ctx| act.remove_snack(old));
        }
        ctx.run_later(SNACK_TTL, move |act, ctx| act.expire_snack(id, ctx));

        self.broadcast_snackbar();
    }

    fn expire_snack(&mut self, id: u64, ctx: &mut Context<Self>) {
        if self.session.notifier_mut().expire(id) {
            ctx.run_later(SNACK_FADE, move |act, _ctx| act.remove_snack(id));
            self.broadcast_snackbar();
        }
    }

    fn remove_snack(&mut self, id: u64) {
        if self.session.notifier_mut().remove(id) {
            self.broadcast_snackbar();
        }
    }

    fn broadcast_snackbar(&self) {
        let html = self.views.snackbar(self.session.notifier());
        self.broadcast(render::TARGET_SNACKBAR, html);
    }

    //------------------- loading 超时 -------------------
    fn schedule_loading_timeout(&self, cmd: CameraCommand, ctx: &mut Context<Self>) {
        let secs = self.ctx.cfg.dash.loading_timeout_secs;
        if secs == 0 {
            return;
        }
        ctx.run_later(Duration::from_secs(secs), move |act, ctx| act.check_loading(cmd, ctx));
    }

    /// 仍然没有收到确认, 查询 process-status 修正
    fn check_loading(&mut self, cmd: CameraCommand, ctx: &mut Context<Self>) {
        if !self.session.camera_still_loading(&cmd) {
            return;
        }
        warn!("DashWorker, camera {} ({}) still loading, poll process-status", cmd.index, cmd.ip);

        let api = self.ctx.api.clone();
        let fut = async move { api.process_status().await };

        ctx.spawn(fut.into_actor(self).map(move |res, act, ctx| {
            let running_ips = match res {
                Ok(v) => Some(v.running_ips),
                Err(e) => {
                    error!("error, DashWorker, process_status, {}", e);
                    None
                }
            };
            let effects = act.session.camera_reconcile(&cmd, running_ips);
            act.apply_effects(effects, ctx);
        }));
    }

    //------------------- cadastros -------------------
    fn cadastros_action(&mut self, cmd: CadastrosCmd) -> bool {
        let mut patches = Vec::with_capacity(2);
        {
            let view = match self.session.cadastros_mut() {
                Some(v) => v,
                None => {
                    debug!("DashWorker, cadastros not loaded, ignore {:?}", cmd);
                    return false;
                }
            };

            match cmd {
                CadastrosCmd::Filter(filter) => {
                    // grupo 变化时 unidade 下拉框也要刷新
                    if view.apply_filter(filter) {
                        patches.push((render::TARGET_UNIT_FILTER, self.views.unit_options(view)));
                    }
                    patches.push((render::TARGET_CADASTROS_ROWS, self.views.cadastros_rows(view)));
                }
                CadastrosCmd::Clear => {
                    view.clear_filter();
                    patches.push((render::TARGET_MAIN, self.views.cadastros(view)));
                }
                CadastrosCmd::Toggle(index) => {
                    if view.toggle(index).is_none() {
                        return false;
                    }
                    patches.push((render::TARGET_CADASTROS_ROWS, self.views.cadastros_rows(view)));
                }
            }
        }

        for (target, html) in patches {
            self.broadcast(target, html);
        }
        true
    }
}

/// ws连接上来时候，发送当前的提示消息
impl Handler<SessionConnect> for DashWorker {
    type Result = usize;

    fn handle(&mut self, msg: SessionConnect, _ctx: &mut Context<Self>) -> Self::Result {
        match self.views.snackbar(self.session.notifier()) {
            Ok(html) => self.deliver_patch(&Patch::new(render::TARGET_SNACKBAR, html), msg.id),
            Err(e) => error!("error, DashWorker, render snackbar, {}", e),
        }
        msg.id
    }
}

impl Handler<RegisterMessage> for DashWorker {
    type Result = ();

    /// 记录 agent的地址
    fn handle(&mut self, msg: RegisterMessage, _ctx: &mut Context<Self>) -> Self::Result {
        debug!("DashWorker, handle RegisterMessage");
        self.agent_addr = Some(msg.addr);
    }
}

impl Handler<LoadView> for DashWorker {
    type Result = AppResult<String>;

    fn handle(&mut self, msg: LoadView, _ctx: &mut Context<Self>) -> Self::Result {
        match msg.data {
            ViewData::Cadastros { records, running_ips } => {
                self.session.load_cadastros(records, running_ips);
            }
            ViewData::Settings { cameras, running_ips, mg3000 } => {
                self.session.load_settings(cameras, running_ips, &mg3000);
            }
            ViewData::Control { channels, histories } => {
                self.session.load_control(&channels, histories);
            }
            ViewData::Failed => {
                self.session.load_failed(msg.page);
                return self.views.view_error(msg.page);
            }
        }

        self.views.view(&self.session)
    }
}

impl Handler<CurrentView> for DashWorker {
    type Result = AppResult<String>;

    fn handle(&mut self, _msg: CurrentView, _ctx: &mut Context<Self>) -> Self::Result {
        self.views.view(&self.session)
    }
}

impl Handler<CadastrosAction> for DashWorker {
    type Result = bool;

    fn handle(&mut self, msg: CadastrosAction, _ctx: &mut Context<Self>) -> Self::Result {
        self.cadastros_action(msg.0)
    }
}

impl Handler<CameraClick> for DashWorker {
    type Result = Option<CameraCommand>;

    fn handle(&mut self, msg: CameraClick, ctx: &mut Context<Self>) -> Self::Result {
        // 其他浏览器已经切换了页面
        if self.session.settings().is_none() {
            warn!("DashWorker, camera click {}, settings not active", msg.index);
            self.notify(SnackKind::Error, MSG_SETTINGS_INACTIVE, ctx);
            return None;
        }

        let (cmd, effects) = self.session.camera_click(msg.index)?;
        info!("DashWorker, camera {} ({}) {:?}", cmd.index, cmd.ip, cmd.pending);

        self.apply_effects(effects, ctx);
        self.schedule_loading_timeout(cmd.clone(), ctx);
        Some(cmd)
    }
}

impl Handler<CameraRequestFailed> for DashWorker {
    type Result = ();

    fn handle(&mut self, msg: CameraRequestFailed, ctx: &mut Context<Self>) -> Self::Result {
        let effects = self.session.camera_request_failed(&msg.0);
        self.apply_effects(effects, ctx);
    }
}

impl Handler<Mg3000Saved> for DashWorker {
    type Result = ();

    fn handle(&mut self, msg: Mg3000Saved, ctx: &mut Context<Self>) -> Self::Result {
        let effects = if msg.ok {
            self.session.mg3000_saved(&msg.list)
        } else {
            self.session.mg3000_save_failed()
        };
        self.apply_effects(effects, ctx);
    }
}

impl Handler<PushMessage> for DashWorker {
    type Result = ();

    fn handle(&mut self, msg: PushMessage, ctx: &mut Context<Self>) -> Self::Result {
        debug!("DashWorker, push event: {}", msg.0.kind().name());
        let effects = bridge::dispatch(&mut self.session, msg.0);
        self.apply_effects(effects, ctx);
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::watch;

    use lpr_base::api::push::PushEvent;
    use lpr_base::model::camera::CameraConfig;
    use lpr_base::model::detection::{ActiveChannel, CustomerInfo, DetectionEvent};

    use crate::app_cfg::AppCfg;
    use crate::dash::session::Page;

    use super::*;

    /// 代替 WsAgent, 收集 worker 推送的消息
    struct Collector {
        msgs: Arc<Mutex<Vec<DeliverMessage>>>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<DeliverMessage> for Collector {
        type Result = ();

        fn handle(&mut self, msg: DeliverMessage, _ctx: &mut Context<Self>) {
            self.msgs.lock().unwrap().push(msg);
        }
    }

    #[derive(Message)]
    #[rtype(result = "()")]
    struct Flush;

    impl Handler<Flush> for Collector {
        type Result = ();

        fn handle(&mut self, _msg: Flush, _ctx: &mut Context<Self>) {}
    }

    fn start_worker() -> (Addr<DashWorker>, Addr<Collector>, Arc<Mutex<Vec<DeliverMessage>>>) {
        let dir = env!("CARGO_MANIFEST_DIR");
        let mut cfg = AppCfg::load(&format!("{}/cfg.json", dir)).unwrap();
        cfg.replace_var();

        let (_tx, rx) = watch::channel(1_i64);
        let ctx = Arc::new(AppCtx::new(cfg, rx).unwrap());
        let views = Views::new(&format!("{}/views/**/*.tpl", dir)).unwrap();

        let worker = DashWorker::new(ctx, views).start();
        let msgs = Arc::new(Mutex::new(Vec::new()));
        let collector = Collector { msgs: msgs.clone() }.start();
        worker.do_send(RegisterMessage { addr: collector.clone().recipient() });

        (worker, collector, msgs)
    }

    fn targets(msgs: &Arc<Mutex<Vec<DeliverMessage>>>) -> Vec<String> {
        msgs.lock().unwrap().iter().map(|m| {
            let v: serde_json::Value = serde_json::from_str(&m.msg).unwrap();
            v["target"].as_str().unwrap().to_string()
        }).collect()
    }

    fn camera(ip: &str) -> CameraConfig {
        CameraConfig {
            equip_add: ip.to_string(),
            equip_user: "admin".to_string(),
            equip_pass: "x".to_string(),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn settings_play_started_round_trip() {
        let (worker, collector, msgs) = start_worker();

        let html = worker.send(LoadView {
            page: Page::Settings,
            data: ViewData::Settings {
                cameras: vec![camera("10.0.0.1")],
                running_ips: Vec::new(),
                mg3000: Vec::new(),
            },
        }).await.unwrap().unwrap();
        assert!(html.contains(r#"id="camera-row-0""#));

        let cmd = worker.send(CameraClick { index: 0 }).await.unwrap().unwrap();
        assert_eq!(cmd.ip, "10.0.0.1");
        // loading 中再次点击无效
        assert!(worker.send(CameraClick { index: 0 }).await.unwrap().is_none());

        worker.send(PushMessage(PushEvent::ProcessStarted { ip: "10.0.0.1".to_string() })).await.unwrap();
        collector.send(Flush).await.unwrap();

        let t = targets(&msgs);
        assert_eq!(t.iter().filter(|x| *x == "camera-row-0").count(), 2);
        assert!(t.iter().any(|x| x == "snackbar"));
        assert!(msgs.lock().unwrap().iter().all(|m| m.id == 0 && m.room == DASH_ROOM));

        let last_row = msgs.lock().unwrap().iter().rev()
            .find(|m| m.msg.contains("camera-row-0"))
            .map(|m| m.msg.clone())
            .unwrap();
        assert!(last_row.contains("green"));
    }

    #[actix_web::test]
    async fn current_view_reflects_pushes_missed_by_a_browser() {
        let (worker, _collector, _msgs) = start_worker();

        worker.send(LoadView {
            page: Page::Settings,
            data: ViewData::Settings {
                cameras: vec![camera("10.0.0.1")],
                running_ips: Vec::new(),
                mg3000: Vec::new(),
            },
        }).await.unwrap().unwrap();
        worker.send(CameraClick { index: 0 }).await.unwrap().unwrap();
        worker.send(PushMessage(PushEvent::ProcessStarted { ip: "10.0.0.1".to_string() })).await.unwrap();

        let html = worker.send(CurrentView).await.unwrap().unwrap();
        assert!(html.contains("status-circle green"));
        assert!(html.contains(r#"data-status="running""#));
        assert!(!html.contains(" disabled>"));
    }

    #[actix_web::test]
    async fn click_after_view_switch_notifies() {
        let (worker, collector, msgs) = start_worker();

        worker.send(LoadView {
            page: Page::Control,
            data: ViewData::Control { channels: Vec::new(), histories: Vec::new() },
        }).await.unwrap().unwrap();

        assert!(worker.send(CameraClick { index: 0 }).await.unwrap().is_none());
        collector.send(Flush).await.unwrap();

        assert_eq!(targets(&msgs), vec!["snackbar".to_string()]);
        assert!(msgs.lock().unwrap()[0].msg.contains("A página de configurações não está mais ativa."));
    }

    #[actix_web::test]
    async fn control_plate_found_and_failed_load() {
        let (worker, collector, msgs) = start_worker();

        worker.send(LoadView {
            page: Page::Control,
            data: ViewData::Control {
                channels: vec![ActiveChannel { number: 1, camera_name: None }],
                histories: Vec::new(),
            },
        }).await.unwrap().unwrap();

        worker.send(PushMessage(PushEvent::PlateFound(DetectionEvent {
            channel_number: 1,
            timestamp: "t".to_string(),
            customer_info: CustomerInfo { plate: "ABC1234".to_string(), ..Default::default() },
        }))).await.unwrap();
        collector.send(Flush).await.unwrap();
        assert_eq!(targets(&msgs), vec!["table-body-1".to_string()]);

        let html = worker.send(LoadView { page: Page::Cadastros, data: ViewData::Failed }).await.unwrap().unwrap();
        assert!(html.contains("Erro ao carregar cadastros. Tente novamente mais tarde."));
        assert_eq!(worker.send(CurrentView).await.unwrap().unwrap(), "");
        assert!(!worker.send(CadastrosAction(CadastrosCmd::Toggle(0))).await.unwrap());
    }
}
