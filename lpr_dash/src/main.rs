use std::sync::Arc;

use actix::Actor;
use clap::{App, Arg};
use log::{debug, error, info};
use tokio::sync::watch;

use lpr_base::util::{logger, utils};
use lpr_dash::app_cfg::AppCfg;
use lpr_dash::app_ctx::AppCtx;
use lpr_dash::dash::render::Views;
use lpr_dash::services::event_sub::EventSubSvc;
use lpr_dash::services::ServiceRepo;
use lpr_dash::services::signal_proc::SignalProcSvc;
use lpr_dash::services::ws::agent::WsAgent;
use lpr_dash::services::ws::worker::DashWorker;
use lpr_dash::web::server::WebServer;

const APP_NAME: &str = "lpr_dash";
const APP_VER_NUM: &str = "0.1.0";

/**
) 命令行参数处理
) 读取配置文件
) 初始化日志
) 初始化 worker + web + service
) 初始化出错退出
) 中断退出
*/
#[actix_web::main]
async fn main() {
    std::env::set_var("RUST_BACKTRACE", "1");

    let cli_app = App::new(APP_NAME)
        .version(APP_VER_NUM)
        .about("web dashboard for plate recognition")
        .arg(Arg::with_name("config")
            .short("c")
            .long("config")
            .takes_value(true)
            .value_name("CONFIG")
            .help("config file")
            .default_value("cfg.json")
        );

    let cli_matches = cli_app.get_matches();
    let config_file = cli_matches.value_of("config").unwrap_or("cfg.json");

    println!("read config: {}", config_file);

    // 读取配置文件
    let mut cfg = match AppCfg::load(config_file) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error, load config {}, {}", config_file, e);
            return;
        }
    };
    cfg.replace_var();
    if let Err(e) = cfg.validate() {
        eprintln!("error, invalid config, {}", e);
        return;
    }

    // 初始化日志
    if let Err(e) = utils::prepare_parent_dir(&cfg.log.file).await {
        eprintln!("error, prepare log dir, {}", e);
        return;
    }
    if logger::init_app_logger_str(&cfg.log.file, APP_NAME, &cfg.log.level, &cfg.log.lib_level).is_err() {
        eprintln!("error, init logger");
        return;
    }
    debug!("{:?}", cfg);

    info!("{} start ...", APP_NAME);

    let views = match Views::new(&cfg.dash.views) {
        Ok(v) => v,
        Err(e) => {
            error!("error, load views {}, {}", cfg.dash.views, e);
            return;
        }
    };

    let (tx, rx) = watch::channel(1_i64);

    let app_ctx = match AppCtx::new(cfg, rx) {
        Ok(v) => Arc::new(v),
        Err(e) => {
            error!("error, init app ctx, {}", e);
            return;
        }
    };

    let signal_proc_svc = match SignalProcSvc::new(tx) {
        Ok(v) => v,
        Err(e) => {
            error!("error, init signal, {}", e);
            return;
        }
    };

    // worker 先启动, agent 启动后向 worker 注册
    let worker = DashWorker::new(app_ctx.clone(), views).start();
    let agent = WsAgent::new(worker.clone()).start();

    let event_sub_svc = EventSubSvc::new(app_ctx.clone(), worker.clone().recipient());
    let web_server = WebServer::new(app_ctx.clone(), worker, agent);

    // 启动各个模块
    let mut svc_repo = ServiceRepo::new(app_ctx.clone());
    svc_repo.start_service(signal_proc_svc);
    svc_repo.start_service(event_sub_svc);

    info!("start web_server");
    svc_repo.start_service(web_server);

    svc_repo.join().await;
    info!("app exit.");
}
