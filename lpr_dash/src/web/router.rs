use actix::Addr;
use actix_files::Files;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_web_actors::ws;
use log::debug;

use crate::services::ws::agent::WsAgent;
use crate::services::ws::session::WsSession;
use crate::web::controllers::{cadastros_ctl, camera_ctl, mg3000_ctl, page_ctl};

async fn ws_route(room: web::Path<String>, req: HttpRequest,
                  stream: web::Payload, srv: web::Data<Addr<WsAgent>>) -> Result<HttpResponse, Error> {
    let room = room.into_inner();
    debug!("WS, ws_route, room: {}", room);

    ws::start(WsSession::new(&room, srv.get_ref().clone()), &req, stream)
}

pub fn config(cfg: &mut web::ServiceConfig, static_dir: &str) {
    cfg.service(Files::new("/css", format!("{}/css", static_dir)).prefer_utf8(true).disable_content_disposition())
        .service(Files::new("/js", format!("{}/js", static_dir)).prefer_utf8(true).disable_content_disposition())
        .service(Files::new("/assets", format!("{}/assets", static_dir)).disable_content_disposition())
        .service(web::resource("/ws/{room}").to(ws_route))
        .route("/", web::get().to(page_ctl::index))
        .route("/view", web::get().to(page_ctl::current))
        .route("/view/{page}", web::get().to(page_ctl::view))
        .route("/cadastros/filter", web::post().to(cadastros_ctl::filter))
        .route("/cadastros/clear", web::post().to(cadastros_ctl::clear))
        .route("/cadastros/toggle/{index}", web::post().to(cadastros_ctl::toggle))
        .route("/camera/toggle/{index}", web::post().to(camera_ctl::toggle))
        .route("/mg3000/save", web::post().to(mg3000_ctl::save));
}
