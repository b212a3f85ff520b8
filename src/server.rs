use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use crate::config::Config;
use crate::server_handlers::{
    bulk_handler, decode_handler, encode_handler, help_handler, init_handler, schedule_view_handler, sections_handler,
    semester_handler, status_handler, teardown_handler, week_handler,
};
use crate::session::Timetable;
use crate::upstream::FileApi;

/// Registra las rutas; separado de `run_server` para poder probarlas con
/// `actix_web::test`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/timetable/init", web::post().to(init_handler))
        .route("/timetable/status", web::get().to(status_handler))
        .route("/timetable/semester", web::get().to(semester_handler))
        .route("/timetable/sections", web::get().to(sections_handler))
        .route("/timetable/week/{week}", web::get().to(week_handler))
        .route("/timetable/schedule", web::get().to(schedule_view_handler))
        .route("/timetable", web::delete().to(teardown_handler))
        .route("/weeks/decode", web::get().to(decode_handler))
        .route("/weeks/encode", web::post().to(encode_handler))
        .route("/weeks/bulk", web::post().to(bulk_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    log::info!("datos upstream en {}", config.data_dir.display());
    let api = Arc::new(FileApi::new(&config.data_dir));
    // una sola sesión compartida por todos los workers
    let timetable = web::Data::new(Timetable::new(api, &config));

    HttpServer::new(move || {
        App::new()
            .app_data(timetable.clone())
            .configure(configure)
    })
    .workers(config.workers)
    .bind(config.bind.as_str())?
    .run()
    .await
}
