use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::error_response;
use crate::calendar::week_dates;
use crate::session::Timetable;

/// POST /timetable/init
pub async fn init_handler(timetable: web::Data<Timetable>) -> impl Responder {
    let snapshot = timetable.initialize().await;
    HttpResponse::Ok().json(snapshot)
}

/// GET /timetable/status
pub async fn status_handler(timetable: web::Data<Timetable>) -> impl Responder {
    HttpResponse::Ok().json(timetable.snapshot())
}

/// GET /timetable/semester
pub async fn semester_handler(timetable: web::Data<Timetable>) -> impl Responder {
    match timetable.semester() {
        Some(resolved) => {
            let selected = timetable.selected_week();
            // lunes y domingo de la semana mostrada
            let span = selected.and_then(|w| week_dates(&resolved.window.start_date, w));
            HttpResponse::Ok().json(json!({
                "semester": resolved.window,
                "weeks": resolved.weeks,
                "selectedWeek": selected,
                "selectedWeekDates": span,
            }))
        }
        None => HttpResponse::NotFound().json(json!({"error": "semester not loaded", "state": timetable.coordinator().semester().state()})),
    }
}

/// GET /timetable/sections
pub async fn sections_handler(timetable: web::Data<Timetable>) -> impl Responder {
    let sections = timetable.sections();
    HttpResponse::Ok().json(json!({
        "state": timetable.coordinator().sections().state(),
        "sections": sections.as_ref(),
    }))
}

/// GET /timetable/week/{week}
pub async fn week_handler(timetable: web::Data<Timetable>, path: web::Path<u32>) -> impl Responder {
    let week = path.into_inner();
    match timetable.select_week(week).await {
        Ok(entries) => HttpResponse::Ok().json(json!({"week": week, "entries": entries.as_ref()})),
        Err(e) => error_response(&e),
    }
}

/// GET /timetable/schedule
pub async fn schedule_view_handler(timetable: web::Data<Timetable>) -> impl Responder {
    HttpResponse::Ok().json(timetable.schedule_view())
}

/// DELETE /timetable
pub async fn teardown_handler(timetable: web::Data<Timetable>) -> impl Responder {
    timetable.teardown();
    HttpResponse::Ok().json(json!({"status": "ok"}))
}
