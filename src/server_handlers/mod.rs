pub mod docs;
pub mod timetable;
pub mod weeks;

pub use docs::*;
pub use timetable::*;
pub use weeks::*;

use actix_web::HttpResponse;
use serde_json::json;

use crate::error::TimetableError;

/// Traduce el error del cargador a un código HTTP.
pub(crate) fn error_response(e: &TimetableError) -> HttpResponse {
    let body = json!({"error": e});
    match e {
        TimetableError::Validation(_) => HttpResponse::BadRequest().json(body),
        TimetableError::Precondition(_) => HttpResponse::Conflict().json(body),
        TimetableError::Fetch(_) => HttpResponse::BadGateway().json(body),
    }
}
