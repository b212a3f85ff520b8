use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::calendar::{DEFAULT_TOTAL_WEEKS, MAX_TOTAL_WEEKS};
use crate::weeks::{decode, encode, WeekSelection};

/// `total` pedido o el valor por defecto; fuera de `1..=99` es un 400.
fn requested_total(total: Option<usize>) -> Result<usize, HttpResponse> {
    let total = total.unwrap_or(DEFAULT_TOTAL_WEEKS as usize);
    if total == 0 || total > MAX_TOTAL_WEEKS as usize {
        return Err(HttpResponse::BadRequest().json(json!({
            "error": format!("total must be between 1 and {}", MAX_TOTAL_WEEKS)
        })));
    }
    Ok(total)
}

#[derive(Deserialize)]
pub struct DecodeQuery {
    #[serde(default)]
    text: String,
    total: Option<usize>,
}

/// GET /weeks/decode?text=1-8,10&total=18
pub async fn decode_handler(query: web::Query<DecodeQuery>) -> impl Responder {
    let q = query.into_inner();
    let total = match requested_total(q.total) {
        Ok(total) => total,
        Err(resp) => return resp,
    };
    let selection = decode(&q.text, total);
    HttpResponse::Ok().json(json!({
        "total": total,
        "selection": selection,
        // forma canónica de lo que se pudo interpretar
        "weeks": encode(&selection),
    }))
}

#[derive(Deserialize)]
pub struct EncodeRequest {
    selection: WeekSelection,
}

/// POST /weeks/encode {"selection": [true, false, ...]}
pub async fn encode_handler(body: web::Json<EncodeRequest>) -> impl Responder {
    let req = body.into_inner();
    if req.selection.total_weeks() > MAX_TOTAL_WEEKS as usize {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("selection cannot exceed {} weeks", MAX_TOTAL_WEEKS)
        }));
    }
    HttpResponse::Ok().json(json!({"weeks": encode(&req.selection)}))
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkOp {
    All,
    #[serde(rename = "none")]
    Clear,
    Odd,
    Even,
    Toggle,
}

#[derive(Deserialize)]
pub struct BulkRequest {
    op: BulkOp,
    #[serde(default)]
    weeks: String,
    total: Option<usize>,
    week: Option<usize>,
}

/// POST /weeks/bulk {"op": "odd", "weeks": "1-4", "total": 18}
pub async fn bulk_handler(body: web::Json<BulkRequest>) -> impl Responder {
    let req = body.into_inner();
    let total = match requested_total(req.total) {
        Ok(total) => total,
        Err(resp) => return resp,
    };
    let current = decode(&req.weeks, total);
    let next = match req.op {
        BulkOp::All => current.select_all(),
        BulkOp::Clear => current.clear_all(),
        BulkOp::Odd => current.select_odd(),
        BulkOp::Even => current.select_even(),
        BulkOp::Toggle => match req.week {
            Some(w) if w >= 1 && w <= total => current.toggle(w),
            _ => return HttpResponse::BadRequest().json(json!({"error": format!("toggle requires a week between 1 and {}", total)})),
        },
    };
    HttpResponse::Ok().json(json!({"weeks": encode(&next), "selection": next}))
}
