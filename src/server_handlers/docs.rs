use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "API del cargador de horarios: inicializa semestre y bloques, navega semanas y convierte selecciones de semanas a cadenas de rangos.",
        "endpoints": {
            "POST /timetable/init": "inicializa (idempotente) y devuelve el snapshot",
            "GET /timetable/status": "snapshot sin disparar peticiones",
            "GET /timetable/semester": "ventana del semestre y semanas derivadas",
            "GET /timetable/sections": "catálogo de bloques horarios",
            "GET /timetable/week/{week}": "selecciona la semana y devuelve su horario",
            "GET /timetable/schedule": "horario almacenado actualmente",
            "DELETE /timetable": "limpia la sesión (logout)",
            "GET /weeks/decode": "text=1-8,10&total=18 -> selección booleana",
            "POST /weeks/encode": "{\"selection\": [true,true,false]} -> \"1-2\"",
            "POST /weeks/bulk": "{\"op\": \"all|none|odd|even|toggle\", \"weeks\": \"1-4\", \"total\": 18, \"week\": 3}"
        },
        "weeks_format": "tokens separados por coma, cada uno N o N-M, ascendentes y sin espacios (ej. 1-8,10,12-16)"
    });
    HttpResponse::Ok().json(help)
}
