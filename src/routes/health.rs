use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::protocol::{PingRequest, PingResponse};

async fn ping(body: web::Json<PingRequest>) -> Result<HttpResponse, AppError> {
    tracing::debug!(message = body.message, "got ping");
    Ok(HttpResponse::Ok().json(PingResponse {
        message: "Pong".to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/ping", web::post().to(ping));
}
