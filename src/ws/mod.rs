//! Websocket endpoints for the three server-streaming calls.

pub mod game;
pub mod session;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws/register", web::get().to(session::upgrade))
        .route("/ws/games/{game_id}/join", web::get().to(game::join))
        .route("/ws/games/{game_id}/observe", web::get().to(game::observe));
}
