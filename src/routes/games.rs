//! Game-related HTTP routes: the unary half of the command surface.

use actix_web::{web, HttpResponse, Result};
use tracing::debug;

use crate::domain::Phase;
use crate::errors::{AppError, ErrorCode};
use crate::protocol::{
    CreateGameResponse, GameAction, GameActionRequest, ListGamesQuery, ListGamesResponse,
    SessionQuery, StatusResponse,
};
use crate::state::AppState;

async fn create_game(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let game_id = app_state.service().create_game();
    Ok(HttpResponse::Ok().json(CreateGameResponse { game_id }))
}

async fn list_games(
    query: web::Query<ListGamesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let phases = parse_phase_filter(query.phases.as_deref())?;
    let games = app_state.service().list_games(&phases);
    Ok(HttpResponse::Ok().json(ListGamesResponse { games }))
}

fn parse_phase_filter(raw: Option<&str>) -> Result<Vec<Phase>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Phase>().map_err(|_| {
                AppError::bad_request(ErrorCode::BadRequest, format!("unknown phase '{s}'"))
            })
        })
        .collect()
}

/// POST /api/games/{game_id}/action
///
/// Routes one of the in-game commands. Always answers 200 with a status
/// body: code 0 on success, a non-zero code plus message otherwise.
async fn game_action(
    path: web::Path<String>,
    body: web::Json<GameActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let request = body.into_inner();
    let service = app_state.service();

    let outcome = match &request.action {
        GameAction::ReadyToStart => service.ready_to_start(&request.session_id, &game_id),
        GameAction::LeaveGame => service.leave_game(&request.session_id, &game_id),
        GameAction::PlayCard { card } => service.play_card(&request.session_id, &game_id, card),
    };

    let status = match outcome {
        Ok(()) => StatusResponse::ok(),
        Err(err) => {
            debug!(game_id, session_id = request.session_id, error = %err, "game action rejected");
            StatusResponse {
                code: err.code().status(),
                error: Some(err.detail()),
            }
        }
    };
    Ok(HttpResponse::Ok().json(status))
}

async fn game_state(
    path: web::Path<String>,
    query: web::Query<SessionQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let view = app_state
        .service()
        .game_state(query.session_id.as_deref(), &game_id)?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/games")
            .route("", web::post().to(create_game))
            .route("", web::get().to(list_games))
            .route("/{game_id}/action", web::post().to(game_action))
            .route("/{game_id}/state", web::get().to(game_state)),
    );
}
