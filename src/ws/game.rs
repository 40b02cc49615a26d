//! Game streams: one websocket per join or observe, carrying game events.

use std::sync::Arc;
use std::time::Instant;

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;

use super::session::{CLIENT_TIMEOUT, HEARTBEAT_INTERVAL};
use crate::protocol::{GameEvent, StatusResponse};
use crate::services::GameService;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamRole {
    Player,
    Observer,
}

#[derive(Debug, Deserialize)]
pub struct GameStreamQuery {
    pub session_id: String,
}

pub async fn join(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<String>,
    query: web::Query<GameStreamQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let socket = GameSocket::new(
        Arc::clone(app_state.service()),
        query.into_inner().session_id,
        path.into_inner(),
        StreamRole::Player,
    );
    ws::start(socket, &req, stream)
}

pub async fn observe(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<String>,
    query: web::Query<GameStreamQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let socket = GameSocket::new(
        Arc::clone(app_state.service()),
        query.into_inner().session_id,
        path.into_inner(),
        StreamRole::Observer,
    );
    ws::start(socket, &req, stream)
}

pub struct GameSocket {
    conn_id: Uuid,
    service: Arc<GameService>,
    session_id: String,
    game_id: String,
    role: StreamRole,
    /// Set once the listener queue is registered with the dispatcher.
    attached: bool,
    last_heartbeat: Instant,
}

impl GameSocket {
    fn new(service: Arc<GameService>, session_id: String, game_id: String, role: StreamRole) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            service,
            session_id,
            game_id,
            role,
            attached: false,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json<T: Serialize>(ctx: &mut ws::WebsocketContext<Self>, msg: &T) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound game event"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    session_id = %actor.session_id,
                    "game stream heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for GameSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let attach = match self.role {
            StreamRole::Player => self.service.join_game(&self.session_id, &self.game_id),
            StreamRole::Observer => self.service.observe_game(&self.session_id, &self.game_id),
        };
        match attach {
            Ok(events) => {
                info!(
                    conn_id = %self.conn_id,
                    session_id = %self.session_id,
                    game_id = %self.game_id,
                    "game stream opened"
                );
                self.attached = true;
                ctx.add_stream(ReceiverStream::new(events));
                self.start_heartbeat(ctx);
            }
            Err(err) => {
                warn!(
                    session_id = %self.session_id,
                    game_id = %self.game_id,
                    error = %err,
                    "game stream rejected"
                );
                Self::send_json(ctx, &StatusResponse {
                    code: err.code().status(),
                    error: Some(err.detail()),
                });
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Policy)));
                ctx.stop();
            }
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if self.attached {
            self.service
                .release_listener(&self.session_id, &self.game_id);
            info!(
                conn_id = %self.conn_id,
                session_id = %self.session_id,
                game_id = %self.game_id,
                "game stream closed"
            );
        }
    }
}

impl StreamHandler<GameEvent> for GameSocket {
    fn handle(&mut self, event: GameEvent, ctx: &mut Self::Context) {
        let terminal = event.detail.is_terminal();
        Self::send_json(ctx, &event);
        if terminal {
            // Game over: end this stream cleanly.
            ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
            ctx.stop();
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        // The dispatcher dropped our queue (game deleted or seat removed).
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            // Game streams are server -> client only; commands go over HTTP.
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    session_id = %self.session_id,
                    error = %err,
                    "game stream protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
