//! Registration stream: one websocket per session, carrying registry events.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::protocol::RegistryEvent;
use crate::services::GameService;
use crate::state::AppState;

pub(crate) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
pub(crate) const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    pub name: Option<String>,
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<RegisterQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let socket = RegistrySocket::new(Arc::clone(app_state.service()), query.into_inner().name);
    ws::start(socket, &req, stream)
}

/// The session exists exactly as long as this actor: it is created in
/// `started` and destroyed in `stopped`, cascading a leave through every
/// joined game.
pub struct RegistrySocket {
    conn_id: Uuid,
    service: Arc<GameService>,
    name: Option<String>,
    session_id: Option<String>,
    last_heartbeat: Instant,
}

impl RegistrySocket {
    fn new(service: Arc<GameService>, name: Option<String>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            service,
            name,
            session_id: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json<T: Serialize>(ctx: &mut ws::WebsocketContext<Self>, msg: &T) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound registry event"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "registry stream heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for RegistrySocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (session_id, events) = self.service.register(self.name.take());
        info!(conn_id = %self.conn_id, %session_id, "registry stream opened");
        self.session_id = Some(session_id);
        ctx.add_stream(ReceiverStream::new(events));
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(session_id) = self.session_id.take() {
            self.service.unregister(&session_id);
            info!(conn_id = %self.conn_id, %session_id, "registry stream closed");
        }
    }
}

impl StreamHandler<RegistryEvent> for RegistrySocket {
    fn handle(&mut self, event: RegistryEvent, ctx: &mut Self::Context) {
        Self::send_json(ctx, &event);
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        // The dispatcher closed our queue: the session is gone.
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RegistrySocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            // The registry stream is server -> client only.
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
                warn!(conn_id = %self.conn_id, error = %err, "registry stream protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
