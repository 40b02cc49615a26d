//! Request logging keyed by the identifiers this server routes on.
//!
//! Every command and stream upgrade names a game in its path and a session
//! in its query string; pulling both into the completion log line makes one
//! game's traffic greppable without per-handler instrumentation.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

/// The path segment following `games`, as in `/api/games/{game_id}/action`
/// and `/ws/games/{game_id}/join`.
fn game_id_segment(path: &str) -> Option<&str> {
    let mut segments = path.split('/');
    segments.find(|s| *s == "games")?;
    segments.next().filter(|s| !s.is_empty())
}

/// The `session_id` query parameter carried by stream upgrades and state
/// fetches. Commands carry it in the body instead, which stays unlogged.
fn session_id_param(query: &str) -> Option<&str> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("session_id="))
        .filter(|s| !s.is_empty())
}

pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = RequestLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogService { service }))
    }
}

pub struct RequestLogService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let game_id = game_id_segment(req.path()).unwrap_or("-").to_string();
        let session_id = session_id_param(req.query_string()).unwrap_or("-").to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let status = status.as_u16();
            let duration_us = start.elapsed().as_micros() as u64;

            if status >= 500 {
                error!(%method, %path, game_id = %game_id, session_id = %session_id, status, duration_us, "request completed");
            } else if status >= 400 {
                warn!(%method, %path, game_id = %game_id, session_id = %session_id, status, duration_us, "request completed");
            } else {
                info!(%method, %path, game_id = %game_id, session_id = %session_id, status, duration_us, "request completed");
            }

            result
        })
    }
}
