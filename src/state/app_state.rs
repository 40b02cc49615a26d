use std::sync::Arc;

use crate::services::GameService;

/// Application state shared across workers: the one service object that
/// owns every session and game.
#[derive(Clone)]
pub struct AppState {
    service: Arc<GameService>,
}

impl AppState {
    pub fn new(service: Arc<GameService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<GameService> {
        &self.service
    }
}
