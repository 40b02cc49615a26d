//! Shared helpers for service-level tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use hearts_server::domain::Phase;
use hearts_server::protocol::{GameEvent, GameEventDetail, RegistryEvent};
use hearts_server::services::GameService;

/// Generous virtual-time bound for awaiting a single event.
pub const EVENT_WAIT: Duration = Duration::from_secs(300);

pub async fn next_game_event(rx: &mut mpsc::Receiver<GameEvent>) -> GameEventDetail {
    tokio::time::timeout(EVENT_WAIT, rx.recv())
        .await
        .expect("timed out waiting for a game event")
        .expect("game stream closed unexpectedly")
        .detail
}

pub async fn next_registry_event(rx: &mut mpsc::Receiver<RegistryEvent>) -> RegistryEvent {
    tokio::time::timeout(EVENT_WAIT, rx.recv())
        .await
        .expect("timed out waiting for a registry event")
        .expect("registry stream closed unexpectedly")
}

/// Pop everything already enqueued without letting time advance.
pub fn drain_game(rx: &mut mpsc::Receiver<GameEvent>) -> Vec<GameEventDetail> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event.detail);
    }
    events
}

pub fn drain_registry(rx: &mut mpsc::Receiver<RegistryEvent>) -> Vec<RegistryEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub struct Player {
    pub session_id: String,
    pub registry: mpsc::Receiver<RegistryEvent>,
    pub game: mpsc::Receiver<GameEvent>,
}

pub struct Table {
    pub service: Arc<GameService>,
    pub game_id: String,
    pub players: Vec<Player>,
}

impl Table {
    pub fn player_id(&self, i: usize) -> &str {
        &self.players[i].session_id
    }

    pub fn drain_all(&mut self) -> Vec<Vec<GameEventDetail>> {
        self.players
            .iter_mut()
            .map(|p| drain_game(&mut p.game))
            .collect()
    }

    /// The session currently on move, from the public view.
    pub fn on_move(&self) -> String {
        let view = self.service.game_state(None, &self.game_id).unwrap();
        view.players
            .iter()
            .find(|p| p.is_next)
            .map(|p| p.id.clone())
            .expect("no seat on move")
    }

    pub fn phase(&self) -> Phase {
        self.service.game_state(None, &self.game_id).unwrap().phase
    }
}

/// Register four sessions, create a game, and seat all four. All event
/// queues are drained so tests start from a quiet table.
pub fn seated_table(seed: u64) -> Table {
    let service = GameService::with_seed(seed);
    let game_id = service.create_game();

    let mut players = Vec::new();
    for i in 0..4 {
        let (session_id, registry) = service.register(Some(format!("player{i}")));
        let game = service.join_game(&session_id, &game_id).unwrap();
        players.push(Player {
            session_id,
            registry,
            game,
        });
    }

    let mut table = Table {
        service,
        game_id,
        players,
    };
    table.drain_all();
    table
}

/// Confirm every seat and wait for the started/your-turn pair to land.
pub async fn start_table(table: &mut Table) {
    for i in 0..4 {
        let session_id = table.player_id(i).to_string();
        table
            .service
            .ready_to_start(&session_id, &table.game_id)
            .unwrap();
    }
    for player in &mut table.players {
        loop {
            match next_game_event(&mut player.game).await {
                GameEventDetail::GameStarted => break,
                GameEventDetail::GameReadyToStart => continue,
                other => panic!("expected game_started, got {other:?}"),
            }
        }
    }
}
