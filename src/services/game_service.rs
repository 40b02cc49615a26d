//! The game service: both registries, the command surface, and event fan-out.
//!
//! All mutable state lives behind one mutex. Commands lock, mutate, enqueue
//! events with non-blocking sends, and release; nothing awaits while holding
//! the lock. Each listener has a bounded queue with exactly one reader (its
//! streaming task); a full queue drops the event rather than stalling the
//! dispatcher.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::{Card, DomainError, GameStateView, HeartsGame, Phase};
use crate::errors::{AppError, ErrorCode};
use crate::protocol::{GameEvent, GameEventDetail, GameSummary, RegistryEvent};

/// Per-listener queue depth. Producers never block: a slow consumer loses
/// events instead of stalling every other player's game.
const EVENT_QUEUE_CAPACITY: usize = 4;

/// How long a finished game lingers so clients can fetch the final state.
const FINISHED_GAME_LINGER: Duration = Duration::from_secs(20);
/// How long an aborted game lingers.
const ABORTED_GAME_LINGER: Duration = Duration::from_secs(1);

/// Readiness poll cadence once a table fills.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long a full table may sit unconfirmed before the game is aborted.
const READY_WAIT_LIMIT: Duration = Duration::from_secs(60);

/// Idle-game sweep cadence and threshold.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const IDLE_GAME_LIMIT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerRole {
    Player,
    Observer,
}

struct GameListener {
    tx: mpsc::Sender<GameEvent>,
    role: ListenerRole,
}

struct GameEntry {
    game: HeartsGame,
    /// Keyed by session id: players and observers alike.
    listeners: HashMap<String, GameListener>,
    last_activity: Instant,
}

impl GameEntry {
    fn new(game: HeartsGame) -> Self {
        Self {
            game,
            listeners: HashMap::new(),
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

struct Session {
    name: String,
    game_ids: HashSet<String>,
    events: mpsc::Sender<RegistryEvent>,
}

struct ServiceState {
    sessions: HashMap<String, Session>,
    games: HashMap<String, GameEntry>,
    rng: StdRng,
}

pub struct GameService {
    state: Mutex<ServiceState>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

impl GameService {
    pub fn new() -> Arc<Self> {
        Self::with_seed(clock_seed())
    }

    /// Construct with a fixed RNG seed so id assignment and dealing are
    /// reproducible.
    pub fn with_seed(seed: u64) -> Arc<Self> {
        let service = Arc::new(Self {
            state: Mutex::new(ServiceState {
                sessions: HashMap::new(),
                games: HashMap::new(),
                rng: StdRng::seed_from_u64(seed),
            }),
        });
        Arc::clone(&service).spawn_inactivity_sweep();
        service
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- session registry ----

    /// Create a session and its registry-scope event queue. The first two
    /// events on the queue are the session id and the list of live games.
    pub fn register(&self, name: Option<String>) -> (String, mpsc::Receiver<RegistryEvent>) {
        let mut guard = self.lock();
        let st = &mut *guard;

        let session_id = new_session_id(&mut st.rng, &st.sessions);
        let name = match name {
            Some(n) if !n.is_empty() => n,
            _ => session_id.clone(),
        };
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

        offer_registry(
            &tx,
            &session_id,
            RegistryEvent::SessionCreated {
                session_id: session_id.clone(),
            },
        );
        offer_registry(
            &tx,
            &session_id,
            RegistryEvent::FullGamesList {
                game_ids: st.games.keys().cloned().collect(),
            },
        );

        st.sessions.insert(
            session_id.clone(),
            Session {
                name,
                game_ids: HashSet::new(),
                events: tx,
            },
        );
        info!(%session_id, "registered session");
        (session_id, rx)
    }

    /// Tear down a session once its registration stream ends. Cascades a
    /// leave through every game the session joined or observed.
    pub fn unregister(self: &Arc<Self>, session_id: &str) {
        let mut guard = self.lock();
        let st = &mut *guard;
        let Some(session) = st.sessions.remove(session_id) else {
            return;
        };
        for game_id in session.game_ids {
            self.remove_from_game_locked(st, session_id, &game_id);
        }
        info!(session_id, "deleted session");
    }

    // ---- game registry ----

    pub fn create_game(&self) -> String {
        let mut guard = self.lock();
        let st = &mut *guard;
        let game_id = new_game_id(&mut st.rng, &st.games);
        st.games.insert(
            game_id.clone(),
            GameEntry::new(HeartsGame::new(game_id.as_str())),
        );
        info!(%game_id, "created game");
        broadcast_registry(
            st,
            RegistryEvent::GameCreated {
                game_id: game_id.clone(),
            },
        );
        game_id
    }

    pub fn list_games(&self, phases: &[Phase]) -> Vec<GameSummary> {
        let guard = self.lock();
        guard
            .games
            .values()
            .filter(|entry| phases.is_empty() || phases.contains(&entry.game.phase()))
            .map(|entry| GameSummary {
                id: entry.game.id().to_string(),
                phase: entry.game.phase(),
                player_names: entry.game.player_names(),
            })
            .collect()
    }

    // ---- joining and observing ----

    /// Take a seat and open the game-scope event queue for this session.
    /// Filling the fourth seat arms the readiness trigger.
    pub fn join_game(
        self: &Arc<Self>,
        session_id: &str,
        game_id: &str,
    ) -> Result<mpsc::Receiver<GameEvent>, AppError> {
        let mut guard = self.lock();
        let st = &mut *guard;
        let session = st
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        let entry = st
            .games
            .get_mut(game_id)
            .ok_or_else(|| game_not_found(game_id))?;
        if entry.listeners.contains_key(session_id) {
            return Err(AppError::precondition(
                ErrorCode::AlreadyInGame,
                format!("session {session_id} is already listening to game {game_id}"),
            ));
        }
        entry.game.add_player(session_id, session.name.clone())?;
        entry.touch();
        session.game_ids.insert(game_id.to_string());
        info!(session_id, game_id, "player joined game");

        // Existing listeners hear about the join; the joiner's own queue is
        // registered afterwards and does not see it.
        broadcast_game(entry, GameEventDetail::PlayerJoined {
            name: session.name.clone(),
        });

        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        entry.listeners.insert(
            session_id.to_string(),
            GameListener {
                tx,
                role: ListenerRole::Player,
            },
        );

        if entry.game.has_full_table() {
            Arc::clone(self).spawn_start_trigger(game_id.to_string());
        }
        Ok(rx)
    }

    /// Open a read-only game-scope event queue for this session.
    pub fn observe_game(
        &self,
        session_id: &str,
        game_id: &str,
    ) -> Result<mpsc::Receiver<GameEvent>, AppError> {
        let mut guard = self.lock();
        let st = &mut *guard;
        let session = st
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        let entry = st
            .games
            .get_mut(game_id)
            .ok_or_else(|| game_not_found(game_id))?;
        if entry.listeners.contains_key(session_id) {
            return Err(AppError::precondition(
                ErrorCode::AlreadyInGame,
                format!("session {session_id} is already listening to game {game_id}"),
            ));
        }
        session.game_ids.insert(game_id.to_string());
        info!(session_id, game_id, "observer joined game");

        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        entry.listeners.insert(
            session_id.to_string(),
            GameListener {
                tx,
                role: ListenerRole::Observer,
            },
        );
        Ok(rx)
    }

    // ---- game actions ----

    pub fn ready_to_start(&self, session_id: &str, game_id: &str) -> Result<(), AppError> {
        let mut guard = self.lock();
        let st = &mut *guard;
        if !st.sessions.contains_key(session_id) {
            return Err(session_not_found(session_id));
        }
        let entry = st
            .games
            .get_mut(game_id)
            .ok_or_else(|| game_not_found(game_id))?;
        entry.game.confirm_ready(session_id)?;
        entry.touch();
        Ok(())
    }

    pub fn leave_game(self: &Arc<Self>, session_id: &str, game_id: &str) -> Result<(), AppError> {
        let mut guard = self.lock();
        let st = &mut *guard;
        if !st.sessions.contains_key(session_id) {
            return Err(session_not_found(session_id));
        }
        let phase = st
            .games
            .get(game_id)
            .map(|entry| entry.game.phase())
            .ok_or_else(|| game_not_found(game_id))?;
        // An explicit leave while the hand is live tears the game down no
        // matter who asks, observers included. Only a dropped stream gets
        // the gentler player-only treatment.
        if phase == Phase::Playing {
            if let Some(session) = st.sessions.get_mut(session_id) {
                session.game_ids.remove(game_id);
            }
            if let Some(entry) = st.games.get_mut(game_id) {
                info!(session_id, game_id, "listener left mid-game, aborting");
                self.abort_entry(entry);
            }
            return Ok(());
        }
        self.remove_from_game_locked(st, session_id, game_id);
        Ok(())
    }

    pub fn play_card(
        self: &Arc<Self>,
        session_id: &str,
        game_id: &str,
        card_text: &str,
    ) -> Result<(), AppError> {
        let card: Card = card_text.parse().map_err(AppError::from)?;
        let mut guard = self.lock();
        let st = &mut *guard;
        if !st.sessions.contains_key(session_id) {
            return Err(session_not_found(session_id));
        }
        let entry = st
            .games
            .get_mut(game_id)
            .ok_or_else(|| game_not_found(game_id))?;

        let outcome = match entry.game.play_card(session_id, card) {
            Ok(outcome) => outcome,
            Err(err @ DomainError::Invariant(_)) => {
                // A broken game must not take the process down with it.
                error!(game_id, %err, "game state invariant violated, aborting game");
                self.abort_entry(entry);
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        entry.touch();

        broadcast_game(entry, GameEventDetail::CardPlayed);
        if let Some(trick) = outcome.completed_trick {
            debug!(
                game_id,
                winner = %trick.winner_id,
                winning_card = %trick.winning_card,
                "trick completed"
            );
            broadcast_game(entry, GameEventDetail::TrickCompleted {
                trick: trick.cards,
                winning_card: trick.winning_card,
                winner_id: trick.winner_id,
                winner_name: trick.winner_name,
            });
        }
        if outcome.hand_complete {
            info!(game_id, "game complete");
            broadcast_game(entry, GameEventDetail::GameFinished);
            self.schedule_delete(game_id.to_string(), FINISHED_GAME_LINGER);
        } else if let Some(next) = entry.game.next_player_id() {
            send_game_event(entry, next, GameEventDetail::YourTurn);
        }
        Ok(())
    }

    pub fn game_state(
        &self,
        session_id: Option<&str>,
        game_id: &str,
    ) -> Result<GameStateView, AppError> {
        let guard = self.lock();
        let entry = guard
            .games
            .get(game_id)
            .ok_or_else(|| game_not_found(game_id))?;
        Ok(crate::domain::view(&entry.game, session_id))
    }

    /// Post a free-form message to every listener of a game.
    pub fn broadcast_message(&self, game_id: &str, text: &str) -> Result<(), AppError> {
        let guard = self.lock();
        let entry = guard
            .games
            .get(game_id)
            .ok_or_else(|| game_not_found(game_id))?;
        broadcast_game(entry, GameEventDetail::BroadcastMessage {
            text: text.to_string(),
        });
        Ok(())
    }

    // ---- stream cleanup ----

    /// Called when a game-scope stream ends. Dropping a player's stream
    /// mid-game counts as leaving; an observer's stream just goes away.
    pub fn release_listener(self: &Arc<Self>, session_id: &str, game_id: &str) {
        let mut guard = self.lock();
        let st = &mut *guard;

        let removed = match st.games.get_mut(game_id) {
            Some(entry) => entry
                .listeners
                .remove(session_id)
                .map(|l| (l.role, entry.game.phase().is_terminal())),
            None => None,
        };
        match removed {
            Some((ListenerRole::Player, false)) => {
                self.remove_from_game_locked(st, session_id, game_id);
            }
            Some(_) => {
                if let Some(session) = st.sessions.get_mut(session_id) {
                    session.game_ids.remove(game_id);
                }
            }
            // Already detached by an explicit leave or a game deletion.
            None => {}
        }
    }

    /// Disconnect-path removal of a session's involvement in one game:
    /// drop the seat while Preparing, abort while Playing only if a seated
    /// player went away (a vanished observer just loses its queue), nothing
    /// once terminal. Safe to call for non-members.
    fn remove_from_game_locked(self: &Arc<Self>, st: &mut ServiceState, session_id: &str, game_id: &str) {
        if let Some(session) = st.sessions.get_mut(session_id) {
            session.game_ids.remove(game_id);
        }
        let Some(entry) = st.games.get_mut(game_id) else {
            return;
        };
        let is_player = entry.game.contains_player(session_id);
        match entry.game.phase() {
            Phase::Preparing => {
                entry.listeners.remove(session_id);
                if !is_player {
                    return;
                }
                let name = entry
                    .game
                    .players()
                    .iter()
                    .find(|p| p.id == session_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                match entry.game.remove_player(session_id) {
                    Ok(()) => {
                        entry.touch();
                        info!(session_id, game_id, "player left game");
                        broadcast_game(entry, GameEventDetail::PlayerLeft { name });
                    }
                    Err(err) => {
                        warn!(session_id, game_id, %err, "could not remove player, aborting game");
                        self.abort_entry(entry);
                    }
                }
            }
            Phase::Playing => {
                if is_player {
                    info!(session_id, game_id, "player left mid-game, aborting");
                    self.abort_entry(entry);
                } else {
                    entry.listeners.remove(session_id);
                }
            }
            Phase::Completed | Phase::Aborted => {
                entry.listeners.remove(session_id);
            }
        }
    }

    fn abort_entry(self: &Arc<Self>, entry: &mut GameEntry) {
        entry.game.abort();
        entry.touch();
        broadcast_game(entry, GameEventDetail::GameAborted);
        self.schedule_delete(entry.game.id().to_string(), ABORTED_GAME_LINGER);
    }

    // ---- timers ----

    fn spawn_start_trigger(self: Arc<Self>, game_id: String) {
        tokio::spawn(async move {
            let mut poll = interval(READY_POLL_INTERVAL);
            poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let deadline = sleep(READY_WAIT_LIMIT);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = poll.tick() => {
                        if self.poll_ready(&game_id) {
                            return;
                        }
                    }
                    _ = &mut deadline => {
                        self.abort_unready(&game_id);
                        return;
                    }
                }
            }
        });
    }

    /// One readiness poll. Returns true once there is nothing left to wait
    /// for: the game started, disappeared, or moved on without us.
    fn poll_ready(self: &Arc<Self>, game_id: &str) -> bool {
        let mut guard = self.lock();
        let ServiceState { games, rng, .. } = &mut *guard;
        let Some(entry) = games.get_mut(game_id) else {
            return true;
        };
        if entry.game.phase() != Phase::Preparing {
            return true;
        }
        let unconfirmed = entry.game.unconfirmed_player_ids();
        if entry.game.has_full_table() && unconfirmed.is_empty() {
            let seed = rng.gen();
            match entry.game.start(seed) {
                Ok(()) => {
                    entry.touch();
                    info!(game_id, "game started");
                    broadcast_game(entry, GameEventDetail::GameStarted);
                    if let Some(next) = entry.game.next_player_id() {
                        send_game_event(entry, next, GameEventDetail::YourTurn);
                    }
                }
                Err(err) => {
                    error!(game_id, %err, "failed to start game, aborting");
                    self.abort_entry(entry);
                }
            }
            return true;
        }
        // Nudge the holdouts in case they missed the earlier prompt.
        for player_id in unconfirmed {
            send_game_event(entry, &player_id, GameEventDetail::GameReadyToStart);
        }
        false
    }

    fn abort_unready(self: &Arc<Self>, game_id: &str) {
        let mut guard = self.lock();
        let st = &mut *guard;
        let Some(entry) = st.games.get_mut(game_id) else {
            return;
        };
        if entry.game.phase() != Phase::Preparing {
            return;
        }
        warn!(game_id, "players not ready in time, aborting game");
        self.abort_entry(entry);
    }

    fn schedule_delete(self: &Arc<Self>, game_id: String, delay: Duration) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            sleep(delay).await;
            service.delete_game(&game_id);
        });
    }

    /// Remove a game, closing every game-scope queue and announcing the
    /// deletion on every registry queue.
    pub fn delete_game(&self, game_id: &str) {
        let mut guard = self.lock();
        let st = &mut *guard;
        let Some(entry) = st.games.remove(game_id) else {
            debug!(game_id, "delete_game: game already gone");
            return;
        };
        for session_id in entry.listeners.keys() {
            if let Some(session) = st.sessions.get_mut(session_id) {
                session.game_ids.remove(game_id);
            }
        }
        // Dropping the entry drops every listener sender, ending the streams.
        drop(entry);
        info!(game_id, "deleted game");
        broadcast_registry(
            st,
            RegistryEvent::GameDeleted {
                game_id: game_id.to_string(),
            },
        );
    }

    fn spawn_inactivity_sweep(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut tick = interval(SWEEP_INTERVAL);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                let expired: Vec<String> = {
                    let guard = self.lock();
                    guard
                        .games
                        .iter()
                        .filter(|(_, entry)| entry.last_activity.elapsed() > IDLE_GAME_LIMIT)
                        .map(|(id, _)| id.clone())
                        .collect()
                };
                for game_id in expired {
                    info!(%game_id, "removing game due to inactivity");
                    self.schedule_delete(game_id, ABORTED_GAME_LINGER);
                }
            }
        });
    }
}

// ---- id assignment ----

fn new_session_id(rng: &mut StdRng, sessions: &HashMap<String, Session>) -> String {
    loop {
        let id = format!("s{:06}", rng.gen_range(0..1_000_000));
        if !sessions.contains_key(&id) {
            return id;
        }
    }
}

fn new_game_id(rng: &mut StdRng, games: &HashMap<String, GameEntry>) -> String {
    loop {
        let id = format!("g{:04}", rng.gen_range(0..10_000));
        if !games.contains_key(&id) {
            return id;
        }
    }
}

// ---- event fan-out ----

fn broadcast_game(entry: &GameEntry, detail: GameEventDetail) {
    for (session_id, listener) in &entry.listeners {
        offer_game(&listener.tx, entry.game.id(), session_id, detail.clone());
    }
}

fn send_game_event(entry: &GameEntry, session_id: &str, detail: GameEventDetail) {
    match entry.listeners.get(session_id) {
        Some(listener) => offer_game(&listener.tx, entry.game.id(), session_id, detail),
        None => warn!(
            game_id = entry.game.id(),
            session_id, "no listener queue for targeted event"
        ),
    }
}

fn offer_game(tx: &mpsc::Sender<GameEvent>, game_id: &str, session_id: &str, detail: GameEventDetail) {
    let event = GameEvent {
        game_id: game_id.to_string(),
        detail,
    };
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(game_id, session_id, detail = ?event.detail, "listener queue full, dropping event");
        }
        Err(TrySendError::Closed(_)) => {
            debug!(game_id, session_id, "listener queue closed");
        }
    }
}

fn broadcast_registry(st: &ServiceState, event: RegistryEvent) {
    for (session_id, session) in &st.sessions {
        offer_registry(&session.events, session_id, event.clone());
    }
}

fn offer_registry(tx: &mpsc::Sender<RegistryEvent>, session_id: &str, event: RegistryEvent) {
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(session_id, ?event, "registry queue full, dropping event");
        }
        Err(TrySendError::Closed(_)) => {
            debug!(session_id, "registry queue closed");
        }
    }
}

fn session_not_found(session_id: &str) -> AppError {
    AppError::not_found(
        ErrorCode::SessionNotFound,
        format!("session {session_id} not found"),
    )
}

fn game_not_found(game_id: &str) -> AppError {
    AppError::not_found(ErrorCode::GameNotFound, format!("game {game_id} not found"))
}
