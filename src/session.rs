//! In-memory bookkeeping for many games.
//!
//! The registry owns every game, the participants seated in them and each
//! game's chat history. Games share no state; the registry is the only place
//! identifiers are handed out.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use log::info;

use crate::board::Color;
use crate::constants::{CHAT_HISTORY_LIMIT, CHAT_MAX_LEN, STALE_AFTER};
use crate::error::SessionError;
use crate::game::{Game, GameId, GameSnapshot, MoveResult, ParticipantId, Slot, Status};
use crate::search::{Opponent, Tier};

/// Registry limits and opponent seeding.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Games older than this are removed by [`Registry::cleanup`].
    pub max_age: Duration,
    pub chat_history_limit: usize,
    pub chat_max_len: usize,
    /// Base seed for computer opponents; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_age: STALE_AFTER,
            chat_history_limit: CHAT_HISTORY_LIMIT,
            chat_max_len: CHAT_MAX_LEN,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub color: Color,
    pub game: GameId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub player: ParticipantId,
    pub name: String,
    pub color: Color,
    pub text: String,
}

/// Summary of a game that is still waiting or playing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub id: GameId,
    pub status: Status,
    pub white: Slot,
    pub black: Slot,
    pub current: Color,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegistryStatus {
    pub active_games: usize,
    pub total_players: usize,
    pub total_games: usize,
}

#[derive(Debug, Default)]
pub struct Registry {
    config: SessionConfig,
    next_id: u64,
    games: HashMap<GameId, Game>,
    players: HashMap<ParticipantId, Participant>,
    chat: HashMap<GameId, VecDeque<ChatMessage>>,
}

impl Registry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn game(&self, id: GameId) -> Result<&Game, SessionError> {
        self.games.get(&id).ok_or(SessionError::GameNotFound(id))
    }

    fn game_mut(&mut self, id: GameId) -> Result<&mut Game, SessionError> {
        self.games.get_mut(&id).ok_or(SessionError::GameNotFound(id))
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&Participant, SessionError> {
        self.players.get(&id).ok_or(SessionError::PlayerNotFound(id))
    }

    pub fn snapshot(&self, id: GameId) -> Result<GameSnapshot, SessionError> {
        self.game(id).map(Game::snapshot)
    }

    pub fn create_game(&mut self) -> GameId {
        self.create_game_at(Instant::now())
    }

    pub fn create_game_at(&mut self, now: Instant) -> GameId {
        let id = GameId(self.fresh_id());
        self.games.insert(id, Game::new(id, now));
        info!("game {id} created");
        id
    }

    fn register(&mut self, game: GameId, name: Option<&str>, color: Color) -> ParticipantId {
        let id = ParticipantId(self.fresh_id());
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Player_{color}"),
        };
        info!("player {name} ({id}) joined game {game} as {color}");
        self.players.insert(
            id,
            Participant {
                id,
                name,
                color,
                game,
            },
        );
        id
    }

    /// Seat a new human participant in an existing game.
    pub fn join(
        &mut self,
        game_id: GameId,
        name: Option<&str>,
    ) -> Result<(ParticipantId, Color), SessionError> {
        let pending = ParticipantId(self.next_id + 1);
        let color = self.game_mut(game_id)?.join_as_human(pending)?;
        let id = self.register(game_id, name, color);
        debug_assert_eq!(id, pending);
        Ok((id, color))
    }

    /// Create a game and start it against a computer opponent.
    pub fn start_single(
        &mut self,
        name: Option<&str>,
        tier: Tier,
    ) -> Result<(GameId, ParticipantId, Color), SessionError> {
        let game_id = self.create_game();
        let opponent = match self.config.seed {
            Some(seed) => Opponent::with_seed(tier, seed.wrapping_add(game_id.0)),
            None => Opponent::new(tier),
        };
        let pending = ParticipantId(self.next_id + 1);
        let color = self.game_mut(game_id)?.start_against(pending, opponent)?;
        let id = self.register(game_id, name, color);
        debug_assert_eq!(id, pending);
        Ok((game_id, id, color))
    }

    fn check_member(&self, game_id: GameId, player: ParticipantId) -> Result<(), SessionError> {
        self.participant(player)?;
        if !self.game(game_id)?.has_participant(player) {
            return Err(SessionError::NotInGame);
        }
        Ok(())
    }

    pub fn play(
        &mut self,
        game_id: GameId,
        player: ParticipantId,
        row: usize,
        col: usize,
    ) -> Result<MoveResult, SessionError> {
        self.game(game_id)?;
        self.check_member(game_id, player)?;
        let result = self.game_mut(game_id)?.apply_human_move(player, row, col)?;
        Ok(result)
    }

    pub fn computer_move(&mut self, game_id: GameId) -> Result<MoveResult, SessionError> {
        Ok(self.game_mut(game_id)?.apply_opponent_move()?)
    }

    /// Remove a participant, forfeiting a running game.
    pub fn leave(&mut self, game_id: GameId, player: ParticipantId) -> Result<(), SessionError> {
        self.game(game_id)?;
        self.check_member(game_id, player)?;
        self.game_mut(game_id)?.forfeit(player)?;
        self.players.remove(&player);
        info!("player {player} left game {game_id}");
        Ok(())
    }

    /// Append a chat message; the trimmed text is stored.
    ///
    /// The length limit applies to the text as sent, surrounding whitespace
    /// included.
    pub fn send_chat(
        &mut self,
        game_id: GameId,
        player: ParticipantId,
        text: &str,
    ) -> Result<ChatMessage, SessionError> {
        self.game(game_id)?;
        self.check_member(game_id, player)?;
        let len = text.chars().count();
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if len > self.config.chat_max_len {
            return Err(SessionError::MessageTooLong {
                len,
                max: self.config.chat_max_len,
            });
        }
        let participant = self.participant(player)?;
        let (name, color) = (participant.name.clone(), participant.color);
        let message = ChatMessage {
            id: self.fresh_id(),
            player,
            name,
            color,
            text: text.to_string(),
        };
        let limit = self.config.chat_history_limit;
        let history = self.chat.entry(game_id).or_default();
        history.push_back(message.clone());
        while history.len() > limit {
            history.pop_front();
        }
        Ok(message)
    }

    pub fn chat_history(&self, game_id: GameId) -> Result<Vec<ChatMessage>, SessionError> {
        self.game(game_id)?;
        Ok(self
            .chat
            .get(&game_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Waiting and playing games, oldest id first.
    pub fn active_games(&self) -> Vec<GameSummary> {
        let mut out: Vec<GameSummary> = self
            .games
            .values()
            .filter(|g| g.status() != Status::Finished)
            .map(|g| GameSummary {
                id: g.id(),
                status: g.status(),
                white: g.slot(Color::White),
                black: g.slot(Color::Black),
                current: g.current(),
            })
            .collect();
        out.sort_by_key(|s| s.id);
        out
    }

    pub fn status(&self) -> RegistryStatus {
        RegistryStatus {
            active_games: self
                .games
                .values()
                .filter(|g| g.status() != Status::Finished)
                .count(),
            total_players: self.players.len(),
            total_games: self.games.len(),
        }
    }

    /// Drop finished games and games older than the configured age, along
    /// with their participants and chat. Returns the number of games removed.
    pub fn cleanup(&mut self, now: Instant) -> usize {
        let max_age = self.config.max_age;
        let stale: Vec<GameId> = self
            .games
            .values()
            .filter(|g| {
                g.status() == Status::Finished
                    || now.saturating_duration_since(g.created_at()) > max_age
            })
            .map(Game::id)
            .collect();
        for id in &stale {
            self.games.remove(id);
            self.chat.remove(id);
        }
        self.players.retain(|_, p| !stale.contains(&p.game));
        if !stale.is_empty() {
            info!("cleaned up {} old games", stale.len());
        }
        stale.len()
    }
}
