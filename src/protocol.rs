//! Line-oriented text protocol for driving a [`Registry`].
//!
//! Each request is one line: an optional numeric id, a command, and
//! whitespace-separated arguments. Responses follow the GTP convention:
//! `=[id] result` on success, `?[id] error` on failure, each followed by a
//! blank line.
//!
//! ## Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`,
//!   `known_command <cmd>`, `quit`
//! - `new` - create a game, reply with its id
//! - `join <game> [name]` - reply `<player> <color>`
//! - `single [tier] [name]` - start against the computer, reply `<game> <player> <color>`
//! - `play <game> <player> <row> <col>`
//! - `genmove <game>` - let the computer move, reply `<row> <col>` plus the result
//! - `showboard <game>`, `state <game>`
//! - `leave <game> <player>`
//! - `chat <game> <player> <text...>`, `history <game>`
//! - `games`, `status`, `cleanup`
//!
//! ## Example
//!
//! ```
//! use sixgrid::protocol::TextEngine;
//!
//! let mut engine = TextEngine::default();
//! let mut out = Vec::new();
//! engine.run("new\nstate 1\n".as_bytes(), &mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("= 1"));
//! ```

use std::io::{BufRead, Write};
use std::time::Instant;

use crate::game::{GameId, MoveResult, ParticipantId, Slot};
use crate::session::{Registry, SessionConfig};
use crate::search::Tier;

const KNOWN_COMMANDS: &[&str] = &[
    "chat",
    "cleanup",
    "games",
    "genmove",
    "history",
    "join",
    "known_command",
    "leave",
    "list_commands",
    "name",
    "new",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "single",
    "state",
    "status",
    "version",
];

type Response = (bool, String);

pub struct TextEngine {
    registry: Registry,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl TextEngine {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            registry: Registry::new(config),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Process commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional leading numeric id from the command.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let end = line
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        if end > 0 {
            if let Ok(id) = line[..end].parse::<u32>() {
                return (Some(id), line[end..].trim());
            }
        }
        (None, line)
    }

    fn execute(&mut self, command: &str, args: &[&str]) -> Response {
        match self.dispatch(command, args) {
            Ok(message) => (true, message),
            Err(message) => (false, message),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
            "protocol_version" => Ok("1".to_string()),
            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),
            "known_command" => {
                let cmd = arg(args, 0)?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }
            "quit" => Ok(String::new()),

            "new" => Ok(self.registry.create_game().to_string()),

            "join" => {
                let game = game_arg(args, 0)?;
                let name = rest(args, 1);
                let (player, color) = self
                    .registry
                    .join(game, name.as_deref())
                    .map_err(|e| e.to_string())?;
                Ok(format!("{player} {color}"))
            }

            "single" => {
                // Without a recognised tier every argument is part of the name.
                let (tier, name_from) = match args.first().map(|t| t.parse::<Tier>()) {
                    Some(Ok(tier)) => (tier, 1),
                    _ => (Tier::default(), 0),
                };
                let name = rest(args, name_from);
                let (game, player, color) = self
                    .registry
                    .start_single(name.as_deref(), tier)
                    .map_err(|e| e.to_string())?;
                Ok(format!("{game} {player} {color}"))
            }

            "play" => {
                let game = game_arg(args, 0)?;
                let player = ParticipantId(num_arg(args, 1, "player")?);
                let row = coord_arg(args, 2)?;
                let col = coord_arg(args, 3)?;
                let result = self
                    .registry
                    .play(game, player, row, col)
                    .map_err(|e| e.to_string())?;
                Ok(describe(&result))
            }

            "genmove" => {
                let game = game_arg(args, 0)?;
                let result = self.registry.computer_move(game).map_err(|e| e.to_string())?;
                let (row, col) = result.point;
                Ok(format!("{row} {col} {}", describe(&result)))
            }

            "showboard" => {
                let game = game_arg(args, 0)?;
                let snap = self.registry.snapshot(game).map_err(|e| e.to_string())?;
                Ok(format!("\n{}", snap.board))
            }

            "state" => {
                let game = game_arg(args, 0)?;
                let snap = self.registry.snapshot(game).map_err(|e| e.to_string())?;
                let winner = snap.winner.map(|w| w.to_string()).unwrap_or_else(|| "-".into());
                let condition = snap
                    .win_condition
                    .map(|c| c.tag())
                    .unwrap_or_else(|| "-".into());
                Ok(format!(
                    "status={} current={} white={} black={} winner={winner} condition={condition}",
                    snap.status,
                    snap.current,
                    slot_name(snap.white),
                    slot_name(snap.black)
                ))
            }

            "leave" => {
                let game = game_arg(args, 0)?;
                let player = ParticipantId(num_arg(args, 1, "player")?);
                self.registry.leave(game, player).map_err(|e| e.to_string())?;
                Ok(String::new())
            }

            "chat" => {
                let game = game_arg(args, 0)?;
                let player = ParticipantId(num_arg(args, 1, "player")?);
                let text = rest(args, 2).unwrap_or_default();
                let message = self
                    .registry
                    .send_chat(game, player, &text)
                    .map_err(|e| e.to_string())?;
                Ok(message.id.to_string())
            }

            "history" => {
                let game = game_arg(args, 0)?;
                let history = self.registry.chat_history(game).map_err(|e| e.to_string())?;
                Ok(history
                    .iter()
                    .map(|m| format!("{} ({}): {}", m.name, m.color, m.text))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }

            "games" => Ok(self
                .registry
                .active_games()
                .iter()
                .map(|g| format!("{} {} {}", g.id, g.status, g.current))
                .collect::<Vec<_>>()
                .join("\n")),

            "status" => {
                let s = self.registry.status();
                Ok(format!(
                    "active={} players={} games={}",
                    s.active_games, s.total_players, s.total_games
                ))
            }

            "cleanup" => Ok(self.registry.cleanup(Instant::now()).to_string()),

            _ => Err(format!("unknown command: {command}")),
        }
    }
}

fn arg<'a>(args: &[&'a str], i: usize) -> Result<&'a str, String> {
    args.get(i).copied().ok_or_else(|| "missing argument".to_string())
}

fn num_arg(args: &[&str], i: usize, what: &str) -> Result<u64, String> {
    arg(args, i)?
        .parse::<u64>()
        .map_err(|_| format!("invalid {what}"))
}

fn game_arg(args: &[&str], i: usize) -> Result<GameId, String> {
    num_arg(args, i, "game").map(GameId)
}

fn coord_arg(args: &[&str], i: usize) -> Result<usize, String> {
    arg(args, i)?
        .parse::<usize>()
        .map_err(|_| "invalid coordinates".to_string())
}

/// Remaining arguments joined by spaces, if any.
fn rest(args: &[&str], from: usize) -> Option<String> {
    args.get(from..)
        .filter(|a| !a.is_empty())
        .map(|a| a.join(" "))
}

fn slot_name(slot: Slot) -> String {
    match slot {
        Slot::Open => "-".to_string(),
        Slot::Human(id) => id.to_string(),
        Slot::Computer => "computer".to_string(),
    }
}

fn describe(result: &MoveResult) -> String {
    if !result.finished {
        return format!("next={}", result.game.current);
    }
    let winner = result.winner.map(|w| w.to_string()).unwrap_or_default();
    let condition = result.win_condition.map(|c| c.tag()).unwrap_or_default();
    match result.largest_area_size {
        Some(size) => format!("finished winner={winner} condition={condition} area={size}"),
        None => format!("finished winner={winner} condition={condition}"),
    }
}
