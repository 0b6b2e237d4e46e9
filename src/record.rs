//! Recorded games
//!
//! A record is two lines of text: the index of the player to move next, then
//! the moves played so far as `(x,y)` pairs separated by commas, or `0` when
//! no move has been played. The comma between two pairs is optional, a
//! trailing one after the last pair is not.
//!
//! ```text
//! 0
//! (10,10),(11,10),(9,9)
//! ```
//!
//! Moves alternate between the seated players starting with player 0.

use anyhow::{anyhow, bail, Context, Result};
use log::trace;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::{board::Board, geometry::Pos, players::PlayerId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    pub to_move: PlayerId,
    pub moves: Vec<Pos>,
}

impl GameRecord {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot open game record {}", path.display()))?;
        content
            .parse()
            .with_context(|| format!("invalid game record {}", path.display()))
    }

    /// The moves paired with the player who made each of them
    pub fn placements(&self, player_count: usize) -> impl Iterator<Item = (PlayerId, Pos)> + '_ {
        self.moves
            .iter()
            .enumerate()
            .map(move |(i, &pos)| (PlayerId((i % player_count) as u8), pos))
    }

    /// Builds a fresh board holding the recorded position
    pub fn replay(&self, size: usize, player_count: usize) -> Result<Board> {
        let mut board = Board::new(size, player_count)?;
        self.replay_onto(&mut board)?;
        Ok(board)
    }

    /// Places the recorded moves in order on `board`
    pub fn replay_onto(&self, board: &mut Board) -> Result<()> {
        if self.to_move.index() >= board.player_count() {
            bail!(
                "player {} cannot move in a {} player game",
                self.to_move,
                board.player_count()
            );
        }
        for (i, (player, (x, y))) in self.placements(board.player_count()).enumerate() {
            trace!("replaying move {}: player {} at ({}, {})", i + 1, player, x, y);
            board
                .place(x, y, player)
                .with_context(|| format!("could not replay move {} of the record", i + 1))?;
        }
        Ok(())
    }
}

fn parse_coordinate(text: &str) -> Result<usize> {
    let text = text.trim();
    text.parse()
        .map_err(|_| anyhow!("could not parse '{}' as a coordinate", text))
}

fn parse_moves(text: &str) -> Result<Vec<Pos>> {
    let text = text.trim();
    if text == "0" {
        return Ok(Vec::new());
    }

    let mut moves = Vec::new();
    let mut rest = text;
    loop {
        let body = rest
            .strip_prefix('(')
            .ok_or_else(|| anyhow!("expected '(' at '{}'", rest))?;
        let close = body
            .find(')')
            .ok_or_else(|| anyhow!("unclosed '(' before '{}'", body))?;
        let pair = &body[..close];
        let (x, y) = pair
            .split_once(',')
            .ok_or_else(|| anyhow!("expected 'x,y' but found '{}'", pair))?;
        moves.push((parse_coordinate(x)?, parse_coordinate(y)?));

        rest = body[close + 1..].trim_start();
        if rest.is_empty() {
            break;
        }
        // the comma between two moves may be left out
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
            if rest.is_empty() {
                bail!("trailing ',' after the last move");
            }
        }
    }
    Ok(moves)
}

impl FromStr for GameRecord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s.trim().lines();
        let player_line = lines.next().ok_or_else(|| anyhow!("empty game record"))?;
        let to_move = player_line
            .trim()
            .parse::<u8>()
            .map(PlayerId)
            .map_err(|_| anyhow!("could not parse '{}' as a player index", player_line.trim()))?;
        let moves_line = lines
            .next()
            .ok_or_else(|| anyhow!("game record has no move list"))?;
        if let Some(extra) = lines.find(|line| !line.trim().is_empty()) {
            bail!("unexpected trailing line '{}'", extra);
        }
        Ok(Self {
            to_move,
            moves: parse_moves(moves_line)?,
        })
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.to_move)?;
        if self.moves.is_empty() {
            return write!(f, "0");
        }
        let moves: Vec<String> = self
            .moves
            .iter()
            .map(|(x, y)| format!("({},{})", x, y))
            .collect();
        write!(f, "{}", moves.join(","))
    }
}
