//! Player identities and the table of names and marks shown to humans

use std::fmt;

use crate::MAX_PLAYERS;

/// A seat at the board, numbered from 0 in turn order
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The player seated after this one
    pub fn next(self, player_count: usize) -> Self {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }

    /// The player seated before this one
    pub fn prev(self, player_count: usize) -> Self {
        PlayerId(((self.index() + player_count - 1) % player_count) as u8)
    }

    /// Iterates all seats of a game with `player_count` players
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(|i| PlayerId(i as u8))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlayerInfo {
    pub name: &'static str,
    pub mark: char,
}

const STANDARD: [PlayerInfo; MAX_PLAYERS] = [
    PlayerInfo { name: "Circle", mark: 'O' },
    PlayerInfo { name: "Cross", mark: 'X' },
    PlayerInfo { name: "Square", mark: '=' },
    PlayerInfo { name: "Triangle", mark: '^' },
];

/// Read-only presentation data for the seated players
///
/// The board and the search only ever see [`PlayerId`]s; whoever draws the
/// game owns a `Roster` to turn them into names and marks.
#[derive(Clone, Debug)]
pub struct Roster {
    players: Vec<PlayerInfo>,
}

impl Roster {
    /// The first `player_count` of Circle, Cross, Square and Triangle
    pub fn standard(player_count: usize) -> Self {
        Self {
            players: STANDARD.iter().take(player_count).copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, player: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(player.index())
    }

    pub fn name(&self, player: PlayerId) -> &'static str {
        self.get(player).map_or("?", |info| info.name)
    }

    pub fn mark(&self, player: PlayerId) -> char {
        self.get(player).map_or('?', |info| info.mark)
    }
}
