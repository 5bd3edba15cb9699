use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest board the engine accepts
pub const MAX_BOARD_SIZE: u16 = 1024;

/// Fewest players in a session
pub const MIN_PLAYERS: u8 = 2;

/// Most players in a session, one per board corner
pub const MAX_PLAYERS: u8 = 4;

/// Board sizes offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    /// 50x50
    Small,
    /// 100x100
    Medium,
    /// 150x150
    Large,
}

impl BoardSize {
    /// every preset, smallest first
    pub fn all() -> [BoardSize; 3] {
        [BoardSize::Small, BoardSize::Medium, BoardSize::Large]
    }

    /// number of cells along one side
    pub fn cells(self) -> u16 {
        match self {
            BoardSize::Small => 50,
            BoardSize::Medium => 100,
            BoardSize::Large => 150,
        }
    }
}

/// Who controls the players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// every player is a human at the same screen
    #[serde(rename = "pvp")]
    PlayerVsPlayer,
    /// player 2 is the computer, always a two player game
    #[serde(rename = "pvc")]
    PlayerVsComputer,
}

/// Settings chosen before a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// cells along each side of the square board
    pub board_size: u16,
    /// number of players, 2 to 4
    pub player_count: u8,
    #[allow(missing_docs)]
    pub mode: GameMode,
    /// seeds the dice so a session can be replayed, random when absent
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            board_size: BoardSize::Small.cells(),
            player_count: MIN_PLAYERS,
            mode: GameMode::PlayerVsPlayer,
            seed: None,
        }
    }
}

/// Reasons a session refuses to start
#[derive(Debug, Error)]
pub enum ConfigError {
    #[allow(missing_docs)]
    #[error("board size must be between 1 and {}, got {0}", MAX_BOARD_SIZE)]
    InvalidBoardSize(u16),
    #[allow(missing_docs)]
    #[error("player count must be between {} and {}, got {0}", MIN_PLAYERS, MAX_PLAYERS)]
    InvalidPlayerCount(u8),
    #[allow(missing_docs)]
    #[error("a game against the computer needs exactly 2 players, got {0}")]
    ComputerNeedsTwoPlayers(u8),
    #[allow(missing_docs)]
    #[error("could not parse session config: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionConfig {
    /// a player vs player config with the given size and player count
    pub fn new(board_size: u16, player_count: u8) -> Self {
        SessionConfig {
            board_size,
            player_count,
            ..Default::default()
        }
    }

    /// a two player game against the computer
    pub fn against_computer(board_size: u16) -> Self {
        SessionConfig {
            board_size,
            player_count: 2,
            mode: GameMode::PlayerVsComputer,
            seed: None,
        }
    }

    /// fixes the dice sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// parses and validates a JSON config, missing fields take the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// checks the config before any board is allocated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::InvalidBoardSize(self.board_size));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::InvalidPlayerCount(self.player_count));
        }
        if self.mode == GameMode::PlayerVsComputer && self.player_count != 2 {
            return Err(ConfigError::ComputerNeedsTwoPlayers(self.player_count));
        }
        Ok(())
    }
}
