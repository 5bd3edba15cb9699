//! The turn and game state machine
//!
//! A session starts in play with the first piece already rolled for player 1.
//! Every turn the current player either places the current piece on one of
//! its valid positions or, when there is none, skips. A placement that makes a
//! two player game's territory join two opposite borders ends the game early
//! and hands the sealed off empty cells to the wall's owner. Otherwise the
//! game runs until the board is full or nobody can place anything.
mod config;

use std::fmt;

use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use thiserror::Error;
use tracing::{debug, info};

use crate::bot::{self, BotMove};
use crate::connectivity::{self, Frontier};
use crate::grid::Grid;
use crate::piece_queue::PieceQueue;
use crate::placement::{self, TurnContext, ValidPositions};
use crate::types::{
    OccupancyQueryableGame, Piece, Placement, PlayerIDGettableGame, PlayerId, Position, Rect,
    SizeDeterminableGame, VictorDeterminableGame, Winner,
};
use crate::wire_representation::SessionView;

pub use config::{
    BoardSize, ConfigError, GameMode, SessionConfig, MAX_BOARD_SIZE, MAX_PLAYERS, MIN_PLAYERS,
};

/// The player the computer controls in a player vs computer game
pub const COMPUTER_PLAYER: PlayerId = PlayerId(1);

/// Operations a session refuses in its current state. None of them change
/// the session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[allow(missing_docs)]
    #[error("the game is over")]
    GameOver,
    #[allow(missing_docs)]
    #[error("{position} is not a valid position for the current piece")]
    NotAValidPosition { position: Position },
    #[allow(missing_docs)]
    #[error("a turn can only be skipped when the current piece has nowhere to go")]
    SkipNotAvailable,
    #[allow(missing_docs)]
    #[error("it is not the computer's turn")]
    NotComputerTurn,
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// turns are being taken
    Playing,
    /// final scores are in, nothing else changes
    GameOver,
}

/// Per player bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    #[allow(missing_docs)]
    pub id: PlayerId,
    /// true until the player's first placement
    pub first_move: bool,
    /// cells owned
    pub score: usize,
    placements: Vec<Placement>,
}

impl PlayerState {
    fn new(id: PlayerId) -> Self {
        PlayerState {
            id,
            first_move: true,
            score: 0,
            placements: Vec::new(),
        }
    }

    /// rectangles placed so far, oldest first
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }
}

/// Final scores and the outcome of a finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    /// cells owned per player, indexed by player id
    pub scores: Vec<usize>,
    #[allow(missing_docs)]
    pub winner: Winner,
}

impl fmt::Display for Standings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, score) in self.scores.iter().enumerate() {
            writeln!(
                f,
                "{}: {} cells",
                PlayerId(idx as u8),
                score.to_formatted_string(&Locale::en)
            )?;
        }
        match self.winner {
            Winner::Player(id) => write!(f, "winner: {}", id),
            Winner::Draw => write!(f, "draw"),
        }
    }
}

fn decide_winner(scores: &[usize]) -> Winner {
    let best = scores.iter().copied().max().unwrap_or(0);
    let leaders = scores.iter().positions(|s| *s == best).collect_vec();
    match leaders.as_slice() {
        [only] => Winner::Player(PlayerId(*only as u8)),
        _ => Winner::Draw,
    }
}

/// One game from the first roll to the final tally
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    grid: Grid,
    queue: PieceQueue,
    players: Vec<PlayerState>,
    current_player: PlayerId,
    rolled: Piece,
    rotated: bool,
    valid: ValidPositions,
    phase: Phase,
    winner: Option<Winner>,
    premature_endgame: bool,
    frontier: Option<Frontier>,
    blocked: Vec<Position>,
    turn: u64,
}

/// Starts a player vs player session with random dice
pub fn start_session(board_size: u16, player_count: u8) -> Result<GameSession, ConfigError> {
    GameSession::start(SessionConfig::new(board_size, player_count))
}

impl GameSession {
    /// validates the config, sets up an empty board and rolls the first piece
    pub fn start(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let queue = match config.seed {
            Some(seed) => PieceQueue::seeded(seed),
            None => PieceQueue::from_entropy(),
        };
        let players = (0..config.player_count)
            .map(|id| PlayerState::new(PlayerId(id)))
            .collect();

        let mut session = GameSession {
            config,
            grid: Grid::new(config.board_size),
            queue,
            players,
            current_player: PlayerId(0),
            rolled: Piece::from_dice(1, 1),
            rotated: false,
            valid: ValidPositions::default(),
            phase: Phase::Playing,
            winner: None,
            premature_endgame: false,
            frontier: None,
            blocked: Vec::new(),
            turn: 0,
        };
        info!(
            board_size = config.board_size,
            player_count = config.player_count,
            mode = ?config.mode,
            "starting session"
        );
        session.roll_next_piece();
        Ok(session)
    }

    /// the settings this session was started with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// read only access to the board
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[allow(missing_docs)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// number of turns taken, placements and skips alike
    pub fn turn(&self) -> u64 {
        self.turn
    }

    #[allow(missing_docs)]
    pub fn player_count(&self) -> u8 {
        self.config.player_count
    }

    /// whose turn it is
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// bookkeeping for a player, None for an id that is not in this session
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id.as_usize())
    }

    /// rectangles a player has placed, oldest first. Empty for an id that is
    /// not in this session.
    pub fn placements(&self, id: PlayerId) -> &[Placement] {
        self.player(id).map(PlayerState::placements).unwrap_or(&[])
    }

    /// the piece to place, with the current rotation applied
    pub fn current_piece(&self) -> Piece {
        if self.rotated {
            self.rolled.rotated()
        } else {
            self.rolled
        }
    }

    /// has the current piece been turned
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// the pieces after the current one, in drawing order
    pub fn piece_queue(&self) -> Vec<Piece> {
        self.queue.peek().copied().collect()
    }

    /// legal anchors for the current piece and player
    pub fn valid_positions(&self) -> &ValidPositions {
        &self.valid
    }

    fn turn_context(&self) -> TurnContext {
        TurnContext {
            player: self.current_player,
            piece: self.current_piece(),
            first_move: self.players[self.current_player.as_usize()].first_move,
            player_count: self.config.player_count,
        }
    }

    /// would the current piece be legal with its top left corner at `pos`
    pub fn can_place(&self, pos: Position) -> bool {
        !self.is_game_over() && placement::can_place(&self.grid, &self.turn_context(), pos)
    }

    /// a skip is only on offer while the current piece has no legal position
    pub fn skip_available(&self) -> bool {
        !self.is_game_over() && self.valid.is_empty()
    }

    fn refresh_valid_positions(&mut self) {
        self.valid = placement::valid_positions(&self.grid, &self.turn_context());
    }

    fn roll_next_piece(&mut self) {
        self.rolled = self.queue.pop();
        self.rotated = false;
        self.refresh_valid_positions();
        debug!(
            player = %self.current_player,
            piece = %self.rolled,
            valid = self.valid.len(),
            "rolled piece"
        );
    }

    /// turns the current piece a quarter and recomputes where it can go
    pub fn rotate(&mut self) -> Result<Piece, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        self.rotated = !self.rotated;
        self.refresh_valid_positions();
        debug!(
            player = %self.current_player,
            piece = %self.current_piece(),
            valid = self.valid.len(),
            "rotated piece"
        );
        Ok(self.current_piece())
    }

    /// places the current piece with its top left corner at `pos`, then passes
    /// the turn on. Positions outside the valid set are refused and the
    /// current player keeps the turn.
    pub fn place_at(&mut self, pos: Position) -> Result<Placement, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if !self.valid.contains(pos) {
            return Err(MoveError::NotAValidPosition { position: pos });
        }

        let owner = self.current_player;
        let rect = Rect::at(pos, self.current_piece());
        self.grid.claim(rect, owner);
        let placed = Placement { rect, owner };

        let state = &mut self.players[owner.as_usize()];
        state.placements.push(placed);
        state.first_move = false;
        state.score += rect.area() as usize;
        debug!(player = %owner, piece = %self.current_piece(), position = %pos, "placed piece");

        self.turn += 1;
        if !self.check_premature_endgame() {
            self.advance_turn();
        }
        Ok(placed)
    }

    /// [GameSession::place_at] for callers that only need to know whether it worked
    pub fn try_place_at(&mut self, x: i32, y: i32) -> bool {
        self.place_at(Position::new(x, y)).is_ok()
    }

    /// passes the turn without placing, only while the current piece has nowhere to go
    pub fn skip_turn(&mut self) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if !self.valid.is_empty() {
            return Err(MoveError::SkipNotAvailable);
        }
        debug!(player = %self.current_player, piece = %self.current_piece(), "skipped turn");
        self.turn += 1;
        self.advance_turn();
        Ok(())
    }

    /// [GameSession::skip_turn] for callers that only need to know whether it worked
    pub fn try_skip_turn(&mut self) -> bool {
        self.skip_turn().is_ok()
    }

    /// plays a move chosen elsewhere, e.g. by [bot::choose_move]
    pub fn apply_move(&mut self, mv: BotMove) -> Result<(), MoveError> {
        match mv {
            BotMove::Place(pos) => self.place_at(pos).map(|_| ()),
            BotMove::Skip => self.skip_turn(),
        }
    }

    /// the computer's player in a player vs computer game
    pub fn computer_player(&self) -> Option<PlayerId> {
        match self.config.mode {
            GameMode::PlayerVsComputer => Some(COMPUTER_PLAYER),
            GameMode::PlayerVsPlayer => None,
        }
    }

    /// is the computer due to move
    pub fn is_computer_turn(&self) -> bool {
        !self.is_game_over() && self.computer_player() == Some(self.current_player)
    }

    /// lets the computer choose and play its move as one step. Refused unless
    /// it is the computer's turn.
    pub fn play_computer_turn(&mut self) -> Result<BotMove, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if !self.is_computer_turn() {
            return Err(MoveError::NotComputerTurn);
        }
        let mv = bot::choose_move(self);
        self.apply_move(mv)?;
        Ok(mv)
    }

    fn advance_turn(&mut self) {
        let next = (self.current_player.0 + 1) % self.config.player_count;
        self.current_player = PlayerId(next);
        self.rotated = false;

        if self.board_exhausted() {
            self.end_game();
        } else {
            self.roll_next_piece();
        }
    }

    fn board_exhausted(&self) -> bool {
        if self.grid.is_full() {
            return true;
        }
        !self.players.iter().any(|p| {
            placement::can_ever_place(&self.grid, p.id, p.first_move, self.config.player_count)
        })
    }

    /// Opposite border walls only end two player games. Returns true when the
    /// game ended.
    fn check_premature_endgame(&mut self) -> bool {
        if self.config.player_count != 2 {
            return false;
        }
        let connected = self
            .players
            .iter()
            .find_map(|p| connectivity::connecting_axis(&self.grid, p.id).map(|axis| (p.id, axis)));

        match connected {
            Some((id, axis)) => {
                self.premature_endgame = true;
                self.frontier = Some(connectivity::frontier_lines(&self.grid, id, axis));
                self.blocked = connectivity::blocked_cells(&self.grid, id);
                for pos in self.blocked.iter() {
                    self.grid.claim_cell(*pos, id);
                }
                info!(
                    player = %id,
                    axis = %axis,
                    blocked = self.blocked.len(),
                    "wall joins opposite borders"
                );
                self.end_game();
                true
            }
            None => false,
        }
    }

    fn end_game(&mut self) {
        self.valid = ValidPositions::default();
        for p in self.players.iter_mut() {
            p.score = self.grid.count_owned(p.id);
        }
        let winner = decide_winner(&self.scores());
        self.winner = Some(winner);
        self.phase = Phase::GameOver;
        info!(scores = ?self.scores(), winner = ?winner, "game over");
    }

    #[allow(missing_docs)]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// the sole winner, None while playing or after a draw
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner.and_then(|w| w.player())
    }

    /// how the game ended, None while playing
    pub fn outcome(&self) -> Option<Winner> {
        self.winner
    }

    /// cells owned by each player, indexed by player id
    pub fn scores(&self) -> Vec<usize> {
        self.players.iter().map(|p| p.score).collect()
    }

    /// final scores and outcome once the game is over
    pub fn standings(&self) -> Option<Standings> {
        self.winner.map(|winner| Standings {
            scores: self.scores(),
            winner,
        })
    }

    /// did a wall end the game early
    pub fn is_premature_endgame(&self) -> bool {
        self.premature_endgame
    }

    /// outline of the wall that ended the game early
    pub fn frontier_lines(&self) -> Option<&Frontier> {
        self.frontier.as_ref()
    }

    /// empty cells the wall sealed off and handed to its owner
    pub fn blocked_cells(&self) -> &[Position] {
        &self.blocked
    }

    /// a serialisable snapshot for whoever draws the board
    pub fn view(&self) -> SessionView {
        SessionView {
            board_size: self.grid.size(),
            rows: self.grid.rows().map(|r| r.to_vec()).collect(),
            current_player: self.current_player,
            current_piece: self.current_piece(),
            rotated: self.rotated,
            piece_queue: self.piece_queue(),
            valid_positions: self.valid.iter().copied().collect(),
            skip_available: self.skip_available(),
            scores: self.scores(),
            game_over: self.is_game_over(),
            premature_endgame: self.premature_endgame,
            winner: self.winner,
            frontier: self.frontier.clone(),
            blocked_cells: self.blocked.clone(),
            computer_player: self.computer_player(),
        }
    }
}

impl SizeDeterminableGame for GameSession {
    fn get_size(&self) -> u16 {
        self.grid.size()
    }
}

impl OccupancyQueryableGame for GameSession {
    fn occupant(&self, pos: Position) -> Option<PlayerId> {
        self.grid.occupant(pos)
    }
}

impl PlayerIDGettableGame for GameSession {
    fn get_player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }
}

impl VictorDeterminableGame for GameSession {
    fn is_over(&self) -> bool {
        self.is_game_over()
    }

    fn get_winner(&self) -> Option<PlayerId> {
        self.winner()
    }
}
