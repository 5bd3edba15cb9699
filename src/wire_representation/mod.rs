#![allow(missing_docs)]
//! JSON shapes that cross the crate boundary: board fixtures coming in and
//! session snapshots going out to whatever draws the game
use crate::connectivity::Frontier;
use crate::grid::Grid;
use crate::types::{Piece, PlayerId, Position, SizeDeterminableGame, Winner};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::error::Error;

/// A board written out one string per row, `.` for an unclaimed cell and the
/// digits `1` to `4` for the owning player
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GridFixture {
    pub rows: Vec<String>,
}

impl GridFixture {
    /// builds the grid, failing on ragged rows or unknown characters
    pub fn into_grid(self) -> Result<Grid, Box<dyn Error>> {
        let size = self.rows.len();
        if size == 0 {
            return Err("a fixture needs at least one row".into());
        }
        let size = u16::try_from(size)?;

        let mut grid = Grid::new(size);
        for (y, row) in self.rows.iter().enumerate() {
            if row.chars().count() != size as usize {
                return Err(format!("row {} is not {} cells wide", y, size).into());
            }
            for (x, c) in row.chars().enumerate() {
                let owner = match c {
                    '.' => continue,
                    '1'..='4' => PlayerId(c as u8 - b'1'),
                    other => return Err(format!("unknown cell {:?} in row {}", other, y).into()),
                };
                grid.claim_cell(Position::new(x as i32, y as i32), owner);
            }
        }
        Ok(grid)
    }
}

impl From<&Grid> for GridFixture {
    fn from(grid: &Grid) -> Self {
        GridFixture {
            rows: grid
                .to_string()
                .lines()
                .map(|row| row.to_owned())
                .collect(),
        }
    }
}

/// Everything a front end needs to draw a session and offer the right
/// controls. Grid rows hold the raw cell values, zero for unclaimed and player
/// id plus one otherwise.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub board_size: u16,
    pub rows: Vec<Vec<u8>>,
    pub current_player: PlayerId,
    pub current_piece: Piece,
    pub rotated: bool,
    pub piece_queue: Vec<Piece>,
    pub valid_positions: Vec<Position>,
    pub skip_available: bool,
    pub scores: Vec<usize>,
    pub game_over: bool,
    pub premature_endgame: bool,
    pub winner: Option<Winner>,
    pub frontier: Option<Frontier>,
    pub blocked_cells: Vec<Position>,
    pub computer_player: Option<PlayerId>,
}

impl SessionView {
    /// the player owning a cell of the snapshot
    pub fn occupant(&self, pos: Position) -> Option<PlayerId> {
        if self.off_board(pos) {
            return None;
        }
        PlayerId::from_cell_value(self.rows[pos.y as usize][pos.x as usize])
    }
}

impl SizeDeterminableGame for SessionView {
    fn get_size(&self) -> u16 {
        self.board_size
    }
}
