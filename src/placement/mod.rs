//! Legality rules for putting a piece on the board
//!
//! A player's first piece goes in the corner assigned to them. Every later
//! piece has to sit fully on the board, cover only unclaimed cells and have at
//! least one whole side resting against cells the same player already owns.
use fxhash::FxHashSet;

use crate::grid::Grid;
use crate::types::{OccupancyQueryableGame, Piece, PlayerId, Position, Rect, Side};

/// Everything the validator needs to know about the piece being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    /// who is placing
    pub player: PlayerId,
    /// the piece in its current orientation
    pub piece: Piece,
    /// true until this player has placed anything
    pub first_move: bool,
    /// number of players in the session, decides which corners are in use
    pub player_count: u8,
}

/// The corner a player's first piece has to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Corner {
    TopLeft,
    BottomRight,
    TopRight,
    BottomLeft,
}

impl Corner {
    /// corner assigned to a player. Players 2 and 3 only get a corner when
    /// there are enough players for them to exist.
    pub fn for_player(player: PlayerId, player_count: u8) -> Option<Corner> {
        match player.0 {
            0 => Some(Corner::TopLeft),
            1 => Some(Corner::BottomRight),
            2 if player_count >= 3 => Some(Corner::TopRight),
            3 if player_count >= 4 => Some(Corner::BottomLeft),
            _ => None,
        }
    }

    /// the cell in this corner of a board
    pub fn cell(&self, size: u16) -> Position {
        let last = size as i32 - 1;
        match self {
            Corner::TopLeft => Position::new(0, 0),
            Corner::BottomRight => Position::new(last, last),
            Corner::TopRight => Position::new(last, 0),
            Corner::BottomLeft => Position::new(0, last),
        }
    }

    /// top left anchor that puts `piece` flush into this corner
    pub fn anchor(&self, size: u16, piece: Piece) -> Position {
        let size = size as i32;
        let (w, h) = (piece.width as i32, piece.height as i32);
        match self {
            Corner::TopLeft => Position::new(0, 0),
            Corner::BottomRight => Position::new(size - w, size - h),
            Corner::TopRight => Position::new(size - w, 0),
            Corner::BottomLeft => Position::new(0, size - h),
        }
    }
}

/// The anchor position of a player's opening piece
pub fn first_move_corner(size: u16, turn: &TurnContext) -> Option<Position> {
    Corner::for_player(turn.player, turn.player_count).map(|c| c.anchor(size, turn.piece))
}

/// does some whole side of `rect` rest against cells owned by `player`.
/// A side on the board border never counts.
pub fn has_full_edge_contact(grid: &Grid, rect: Rect, player: PlayerId) -> bool {
    Side::all().iter().any(|side| {
        rect.outside_edge(*side)
            .all(|pos| grid.is_owned_by(pos, player))
    })
}

/// Checks a single anchor position for the current piece
pub fn can_place(grid: &Grid, turn: &TurnContext, origin: Position) -> bool {
    let rect = Rect::at(origin, turn.piece);
    if !grid.rect_in_bounds(rect) || !grid.rect_is_empty(rect) {
        return false;
    }

    if turn.first_move {
        return first_move_corner(grid.size(), turn) == Some(origin);
    }

    has_full_edge_contact(grid, rect, turn.player)
}

/// The legal anchors for the current piece, kept both in board scan order
/// (rows top to bottom, columns left to right) and as a set for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidPositions {
    ordered: Vec<Position>,
    lookup: FxHashSet<Position>,
}

impl ValidPositions {
    fn push(&mut self, pos: Position) {
        if self.lookup.insert(pos) {
            self.ordered.push(pos);
        }
    }

    /// is this anchor legal
    pub fn contains(&self, pos: Position) -> bool {
        self.lookup.contains(&pos)
    }

    /// legal anchors in scan order
    pub fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.ordered.iter()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// no legal anchor, the player has to skip
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// the anchors as a set
    pub fn as_set(&self) -> &FxHashSet<Position> {
        &self.lookup
    }
}

/// Every legal anchor for the current piece and player
pub fn valid_positions(grid: &Grid, turn: &TurnContext) -> ValidPositions {
    let mut valid = ValidPositions::default();

    if turn.first_move {
        if let Some(corner) = first_move_corner(grid.size(), turn) {
            if can_place(grid, turn, corner) {
                valid.push(corner);
            }
        }
        return valid;
    }

    let size = grid.size() as i32;
    let max_x = size - turn.piece.width as i32;
    let max_y = size - turn.piece.height as i32;
    for y in 0..=max_y {
        for x in 0..=max_x {
            let pos = Position::new(x, y);
            if can_place(grid, turn, pos) {
                valid.push(pos);
            }
        }
    }
    valid
}

/// Could `player` place anything ever again, whatever pieces they roll. The
/// smallest piece is a single cell, so this asks whether one cell could go
/// somewhere.
pub fn can_ever_place(grid: &Grid, player: PlayerId, first_move: bool, player_count: u8) -> bool {
    if first_move {
        return match Corner::for_player(player, player_count) {
            Some(corner) => grid.is_empty_cell(corner.cell(grid.size())),
            None => false,
        };
    }

    grid.owned_positions(player)
        .any(|pos| grid.neighbors(pos).any(|n| grid.is_empty_cell(n)))
}
