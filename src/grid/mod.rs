//! The occupancy matrix the whole engine reads and writes
use std::fmt;

use crate::types::{OccupancyQueryableGame, PlayerId, Position, Rect, SizeDeterminableGame};

/// wrapper type for an index in to the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct CellIndex(pub u32);

impl CellIndex {
    /// makes a new cell index from a position, needs to know the width of the board
    pub fn new(pos: Position, width: u16) -> Self {
        Self((pos.y * width as i32 + pos.x) as u32)
    }

    /// build a CellIndex from a usize
    pub fn from_usize(u: usize) -> Self {
        Self(u as u32)
    }

    /// get a usize from a CellIndex
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// converts a cellindex to a position
    pub fn into_position(self, width: u16) -> Position {
        let y = (self.0 / width as u32) as i32;
        let x = (self.0 % width as u32) as i32;
        Position { x, y }
    }
}

/// A square matrix of owners. Each cell holds zero when unclaimed and the
/// player id plus one otherwise.
///
/// The grid trusts its callers: [Grid::claim] expects a rectangle that the
/// placement validator has already checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u16,
    cells: Vec<u8>,
}

impl Grid {
    /// an empty board of `size` x `size` cells
    pub fn new(size: u16) -> Self {
        Grid {
            size,
            cells: vec![0; size as usize * size as usize],
        }
    }

    /// number of cells along one side
    pub fn size(&self) -> u16 {
        self.size
    }

    /// total number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// index of an on-board position
    pub fn index_of(&self, pos: Position) -> CellIndex {
        debug_assert!(!self.off_board(pos), "{} is off the board", pos);
        CellIndex::new(pos, self.size)
    }

    /// position of a cell index
    pub fn position_of(&self, idx: CellIndex) -> Position {
        idx.into_position(self.size)
    }

    /// raw owner of a cell by index, None when unclaimed
    pub fn occupant_at(&self, idx: CellIndex) -> Option<PlayerId> {
        PlayerId::from_cell_value(self.cells[idx.as_usize()])
    }

    /// does `player` own this cell. Off board positions are owned by nobody.
    pub fn is_owned_by(&self, pos: Position, player: PlayerId) -> bool {
        !self.off_board(pos) && self.cells[self.index_of(pos).as_usize()] == player.as_cell_value()
    }

    /// marks every cell of `rect` as owned by `owner`
    pub fn claim(&mut self, rect: Rect, owner: PlayerId) {
        debug_assert!(self.rect_in_bounds(rect), "{:?} leaves the board", rect);
        for pos in rect.cells() {
            let idx = self.index_of(pos);
            debug_assert_eq!(self.cells[idx.as_usize()], 0, "{} already claimed", pos);
            self.cells[idx.as_usize()] = owner.as_cell_value();
        }
    }

    /// hands a single unclaimed cell to `owner`. Used when sealed off territory
    /// is awarded at the end of the game.
    pub fn claim_cell(&mut self, pos: Position, owner: PlayerId) {
        let idx = self.index_of(pos);
        debug_assert_eq!(self.cells[idx.as_usize()], 0, "{} already claimed", pos);
        self.cells[idx.as_usize()] = owner.as_cell_value();
    }

    /// is the rectangle fully on the board
    pub fn rect_in_bounds(&self, rect: Rect) -> bool {
        let size = self.size as i32;
        rect.x >= 0 && rect.y >= 0 && rect.right() <= size && rect.bottom() <= size
    }

    /// is every cell of the (in bounds) rectangle unclaimed
    pub fn rect_is_empty(&self, rect: Rect) -> bool {
        rect.cells().all(|pos| self.cells[self.index_of(pos).as_usize()] == 0)
    }

    /// number of cells owned by `player`
    pub fn count_owned(&self, player: PlayerId) -> usize {
        let value = player.as_cell_value();
        self.cells.iter().filter(|c| **c == value).count()
    }

    /// number of unclaimed cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == 0).count()
    }

    /// are there no unclaimed cells left
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&0)
    }

    /// iterate the positions of every cell owned by `player`
    pub fn owned_positions(&self, player: PlayerId) -> impl Iterator<Item = Position> + '_ {
        let value = player.as_cell_value();
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == value)
            .map(move |(idx, _)| CellIndex::from_usize(idx).into_position(self.size))
    }

    /// iterate the positions of every unclaimed cell
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == 0)
            .map(move |(idx, _)| CellIndex::from_usize(idx).into_position(self.size))
    }

    /// positions on the outer ring of the board, each listed once
    pub fn border_positions(&self) -> impl Iterator<Item = Position> {
        let last = self.size as i32 - 1;
        (0..=last).flat_map(move |y| {
            let xs: Box<dyn Iterator<Item = i32>> = if y == 0 || y == last {
                Box::new(0..=last)
            } else if last > 0 {
                Box::new(IntoIterator::into_iter([0, last]))
            } else {
                Box::new(std::iter::once(0))
            };
            xs.map(move |x| Position::new(x, y))
        })
    }

    /// the on-board, edge-adjacent neighbours of a position
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        IntoIterator::into_iter(pos.neighbors()).filter(move |n| !self.off_board(*n))
    }

    /// raw cell values row by row, top row first
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.cells.chunks(self.size.max(1) as usize)
    }
}

impl SizeDeterminableGame for Grid {
    fn get_size(&self) -> u16 {
        self.size
    }
}

impl OccupancyQueryableGame for Grid {
    fn occupant(&self, pos: Position) -> Option<PlayerId> {
        if self.off_board(pos) {
            None
        } else {
            self.occupant_at(self.index_of(pos))
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                if *cell == 0 {
                    write!(f, ".")?;
                } else {
                    write!(f, "{}", cell)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::types::Piece;

    #[test]
    fn test_cell_index_round_trips() {
        let pos = Position::new(7, 3);
        let idx = CellIndex::new(pos, 10);
        assert_eq!(idx, CellIndex(37));
        assert_eq!(idx.into_position(10), pos);
    }

    #[test]
    fn test_claim_marks_only_the_rect() {
        let mut grid = Grid::new(6);
        let rect = Rect::at(Position::new(1, 2), Piece::from_dice(3, 2));
        grid.claim(rect, PlayerId(1));

        for y in 0..6 {
            for x in 0..6 {
                let pos = Position::new(x, y);
                if rect.contains(pos) {
                    assert_eq!(grid.occupant(pos), Some(PlayerId(1)));
                } else {
                    assert_eq!(grid.occupant(pos), None);
                }
            }
        }
        assert_eq!(grid.count_owned(PlayerId(1)), 6);
        assert_eq!(grid.empty_count(), 30);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_off_board_is_never_owned() {
        let mut grid = Grid::new(3);
        grid.claim(Rect::at(Position::new(0, 0), Piece::from_dice(3, 3)), PlayerId(0));
        assert!(grid.is_full());
        assert_eq!(grid.occupant(Position::new(-1, 0)), None);
        assert_eq!(grid.occupant(Position::new(0, 3)), None);
        assert!(!grid.is_owned_by(Position::new(3, 3), PlayerId(0)));
        assert!(!grid.is_empty_cell(Position::new(3, 0)));
    }

    #[test]
    fn test_rect_bounds() {
        let grid = Grid::new(5);
        assert!(grid.rect_in_bounds(Rect::at(Position::new(0, 0), Piece::from_dice(5, 5))));
        assert!(!grid.rect_in_bounds(Rect::at(Position::new(1, 0), Piece::from_dice(5, 1))));
        assert!(!grid.rect_in_bounds(Rect::at(Position::new(-1, 0), Piece::from_dice(1, 1))));
    }

    #[test]
    fn test_border_positions_cover_ring_once() {
        let grid = Grid::new(4);
        let border = grid.border_positions().collect_vec();
        assert_eq!(border.len(), 12);
        assert_eq!(border.iter().unique().count(), 12);
        assert!(border
            .iter()
            .all(|p| p.x == 0 || p.y == 0 || p.x == 3 || p.y == 3));

        assert_eq!(Grid::new(1).border_positions().count(), 1);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(3);
        grid.claim(Rect::at(Position::new(1, 1), Piece::from_dice(2, 1)), PlayerId(1));
        assert_eq!(format!("{}", grid), "...\n.22\n...\n");
    }
}
