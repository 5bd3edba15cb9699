//! Flood fills over the grid: walls that join opposite borders, the outline
//! of a player's territory, and the empty cells such a wall seals off.
use std::collections::VecDeque;

use serde::Serialize;

use crate::grid::{CellIndex, Grid};
use crate::types::{Axis, PlayerId, Position, Side};

fn on_side(pos: Position, side: Side, size: u16) -> bool {
    let last = size as i32 - 1;
    match side {
        Side::Top => pos.y == 0,
        Side::Bottom => pos.y == last,
        Side::Left => pos.x == 0,
        Side::Right => pos.x == last,
    }
}

fn side_positions(side: Side, size: u16) -> impl Iterator<Item = Position> {
    let last = size as i32 - 1;
    (0..size as i32).map(move |i| match side {
        Side::Top => Position::new(i, 0),
        Side::Bottom => Position::new(i, last),
        Side::Left => Position::new(0, i),
        Side::Right => Position::new(last, i),
    })
}

/// Breadth first search over the 4-connected cells of `player`, starting from
/// every such cell on `from`. True as soon as a cell on `to` is reached.
pub fn connects_sides(grid: &Grid, player: PlayerId, from: Side, to: Side) -> bool {
    let size = grid.size();
    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();

    for pos in side_positions(from, size) {
        if grid.is_owned_by(pos, player) {
            let idx = grid.index_of(pos);
            visited[idx.as_usize()] = true;
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        let pos = grid.position_of(idx);
        if on_side(pos, to, size) {
            return true;
        }
        for n in grid.neighbors(pos) {
            let n_idx = grid.index_of(n);
            if !visited[n_idx.as_usize()] && grid.is_owned_by(n, player) {
                visited[n_idx.as_usize()] = true;
                queue.push_back(n_idx);
            }
        }
    }

    false
}

/// Which pair of opposite borders `player`'s territory joins, if any. Top to
/// bottom is checked before left to right.
pub fn connecting_axis(grid: &Grid, player: PlayerId) -> Option<Axis> {
    if connects_sides(grid, player, Side::Top, Side::Bottom) {
        Some(Axis::Vertical)
    } else if connects_sides(grid, player, Side::Left, Side::Right) {
        Some(Axis::Horizontal)
    } else {
        None
    }
}

/// does `player` own an unbroken path between two opposite borders
pub fn connects_opposite_sides(grid: &Grid, player: PlayerId) -> bool {
    connecting_axis(grid, player).is_some()
}

/// A unit segment between two lattice points on cell corners. Cell `(x, y)`
/// spans the corners `(x, y)` to `(x + 1, y + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrontierLine {
    #[allow(missing_docs)]
    pub start: Position,
    #[allow(missing_docs)]
    pub end: Position,
}

impl FrontierLine {
    fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        FrontierLine {
            start: Position::new(start.0, start.1),
            end: Position::new(end.0, end.1),
        }
    }
}

/// Outline of a player's territory, recorded for highlighting a winning wall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frontier {
    /// whose territory this outlines
    pub owner: PlayerId,
    /// which borders the wall joins
    pub axis: Axis,
    /// every edge between an owned cell and a cell (or border) that is not owned
    pub lines: Vec<FrontierLine>,
}

/// Emits a segment for each side of each `player` cell whose neighbour is not
/// owned by `player`, the board border included.
pub fn frontier_lines(grid: &Grid, player: PlayerId, axis: Axis) -> Frontier {
    let mut lines = Vec::new();
    for pos in grid.owned_positions(player) {
        let (x, y) = (pos.x, pos.y);
        if !grid.is_owned_by(Position::new(x, y - 1), player) {
            lines.push(FrontierLine::new((x, y), (x + 1, y)));
        }
        if !grid.is_owned_by(Position::new(x, y + 1), player) {
            lines.push(FrontierLine::new((x, y + 1), (x + 1, y + 1)));
        }
        if !grid.is_owned_by(Position::new(x - 1, y), player) {
            lines.push(FrontierLine::new((x, y), (x, y + 1)));
        }
        if !grid.is_owned_by(Position::new(x + 1, y), player) {
            lines.push(FrontierLine::new((x + 1, y), (x + 1, y + 1)));
        }
    }
    Frontier {
        owner: player,
        axis,
        lines,
    }
}

/// Marks every cell that can be reached from any border cell without stepping
/// on a cell owned by `blocker`. Other players' cells can be walked through.
/// The result is indexed by [CellIndex].
pub fn reachable_from_border(grid: &Grid, blocker: PlayerId) -> Vec<bool> {
    let mut reached = vec![false; grid.cell_count()];
    let mut queue: VecDeque<CellIndex> = VecDeque::new();

    for pos in grid.border_positions() {
        if !grid.is_owned_by(pos, blocker) {
            let idx = grid.index_of(pos);
            reached[idx.as_usize()] = true;
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        let pos = grid.position_of(idx);
        for n in grid.neighbors(pos) {
            let n_idx = grid.index_of(n);
            if !reached[n_idx.as_usize()] && !grid.is_owned_by(n, blocker) {
                reached[n_idx.as_usize()] = true;
                queue.push_back(n_idx);
            }
        }
    }

    reached
}

/// Empty cells sealed off from every border by `blocker`'s territory, in
/// board scan order
pub fn blocked_cells(grid: &Grid, blocker: PlayerId) -> Vec<Position> {
    let reached = reachable_from_border(grid, blocker);
    grid.empty_positions()
        .filter(|pos| !reached[grid.index_of(*pos).as_usize()])
        .collect()
}

/// Cells not owned by `blocker` that can still be reached from a border, in
/// board scan order
pub fn accessible_cells(grid: &Grid, blocker: PlayerId) -> Vec<Position> {
    let reached = reachable_from_border(grid, blocker);
    reached
        .iter()
        .enumerate()
        .filter(|(_, r)| **r)
        .map(|(idx, _)| grid.position_of(CellIndex::from_usize(idx)))
        .collect()
}
