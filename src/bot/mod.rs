//! A greedy heuristic player
//!
//! Every legal anchor for the current piece is scored and the best one is
//! played, the first in scan order winning ties. The score rewards staying
//! close to the opponents, staying close to the centre and big pieces, and it
//! punishes hugging the board edge.
use std::collections::VecDeque;

use serde::Serialize;
use tracing::{instrument, trace};

use crate::grid::CellIndex;
use crate::session::GameSession;
use crate::types::{OccupancyQueryableGame, Piece, PlayerId, Position, SizeDeterminableGame};

/// bonus for sitting right next to an opponent, shrinking with distance
pub const OPPONENT_BONUS: i64 = 100;
/// how fast the opponent bonus shrinks per cell of distance
pub const OPPONENT_DISTANCE_WEIGHT: i64 = 2;
/// bonus for sitting on the centre, shrinking with distance
pub const CENTER_BONUS: i64 = 50;
/// reward per cell of piece area
pub const AREA_WEIGHT: i64 = 3;
/// pieces this close to a border are penalised
pub const EDGE_MARGIN: i32 = 2;
#[allow(missing_docs)]
pub const EDGE_PENALTY: i64 = 20;

/// A move the computer has decided on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMove {
    /// put the current piece with its top left corner here
    Place(Position),
    /// the current piece has nowhere to go
    Skip,
}

/// Distance from every cell to the nearest cell owned by someone other than
/// `player`, indexed by [CellIndex]. All cells are None when no opponent owns
/// anything yet.
pub fn opponent_distance_field<G: OccupancyQueryableGame>(
    game: &G,
    player: PlayerId,
) -> Vec<Option<u32>> {
    let size = game.get_size();
    let cell_count = size as usize * size as usize;
    let mut dist = vec![None; cell_count];
    let mut queue = VecDeque::new();

    for idx in 0..cell_count {
        let pos = CellIndex::from_usize(idx).into_position(size);
        if matches!(game.occupant(pos), Some(owner) if owner != player) {
            dist[idx] = Some(0);
            queue.push_back(pos);
        }
    }

    while let Some(pos) = queue.pop_front() {
        let d = dist[CellIndex::new(pos, size).as_usize()].unwrap_or(0);
        for n in IntoIterator::into_iter(pos.neighbors()) {
            if game.off_board(n) {
                continue;
            }
            let n_idx = CellIndex::new(n, size).as_usize();
            if dist[n_idx].is_none() {
                dist[n_idx] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }

    dist
}

/// Heuristic value of putting `piece` at `pos` on a board of `size` cells a
/// side, given the distance from `pos` to the nearest opponent cell.
pub fn score_position(
    size: u16,
    pos: Position,
    piece: Piece,
    opponent_distance: Option<u32>,
) -> i64 {
    let size = size as i32;
    let center = Position::new(size / 2, size / 2);

    let opponent = opponent_distance
        .map(|d| (OPPONENT_BONUS - OPPONENT_DISTANCE_WEIGHT * d as i64).max(0))
        .unwrap_or(0);
    let centre = (CENTER_BONUS - pos.manhattan_distance(&center) as i64).max(0);
    let area = AREA_WEIGHT * piece.area() as i64;

    let near_edge = pos.x < EDGE_MARGIN
        || pos.y < EDGE_MARGIN
        || pos.x + piece.width as i32 > size - EDGE_MARGIN
        || pos.y + piece.height as i32 > size - EDGE_MARGIN;
    let edge = if near_edge { EDGE_PENALTY } else { 0 };

    opponent + centre + area - edge
}

/// Picks the move for the current player of `session`
#[instrument(level = "trace", skip(session), fields(player = %session.current_player()))]
pub fn choose_move(session: &GameSession) -> BotMove {
    let valid = session.valid_positions();
    if valid.is_empty() {
        trace!("nothing fits, skipping");
        return BotMove::Skip;
    }

    let size = session.get_size();
    let piece = session.current_piece();
    let dist = opponent_distance_field(session, session.current_player());

    let mut best: Option<(Position, i64)> = None;
    for pos in valid.iter() {
        let score = score_position(size, *pos, piece, dist[CellIndex::new(*pos, size).as_usize()]);
        trace!(position = %pos, score, "scored candidate");
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((*pos, score)),
        }
    }

    match best {
        Some((pos, score)) => {
            trace!(position = %pos, score, "chose move");
            BotMove::Place(pos)
        }
        None => BotMove::Skip,
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::grid::Grid;
    use crate::session::SessionConfig;
    use crate::types::Rect;

    fn nearest_opponent(grid: &Grid, player: PlayerId, pos: Position) -> Option<u32> {
        (0..4u8)
            .map(PlayerId)
            .filter(|p| *p != player)
            .flat_map(|p| grid.owned_positions(p).collect_vec())
            .map(|c| c.manhattan_distance(&pos) as u32)
            .min()
    }

    #[test]
    fn test_distance_field_is_manhattan() {
        let mut grid = Grid::new(7);
        grid.claim(Rect::at(Position::new(5, 1), Piece::from_dice(2, 1)), PlayerId(1));
        grid.claim(Rect::at(Position::new(0, 6), Piece::from_dice(1, 1)), PlayerId(2));
        grid.claim(Rect::at(Position::new(0, 0), Piece::from_dice(3, 3)), PlayerId(0));

        let field = opponent_distance_field(&grid, PlayerId(0));
        for idx in 0..grid.cell_count() {
            let pos = CellIndex::from_usize(idx).into_position(grid.size());
            assert_eq!(field[idx], nearest_opponent(&grid, PlayerId(0), pos), "{}", pos);
        }
        assert_eq!(field[grid.index_of(Position::new(5, 1)).as_usize()], Some(0));
        assert_eq!(field[grid.index_of(Position::new(0, 0)).as_usize()], Some(6));
        assert_eq!(field[grid.index_of(Position::new(4, 2)).as_usize()], Some(2));
    }

    #[test]
    fn test_distance_field_without_opponents() {
        let mut grid = Grid::new(4);
        grid.claim(Rect::at(Position::new(0, 0), Piece::from_dice(2, 2)), PlayerId(0));
        assert!(opponent_distance_field(&grid, PlayerId(0)).iter().all(Option::is_none));
    }

    #[test]
    fn test_scores() {
        // near the centre, no opponents: centre 48 + area 12
        assert_eq!(score_position(50, Position::new(24, 24), Piece::from_dice(2, 2), None), 60);
        assert_eq!(
            score_position(50, Position::new(24, 24), Piece::from_dice(2, 2), Some(10)),
            140
        );
        // in the corner: no centre bonus, area 3, edge penalty
        assert_eq!(score_position(50, Position::new(0, 0), Piece::from_dice(1, 1), None), -17);
        // far away opponents are worth nothing
        assert_eq!(
            score_position(50, Position::new(0, 0), Piece::from_dice(1, 1), Some(60)),
            -17
        );
        // touching the bottom margin counts as near the edge
        assert_eq!(
            score_position(10, Position::new(4, 6), Piece::from_dice(1, 3), None),
            score_position(10, Position::new(4, 5), Piece::from_dice(1, 3), None) - 1 - EDGE_PENALTY
        );
    }

    #[test]
    fn test_skips_only_when_nothing_fits() {
        let mut skipped = 0;
        for seed in 0..20 {
            let mut session = GameSession::start(SessionConfig::new(4, 2).with_seed(seed)).unwrap();
            while !session.is_game_over() {
                let mv = choose_move(&session);
                match mv {
                    BotMove::Skip => {
                        assert!(session.skip_available());
                        skipped += 1;
                    }
                    BotMove::Place(pos) => assert!(session.valid_positions().contains(pos)),
                }
                session.apply_move(mv).unwrap();
            }
        }
        assert!(skipped > 0);
    }

    #[test]
    fn test_picks_the_first_best_candidate() {
        let mut session = GameSession::start(SessionConfig::new(30, 2).with_seed(9)).unwrap();
        for _ in 0..40 {
            if session.is_game_over() {
                break;
            }
            let player = session.current_player();
            let piece = session.current_piece();
            let expected = session
                .valid_positions()
                .iter()
                .copied()
                .map(|pos| {
                    let d = nearest_opponent(session.grid(), player, pos);
                    (pos, score_position(30, pos, piece, d))
                })
                .fold(None, |best: Option<(Position, i64)>, (pos, score)| match best {
                    Some((_, s)) if s >= score => best,
                    _ => Some((pos, score)),
                });

            let mv = choose_move(&session);
            match expected {
                Some((pos, _)) => assert_eq!(mv, BotMove::Place(pos)),
                None => assert_eq!(mv, BotMove::Skip),
            }
            session.apply_move(mv).unwrap();
        }
    }

    #[test]
    fn test_bot_move_serializes() {
        assert_eq!(
            serde_json::to_string(&BotMove::Place(Position::new(3, 4))).unwrap(),
            r#"{"place":{"x":3,"y":4}}"#
        );
        assert_eq!(serde_json::to_string(&BotMove::Skip).unwrap(), r#""skip""#);
    }
}
