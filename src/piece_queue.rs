//! Dice rolling and the lookahead queue of upcoming pieces
use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::types::{Piece, DIE_FACES};

/// How many upcoming pieces are shown to the players
pub const QUEUE_CAPACITY: usize = 3;

/// Rolls two dice and turns them into a piece
pub fn roll_piece(rng: &mut impl Rng) -> Piece {
    Piece::from_dice(rng.gen_range(1..=DIE_FACES), rng.gen_range(1..=DIE_FACES))
}

/// FIFO of upcoming pieces which is topped back up to capacity after every pop
#[derive(Debug, Clone)]
pub struct PieceQueue {
    upcoming: VecDeque<Piece>,
    rng: SmallRng,
}

impl PieceQueue {
    /// a full queue drawing from `rng`
    pub fn new(rng: SmallRng) -> Self {
        let mut queue = PieceQueue {
            upcoming: VecDeque::with_capacity(QUEUE_CAPACITY),
            rng,
        };
        queue.refill();
        queue
    }

    /// a full queue with a reproducible sequence of pieces
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    /// a full queue seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    fn refill(&mut self) {
        while self.upcoming.len() < QUEUE_CAPACITY {
            let piece = roll_piece(&mut self.rng);
            self.upcoming.push_back(piece);
        }
    }

    /// takes the next piece and rolls a fresh one on to the back
    pub fn pop(&mut self) -> Piece {
        let piece = match self.upcoming.pop_front() {
            Some(piece) => piece,
            None => roll_piece(&mut self.rng),
        };
        self.refill();
        piece
    }

    /// the upcoming pieces in the order they will be drawn
    pub fn peek(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.upcoming.iter()
    }

    /// number of pieces waiting, always the capacity between calls
    pub fn len(&self) -> usize {
        self.upcoming.len()
    }

    /// never true between calls, provided for completeness with `len`
    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_rolls_stay_on_the_dice() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let piece = roll_piece(&mut rng);
            assert!((1..=DIE_FACES).contains(&piece.width));
            assert!((1..=DIE_FACES).contains(&piece.height));
        }
    }

    #[test]
    fn test_queue_is_refilled_after_pop() {
        let mut queue = PieceQueue::seeded(11);
        assert_eq!(queue.len(), QUEUE_CAPACITY);
        for _ in 0..20 {
            queue.pop();
            assert_eq!(queue.len(), QUEUE_CAPACITY);
        }
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = PieceQueue::seeded(3);
        let preview = queue.peek().copied().collect_vec();
        let popped = (0..QUEUE_CAPACITY).map(|_| queue.pop()).collect_vec();
        assert_eq!(preview, popped);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = PieceQueue::seeded(42);
        let mut b = PieceQueue::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.pop(), b.pop());
        }
    }
}
