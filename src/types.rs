//! various types that are useful for working with rectangle battles
use serde::{Serialize, Serializer};
use std::fmt::{self, Debug};

/// Number of faces on each die used to roll a piece
pub const DIE_FACES: u8 = 6;

/// Position of a cell on the board. `x` is the column and `y` the row, with the
/// origin in the top left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    /// make a new position
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// manhattan distance between two positions
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// returns the four edge-adjacent positions, which may be off the board
    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// token to represent a player. Player ids are zero based, the grid stores
/// them offset by one so that zero can mean an unclaimed cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// convert this player ID to a usize
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// the value written into grid cells owned by this player
    pub fn as_cell_value(&self) -> u8 {
        self.0 + 1
    }

    /// the player owning a raw grid cell value, None for an unclaimed cell
    pub fn from_cell_value(value: u8) -> Option<PlayerId> {
        value.checked_sub(1).map(PlayerId)
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0 + 1)
    }
}

/// An axis along which a wall can split the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// a wall running from the top border to the bottom border
    Vertical,
    /// a wall running from the left border to the right border
    Horizontal,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Vertical => write!(f, "top-bottom"),
            Axis::Horizontal => write!(f, "left-right"),
        }
    }
}

/// The four borders of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// returns all four sides
    pub fn all() -> [Side; 4] {
        [Side::Top, Side::Bottom, Side::Left, Side::Right]
    }
}

/// An axis aligned rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub width: u8,
    #[allow(missing_docs)]
    pub height: u8,
}

impl Rect {
    /// a rectangle of the given piece anchored with its top left corner at `origin`
    pub fn at(origin: Position, piece: Piece) -> Self {
        Rect {
            x: origin.x,
            y: origin.y,
            width: piece.width,
            height: piece.height,
        }
    }

    /// top left corner of the rectangle
    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// one past the last column
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// one past the last row
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// number of cells covered
    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// does this rectangle cover the given position
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    /// all covered positions, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (x, right, y, bottom) = (self.x, self.right(), self.y, self.bottom());
        (y..bottom).flat_map(move |row| (x..right).map(move |col| Position::new(col, row)))
    }

    /// the cells just outside the given side of the rectangle. These may be off the board.
    pub fn outside_edge(&self, side: Side) -> Box<dyn Iterator<Item = Position>> {
        let (x, right, y, bottom) = (self.x, self.right(), self.y, self.bottom());
        match side {
            Side::Left => Box::new((y..bottom).map(move |row| Position::new(x - 1, row))),
            Side::Right => Box::new((y..bottom).map(move |row| Position::new(right, row))),
            Side::Top => Box::new((x..right).map(move |col| Position::new(col, y - 1))),
            Side::Bottom => Box::new((x..right).map(move |col| Position::new(col, bottom))),
        }
    }
}

/// A rectangular piece rolled from two dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    #[allow(missing_docs)]
    pub width: u8,
    #[allow(missing_docs)]
    pub height: u8,
}

impl Piece {
    /// the piece for a pair of die values, first die is the width
    pub fn from_dice(first: u8, second: u8) -> Self {
        debug_assert!((1..=DIE_FACES).contains(&first));
        debug_assert!((1..=DIE_FACES).contains(&second));
        Piece {
            width: first,
            height: second,
        }
    }

    /// the same piece turned a quarter, width and height swapped
    pub fn rotated(self) -> Self {
        Piece {
            width: self.height,
            height: self.width,
        }
    }

    /// number of cells this piece claims
    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle committed to the board by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Placement {
    #[allow(missing_docs)]
    pub rect: Rect,
    #[allow(missing_docs)]
    pub owner: PlayerId,
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "player")]
pub enum Winner {
    /// a single player owns strictly the most cells
    Player(PlayerId),
    /// more than one player shares the highest cell count
    Draw,
}

impl Winner {
    /// the winning player, None for a draw
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Winner::Player(id) => Some(*id),
            Winner::Draw => None,
        }
    }
}

/// A game for which the player ids can be listed
pub trait PlayerIDGettableGame {
    #[allow(missing_docs)]
    fn get_player_ids(&self) -> Vec<PlayerId>;
}

/// a game for which the size of the (square) board can be determined
pub trait SizeDeterminableGame {
    /// number of cells along each side of the board
    fn get_size(&self) -> u16;

    /// determines if a given position is not on the board
    fn off_board(&self, pos: Position) -> bool {
        let size = self.get_size() as i32;
        pos.x < 0 || pos.y < 0 || pos.x >= size || pos.y >= size
    }
}

/// A game where the owner of every cell can be queried
pub trait OccupancyQueryableGame: SizeDeterminableGame {
    /// who owns this cell, None if it is unclaimed. Off board positions are never owned.
    fn occupant(&self, pos: Position) -> Option<PlayerId>;

    /// is this cell on the board and unclaimed
    fn is_empty_cell(&self, pos: Position) -> bool {
        !self.off_board(pos) && self.occupant(pos).is_none()
    }
}

/// A game which can have it's winner determined
pub trait VictorDeterminableGame: Debug + PlayerIDGettableGame {
    #[allow(missing_docs)]
    fn is_over(&self) -> bool;

    /// get the winner for a given game, will return None in the case of a draw, or if the game is not over
    fn get_winner(&self) -> Option<PlayerId>;
}
