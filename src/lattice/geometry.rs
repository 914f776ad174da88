//! Triangular-lattice geometry and the five-move alphabet.
//!
//! Every move both changes the running value and turns the walker by a fixed
//! amount before it steps to the neighbouring lattice point.

use std::collections::HashSet;

/// Unit offsets for the six facings.
pub const NEIGHBORS: [(i32, i32); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];

/// Next facing, indexed by current facing then move index.
pub const DIRECTION_TRANSITIONS: [[u8; 5]; 6] = [
    [4, 5, 0, 1, 2],
    [5, 0, 1, 2, 3],
    [0, 1, 2, 3, 4],
    [1, 2, 3, 4, 5],
    [2, 3, 4, 5, 0],
    [3, 4, 5, 0, 1],
];

// =============================
// Sign
// =============================

/// Sign of the target, fixed once per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// `target >= 0` is positive, so `-0.0` counts as positive.
    pub fn of(target: f64) -> Self {
        if target >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    /// Header moves that seed the walk and encode the sign.
    pub fn prefix(self) -> &'static str {
        match self {
            Sign::Positive => "aqaa",
            Sign::Negative => "dedd",
        }
    }

    pub fn initial_facing(self) -> u8 {
        match self {
            Sign::Positive => 2,
            Sign::Negative => 4,
        }
    }

    fn unit(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

// =============================
// Moves
// =============================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// `a`: ×2
    Double,
    /// `q`: ±5
    AddFive,
    /// `w`: ±1
    AddOne,
    /// `e`: ±10
    AddTen,
    /// `d`: ÷2
    Halve,
}

impl Move {
    pub const ALL: [Move; 5] = [
        Move::Double,
        Move::AddFive,
        Move::AddOne,
        Move::AddTen,
        Move::Halve,
    ];

    pub fn index(self) -> usize {
        match self {
            Move::Double => 0,
            Move::AddFive => 1,
            Move::AddOne => 2,
            Move::AddTen => 3,
            Move::Halve => 4,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Move::Double => 'a',
            Move::AddFive => 'q',
            Move::AddOne => 'w',
            Move::AddTen => 'e',
            Move::Halve => 'd',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Move::ALL.into_iter().find(|m| m.symbol() == symbol)
    }

    /// Additive moves follow the target's sign; ×2 and ÷2 do not.
    pub fn apply(self, value: f64, sign: Sign) -> f64 {
        match self {
            Move::Double => value * 2.0,
            Move::AddFive => value + 5.0 * sign.unit(),
            Move::AddOne => value + sign.unit(),
            Move::AddTen => value + 10.0 * sign.unit(),
            Move::Halve => value / 2.0,
        }
    }

    pub fn turn(self, facing: u8) -> u8 {
        DIRECTION_TRANSITIONS[facing as usize][self.index()]
    }
}

// =============================
// Points and edges
// =============================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, facing: u8) -> Point {
        let (dx, dy) = NEIGHBORS[facing as usize];
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Undirected lattice edge, stored with its endpoints ordered by x then y so
/// that both traversal directions compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    from: Point,
    to: Point,
}

impl Edge {
    pub fn new(a: Point, b: Point) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.from, self.to)
    }
}

// =============================
// Replay
// =============================

/// The result of re-walking a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    pub sign: Sign,
    pub value: f64,
    pub position: Point,
    pub facing: u8,
    pub edges: Vec<Edge>,
    /// `false` if any edge was traversed twice.
    pub self_avoiding: bool,
}

/// Re-walks a synthesized pattern from the origin.
///
/// The sign prefix only moves the walker; the value starts at zero after it.
/// Returns `None` if the pattern lacks a sign prefix or holds a character that
/// is not a move.
pub fn replay(pattern: &str) -> Option<Walk> {
    let sign = [Sign::Positive, Sign::Negative]
        .into_iter()
        .find(|s| pattern.starts_with(s.prefix()))?;
    let prefix_len = sign.prefix().len();

    let mut walk = Walk {
        sign,
        value: 0.0,
        position: Point::ORIGIN,
        facing: sign.initial_facing(),
        edges: Vec::with_capacity(pattern.len()),
        self_avoiding: true,
    };
    let mut seen = HashSet::new();

    for (index, symbol) in pattern.chars().enumerate() {
        let step = Move::from_symbol(symbol)?;
        let facing = step.turn(walk.facing);
        let next = walk.position.step(facing);
        let edge = Edge::new(walk.position, next);
        if !seen.insert(edge) {
            walk.self_avoiding = false;
        }
        walk.edges.push(edge);
        if index >= prefix_len {
            walk.value = step.apply(walk.value, sign);
        }
        walk.position = next;
        walk.facing = facing;
    }
    Some(walk)
}
