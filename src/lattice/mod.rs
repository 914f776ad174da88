//! Number synthesizer.
//!
//! Encodes a floating-point target as a move string. Five moves each change a
//! running value (`a` ×2, `q` ±5, `w` ±1, `e` ±10, `d` ÷2) and step a walker
//! across a triangular lattice; a pattern is only valid if the walk never
//! crosses the same edge twice. The solver runs a best-first search over such
//! walks within a depth, time and expansion budget and returns the closest
//! pattern it found.

pub mod geometry;
pub mod heuristic;
pub mod solver;
pub mod state;

pub use geometry::{replay, Edge, Move, Point, Sign, Walk};
pub use solver::{NumberSolver, Solution, SolverConfig, SolverStats};
pub use state::StateKey;
