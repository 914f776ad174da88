//! Best-first number synthesis over self-avoiding lattice walks.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::lattice::geometry::{Edge, Move, Point, Sign};
use crate::lattice::heuristic;
use crate::lattice::state::{Arena, Node, StateKey};

// ============================================================================
// CONFIGURATION AND RESULTS
// ============================================================================

/// Budget and tolerance for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock limit per search.
    pub timeout_ms: u64,
    /// States at this depth are scored but not expanded.
    pub max_depth: usize,
    /// A residual below this counts as exact. `0.0` demands equality.
    pub precision: f64,
    /// Upper bound on dequeued states per search.
    pub max_expansions: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_depth: 30,
            precision: 1e-3,
            max_expansions: 250_000,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn is_exact(&self, residual: f64) -> bool {
        residual == 0.0 || residual < self.precision
    }
}

/// Best pattern found for a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub pattern: String,
    /// The value the pattern actually produces.
    pub value: f64,
    pub exact: bool,
    pub residual: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    /// Searches actually run (cache misses).
    pub searches: usize,
    pub cache_hits: usize,
    /// States dequeued across all searches.
    pub expansions: usize,
}

// ============================================================================
// SOLVER
// ============================================================================

/// Memoizing front end for the lattice search.
///
/// One solver lives for a whole compilation, so a target requested twice is
/// searched once.
#[derive(Debug, Default)]
pub struct NumberSolver {
    config: SolverConfig,
    cache: HashMap<u64, Solution>,
    stats: SolverStats,
}

impl NumberSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            stats: SolverStats::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    pub fn solve(&mut self, target: f64) -> Solution {
        let key = (target + 0.0).to_bits();
        if let Some(hit) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            return hit.clone();
        }

        self.stats.searches += 1;
        let search = Search::new(target, &self.config);
        let (solution, expansions) = search.run();
        self.stats.expansions += expansions;
        self.cache.insert(key, solution.clone());
        solution
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Queue entry: score, insertion order, arena index.
type Entry = Reverse<(u32, u64, usize)>;

struct Best {
    index: usize,
    residual: f64,
    exact: bool,
}

struct Search<'a> {
    target: f64,
    sign: Sign,
    config: &'a SolverConfig,
    arena: Arena,
    queue: BinaryHeap<Entry>,
    seen: HashSet<StateKey>,
    sequence: u64,
}

impl<'a> Search<'a> {
    fn new(target: f64, config: &'a SolverConfig) -> Self {
        Self {
            target,
            sign: Sign::of(target),
            config,
            arena: Arena::default(),
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            sequence: 0,
        }
    }

    /// Walks the sign prefix. The value stays zero; only position, facing and
    /// used edges are seeded.
    fn seed(&mut self) -> usize {
        let mut position = Point::ORIGIN;
        let mut facing = self.sign.initial_facing();
        let mut parent = None;
        for symbol in self.sign.prefix().chars() {
            let Some(step) = Move::from_symbol(symbol) else {
                continue;
            };
            facing = step.turn(facing);
            let next = position.step(facing);
            let index = self.arena.push(Node {
                position: next,
                facing,
                value: 0.0,
                depth: 0,
                parent,
                step,
                edge: Edge::new(position, next),
            });
            parent = Some(index);
            position = next;
        }
        parent.unwrap_or_default()
    }

    fn run(mut self) -> (Solution, usize) {
        let started = Instant::now();
        let seed = self.seed();
        let seed_residual = self.target.abs();
        let mut best = Best {
            index: seed,
            residual: seed_residual,
            exact: self.config.is_exact(seed_residual),
        };
        let mut expansions = 0usize;

        if !best.exact {
            self.seen.insert(self.arena.get(seed).key());
            self.enqueue(0, seed);

            while let Some(Reverse((_, _, index))) = self.queue.pop() {
                expansions += 1;
                let node = *self.arena.get(index);
                let residual = (node.value - self.target).abs();
                if residual < best.residual {
                    best = Best {
                        index,
                        residual,
                        exact: self.config.is_exact(residual),
                    };
                    if best.exact {
                        break;
                    }
                }
                if expansions >= self.config.max_expansions
                    || started.elapsed() >= self.config.timeout()
                {
                    break;
                }
                if node.depth >= self.config.max_depth {
                    continue;
                }
                self.expand(index, &node);
            }
        }

        let solution = Solution {
            pattern: self.arena.pattern(best.index),
            value: self.arena.get(best.index).value,
            exact: best.exact,
            residual: best.residual,
        };
        (solution, expansions)
    }

    fn expand(&mut self, index: usize, node: &Node) {
        for step in Move::ALL {
            let facing = step.turn(node.facing);
            let next = node.position.step(facing);
            let edge = Edge::new(node.position, next);
            if self.arena.uses_edge(index, edge) {
                continue;
            }

            let value = step.apply(node.value, self.sign);
            if !self.seen.insert(StateKey::new(next, facing, value)) {
                continue;
            }

            let child = self.arena.push(Node {
                position: next,
                facing,
                value,
                depth: node.depth + 1,
                parent: Some(index),
                step,
                edge,
            });
            let score = heuristic::score(self.target, value, self.config.precision);
            self.enqueue(score, child);
        }
    }

    fn enqueue(&mut self, score: u32, index: usize) {
        self.queue.push(Reverse((score, self.sequence, index)));
        self.sequence += 1;
    }
}
