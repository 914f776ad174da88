//! Search states.
//!
//! A state is `{position, facing, value, depth, used edges, moves so far}`.
//! States live in an arena: each node stores only the move that produced it and
//! a parent index, so the used-edge set and the move string are the node's
//! ancestor chain. Paths stay at most `max_depth` plus the prefix long, which
//! keeps the chain walks short.

use crate::lattice::geometry::{Edge, Move, Point};

/// Deduplication key.
///
/// Deliberately omits the used edges and the move string: two paths reaching
/// the same point, facing and value are treated as one state even though
/// their remaining free edges differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    position: Point,
    facing: u8,
    value_bits: u64,
}

impl StateKey {
    pub fn new(position: Point, facing: u8, value: f64) -> Self {
        Self {
            position,
            facing,
            // +0.0 folds -0.0 into 0.0
            value_bits: (value + 0.0).to_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub position: Point,
    pub facing: u8,
    pub value: f64,
    pub depth: usize,
    pub parent: Option<usize>,
    pub step: Move,
    pub edge: Edge,
}

impl Node {
    pub fn key(&self) -> StateKey {
        StateKey::new(self.position, self.facing, self.value)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    fn ancestry(&self, index: usize) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(Some(self.get(index)), move |node| {
            node.parent.map(|parent| self.get(parent))
        })
    }

    /// True if `edge` is already on the path ending at `index`.
    pub fn uses_edge(&self, index: usize, edge: Edge) -> bool {
        self.ancestry(index).any(|node| node.edge == edge)
    }

    /// Move string of the path ending at `index`, prefix included.
    pub fn pattern(&self, index: usize) -> String {
        let mut symbols: Vec<char> = self.ancestry(index).map(|n| n.step.symbol()).collect();
        symbols.reverse();
        symbols.into_iter().collect()
    }
}
