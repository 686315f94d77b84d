//! The graph formed by universes and lattices
//!
//! A universe points to the universes and lattices filling its cells, a lattice points to
//! the universes on its grid. Sharing is allowed, cycles are not.

use crate::csg::Fill;
use crate::types::{LatticeId, UniverseId};
use std::collections::HashSet;
use std::fmt;

/// A node of the fill graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Node {
    Universe(UniverseId),
    Lattice(LatticeId),
}

impl Node {
    /// The node a fill points to, if it is not a material
    pub(crate) fn of_fill(fill: &Fill) -> Option<Node> {
        match fill {
            Fill::Material(_) => None,
            Fill::Universe(universe) => Some(Node::Universe(*universe)),
            Fill::Lattice(lattice) => Some(Node::Lattice(*lattice)),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Universe(id) => write!(f, "{id}"),
            Node::Lattice(id) => write!(f, "{id}"),
        }
    }
}

/// Is `target` reachable from `from`? A node reaches itself.
pub(crate) fn reaches<F>(from: Node, target: Node, children: F) -> bool
where
    F: Fn(Node) -> Vec<Node>,
{
    let mut visited = HashSet::new();
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == target {
            return true;
        }
        if visited.insert(node) {
            stack.extend(children(node));
        }
    }
    false
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Find a node that lies on a cycle, if there is one
pub(crate) fn find_cycle<F>(nodes: &[Node], children: F) -> Option<Node>
where
    F: Fn(Node) -> Vec<Node>,
{
    let index = |node: &Node| nodes.iter().position(|n| n == node);
    let mut marks = vec![Mark::Unvisited; nodes.len()];

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        // Each frame holds a node and the children still to visit
        let mut stack = vec![(start, children(nodes[start]))];
        marks[start] = Mark::InProgress;
        while let Some((node, pending)) = stack.last_mut() {
            let node = *node;
            match pending.pop() {
                Some(child) => {
                    let Some(child_index) = index(&child) else {
                        continue;
                    };
                    match marks[child_index] {
                        Mark::InProgress => return Some(child),
                        Mark::Unvisited => {
                            marks[child_index] = Mark::InProgress;
                            stack.push((child_index, children(child)));
                        }
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    None
}
