//! A* search over a grid, keyed by position plus auxiliary state.
//!
//! Many grid problems carry more state than the position alone: the
//! last few moves, items held, actions spent. Two search states are
//! the same visitable place only when the whole [StateKey] matches,
//! which lets the search revisit a location under a different
//! auxiliary state.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use geometry::coord2d::Point;
use log::{debug, warn};

use crate::errors::{Result, SearchError};
use crate::graph::Weight;

/// Composite identity of a visitable search state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey<S> {
    pub position: Point,
    pub state: S,
}

impl<S> StateKey<S> {
    pub fn new(position: Point, state: S) -> Self {
        Self { position, state }
    }
}

/// A [StateKey] along with the costs accumulated reaching it and a
/// back-reference to its predecessor for path reconstruction.
#[derive(Debug, Clone)]
pub struct SearchNode<S>
where
    S: Debug + Clone + Eq + Hash,
{
    key: StateKey<S>,
    g: Weight,
    h: Weight,
    parent: Option<StateKey<S>>,
}

impl<S> SearchNode<S>
where
    S: Debug + Clone + Eq + Hash,
{
    pub fn key(&self) -> &StateKey<S> {
        &self.key
    }

    pub fn position(&self) -> Point {
        self.key.position
    }

    pub fn state(&self) -> &S {
        &self.key.state
    }

    /// Cost accumulated from the start to this node.
    pub fn g(&self) -> Weight {
        self.g
    }

    /// Heuristic estimate of the remaining cost.
    pub fn h(&self) -> Weight {
        self.h
    }

    /// Combined priority used to order the open set.
    pub fn f(&self) -> Weight {
        self.g + self.h
    }
}

/// Behaviors a grid problem supplies to [astar].
///
/// Only the start, the goal locations and the adjacency rule are
/// required; goal validity, step cost and the heuristic have
/// defaults (always valid, uniform cost 1, and Manhattan distance
/// to the nearest goal).
pub trait GridSearch {
    /// Auxiliary search state carried alongside the position.
    type State: Debug + Clone + Eq + Hash;

    /// The single starting location and initial auxiliary state.
    fn start(&self) -> StateKey<Self::State>;

    /// Every acceptable goal location.
    fn goals(&self) -> Vec<Point>;

    /// Adjacent search states reachable from this node. Arbitrary
    /// connectivity is allowed, including transitions which change
    /// only the auxiliary state.
    fn neighbors(&self, node: &SearchNode<Self::State>) -> Vec<StateKey<Self::State>>;

    /// Extra check applied once a goal location is reached.
    fn goal_valid(&self, _state: &Self::State) -> bool {
        true
    }

    /// Cost of stepping from a node to an adjacent state.
    fn cost(&self, _from: &SearchNode<Self::State>, _to: &StateKey<Self::State>) -> Weight {
        1
    }

    /// Best guess of the remaining cost to the nearest goal.
    fn heuristic(&self, key: &StateKey<Self::State>) -> Weight {
        self.goals()
            .iter()
            .map(|goal| Weight::from(key.position.manhattan_distance(*goal)))
            .min()
            .unwrap_or(0)
    }
}

/// Wrapper for open-set entries which sorts the binary heap as a
/// min-heap on F, falling back to the key fingerprint so the order
/// is total and runs are reproducible.
#[derive(Debug)]
struct OpenEntry<S> {
    f: Weight,
    order: u64,
    key: StateKey<S>,
}

impl<S> PartialEq for OpenEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.order == other.order
    }
}

impl<S> Eq for OpenEntry<S> {}

impl<S> Ord for OpenEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then(self.order.cmp(&other.order))
            .reverse()
    }
}

impl<S> PartialOrd for OpenEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-key hash of a composite key, used as the deterministic
/// tie-break between equal priorities.
fn fingerprint<S>(key: &StateKey<S>) -> u64
where
    S: Hash,
{
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Find a cheapest path from the start to any valid goal.
///
/// Returns the sequence of search nodes from the start to the goal
/// inclusive. When the open set empties without reaching a valid
/// goal, returns [SearchError::NoResultFound].
pub fn astar<G>(grid: &G) -> Result<Vec<SearchNode<G::State>>>
where
    G: GridSearch,
{
    let goals = grid.goals();

    let origin = {
        let key = grid.start();
        SearchNode {
            g: 0,
            h: grid.heuristic(&key),
            parent: None,
            key,
        }
    };

    let mut open: HashMap<StateKey<G::State>, SearchNode<G::State>> = HashMap::new();
    let mut closed: HashMap<StateKey<G::State>, SearchNode<G::State>> = HashMap::new();
    let mut heap: BinaryHeap<OpenEntry<G::State>> = BinaryHeap::new();

    heap.push(OpenEntry {
        f: origin.f(),
        order: fingerprint(&origin.key),
        key: origin.key.clone(),
    });
    open.insert(origin.key.clone(), origin);

    let mut expanded = 0usize;

    while let Some(entry) = heap.pop() {
        // Lazy deletion: the entry is stale when its key has since
        // been replaced by a cheaper record, or already expanded.
        let node = match open.get(&entry.key) {
            Some(record) if record.f() == entry.f => open.remove(&entry.key).unwrap(),
            _ => continue,
        };

        expanded += 1;
        if expanded % 10_000 == 0 {
            debug!(
                "astar: E{} O{} C{} F{}",
                expanded,
                open.len(),
                closed.len(),
                node.f()
            );
        }

        if goals.contains(&node.position()) && grid.goal_valid(node.state()) {
            return Ok(reconstruct(node, &closed));
        }

        for key in grid.neighbors(&node) {
            if closed.contains_key(&key) {
                continue;
            }

            let g = node.g + grid.cost(&node, &key);
            if let Some(existing) = open.get(&key) {
                if existing.g <= g {
                    continue;
                }
            }

            let candidate = SearchNode {
                g,
                h: grid.heuristic(&key),
                parent: Some(node.key.clone()),
                key: key.clone(),
            };
            heap.push(OpenEntry {
                f: candidate.f(),
                order: fingerprint(&key),
                key: key.clone(),
            });
            open.insert(key, candidate);
        }

        closed.insert(node.key.clone(), node);
    }

    warn!(
        "astar: open set exhausted after {} expansions without reaching a valid goal",
        expanded
    );
    Err(SearchError::NoResultFound)
}

/// Walk predecessor links back to the start. Every parent was
/// expanded before its children, so each link resolves in the
/// closed set.
fn reconstruct<S>(
    tail: SearchNode<S>,
    closed: &HashMap<StateKey<S>, SearchNode<S>>,
) -> Vec<SearchNode<S>>
where
    S: Debug + Clone + Eq + Hash,
{
    let mut path = vec![tail];
    while let Some(parent) = path.last().and_then(|node| node.parent.clone()) {
        path.push(closed[&parent].clone());
    }
    path.reverse();
    path
}
