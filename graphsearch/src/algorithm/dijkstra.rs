//! Dijkstra's algorithm, augmented to enumerate every optimal path.
//!
//! Instead of a single best predecessor per node, the search records
//! all predecessors tied for the best known distance. Reconstruction
//! then expands those predecessor lists into the full set of
//! equally short paths. Assumes non-negative edge weights.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

use crate::errors::{Result, SearchError};
use crate::graph::{Graphable, Path, Weight};

/// Per-node record of the best known distance and every
/// predecessor achieving it.
#[derive(Debug)]
struct Record<N> {
    distance: Weight,
    predecessors: Vec<N>,
}

impl<N> Record<N> {
    fn unreached() -> Self {
        Self {
            distance: Weight::max_value(),
            predecessors: Vec::new(),
        }
    }
}

/// Wrapper for queue entries which sorts the binary heap as a
/// min-heap on distance.
#[derive(Debug, PartialEq, Eq)]
struct QueueEntry<N>
where
    N: Eq,
{
    distance: Weight,
    node: N,
}

impl<N> Ord for QueueEntry<N>
where
    N: Eq,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.cmp(&other.distance).reverse()
    }
}

impl<N> PartialOrd for QueueEntry<N>
where
    N: Eq,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the minimum total weight from `start` to any node accepted
/// by `is_end`, returning every path achieving that minimum.
///
/// When the queue empties without reaching an end node the graph is
/// disconnected relative to the predicate; this is reported as
/// [SearchError::NoResultFound] rather than an empty collection.
pub fn all_shortest_paths<G, F>(
    graph: &G,
    start: G::Node,
    is_end: F,
) -> Result<Vec<Path<G::Node>>>
where
    G: Graphable,
    F: Fn(&G::Node) -> bool,
{
    let mut records: HashMap<G::Node, Record<G::Node>> = graph
        .nodes()
        .map(|node| (node.clone(), Record::unreached()))
        .collect();

    records
        .entry(start.clone())
        .or_insert_with(Record::unreached)
        .distance = 0;

    let mut queue = BinaryHeap::new();
    queue.push(QueueEntry {
        distance: 0,
        node: start.clone(),
    });

    let mut settled = 0usize;

    while let Some(QueueEntry { distance, node }) = queue.pop() {
        // Lazy deletion: skip entries superseded by a shorter route.
        match records.get(&node) {
            Some(record) if record.distance == distance => {}
            _ => continue,
        }

        settled += 1;
        if settled % 10_000 == 0 {
            debug!("dijkstra: S{} Q{} D{}", settled, queue.len(), distance);
        }

        if is_end(&node) {
            let paths = expand(&node, &records, &start)
                .into_iter()
                .map(|nodes| Path::from_nodes(nodes, distance))
                .collect();
            return Ok(paths);
        }

        for edge in graph.outgoing(&node) {
            let candidate = distance + edge.weight();
            let record = records
                .entry(edge.destination().clone())
                .or_insert_with(Record::unreached);

            if candidate < record.distance {
                record.distance = candidate;
                record.predecessors.clear();
                record.predecessors.push(node.clone());
                queue.push(QueueEntry {
                    distance: candidate,
                    node: edge.destination().clone(),
                });
            } else if candidate == record.distance {
                record.predecessors.push(node.clone());
            }
        }
    }

    warn!(
        "dijkstra: queue exhausted after {} nodes without reaching an end node",
        settled
    );
    Err(SearchError::NoResultFound)
}

/// Recursively expand the predecessor lists of `node` into the
/// Cartesian set of optimal node sequences from `start`.
fn expand<N>(node: &N, records: &HashMap<N, Record<N>>, start: &N) -> Vec<Vec<N>>
where
    N: Debug + Clone + Eq + Hash,
{
    if node == start {
        return vec![vec![start.clone()]];
    }

    let mut paths = Vec::new();
    for predecessor in &records[node].predecessors {
        for mut nodes in expand(predecessor, records, start) {
            nodes.push(node.clone());
            paths.push(nodes);
        }
    }
    paths
}
