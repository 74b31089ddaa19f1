//! Exhaustive backtracking search with caller-configurable rules.
//!
//! The search walks every distinct traversal the eligibility rule
//! permits, and keeps the best accumulated weight among those the
//! completion rule accepts. Worst case this is factorial in the node
//! count; callers use it on small graphs, or prune the branching via
//! [ExhaustiveSearch::eligible_edges].

use std::collections::HashSet;
use std::fmt::Debug;

use log::warn;

use crate::errors::{Result, SearchError};
use crate::graph::{Edge, Graphable, Weight};

/// Read-only view of the traversal under construction, handed to
/// the caller-supplied rules.
#[derive(Debug)]
pub struct Traversal<'a, N>
where
    N: Debug + Clone,
{
    /// The node the traversal currently stands on.
    pub current: &'a N,
    /// Every node visited so far, including the start.
    pub visited: &'a HashSet<N>,
    /// The nodes visited so far, in order, including the start.
    pub path: &'a [N],
    /// Total number of nodes in the graph.
    pub node_count: usize,
}

type BetterFn<'g> = Box<dyn Fn(Weight, Weight) -> bool + 'g>;
type EligibleFn<'g, N> = Box<dyn Fn(&Traversal<'_, N>) -> Vec<Edge<N>> + 'g>;
type CompleteFn<'g, N> = Box<dyn Fn(&Traversal<'_, N>, Option<&N>) -> bool + 'g>;
type WeightFn<'g, N> = Box<dyn Fn(&Edge<N>) -> Weight + 'g>;

/// Depth-first backtracking search over a borrowed graph.
///
/// Four behaviors can be replaced by the caller:
///
/// * which edges are eligible from the current traversal
///   (default: edges leading to unvisited nodes),
/// * when a traversal is complete (default: every node visited,
///   and the fixed end node reached if one was given),
/// * how two accumulated weights compare (default: minimize),
/// * the effective weight of an edge (default: its stored weight).
///
/// With no fixed start node, every node is tried as a start.
pub struct ExhaustiveSearch<'g, G>
where
    G: Graphable,
{
    graph: &'g G,
    start: Option<G::Node>,
    end: Option<G::Node>,
    better: BetterFn<'g>,
    eligible: EligibleFn<'g, G::Node>,
    complete: CompleteFn<'g, G::Node>,
    weight: WeightFn<'g, G::Node>,
}

impl<'g, G> ExhaustiveSearch<'g, G>
where
    G: Graphable,
{
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            start: None,
            end: None,
            better: Box::new(|candidate, best| candidate < best),
            eligible: Box::new(move |traversal| {
                graph
                    .outgoing(traversal.current)
                    .iter()
                    .filter(|e| !traversal.visited.contains(e.destination()))
                    .cloned()
                    .collect()
            }),
            complete: Box::new(|traversal, end| {
                traversal.visited.len() == traversal.node_count
                    && end.map(|e| e == traversal.current).unwrap_or(true)
            }),
            weight: Box::new(|edge| edge.weight()),
        }
    }

    /// Fix the start node. Without one, every node is tried.
    pub fn start_at(mut self, node: G::Node) -> Self {
        self.start = Some(node);
        self
    }

    /// Fix the end node, passed to the completion rule.
    pub fn end_at(mut self, node: G::Node) -> Self {
        self.end = Some(node);
        self
    }

    /// Keep the smallest accumulated weight (the default).
    pub fn minimize(mut self) -> Self {
        self.better = Box::new(|candidate, best| candidate < best);
        self
    }

    /// Keep the largest accumulated weight.
    pub fn maximize(mut self) -> Self {
        self.better = Box::new(|candidate, best| candidate > best);
        self
    }

    /// Replace the comparison of accumulated weights. The rule
    /// receives `(candidate, best_so_far)` and returns whether the
    /// candidate should become the new best.
    pub fn better(mut self, rule: impl Fn(Weight, Weight) -> bool + 'g) -> Self {
        self.better = Box::new(rule);
        self
    }

    /// Replace the edge eligibility rule. The rule receives the
    /// current [Traversal] and returns the edges to descend into,
    /// in order.
    pub fn eligible_edges(
        mut self,
        rule: impl Fn(&Traversal<'_, G::Node>) -> Vec<Edge<G::Node>> + 'g,
    ) -> Self {
        self.eligible = Box::new(rule);
        self
    }

    /// Replace the completion rule. The rule receives the current
    /// [Traversal] and the fixed end node, if any.
    pub fn complete_when(
        mut self,
        rule: impl Fn(&Traversal<'_, G::Node>, Option<&G::Node>) -> bool + 'g,
    ) -> Self {
        self.complete = Box::new(rule);
        self
    }

    /// Replace the effective weight of an edge, e.g. to sum both
    /// directions of a bidirectional relationship.
    pub fn edge_weight(mut self, rule: impl Fn(&Edge<G::Node>) -> Weight + 'g) -> Self {
        self.weight = Box::new(rule);
        self
    }

    /// Run the search to completion, returning the best accumulated
    /// weight among complete traversals.
    pub fn run(&self) -> Result<Weight> {
        let mut best = None;

        match &self.start {
            Some(start) => self.launch(start, &mut best),
            None => {
                for start in self.graph.nodes() {
                    self.launch(start, &mut best);
                }
            }
        }

        if best.is_none() {
            warn!("exhaustive search explored every branch without completing a traversal");
        }
        best.ok_or(SearchError::NoResultFound)
    }

    fn launch(&self, start: &G::Node, best: &mut Option<Weight>) {
        let mut visited = HashSet::new();
        visited.insert(start.clone());
        self.descend(start, visited, vec![start.clone()], 0, best);
    }

    /// Each child receives its own copies of the visited set and
    /// path, so sibling branches can never observe one another's
    /// state.
    fn descend(
        &self,
        current: &G::Node,
        visited: HashSet<G::Node>,
        path: Vec<G::Node>,
        total: Weight,
        best: &mut Option<Weight>,
    ) {
        let node_count = self.graph.node_count();

        let complete = {
            let view = Traversal {
                current,
                visited: &visited,
                path: &path,
                node_count,
            };
            (self.complete)(&view, self.end.as_ref())
        };

        if complete {
            if best.map(|b| (self.better)(total, b)).unwrap_or(true) {
                *best = Some(total);
            }
            return;
        }

        let edges = {
            let view = Traversal {
                current,
                visited: &visited,
                path: &path,
                node_count,
            };
            (self.eligible)(&view)
        };

        for edge in edges {
            let next = edge.destination().clone();

            let mut next_visited = visited.clone();
            next_visited.insert(next.clone());

            let mut next_path = path.clone();
            next_path.push(next.clone());

            let weight = total + (self.weight)(&edge);
            self.descend(&next, next_visited, next_path, weight, best);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Graph;

    use std::collections::HashMap;

    use permutohedron::Heap;

    fn symmetric(graph: &mut Graph<&'static str>, a: &'static str, b: &'static str, w: Weight) {
        graph.add_edge_with_weight(a, b, w);
        graph.add_edge_with_weight(b, a, w);
    }

    fn cities() -> Graph<&'static str> {
        let mut graph = Graph::new();
        symmetric(&mut graph, "London", "Dublin", 464);
        symmetric(&mut graph, "London", "Belfast", 518);
        symmetric(&mut graph, "Dublin", "Belfast", 141);
        graph
    }

    #[test]
    fn shortest_route_visiting_all() {
        let graph = cities();
        let best = ExhaustiveSearch::new(&graph).run().unwrap();
        assert_eq!(best, 605);
    }

    #[test]
    fn longest_route_visiting_all() {
        let graph = cities();
        let best = ExhaustiveSearch::new(&graph).maximize().run().unwrap();
        assert_eq!(best, 982);
    }

    #[test]
    fn matches_brute_force_enumeration() {
        let mut graph = Graph::new();
        symmetric(&mut graph, "a", "b", 7);
        symmetric(&mut graph, "a", "c", 2);
        symmetric(&mut graph, "a", "d", 11);
        symmetric(&mut graph, "b", "c", 5);
        symmetric(&mut graph, "b", "d", 3);
        symmetric(&mut graph, "c", "d", 13);

        let mut weights = HashMap::new();
        for node in ["a", "b", "c", "d"].iter() {
            for edge in graph.edges(node) {
                weights.insert((*edge.origin(), *edge.destination()), edge.weight());
            }
        }

        let mut nodes = vec!["a", "b", "c", "d"];
        let mut smallest = None;
        let mut largest = None;
        for order in Heap::new(&mut nodes) {
            let total: Weight = order.windows(2).map(|pair| weights[&(pair[0], pair[1])]).sum();
            if smallest.map(|s| total < s).unwrap_or(true) {
                smallest = Some(total);
            }
            if largest.map(|l| total > l).unwrap_or(true) {
                largest = Some(total);
            }
        }

        let search = ExhaustiveSearch::new(&graph);
        assert_eq!(search.run().unwrap(), smallest.unwrap());

        let search = ExhaustiveSearch::new(&graph).maximize();
        assert_eq!(search.run().unwrap(), largest.unwrap());
    }

    #[test]
    fn fixed_start_and_cycle_back() {
        // Hamiltonian cycle: the edge back to the start becomes
        // eligible only once every node has been visited.
        let mut graph = Graph::new();
        symmetric(&mut graph, "a", "b", 1);
        symmetric(&mut graph, "a", "c", 10);
        symmetric(&mut graph, "a", "d", 2);
        symmetric(&mut graph, "b", "c", 2);
        symmetric(&mut graph, "b", "d", 10);
        symmetric(&mut graph, "c", "d", 3);

        let search = ExhaustiveSearch::new(&graph)
            .start_at("a")
            .end_at("a")
            .eligible_edges(|traversal| {
                let all_visited = traversal.visited.len() == traversal.node_count;
                graph
                    .edges(traversal.current)
                    .iter()
                    .filter(|e| {
                        if all_visited {
                            e.destination() == &"a"
                        } else {
                            !traversal.visited.contains(e.destination())
                        }
                    })
                    .cloned()
                    .collect()
            })
            .complete_when(|traversal, end| {
                traversal.path.len() == traversal.node_count + 1
                    && end.map(|e| e == traversal.current).unwrap_or(false)
            });

        assert_eq!(search.run().unwrap(), 8);
    }

    #[test]
    fn revisiting_nodes_when_eligibility_allows() {
        // The eligibility rule may ignore the visited set entirely;
        // completion here is a fixed path length instead.
        let mut graph = Graph::new();
        graph.add_edge_with_weight("a", "b", 2);
        graph.add_edge_with_weight("b", "a", 3);

        let search = ExhaustiveSearch::new(&graph)
            .start_at("a")
            .maximize()
            .eligible_edges(|traversal| graph.edges(traversal.current).to_vec())
            .complete_when(|traversal, _| traversal.path.len() == 5);

        assert_eq!(search.run().unwrap(), 10);
    }

    #[test]
    fn fixed_endpoints() {
        // Default completion: every node visited, ending at the
        // fixed end node.
        let graph = cities();
        let best = ExhaustiveSearch::new(&graph)
            .start_at("London")
            .end_at("Belfast")
            .run()
            .unwrap();
        assert_eq!(best, 605);
    }

    #[test]
    fn effective_weights_can_differ_from_stored() {
        // The weight rule sums both directions of the relationship.
        let mut graph = Graph::new();
        graph.add_edge_with_weight("a", "b", 2);
        graph.add_edge_with_weight("b", "a", 3);

        let search = ExhaustiveSearch::new(&graph).edge_weight(|edge| {
            let reverse = graph
                .edges(edge.destination())
                .iter()
                .find(|e| e.destination() == edge.origin())
                .map(|e| e.weight())
                .unwrap_or(0);
            edge.weight() + reverse
        });

        assert_eq!(search.run().unwrap(), 5);
    }

    #[test]
    fn empty_graph_is_no_result() {
        let graph: Graph<&'static str> = Graph::new();
        let result = ExhaustiveSearch::new(&graph).run();
        assert!(matches!(result, Err(SearchError::NoResultFound)));
    }

    #[test]
    fn tries_every_start_when_unfixed() {
        // Only a traversal starting at "a" can visit both nodes.
        let mut graph = Graph::new();
        graph.add_edge_with_weight("a", "b", 5);

        let best = ExhaustiveSearch::new(&graph).run().unwrap();
        assert_eq!(best, 5);

        let from_b = ExhaustiveSearch::new(&graph).start_at("b").run();
        assert!(from_b.is_err());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let graph = cities();
        let search = ExhaustiveSearch::new(&graph);
        assert_eq!(search.run().unwrap(), search.run().unwrap());
    }
}
