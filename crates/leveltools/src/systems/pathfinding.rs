//! A* search over caller-supplied graphs.
//!
//! The graph is only read through [`Graph::connections`]; node handles are
//! returned as-is, so a path aliases the caller's nodes rather than copying
//! them.
//!
//! With the default cost (1 per node entered) and heuristic (0) the search is
//! plain uniform-cost search; pass a heuristic such as
//! [`NodeGraph::spatial_heuristic`] to get A*.

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec2;

/// A graph whose nodes expose an ordered list of neighbours.
pub trait Graph {
    /// Node handle; equality is node identity.
    type Node: Copy + Eq + Hash;

    /// Neighbours of `node`, in traversal order.
    fn connections(&self, node: Self::Node) -> &[Self::Node];
}

/// Adjacency list indexed by node.
impl Graph for [Vec<usize>] {
    type Node = usize;

    fn connections(&self, node: usize) -> &[usize] {
        self.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Graph for Vec<Vec<usize>> {
    type Node = usize;

    fn connections(&self, node: usize) -> &[usize] {
        self.as_slice().connections(node)
    }
}

/// Keyed adjacency map; unknown keys have no neighbours.
impl<K: Copy + Eq + Hash> Graph for HashMap<K, Vec<K>> {
    type Node = K;

    fn connections(&self, node: K) -> &[K] {
        self.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Open,
    Closed,
}

/// Frontier entry. `previous` indexes the search arena.
#[derive(Debug, Clone)]
struct SearchNode<N> {
    node: N,
    previous: Option<usize>,
    path_cost: f32,
    heuristic: f32,
    state: ListState,
}

impl<N> SearchNode<N> {
    fn score(&self) -> f32 {
        self.path_cost + self.heuristic
    }
}

type CostFn<'g, N> = Box<dyn Fn(N) -> f32 + 'g>;
type HeuristicFn<'g, N> = Box<dyn Fn(N, N) -> f32 + 'g>;

/// Reusable A* search bound to one graph.
///
/// Usage:
///   let mut finder = Pathfinder::new(&graph)
///       .cost(|tile| if walls.contains(&tile) { 10.0 } else { 1.0 })
///       .heuristic(graph.spatial_heuristic());
///   let path = finder.find_path(start, end);
pub struct Pathfinder<'g, G: Graph + ?Sized> {
    graph: &'g G,
    cost: CostFn<'g, G::Node>,
    heuristic: HeuristicFn<'g, G::Node>,
    path: Option<Vec<G::Node>>,
    closed: Vec<G::Node>,
}

impl<'g, G: Graph + ?Sized> Pathfinder<'g, G> {
    /// Cost 1 for every node entered, zero heuristic.
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            cost: Box::new(|_| 1.0),
            heuristic: Box::new(|_, _| 0.0),
            path: None,
            closed: Vec::new(),
        }
    }

    /// Cost of entering a node.
    pub fn cost(mut self, cost: impl Fn(G::Node) -> f32 + 'g) -> Self {
        self.cost = Box::new(cost);
        self
    }

    /// Estimated remaining cost from a node to the goal.
    pub fn heuristic(mut self, heuristic: impl Fn(G::Node, G::Node) -> f32 + 'g) -> Self {
        self.heuristic = Box::new(heuristic);
        self
    }

    /// Result of the last search.
    pub fn path(&self) -> Option<&[G::Node]> {
        self.path.as_deref()
    }

    /// Nodes expanded by the last search, in expansion order.
    pub fn closed(&self) -> &[G::Node] {
        &self.closed
    }

    /// Search from `start` to `end`. Returns the nodes from `start` to `end`
    /// inclusive, or `None` when `end` is unreachable.
    ///
    /// The open list is re-sorted with a stable sort every step, so equal
    /// scores keep their insertion order and results are deterministic.
    ///
    /// Entering a neighbour always adds `cost(neighbour)`, both when it is
    /// first discovered and when a cheaper route to it is found. A cost
    /// function written to price the node being left must be shifted onto
    /// the node being entered.
    ///
    /// A cheaper route to an already-closed node updates its cost and
    /// predecessor but does not reopen it. With a consistent heuristic and
    /// non-negative costs this never matters.
    pub fn find_path(&mut self, start: G::Node, end: G::Node) -> Option<Vec<G::Node>> {
        self.closed.clear();
        self.path = if start == end {
            Some(vec![start])
        } else {
            self.search(start, end)
        };
        self.path.clone()
    }

    fn search(&mut self, start: G::Node, end: G::Node) -> Option<Vec<G::Node>> {
        let mut arena = vec![SearchNode {
            node: start,
            previous: None,
            path_cost: 0.0,
            heuristic: (self.heuristic)(start, end),
            state: ListState::Open,
        }];
        let mut index: HashMap<G::Node, usize> = HashMap::from([(start, 0)]);
        let mut open: Vec<usize> = vec![0];

        while !open.is_empty() {
            let current = open.remove(0);
            let node = arena[current].node;

            if node == end {
                log::trace!("path found after closing {} nodes", self.closed.len());
                return Some(reconstruct(&arena, current));
            }

            for &next in self.graph.connections(node) {
                let tentative = arena[current].path_cost + (self.cost)(next);
                match index.get(&next) {
                    Some(&seen) => {
                        // Relax in place; closed nodes stay closed.
                        let entry = &mut arena[seen];
                        if tentative < entry.path_cost {
                            entry.path_cost = tentative;
                            entry.previous = Some(current);
                            if entry.state == ListState::Closed {
                                log::trace!("relaxed a closed node without reopening it");
                            }
                        }
                    }
                    None => {
                        let id = arena.len();
                        arena.push(SearchNode {
                            node: next,
                            previous: Some(current),
                            path_cost: tentative,
                            heuristic: (self.heuristic)(next, end),
                            state: ListState::Open,
                        });
                        index.insert(next, id);
                        open.push(id);
                    }
                }
            }

            open.sort_by(|&a, &b| arena[a].score().total_cmp(&arena[b].score()));
            arena[current].state = ListState::Closed;
            self.closed.push(node);
        }

        log::trace!("no path: open list exhausted after {} nodes", self.closed.len());
        None
    }
}

fn reconstruct<N: Copy>(arena: &[SearchNode<N>], goal: usize) -> Vec<N> {
    let mut path = vec![arena[goal].node];
    let mut cursor = arena[goal].previous;
    while let Some(idx) = cursor {
        path.push(arena[idx].node);
        cursor = arena[idx].previous;
    }
    path.reverse();
    path
}

/// Find a path with unit cost and no heuristic. See
/// [`Pathfinder::find_path`] for how costs accumulate.
pub fn find_path<G: Graph + ?Sized>(graph: &G, start: G::Node, end: G::Node) -> Option<Vec<G::Node>> {
    Pathfinder::new(graph).find_path(start, end)
}

/// Euclidean distance, the usual admissible heuristic on a plane.
#[inline]
pub fn euclidean(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Graph of positioned nodes, e.g. tiles on an editor floor.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    positions: Vec<Vec2>,
    connections: Vec<Vec<usize>>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its handle.
    pub fn add_node(&mut self, position: Vec2) -> usize {
        self.positions.push(position);
        self.connections.push(Vec::new());
        self.positions.len() - 1
    }

    /// Connect two nodes both ways.
    pub fn connect(&mut self, a: usize, b: usize) {
        self.connect_one_way(a, b);
        self.connect_one_way(b, a);
    }

    /// Connect `from` to `to` only. Duplicate edges are ignored.
    pub fn connect_one_way(&mut self, from: usize, to: usize) {
        if to >= self.positions.len() {
            return;
        }
        if let Some(list) = self.connections.get_mut(from) {
            if !list.contains(&to) {
                list.push(to);
            }
        }
    }

    pub fn position(&self, node: usize) -> Option<Vec2> {
        self.positions.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Straight-line distance from a node to the goal.
    pub fn spatial_heuristic(&self) -> impl Fn(usize, usize) -> f32 + '_ {
        move |node, end| match (self.position(node), self.position(end)) {
            (Some(a), Some(b)) => euclidean(a, b),
            _ => 0.0,
        }
    }
}

impl Graph for NodeGraph {
    type Node = usize;

    fn connections(&self, node: usize) -> &[usize] {
        self.connections.connections(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A - B - C
    fn line() -> Vec<Vec<usize>> {
        vec![vec![1], vec![0, 2], vec![1]]
    }

    #[test]
    fn line_graph() {
        assert_eq!(find_path(&line(), 0, 2), Some(vec![0, 1, 2]));
        assert_eq!(find_path(&line(), 2, 0), Some(vec![2, 1, 0]));
    }

    #[test]
    fn same_start_and_end() {
        let graph = line();
        let mut finder = Pathfinder::new(&graph);
        assert_eq!(finder.find_path(1, 1), Some(vec![1]));
        assert!(finder.closed().is_empty());
    }

    #[test]
    fn disconnected_components() {
        // 0 - 1    2 - 3
        let graph = vec![vec![1], vec![0], vec![3], vec![2]];
        let mut finder = Pathfinder::new(&graph);
        assert_eq!(finder.find_path(0, 3), None);
        assert_eq!(finder.path(), None);
        assert_eq!(finder.closed(), &[0, 1]);
    }

    #[test]
    fn prefers_cheaper_route_over_fewer_hops() {
        // 0 -> 1 (expensive) -> 4
        // 0 -> 2 -> 3 -> 4   (cheap)
        let graph = vec![vec![1, 2], vec![0, 4], vec![0, 3], vec![2, 4], vec![1, 3]];
        let weights = [1.0, 10.0, 1.0, 1.0, 1.0];

        assert_eq!(find_path(&graph, 0, 4), Some(vec![0, 1, 4]));

        let path = Pathfinder::new(&graph)
            .cost(|n| weights[n])
            .find_path(0, 4);
        assert_eq!(path, Some(vec![0, 2, 3, 4]));
    }

    #[test]
    fn handles_cycles() {
        // Square 0-1-2-3-0 with target outside the cycle.
        let graph = vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![2, 0, 4], vec![3]];
        assert_eq!(find_path(&graph, 0, 4), Some(vec![0, 3, 4]));
    }

    #[test]
    fn ties_follow_connection_order() {
        // Two equal routes 0-1-3 and 0-2-3; 1 is listed first.
        let graph = vec![vec![1, 2], vec![3], vec![3], vec![]];
        assert_eq!(find_path(&graph, 0, 3), Some(vec![0, 1, 3]));

        let swapped = vec![vec![2, 1], vec![3], vec![3], vec![]];
        assert_eq!(find_path(&swapped, 0, 3), Some(vec![0, 2, 3]));
    }

    #[test]
    fn closed_node_is_relaxed_but_not_reopened() {
        // 0 -> 1 (cost 10) -> 4 -> 5
        // 0 -> 2 -> 3 -> 4
        // An inadmissible heuristic on 2 and 5 lets 4 close via the expensive
        // branch before the cheap one reaches it.
        let graph = vec![vec![1, 2], vec![4], vec![3], vec![4], vec![5], vec![]];
        let weights = [1.0, 10.0, 1.0, 1.0, 1.0, 1.0];
        let mut finder = Pathfinder::new(&graph)
            .cost(|n| weights[n])
            .heuristic(|n, _| match n {
                2 => 50.0,
                5 => 100.0,
                _ => 0.0,
            });

        let path = finder.find_path(0, 5);
        assert_eq!(path, Some(vec![0, 2, 3, 4, 5]));
        assert_eq!(finder.closed(), &[0, 1, 4, 2, 3]);
    }

    #[test]
    fn relaxation_charges_the_entered_node() {
        // 0 -> 1 (cost 5) -> 3
        // 0 -> 2 (cost 1) -> 1
        // Reaching 1 through 2 costs 1 + 5, no cheaper than entering it
        // directly, so the direct edge stays.
        let graph = vec![vec![1, 2], vec![3], vec![1], vec![]];
        let weights = [1.0, 5.0, 1.0, 1.0];
        let mut finder = Pathfinder::new(&graph).cost(|n| weights[n]);
        assert_eq!(finder.find_path(0, 3), Some(vec![0, 1, 3]));
        assert_eq!(finder.closed(), &[0, 2, 1]);
    }

    #[test]
    fn keyed_graph() {
        let graph: HashMap<char, Vec<char>> = HashMap::from([
            ('a', vec!['b']),
            ('b', vec!['a', 'c']),
            ('c', vec!['b']),
        ]);
        assert_eq!(find_path(&graph, 'a', 'c'), Some(vec!['a', 'b', 'c']));
        assert_eq!(find_path(&graph, 'a', 'z'), None);
    }

    #[test]
    fn spatial_heuristic_limits_expansion() {
        // A row of tiles 0..=5 plus a detour branch hanging off tile 0.
        let mut graph = NodeGraph::new();
        let row: Vec<usize> = (0..6)
            .map(|i| graph.add_node(Vec2::new(i as f32, 0.0)))
            .collect();
        for pair in row.windows(2) {
            graph.connect(pair[0], pair[1]);
        }
        let detour = graph.add_node(Vec2::new(-1.0, 0.0));
        graph.connect(row[0], detour);

        let mut blind = Pathfinder::new(&graph);
        let blind_path = blind.find_path(row[0], row[5]);
        let mut guided = Pathfinder::new(&graph).heuristic(graph.spatial_heuristic());
        let guided_path = guided.find_path(row[0], row[5]);

        assert_eq!(blind_path, Some(row.clone()));
        assert_eq!(guided_path, Some(row));
        assert!(blind.closed().contains(&detour));
        assert!(!guided.closed().contains(&detour));
    }

    #[test]
    fn node_graph_ignores_bad_edges() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Vec2::ZERO);
        graph.connect_one_way(a, 7);
        graph.connect_one_way(a, a);
        graph.connect_one_way(a, a);
        assert_eq!(graph.connections(a), &[a]);
        assert_eq!(graph.len(), 1);
    }
}
