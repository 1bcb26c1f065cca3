//! Label-propagating search over the residual graph
//!
//! A single run labels the source with an unbounded bottleneck and
//! propagates labels along edges with forward residual (`capacity - flow`)
//! and backward residual (`flow`). Label, predecessor and frontier data
//! live in a per-run scratch state and are discarded afterwards, so the
//! graph itself is only borrowed immutably.
//!
//! When the sink cannot be labeled, the labeled set is the source side
//! of a minimum cut.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{EdgeId, Flow, NodeId};
use crate::data_structures::graph::FlowGraph;

/// Order in which labeled nodes are taken from the frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Queue order, yields shortest augmenting paths
    #[default]
    Fifo,
    /// Stack order, depth-first exploration
    Lifo,
}

impl SelectionStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionStrategy::Fifo => "fifo",
            SelectionStrategy::Lifo => "lifo",
        }
    }
}

/// Direction in which a path step traverses its edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Along the edge, consuming `capacity - flow`
    Forward,
    /// Against the edge, cancelling existing flow
    Backward,
}

impl Direction {
    /// `+1` for forward steps, `-1` for backward steps
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// One step of an augmenting path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// Node the step leaves (closer to the source)
    pub from: NodeId,
    /// Node the step reaches (closer to the sink)
    pub to: NodeId,
    pub edge: EdgeId,
    pub direction: Direction,
}

/// Augmenting path from source to sink with its bottleneck capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentingPath {
    steps: Vec<PathStep>,
    bottleneck: Flow,
}

impl AugmentingPath {
    pub fn new(steps: Vec<PathStep>, bottleneck: Flow) -> Self {
        Self { steps, bottleneck }
    }

    /// Steps ordered from source to sink
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn bottleneck(&self) -> Flow {
        self.bottleneck
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Visited nodes from source to sink
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            nodes.push(first.from);
        }
        nodes.extend(self.steps.iter().map(|step| step.to));
        nodes
    }
}

/// Source side of a minimum cut, produced by an exhausted search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MinCut {
    source_side: HashSet<NodeId>,
}

impl MinCut {
    pub fn source_side(&self) -> &HashSet<NodeId> {
        &self.source_side
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.source_side.contains(&node)
    }

    /// Source-side nodes in id order
    pub fn sorted(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.source_side.iter().copied().collect();
        nodes.sort_unstable();
        nodes
    }
}

/// Outcome of a single residual search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The sink was labeled
    Found(AugmentingPath),
    /// No labeled node is left to scan; the current flow is maximum
    Exhausted(MinCut),
}

#[derive(Debug, Clone, Copy)]
struct Predecessor {
    node: NodeId,
    edge: EdgeId,
    direction: Direction,
}

/// Scratch state of one search run
#[derive(Debug)]
struct SearchState {
    labels: HashMap<NodeId, Flow>,
    predecessors: HashMap<NodeId, Predecessor>,
    frontier: VecDeque<NodeId>,
    strategy: SelectionStrategy,
}

impl SearchState {
    fn new(source: NodeId, strategy: SelectionStrategy) -> Self {
        let mut labels = HashMap::new();
        labels.insert(source, Flow::INFINITY);
        Self {
            labels,
            predecessors: HashMap::new(),
            frontier: VecDeque::from([source]),
            strategy,
        }
    }

    fn next(&mut self) -> Option<NodeId> {
        match self.strategy {
            SelectionStrategy::Fifo => self.frontier.pop_front(),
            SelectionStrategy::Lifo => self.frontier.pop_back(),
        }
    }

    fn is_labeled(&self, node: NodeId) -> bool {
        self.labels.contains_key(&node)
    }

    fn label(&mut self, node: NodeId, value: Flow, predecessor: Predecessor) {
        self.labels.insert(node, value);
        self.predecessors.insert(node, predecessor);
        self.frontier.push_back(node);
    }

    /// Walks predecessors back from `sink` and returns the path source-first
    fn trace(&self, source: NodeId, sink: NodeId) -> AugmentingPath {
        let mut steps = Vec::new();
        let mut node = sink;
        while node != source {
            let Some(pred) = self.predecessors.get(&node) else {
                break;
            };
            steps.push(PathStep {
                from: pred.node,
                to: node,
                edge: pred.edge,
                direction: pred.direction,
            });
            node = pred.node;
        }
        steps.reverse();

        let bottleneck = self.labels.get(&sink).copied().unwrap_or(0.0);
        AugmentingPath::new(steps, bottleneck)
    }

    fn into_cut(self) -> MinCut {
        MinCut {
            source_side: self.labels.into_keys().collect(),
        }
    }
}

/// Residual search with a configurable selection order
#[derive(Debug, Clone, Default)]
pub struct ResidualSearch {
    strategy: SelectionStrategy,
    nodes_scanned: usize,
}

impl ResidualSearch {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self {
            strategy,
            nodes_scanned: 0,
        }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Nodes scanned over every run of this search
    pub fn nodes_scanned(&self) -> usize {
        self.nodes_scanned
    }

    /// Searches for an augmenting path from `source` to `sink`.
    ///
    /// A `source` equal to `sink` never yields a path.
    pub fn run(&mut self, graph: &FlowGraph, source: NodeId, sink: NodeId) -> SearchOutcome {
        let mut state = SearchState::new(source, self.strategy);
        if source == sink {
            return SearchOutcome::Exhausted(state.into_cut());
        }

        while let Some(x) = state.next() {
            let Some(node) = graph.node(x) else {
                continue;
            };
            let label = state.labels[&x];
            self.nodes_scanned += 1;
            trace!("Scanning {} with label {}", node.name(), label);

            for (y, edge_id) in node.outgoing() {
                if state.is_labeled(y) {
                    continue;
                }
                let Some(edge) = graph.edge_by_id(edge_id) else {
                    continue;
                };
                let residual = edge.residual_capacity();
                if residual > 0.0 {
                    state.label(y, label.min(residual), Predecessor {
                        node: x,
                        edge: edge_id,
                        direction: Direction::Forward,
                    });
                    if y == sink {
                        return SearchOutcome::Found(state.trace(source, sink));
                    }
                }
            }

            for (y, edge_id) in node.incoming() {
                if state.is_labeled(y) {
                    continue;
                }
                let Some(edge) = graph.edge_by_id(edge_id) else {
                    continue;
                };
                let residual = edge.reverse_residual_capacity();
                if residual > 0.0 {
                    state.label(y, label.min(residual), Predecessor {
                        node: x,
                        edge: edge_id,
                        direction: Direction::Backward,
                    });
                    if y == sink {
                        return SearchOutcome::Found(state.trace(source, sink));
                    }
                }
            }
        }

        SearchOutcome::Exhausted(state.into_cut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(graph: &FlowGraph, names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| graph.node_id(n).unwrap()).collect()
    }

    #[test]
    fn test_forward_path_and_bottleneck() {
        let graph = FlowGraph::from_edges([("s", "a", 4.0), ("a", "b", 2.0), ("b", "t", 3.0)]).unwrap();
        let (s, t) = (graph.node_id("s").unwrap(), graph.node_id("t").unwrap());

        let mut search = ResidualSearch::default();
        match search.run(&graph, s, t) {
            SearchOutcome::Found(path) => {
                assert_eq!(path.bottleneck(), 2.0);
                assert_eq!(path.nodes(), ids(&graph, &["s", "a", "b", "t"]));
                assert!(path.steps().iter().all(|step| step.direction == Direction::Forward));
            }
            other => panic!("expected a path, got {:?}", other),
        }
        assert_eq!(search.nodes_scanned(), 3);
    }

    #[test]
    fn test_backward_edge_cancels_flow() {
        let mut graph = FlowGraph::from_edges([
            ("s", "a", 1.0),
            ("s", "b", 1.0),
            ("a", "b", 1.0),
            ("a", "t", 1.0),
            ("b", "t", 1.0),
        ])
        .unwrap();

        // Route one unit along s->a->b->t, blocking both direct exits.
        for (tail, head) in [("s", "a"), ("a", "b"), ("b", "t")] {
            let id = graph.edge_between(graph.node_id(tail).unwrap(), graph.node_id(head).unwrap()).unwrap();
            assert!(graph.edge_mut(id).unwrap().push_flow(1.0));
        }

        let (s, t) = (graph.node_id("s").unwrap(), graph.node_id("t").unwrap());
        let path = match ResidualSearch::default().run(&graph, s, t) {
            SearchOutcome::Found(path) => path,
            other => panic!("expected a path, got {:?}", other),
        };

        assert_eq!(path.bottleneck(), 1.0);
        assert_eq!(path.nodes(), ids(&graph, &["s", "b", "a", "t"]));
        let directions: Vec<i8> = path.steps().iter().map(|s| s.direction.sign()).collect();
        assert_eq!(directions, vec![1, -1, 1]);
    }

    #[test]
    fn test_exhausted_search_reports_cut() {
        let mut graph = FlowGraph::from_edges([("s", "a", 2.0), ("a", "t", 2.0), ("s", "b", 1.0)]).unwrap();
        let id = graph.edge_between(graph.node_id("a").unwrap(), graph.node_id("t").unwrap()).unwrap();
        assert!(graph.edge_mut(id).unwrap().push_flow(2.0));
        let id = graph.edge_between(graph.node_id("s").unwrap(), graph.node_id("a").unwrap()).unwrap();
        assert!(graph.edge_mut(id).unwrap().push_flow(2.0));

        let (s, t) = (graph.node_id("s").unwrap(), graph.node_id("t").unwrap());
        match ResidualSearch::new(SelectionStrategy::Lifo).run(&graph, s, t) {
            SearchOutcome::Exhausted(cut) => {
                assert_eq!(cut.sorted(), ids(&graph, &["s", "b"]));
                assert!(!cut.contains(t));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_fifo_prefers_shortest_path() {
        // Long branch is inserted first so adjacency order alone would not decide.
        let graph = FlowGraph::from_edges([
            ("s", "a", 1.0),
            ("a", "b", 1.0),
            ("b", "t", 1.0),
            ("s", "t", 1.0),
        ])
        .unwrap();
        let (s, t) = (graph.node_id("s").unwrap(), graph.node_id("t").unwrap());

        match ResidualSearch::new(SelectionStrategy::Fifo).run(&graph, s, t) {
            SearchOutcome::Found(path) => assert_eq!(path.len(), 1),
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let graph = FlowGraph::from_edges([("s", "a", 3.0), ("a", "t", 5.0)]).unwrap();
        let (s, t) = (graph.node_id("s").unwrap(), graph.node_id("t").unwrap());

        let mut search = ResidualSearch::new(SelectionStrategy::Lifo);
        let first = search.run(&graph, s, t);
        let second = search.run(&graph, s, t);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_endpoints_never_yield_a_path() {
        let graph = FlowGraph::from_edges([("s", "t", 3.0)]).unwrap();
        let s = graph.node_id("s").unwrap();
        assert!(matches!(ResidualSearch::default().run(&graph, s, s), SearchOutcome::Exhausted(_)));
    }
}
