//! Flow augmentation along a residual path
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashSet;

use crate::algorithm::graph::residual::{AugmentingPath, Direction, PathStep};
use crate::algorithm::traits::{Flow, FlowError, NodeId};
use crate::data_structures::graph::FlowGraph;

/// Pushes the path's bottleneck along every step, walking from the sink
/// back to the source. Forward steps add flow, backward steps cancel it.
///
/// The path must be a non-empty chain from `source` to `sink` that uses
/// each edge at most once, and every step must have the residual capacity
/// it claims. All of this is checked before any edge is touched, so a
/// rejected path leaves the graph unchanged. Returns the amount augmented.
pub fn augment(graph: &mut FlowGraph, source: NodeId, sink: NodeId, path: &AugmentingPath) -> Result<Flow, FlowError> {
    let delta = path.bottleneck();
    if !(delta.is_finite() && delta > 0.0) {
        return Err(FlowError::InvalidBottleneck(delta));
    }

    check_shape(graph, source, sink, path.steps())?;
    for step in path.steps() {
        check_step(graph, step, delta)?;
    }

    for step in path.steps().iter().rev() {
        let amount = delta * Flow::from(step.direction.sign());
        let applied = graph.edge_mut(step.edge).is_some_and(|edge| edge.shift_flow(amount));
        debug_assert!(applied, "step validated before mutation");
    }

    Ok(delta)
}

/// Endpoints, chaining and edge uniqueness of the whole path
fn check_shape(graph: &FlowGraph, source: NodeId, sink: NodeId, steps: &[PathStep]) -> Result<(), FlowError> {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return Err(FlowError::MalformedPath("path has no steps".to_string()));
    };

    if first.from != source || last.to != sink {
        return Err(FlowError::MalformedPath(format!(
            "path runs from {} to {}, expected {} to {}",
            graph.node_name(first.from),
            graph.node_name(last.to),
            graph.node_name(source),
            graph.node_name(sink)
        )));
    }

    if let Some(gap) = steps.windows(2).find(|pair| pair[0].to != pair[1].from) {
        return Err(FlowError::MalformedPath(format!(
            "step ending at {} is followed by a step leaving {}",
            graph.node_name(gap[0].to),
            graph.node_name(gap[1].from)
        )));
    }

    let mut seen = HashSet::with_capacity(steps.len());
    if let Some(repeated) = steps.iter().find(|step| !seen.insert(step.edge)) {
        return Err(FlowError::MalformedPath(format!(
            "edge {} is used more than once",
            repeated.edge
        )));
    }

    Ok(())
}

fn check_step(graph: &FlowGraph, step: &PathStep, delta: Flow) -> Result<(), FlowError> {
    let stale = || FlowError::StalePath {
        tail: graph.node_name(step.from).to_owned(),
        head: graph.node_name(step.to).to_owned(),
    };

    let edge = graph.edge_by_id(step.edge).ok_or_else(stale)?;
    let fits = match step.direction {
        Direction::Forward => {
            edge.tail() == step.from && edge.head() == step.to && edge.residual_capacity() >= delta
        }
        Direction::Backward => {
            edge.head() == step.from && edge.tail() == step.to && edge.reverse_residual_capacity() >= delta
        }
    };

    if fits {
        Ok(())
    } else {
        Err(stale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::residual::{ResidualSearch, SearchOutcome};
    use crate::algorithm::traits::EdgeId;

    fn endpoints(graph: &FlowGraph) -> (NodeId, NodeId) {
        (graph.node_id("s").unwrap(), graph.node_id("t").unwrap())
    }

    fn find_path(graph: &FlowGraph) -> AugmentingPath {
        let (s, t) = endpoints(graph);
        match ResidualSearch::default().run(graph, s, t) {
            SearchOutcome::Found(path) => path,
            other => panic!("expected a path, got {:?}", other),
        }
    }

    fn forward(graph: &FlowGraph, from: &str, to: &str) -> PathStep {
        let from = graph.node_id(from).unwrap();
        let to = graph.node_id(to).unwrap();
        PathStep { from, to, edge: graph.edge_between(from, to).unwrap(), direction: Direction::Forward }
    }

    fn assert_untouched(graph: &FlowGraph) {
        assert!(graph.edges().all(|(_, e)| e.flow() == 0.0));
    }

    #[test]
    fn test_forward_augmentation() {
        let mut graph = FlowGraph::from_edges([("s", "a", 4.0), ("a", "t", 3.0)]).unwrap();
        let (s, t) = endpoints(&graph);
        let path = find_path(&graph);

        assert_eq!(augment(&mut graph, s, t, &path).unwrap(), 3.0);
        assert_eq!(graph.edge("s", "a").unwrap().flow(), 3.0);
        assert_eq!(graph.edge("a", "t").unwrap().flow(), 3.0);
    }

    #[test]
    fn test_backward_augmentation_preserves_conservation() {
        let mut graph = FlowGraph::from_edges([
            ("s", "a", 1.0),
            ("s", "b", 1.0),
            ("a", "b", 1.0),
            ("a", "t", 1.0),
            ("b", "t", 1.0),
        ])
        .unwrap();
        let (s, t) = endpoints(&graph);
        let a = graph.node_id("a").unwrap();
        let b = graph.node_id("b").unwrap();

        // Force the first unit through the middle edge.
        let steps = vec![forward(&graph, "s", "a"), forward(&graph, "a", "b"), forward(&graph, "b", "t")];
        augment(&mut graph, s, t, &AugmentingPath::new(steps, 1.0)).unwrap();

        let path = find_path(&graph);
        assert!(path.steps().iter().any(|step| step.direction == Direction::Backward));
        augment(&mut graph, s, t, &path).unwrap();

        assert_eq!(graph.edge("a", "b").unwrap().flow(), 0.0);
        for node in [a, b] {
            assert_eq!(graph.inflow(node), graph.outflow(node));
        }
        assert_eq!(graph.flow_value(s), 2.0);
    }

    #[test]
    fn test_stale_path_is_rejected_without_mutation() {
        let mut graph = FlowGraph::from_edges([("s", "a", 2.0), ("a", "t", 2.0)]).unwrap();
        let (s, t) = endpoints(&graph);
        let path = find_path(&graph);
        augment(&mut graph, s, t, &path).unwrap();

        // Same path again: both edges are saturated now.
        let err = augment(&mut graph, s, t, &path).unwrap_err();
        assert!(matches!(err, FlowError::StalePath { .. }));
        assert_eq!(graph.edge("s", "a").unwrap().flow(), 2.0);
        assert_eq!(graph.edge("a", "t").unwrap().flow(), 2.0);
    }

    #[test]
    fn test_mismatched_orientation_is_rejected() {
        let mut graph = FlowGraph::from_edges([("s", "t", 2.0)]).unwrap();
        let (s, t) = endpoints(&graph);
        let edge = graph.edge_between(s, t).unwrap();

        // Runs t -> s over a forward step of s -> t, against the graph's endpoints.
        let reversed = AugmentingPath::new(
            vec![PathStep { from: t, to: s, edge, direction: Direction::Forward }],
            1.0,
        );
        assert!(augment(&mut graph, t, s, &reversed).is_err());

        let foreign = AugmentingPath::new(
            vec![PathStep { from: s, to: t, edge: EdgeId(9), direction: Direction::Forward }],
            1.0,
        );
        assert!(matches!(augment(&mut graph, s, t, &foreign), Err(FlowError::StalePath { .. })));
        assert_untouched(&graph);
    }

    #[test]
    fn test_repeated_edge_is_rejected() {
        let mut graph = FlowGraph::from_edges([("s", "t", 2.0)]).unwrap();
        let (s, t) = endpoints(&graph);
        let step = forward(&graph, "s", "t");

        // Chaining is checked first, so use a walk that returns to s over the same edge.
        let twice = AugmentingPath::new(vec![step, step], 2.0);
        assert!(matches!(augment(&mut graph, s, t, &twice), Err(FlowError::MalformedPath(_))));

        let back = PathStep { from: t, to: s, edge: step.edge, direction: Direction::Backward };
        let loop_path = AugmentingPath::new(vec![step, back, step], 1.0);
        let err = augment(&mut graph, s, t, &loop_path).unwrap_err();
        assert!(matches!(&err, FlowError::MalformedPath(reason) if reason.contains("more than once")));
        assert_untouched(&graph);
    }

    #[test]
    fn test_partial_path_is_rejected() {
        let mut graph = FlowGraph::from_edges([("s", "a", 2.0), ("a", "b", 2.0), ("b", "t", 2.0)]).unwrap();
        let (s, t) = endpoints(&graph);

        let middle = AugmentingPath::new(vec![forward(&graph, "a", "b")], 2.0);
        assert!(matches!(augment(&mut graph, s, t, &middle), Err(FlowError::MalformedPath(_))));

        let gapped = AugmentingPath::new(vec![forward(&graph, "s", "a"), forward(&graph, "b", "t")], 2.0);
        let err = augment(&mut graph, s, t, &gapped).unwrap_err();
        assert!(matches!(&err, FlowError::MalformedPath(reason) if reason.contains("followed by")));
        assert_untouched(&graph);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let mut graph = FlowGraph::from_edges([("s", "t", 2.0)]).unwrap();
        let (s, t) = endpoints(&graph);

        let empty = AugmentingPath::new(Vec::new(), 5.0);
        assert!(matches!(augment(&mut graph, s, t, &empty), Err(FlowError::MalformedPath(_))));
        assert_untouched(&graph);
    }

    #[test]
    fn test_non_positive_bottleneck_is_rejected() {
        let mut graph = FlowGraph::from_edges([("s", "t", 2.0)]).unwrap();
        let (s, t) = endpoints(&graph);
        let step = forward(&graph, "s", "t");

        let path = AugmentingPath::new(vec![step], 0.0);
        assert!(matches!(augment(&mut graph, s, t, &path), Err(FlowError::InvalidBottleneck(_))));

        let path = AugmentingPath::new(vec![step], Flow::INFINITY);
        assert!(matches!(augment(&mut graph, s, t, &path), Err(FlowError::InvalidBottleneck(_))));
        assert_untouched(&graph);
    }
}
