//! Flow Correctness Verification
//!
//! Checks a computed flow against the properties every maximum flow must
//! satisfy:
//!
//! - **Capacity bound**: `0 <= flow <= capacity` on every edge
//! - **Conservation**: inflow equals outflow at every node other than
//!   the source and the sink
//! - **Optimality**: the residual graph holds no augmenting path
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::graph::residual::{ResidualSearch, SearchOutcome};
use crate::algorithm::traits::{Capacity, Flow, FlowError, NodeId};
use crate::data_structures::graph::FlowGraph;

/// Relative tolerance used when comparing flows and accumulated flow sums.
/// Scaled by the magnitude of the compared quantities, never below 1.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// A single violated flow property
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Edge {tail}->{head} carries {flow} outside 0..={capacity}")]
    CapacityViolation {
        tail: String,
        head: String,
        flow: Flow,
        capacity: Capacity,
    },

    #[error("Node {node} receives {inflow} but emits {outflow}")]
    ConservationViolation {
        node: String,
        inflow: Flow,
        outflow: Flow,
    },

    #[error("Augmenting path of {hops} edges with bottleneck {bottleneck} remains")]
    AugmentingPathRemains { hops: usize, bottleneck: Flow },
}

/// Outcome of a validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts the report into a `FlowError::VerificationFailed` listing every violation
    pub fn into_result(self) -> Result<(), FlowError> {
        if self.is_valid() {
            return Ok(());
        }
        let message = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(FlowError::VerificationFailed(message))
    }
}

/// Verifier for the flow stored in a graph
#[derive(Debug, Clone, Copy)]
pub struct FlowValidator {
    tolerance: f64,
}

impl Default for FlowValidator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl FlowValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Allowed rounding error for quantities of the given magnitude
    fn slack(&self, magnitude: f64) -> f64 {
        self.tolerance * magnitude.abs().max(1.0)
    }

    /// Runs every check and collects all violations
    pub fn validate(&self, graph: &FlowGraph, source: NodeId, sink: NodeId) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.violations.extend(self.check_capacity_bounds(graph));
        report.violations.extend(self.check_conservation(graph, source, sink));
        report.violations.extend(self.check_optimality(graph, source, sink));

        if report.is_valid() {
            debug!("Flow from {} to {} passed validation", graph.node_name(source), graph.node_name(sink));
        } else {
            error!("Flow validation found {} violation(s)", report.violations.len());
        }
        report
    }

    pub fn check_capacity_bounds(&self, graph: &FlowGraph) -> Vec<ValidationError> {
        graph
            .edges()
            .filter(|(_, e)| {
                let slack = self.slack(e.capacity());
                e.flow() < -slack || e.flow() > e.capacity() + slack
            })
            .map(|(_, e)| ValidationError::CapacityViolation {
                tail: graph.node_name(e.tail()).to_owned(),
                head: graph.node_name(e.head()).to_owned(),
                flow: e.flow(),
                capacity: e.capacity(),
            })
            .collect()
    }

    pub fn check_conservation(&self, graph: &FlowGraph, source: NodeId, sink: NodeId) -> Vec<ValidationError> {
        graph
            .nodes()
            .filter(|&(id, _)| id != source && id != sink)
            .filter_map(|(id, node)| {
                let inflow = graph.inflow(id);
                let outflow = graph.outflow(id);
                ((inflow - outflow).abs() > self.slack(inflow.max(outflow))).then(|| ValidationError::ConservationViolation {
                    node: node.name().to_owned(),
                    inflow,
                    outflow,
                })
            })
            .collect()
    }

    /// Re-runs the residual search; a maximum flow leaves no path to find
    pub fn check_optimality(&self, graph: &FlowGraph, source: NodeId, sink: NodeId) -> Option<ValidationError> {
        let slack = self.slack(graph.outgoing_capacity(source));
        match ResidualSearch::default().run(graph, source, sink) {
            SearchOutcome::Found(path) if path.bottleneck() > slack => {
                Some(ValidationError::AugmentingPathRemains {
                    hops: path.len(),
                    bottleneck: path.bottleneck(),
                })
            }
            _ => None,
        }
    }
}
