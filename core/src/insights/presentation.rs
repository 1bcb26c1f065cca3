//! Flow presentation for reporting collaborators
//!
//! Flattens a solved graph into plain rows (tail, head, flow, capacity)
//! that a plotting or reporting front end can consume without touching
//! the graph model. Rows render as `(tail->head,flow[capacity])`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::MaxFlowResult;
use crate::algorithm::traits::{Capacity, Flow, FlowError};
use crate::data_structures::graph::FlowGraph;

/// One edge of the final flow assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeReport {
    pub tail: String,
    pub head: String,
    pub flow: Flow,
    pub capacity: Capacity,
}

impl EdgeReport {
    pub fn is_saturated(&self) -> bool {
        self.flow >= self.capacity
    }
}

impl fmt::Display for EdgeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}->{},{}[{}])", self.tail, self.head, self.flow, self.capacity)
    }
}

/// Snapshot of a solved flow network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReport {
    pub source: String,
    pub sink: String,
    pub value: Flow,
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeReport>,
}

impl FlowReport {
    /// Captures the current edge flows of `graph` in insertion order
    pub fn new(graph: &FlowGraph, result: &MaxFlowResult) -> Self {
        Self {
            source: result.source.clone(),
            sink: result.sink.clone(),
            value: result.value,
            nodes: graph.nodes().map(|(_, node)| node.name().to_owned()).collect(),
            edges: graph
                .edges()
                .map(|(_, edge)| EdgeReport {
                    tail: graph.node_name(edge.tail()).to_owned(),
                    head: graph.node_name(edge.head()).to_owned(),
                    flow: edge.flow(),
                    capacity: edge.capacity(),
                })
                .collect(),
        }
    }

    /// Edges carrying positive flow
    pub fn active_edges(&self) -> impl Iterator<Item = &EdgeReport> + '_ {
        self.edges.iter().filter(|e| e.flow > 0.0)
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for FlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.nodes.join(", "))?;
        write!(f, "[")?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", edge)?;
        }
        write!(f, "]")
    }
}
