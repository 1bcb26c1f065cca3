//! labelflow core: maximum flow by the augmenting-path labeling method
//!
//! ```
//! use labelflow_core::FlowGraph;
//!
//! let mut graph = FlowGraph::from_edges([("s", "a", 4.0), ("a", "t", 3.0), ("s", "t", 1.0)])?;
//! assert_eq!(graph.max_flow("s", "t")?, 4.0);
//! assert_eq!(graph.edge("a", "t").map(|e| e.flow()), Some(3.0));
//! # Ok::<(), labelflow_core::FlowError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod insights;
pub mod optimization;
pub mod validation;

pub use crate::algorithm::graph::{
    augment, AugmentingPath, Direction, FlowMetrics, FlowPath, MaxFlowResult, MaxFlowSolver, MinCut, PathStep,
    ResidualSearch, SearchOutcome, SelectionStrategy, SolverConfig,
};
pub use crate::algorithm::traits::{Algorithm, Capacity, EdgeId, Flow, FlowError, NodeId};
pub use crate::data_structures::graph::{Edge, FlowGraph, Node};
pub use crate::insights::presentation::{EdgeReport, FlowReport};
pub use crate::optimization::parallel::{solve_batch, FlowProblem};
pub use crate::validation::correctness::{FlowValidator, ValidationError, ValidationReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
