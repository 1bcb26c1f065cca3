//! Parallel batch solving of independent flow problems
//!
//! A single flow computation is inherently sequential: each augmentation
//! changes the residual capacities the next search depends on. Separate
//! graphs share nothing, so a batch of them is solved on the rayon
//! thread pool with one problem per task.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::info;
use rayon::prelude::*;

use crate::algorithm::graph::max_flow::{MaxFlowResult, MaxFlowSolver, SolverConfig};
use crate::algorithm::traits::FlowError;
use crate::data_structures::graph::FlowGraph;

/// A graph together with the endpoints to solve it for
#[derive(Debug, Clone)]
pub struct FlowProblem {
    pub graph: FlowGraph,
    pub source: String,
    pub sink: String,
}

impl FlowProblem {
    pub fn new(graph: FlowGraph, source: impl Into<String>, sink: impl Into<String>) -> Self {
        Self {
            graph,
            source: source.into(),
            sink: sink.into(),
        }
    }

    /// Solves this problem in place
    pub fn solve(&mut self, config: &SolverConfig) -> Result<MaxFlowResult, FlowError> {
        MaxFlowSolver::with_config(config.clone()).solve(&mut self.graph, &self.source, &self.sink)
    }
}

/// Solves every problem concurrently. Results are returned in input order
/// and each graph keeps its own final flow assignment.
pub fn solve_batch(problems: &mut [FlowProblem], config: &SolverConfig) -> Vec<Result<MaxFlowResult, FlowError>> {
    info!("Solving {} independent flow problems", problems.len());
    problems.par_iter_mut().map(|problem| problem.solve(config)).collect()
}
