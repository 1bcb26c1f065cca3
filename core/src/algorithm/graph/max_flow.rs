//! Maximum Flow by the Augmenting-Path Labeling Method
//!
//! The driver resets every edge flow, then alternates residual searches
//! and augmentations until a search exhausts its frontier. At that point
//! the labeled set is the source side of a minimum cut and, by the
//! max-flow min-cut theorem, the current assignment is a maximum flow.
//!
//! With FIFO selection the searches find shortest augmenting paths
//! (Edmonds-Karp, `O(V·E²)`). LIFO selection explores depth-first and
//! gives the classical Ford-Fulkerson bound `O(E·|f*|)` for integral
//! capacities. Both produce the same flow value.
//!
//! Termination is guaranteed for non-negative integral (or commensurable
//! rational) capacities. Irrational capacities are a caller precondition
//! and are not detected.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::augment::augment;
use crate::algorithm::graph::residual::{MinCut, ResidualSearch, SearchOutcome, SelectionStrategy};
use crate::algorithm::traits::{Algorithm, AlgorithmParameter, Capacity, Flow, FlowError, ParameterType};
use crate::data_structures::graph::FlowGraph;
use crate::validation::correctness::FlowValidator;

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Frontier order of the residual search
    pub selection: SelectionStrategy,
    /// Keep every augmenting path in the result
    pub record_paths: bool,
    /// Check capacity bounds, conservation and optimality after solving
    pub verify: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            selection: SelectionStrategy::Fifo,
            record_paths: true,
            verify: cfg!(debug_assertions),
        }
    }
}

impl SolverConfig {
    /// Parses a JSON configuration; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Flow path representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPath {
    /// Path vertices from source to sink
    pub path: Vec<String>,
    /// Flow amount along path
    pub flow: Flow,
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmentations performed
    pub augmentations: usize,
    /// Nodes scanned across all searches
    pub nodes_scanned: usize,
    /// Algorithm execution time
    pub execution_time_ms: f64,
}

/// Maximum flow result with detailed flow information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFlowResult {
    pub source: String,
    pub sink: String,
    /// Maximum flow value
    pub value: Flow,
    /// Source side of a minimum cut
    pub min_cut: Vec<String>,
    /// Capacity of that cut, equal to `value`
    pub cut_capacity: Capacity,
    /// Augmenting paths in the order they were applied
    pub flow_paths: Vec<FlowPath>,
    pub metrics: FlowMetrics,
}

/// Driver states
#[derive(Debug)]
enum DriverState {
    Searching,
    Done(MinCut),
}

/// Maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    config: SolverConfig,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Computes a maximum flow from `source` to `sink`.
    ///
    /// All edge flows are reset first; on success they hold the maximum
    /// flow assignment. Unknown or identical endpoints are rejected before
    /// any flow is touched.
    pub fn solve(&self, graph: &mut FlowGraph, source: &str, sink: &str) -> Result<MaxFlowResult, FlowError> {
        let source_id = graph
            .node_id(source)
            .ok_or_else(|| FlowError::UnknownNode(source.to_owned()))?;
        let sink_id = graph
            .node_id(sink)
            .ok_or_else(|| FlowError::UnknownNode(sink.to_owned()))?;
        if source_id == sink_id {
            return Err(FlowError::SameEndpoints(source.to_owned()));
        }

        info!(
            "{} from {} to {} over {} nodes and {} edges",
            self.name(),
            source,
            sink,
            graph.node_count(),
            graph.edge_count()
        );
        let start_time = Instant::now();

        graph.reset_flows();

        let mut search = ResidualSearch::new(self.config.selection);
        let mut metrics = FlowMetrics::default();
        let mut flow_paths = Vec::new();
        let mut state = DriverState::Searching;

        let min_cut = loop {
            state = match state {
                DriverState::Searching => match search.run(graph, source_id, sink_id) {
                    SearchOutcome::Found(path) => {
                        let delta = augment(graph, source_id, sink_id, &path)?;
                        metrics.augmentations += 1;
                        debug!(
                            "Augmentation {}: {} along {} edges",
                            metrics.augmentations,
                            delta,
                            path.len()
                        );
                        if self.config.record_paths {
                            flow_paths.push(FlowPath {
                                path: path.nodes().into_iter().map(|n| graph.node_name(n).to_owned()).collect(),
                                flow: delta,
                            });
                        }
                        DriverState::Searching
                    }
                    SearchOutcome::Exhausted(cut) => DriverState::Done(cut),
                },
                DriverState::Done(cut) => break cut,
            };
        };

        if self.config.verify {
            FlowValidator::new().validate(graph, source_id, sink_id).into_result()?;
        }

        metrics.nodes_scanned = search.nodes_scanned();
        metrics.execution_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let value = graph.flow_value(source_id);
        let cut_capacity = graph.cut_capacity(min_cut.source_side());
        info!(
            "Maximum flow {} after {} augmentations ({:.3} ms)",
            value, metrics.augmentations, metrics.execution_time_ms
        );

        Ok(MaxFlowResult {
            source: source.to_owned(),
            sink: sink.to_owned(),
            value,
            min_cut: min_cut
                .sorted()
                .into_iter()
                .map(|n| graph.node_name(n).to_owned())
                .collect(),
            cut_capacity,
            flow_paths,
            metrics,
        })
    }
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        match self.config.selection {
            SelectionStrategy::Fifo => "Edmonds-Karp",
            SelectionStrategy::Lifo => "Ford-Fulkerson",
        }
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        match self.config.selection {
            SelectionStrategy::Fifo => {
                "Augmenting-path labeling with FIFO selection: shortest augmenting paths, O(V·E²).".to_string()
            }
            SelectionStrategy::Lifo => {
                "Augmenting-path labeling with LIFO selection: depth-first paths, O(E·|f*|) for integral capacities."
                    .to_string()
            }
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: "selection".to_string(),
                value: self.config.selection.as_str().to_string(),
                value_type: ParameterType::Enum(vec!["fifo".to_string(), "lifo".to_string()]),
            },
            AlgorithmParameter {
                name: "record_paths".to_string(),
                value: self.config.record_paths.to_string(),
                value_type: ParameterType::Boolean,
            },
            AlgorithmParameter {
                name: "verify".to_string(),
                value: self.config.verify.to_string(),
                value_type: ParameterType::Boolean,
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), FlowError> {
        let parameter = self
            .parameters()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| FlowError::InvalidParameter {
                name: name.to_string(),
                reason: "unknown parameter".to_string(),
            })?;

        if !parameter.value_type.accepts(value) {
            return Err(FlowError::InvalidParameter {
                name: name.to_string(),
                reason: format!("{:?} does not accept '{}'", parameter.value_type, value),
            });
        }

        match name {
            "selection" if value.eq_ignore_ascii_case("lifo") => self.config.selection = SelectionStrategy::Lifo,
            "selection" => self.config.selection = SelectionStrategy::Fifo,
            "record_paths" => self.config.record_paths = value == "true",
            "verify" => self.config.verify = value == "true",
            _ => {
                return Err(FlowError::InvalidParameter {
                    name: name.to_string(),
                    reason: "parameter is listed but not settable".to_string(),
                })
            }
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters().into_iter().find(|p| p.name == name).map(|p| p.value)
    }
}

impl FlowGraph {
    /// Computes a maximum flow with the default solver and returns its value.
    /// Edge flows keep the resulting assignment.
    pub fn max_flow(&mut self, source: &str, sink: &str) -> Result<Flow, FlowError> {
        MaxFlowSolver::new().solve(self, source, sink).map(|result| result.value)
    }
}
