//! Maximum flow over directed capacitated graphs
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod residual;
pub mod augment;
pub mod max_flow;

pub use self::residual::{AugmentingPath, Direction, MinCut, PathStep, ResidualSearch, SearchOutcome, SelectionStrategy};
pub use self::augment::augment;
pub use self::max_flow::{FlowMetrics, FlowPath, MaxFlowResult, MaxFlowSolver, SolverConfig};
