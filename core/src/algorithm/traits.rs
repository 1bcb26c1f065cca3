//! Core vocabulary shared by the flow engine
//!
//! This module defines the identifiers, numeric aliases, error type and
//! the algorithm trait used across the graph model, the residual search,
//! the flow augmenter and the max-flow driver.
//!
//! # Key Design Principles
//! - Arena identifiers instead of references between nodes and edges
//! - Explicit `Result` propagation for every malformed input
//! - String-typed parameters validated against a declared type
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// Edge capacity. Must be finite and non-negative.
pub type Capacity = f64;

/// Flow carried by an edge, always within `0..=capacity`.
pub type Flow = f64;

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Edge identifier, an index into the graph's edge arena
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl EdgeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Error types for graph construction and flow computation
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid capacity {capacity} on edge {tail}->{head}: must be finite and non-negative")]
    InvalidCapacity {
        tail: String,
        head: String,
        capacity: Capacity,
    },

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Source and sink are the same node: {0}")]
    SameEndpoints(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Stale augmenting path: edge {tail}->{head} lacks the claimed residual capacity")]
    StalePath { tail: String, head: String },

    #[error("Malformed augmenting path: {0}")]
    MalformedPath(String),

    #[error("Invalid bottleneck {0}: augmentation needs a finite positive amount")]
    InvalidBottleneck(Flow),

    #[error("Flow verification failed: {0}")]
    VerificationFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
    Enum(Vec<String>),
}

impl ParameterType {
    /// Checks that `value` is admissible for this parameter type
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ParameterType::Boolean => value.parse::<bool>().is_ok(),
            ParameterType::Enum(allowed) => allowed.iter().any(|v| v.eq_ignore_ascii_case(value)),
        }
    }
}

/// Algorithm descriptor with string-typed parameter access
pub trait Algorithm: Debug + Send + Sync {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., max_flow)
    fn category(&self) -> &'static str;

    /// Returns a short description including complexity
    fn description(&self) -> String;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), FlowError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;
}
