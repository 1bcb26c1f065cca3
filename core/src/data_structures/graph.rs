//! Capacitated directed graph with arena storage
//!
//! Nodes and edges live in two arenas addressed by [`NodeId`] and
//! [`EdgeId`]. A node never owns its edges: its adjacency maps hold
//! edge ids, and an edge refers to its endpoints by node id. The graph
//! is the only place where edge flow is mutated.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, EdgeId, Flow, FlowError, NodeId};

/// Graph node with non-owning adjacency views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name
    name: String,
    /// Outgoing edges keyed by head node
    outgoing: BTreeMap<NodeId, EdgeId>,
    /// Incoming edges keyed by tail node
    incoming: BTreeMap<NodeId, EdgeId>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            outgoing: BTreeMap::new(),
            incoming: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing edges as `(head, edge)` pairs in node id order
    pub fn outgoing(&self) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.outgoing.iter().map(|(&head, &edge)| (head, edge))
    }

    /// Incoming edges as `(tail, edge)` pairs in node id order
    pub fn incoming(&self) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.incoming.iter().map(|(&tail, &edge)| (tail, edge))
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }
}

/// Flow edge representation with residual capacity tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    tail: NodeId,
    head: NodeId,
    capacity: Capacity,
    flow: Flow,
}

impl Edge {
    fn new(tail: NodeId, head: NodeId, capacity: Capacity) -> Self {
        Self {
            tail,
            head,
            capacity,
            flow: 0.0,
        }
    }

    pub fn tail(&self) -> NodeId {
        self.tail
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Get residual capacity for forward direction
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }

    /// Get residual capacity for reverse direction
    #[inline]
    pub fn reverse_residual_capacity(&self) -> Capacity {
        self.flow
    }

    /// Push `delta` more flow along the edge. Returns `false` and leaves
    /// the edge untouched if the forward residual is insufficient.
    pub(crate) fn push_flow(&mut self, delta: Flow) -> bool {
        if delta > self.residual_capacity() {
            return false;
        }
        // A bottleneck push saturates exactly; the clamp absorbs rounding otherwise.
        self.flow = if delta == self.residual_capacity() {
            self.capacity
        } else {
            (self.flow + delta).min(self.capacity)
        };
        true
    }

    /// Cancel `delta` units of existing flow.
    pub(crate) fn cancel_flow(&mut self, delta: Flow) -> bool {
        if delta > self.reverse_residual_capacity() {
            return false;
        }
        self.flow = if delta == self.flow { 0.0 } else { (self.flow - delta).max(0.0) };
        true
    }

    /// Signed update: pushes a positive `amount`, cancels a negative one.
    pub(crate) fn shift_flow(&mut self, amount: Flow) -> bool {
        if amount >= 0.0 {
            self.push_flow(amount)
        } else {
            self.cancel_flow(-amount)
        }
    }
}

/// Directed capacitated graph owning every node and edge
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<String, NodeId>,
    edge_index: HashMap<(NodeId, NodeId), EdgeId>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(tail, head, capacity)` triples, stopping at
    /// the first invalid edge.
    pub fn from_edges<I, S>(edges: I) -> Result<Self, FlowError>
    where
        I: IntoIterator<Item = (S, S, Capacity)>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        graph.add_edges(edges)?;
        Ok(graph)
    }

    /// Returns the id of `name`, creating the node if it does not exist yet
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_index.get(name) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.to_owned()));
        self.node_index.insert(name.to_owned(), id);
        id
    }

    /// Inserts the edge `tail -> head`, overwriting any previous edge for
    /// the same ordered pair. The overwritten edge starts with zero flow.
    pub fn add_edge(&mut self, tail: &str, head: &str, capacity: Capacity) -> Result<EdgeId, FlowError> {
        if !capacity.is_finite() || capacity < 0.0 {
            warn!("Rejected edge {}->{} with capacity {}", tail, head, capacity);
            return Err(FlowError::InvalidCapacity {
                tail: tail.to_owned(),
                head: head.to_owned(),
                capacity,
            });
        }

        let tail_id = self.add_node(tail);
        let head_id = self.add_node(head);
        let edge = Edge::new(tail_id, head_id, capacity);

        let edge_id = match self.edge_index.get(&(tail_id, head_id)) {
            Some(&existing) => {
                debug!("Overwriting edge {}->{} with capacity {}", tail, head, capacity);
                self.edges[existing.as_usize()] = edge;
                existing
            }
            None => {
                let id = EdgeId(self.edges.len());
                self.edges.push(edge);
                self.edge_index.insert((tail_id, head_id), id);
                id
            }
        };

        self.nodes[tail_id.as_usize()].outgoing.insert(head_id, edge_id);
        self.nodes[head_id.as_usize()].incoming.insert(tail_id, edge_id);

        Ok(edge_id)
    }

    /// Inserts every edge in order, stopping at the first invalid one
    pub fn add_edges<I, S>(&mut self, edges: I) -> Result<(), FlowError>
    where
        I: IntoIterator<Item = (S, S, Capacity)>,
        S: AsRef<str>,
    {
        for (tail, head, capacity) in edges {
            self.add_edge(tail.as_ref(), head.as_ref(), capacity)?;
        }
        Ok(())
    }

    /// Looks up the edge `tail -> head` by node names
    pub fn edge(&self, tail: &str, head: &str) -> Option<&Edge> {
        let tail = self.node_id(tail)?;
        let head = self.node_id(head)?;
        self.edge_between(tail, head).and_then(|id| self.edge_by_id(id))
    }

    pub fn edge_between(&self, tail: NodeId, head: NodeId) -> Option<EdgeId> {
        self.edge_index.get(&(tail, head)).copied()
    }

    pub fn edge_by_id(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.as_usize())
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.as_usize())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.as_usize())
    }

    /// Name of `id`, or an empty string for ids from another graph
    pub fn node_name(&self, id: NodeId) -> &str {
        self.node(id).map_or("", Node::name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter().enumerate().map(|(i, edge)| (EdgeId(i), edge))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sets every edge's flow to zero
    pub fn reset_flows(&mut self) {
        for edge in &mut self.edges {
            edge.flow = 0.0;
        }
    }

    /// Total flow leaving `node`
    pub fn outflow(&self, node: NodeId) -> Flow {
        self.node(node).map_or(0.0, |n| {
            n.outgoing().map(|(_, e)| self.edges[e.as_usize()].flow).sum()
        })
    }

    /// Total flow entering `node`
    pub fn inflow(&self, node: NodeId) -> Flow {
        self.node(node).map_or(0.0, |n| {
            n.incoming().map(|(_, e)| self.edges[e.as_usize()].flow).sum()
        })
    }

    /// Net flow out of `source`: outgoing flow minus incoming flow
    pub fn flow_value(&self, source: NodeId) -> Flow {
        self.outflow(source) - self.inflow(source)
    }

    /// Capacity of the cut separating `source_side` from the remaining nodes
    pub fn cut_capacity(&self, source_side: &HashSet<NodeId>) -> Capacity {
        self.edges
            .iter()
            .filter(|e| source_side.contains(&e.tail) && !source_side.contains(&e.head))
            .map(|e| e.capacity)
            .sum()
    }

    /// Sum of capacities leaving `node`, a finite upper bound on any flow from it
    pub fn outgoing_capacity(&self, node: NodeId) -> Capacity {
        self.node(node).map_or(0.0, |n| {
            n.outgoing().map(|(_, e)| self.edges[e.as_usize()].capacity).sum()
        })
    }
}
