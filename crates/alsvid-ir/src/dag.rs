//! Dependency DAG representation of a circuit.
//!
//! Nodes wrap gates; directed edges encode must-happen-before ordering
//! between gates that share a qubit. Each qubit's gates form a totally
//! ordered chain (its wire), and the DAG is the union of these chains.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Ids are assigned from a
//! monotonically increasing counter and never reused, so removal leaves
//! gaps rather than renumbering.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::QubitId;

/// Identifier of a node within one DAG. Stable for the DAG's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the DAG: one gate plus its dependency lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagNode {
    gate: Gate,
    predecessors: Vec<NodeId>,
    successors: Vec<NodeId>,
}

impl DagNode {
    /// The gate this node represents.
    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Nodes that must execute before this one.
    #[inline]
    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessors
    }

    /// Nodes that depend on this one.
    #[inline]
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    /// The number of predecessors.
    #[inline]
    pub fn in_degree(&self) -> usize {
        self.predecessors.len()
    }

    /// The number of successors.
    #[inline]
    pub fn out_degree(&self) -> usize {
        self.successors.len()
    }

    /// Check if this node has no predecessors.
    #[inline]
    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Check if this node has no successors.
    #[inline]
    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }
}

/// Dependency DAG over a fixed qubit register.
///
/// ```rust
/// use alsvid_ir::{Circuit, CircuitDag, QubitId};
///
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.h(QubitId(0)).unwrap();
/// circuit.cnot(QubitId(0), QubitId(1)).unwrap();
///
/// let dag = CircuitDag::from_circuit(&circuit);
/// assert_eq!(dag.num_nodes(), 2);
/// assert_eq!(dag.depth().unwrap(), 2);
///
/// let recovered = dag.to_circuit().unwrap();
/// assert_eq!(recovered.len(), circuit.len());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitDag {
    num_qubits: u32,
    next_id: u32,
    nodes: FxHashMap<NodeId, DagNode>,
    last_on_qubit: Vec<Option<NodeId>>,
}

impl CircuitDag {
    /// Create an empty DAG over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(IrError::EmptyRegister);
        }
        Ok(Self {
            num_qubits,
            next_id: 0,
            nodes: FxHashMap::default(),
            last_on_qubit: vec![None; num_qubits as usize],
        })
    }

    /// Build a DAG from a circuit by adding its gates in program order.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut dag = Self {
            num_qubits: circuit.num_qubits(),
            next_id: 0,
            nodes: FxHashMap::default(),
            last_on_qubit: vec![None; circuit.num_qubits() as usize],
        };
        for gate in circuit {
            // Operands were range-checked when the circuit was built.
            dag.link(gate.clone());
        }
        dag
    }

    /// Add a gate, wiring it after the last gate on each of its qubits.
    /// Returns the fresh node id.
    pub fn add(&mut self, gate: Gate) -> IrResult<NodeId> {
        for &q in gate.qubits() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    gate: gate.name(),
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        Ok(self.link(gate))
    }

    /// Insert a pre-validated gate and maintain the wire chains.
    fn link(&mut self, gate: Gate) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        // One edge per distinct predecessor, even when both qubits share it.
        let mut predecessors: Vec<NodeId> = Vec::new();
        for &q in gate.qubits() {
            if let Some(pred) = self.last_on_qubit[q.index()] {
                if !predecessors.contains(&pred) {
                    predecessors.push(pred);
                }
            }
        }
        for &pred in &predecessors {
            if let Some(node) = self.nodes.get_mut(&pred) {
                node.successors.push(id);
            }
        }
        for &q in gate.qubits() {
            self.last_on_qubit[q.index()] = Some(id);
        }

        self.nodes.insert(
            id,
            DagNode {
                gate,
                predecessors,
                successors: vec![],
            },
        );
        id
    }

    /// Remove a node, reconnecting each predecessor to each successor so
    /// the remaining dependencies are preserved.
    pub fn remove(&mut self, id: NodeId) -> IrResult<Gate> {
        let target = self.nodes.remove(&id).ok_or(IrError::NodeNotFound(id))?;

        for &pred in &target.predecessors {
            if let Some(node) = self.nodes.get_mut(&pred) {
                node.successors.retain(|&s| s != id);
            }
        }
        for &succ in &target.successors {
            if let Some(node) = self.nodes.get_mut(&succ) {
                node.predecessors.retain(|&p| p != id);
            }
        }

        // Bridge pred -> succ, avoiding duplicate edges.
        for &pred in &target.predecessors {
            for &succ in &target.successors {
                let present = self
                    .nodes
                    .get(&pred)
                    .is_some_and(|node| node.successors.contains(&succ));
                if !present {
                    if let Some(node) = self.nodes.get_mut(&pred) {
                        node.successors.push(succ);
                    }
                    if let Some(node) = self.nodes.get_mut(&succ) {
                        node.predecessors.push(pred);
                    }
                }
            }
        }

        // Repair the last-gate table: the latest remaining predecessor on
        // each wire the removed node terminated.
        for &q in target.gate.qubits() {
            if self.last_on_qubit[q.index()] == Some(id) {
                self.last_on_qubit[q.index()] = target
                    .predecessors
                    .iter()
                    .copied()
                    .filter(|pred| {
                        self.nodes
                            .get(pred)
                            .is_some_and(|node| node.gate.touches(q))
                    })
                    .max();
            }
        }

        Ok(target.gate)
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> IrResult<&DagNode> {
        self.nodes.get(&id).ok_or(IrError::NodeNotFound(id))
    }

    /// Get a mutable reference to a node's gate.
    ///
    /// Intended for angle rewrites; callers must not change the operand
    /// list, which the dependency edges are derived from.
    pub fn gate_mut(&mut self, id: NodeId) -> Option<&mut Gate> {
        self.nodes.get_mut(&id).map(|node| &mut node.gate)
    }

    /// Check if a node with the given id is present.
    #[inline]
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The register size.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The number of present nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DAG has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All present node ids, in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of nodes with no predecessors, in ascending order.
    pub fn sources(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_source())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of nodes with no successors, in ascending order.
    pub fn sinks(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_sink())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The most recent present node touching `qubit`, if any.
    pub fn last_on(&self, qubit: QubitId) -> Option<NodeId> {
        self.last_on_qubit.get(qubit.index()).copied().flatten()
    }

    /// Check for a direct edge between two nodes.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes
            .get(&from)
            .is_some_and(|node| node.successors.contains(&to))
    }

    /// All `(from, to)` edges, grouped by ascending source id.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut result = Vec::new();
        for id in self.node_ids() {
            if let Some(node) = self.nodes.get(&id) {
                for &succ in &node.successors {
                    result.push((id, succ));
                }
            }
        }
        result
    }

    /// Node ids in topological order (Kahn's algorithm, id-ordered sources).
    ///
    /// A cycle would make the result shorter than the node count; the
    /// construction rules make that unreachable, so it is reported as an
    /// internal error.
    pub fn topological_order(&self) -> IrResult<Vec<NodeId>> {
        let mut in_degree: FxHashMap<NodeId, usize> = self
            .nodes
            .iter()
            .map(|(&id, node)| (id, node.in_degree()))
            .collect();

        let mut ready: VecDeque<NodeId> = self.sources().into();
        let mut result = Vec::with_capacity(self.nodes.len());

        while let Some(id) = ready.pop_front() {
            result.push(id);
            if let Some(node) = self.nodes.get(&id) {
                for &succ in &node.successors {
                    if let Some(degree) = in_degree.get_mut(&succ) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.push_back(succ);
                        }
                    }
                }
            }
        }

        if result.len() != self.nodes.len() {
            return Err(IrError::CyclicDependency);
        }
        Ok(result)
    }

    /// Partition the nodes into layers: layer `k` holds the nodes whose
    /// predecessors all appear in earlier layers. Gates within a layer are
    /// data-independent.
    pub fn layers(&self) -> IrResult<Vec<Vec<NodeId>>> {
        let mut in_degree: FxHashMap<NodeId, usize> = self
            .nodes
            .iter()
            .map(|(&id, node)| (id, node.in_degree()))
            .collect();

        let mut current = self.sources();
        let mut result = Vec::new();
        let mut seen = 0usize;

        while !current.is_empty() {
            seen += current.len();
            let mut next = Vec::new();
            for &id in &current {
                if let Some(node) = self.nodes.get(&id) {
                    for &succ in &node.successors {
                        if let Some(degree) = in_degree.get_mut(&succ) {
                            *degree -= 1;
                            if *degree == 0 {
                                next.push(succ);
                            }
                        }
                    }
                }
            }
            next.sort_unstable();
            result.push(current);
            current = next;
        }

        if seen != self.nodes.len() {
            return Err(IrError::CyclicDependency);
        }
        Ok(result)
    }

    /// The number of layers.
    pub fn depth(&self) -> IrResult<usize> {
        Ok(self.layers()?.len())
    }

    /// Flatten back to a circuit by emitting gates in topological order.
    pub fn to_circuit(&self) -> IrResult<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits)?;
        for id in self.topological_order()? {
            if let Some(node) = self.nodes.get(&id) {
                circuit.push(node.gate.clone())?;
            }
        }
        Ok(circuit)
    }

    /// Drop every node and reset the id counter.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.last_on_qubit.fill(None);
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn bell_dag() -> CircuitDag {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        CircuitDag::from_circuit(&circuit)
    }

    /// BFS reachability over successor edges, for invariant checks.
    fn has_path(dag: &CircuitDag, from: NodeId, to: NodeId) -> bool {
        let mut queue = VecDeque::from([from]);
        let mut visited = vec![from];
        while let Some(id) = queue.pop_front() {
            if id == to {
                return true;
            }
            for &succ in dag.node(id).unwrap().successors() {
                if !visited.contains(&succ) {
                    visited.push(succ);
                    queue.push_back(succ);
                }
            }
        }
        false
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new(2).unwrap();
        assert_eq!(dag.num_nodes(), 0);
        assert!(dag.is_empty());
        assert_eq!(dag.depth().unwrap(), 0);
        assert!(dag.sources().is_empty());
        assert!(dag.sinks().is_empty());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert_eq!(CircuitDag::new(0).unwrap_err(), IrError::EmptyRegister);
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut dag = CircuitDag::new(1).unwrap();
        let a = dag.add(Gate::h(QubitId(0))).unwrap();
        let b = dag.add(Gate::x(QubitId(0))).unwrap();
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
    }

    #[test]
    fn test_add_validates_range() {
        let mut dag = CircuitDag::new(2).unwrap();
        let err = dag.add(Gate::h(QubitId(5))).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { .. }));
        assert!(dag.is_empty());
    }

    #[test]
    fn test_independent_gates_have_no_edges() {
        let mut dag = CircuitDag::new(2).unwrap();
        let a = dag.add(Gate::h(QubitId(0))).unwrap();
        let b = dag.add(Gate::h(QubitId(1))).unwrap();
        assert!(dag.node(a).unwrap().is_source());
        assert!(dag.node(a).unwrap().is_sink());
        assert!(!dag.has_edge(a, b));
        assert_eq!(dag.edges().len(), 0);
    }

    #[test]
    fn test_sequential_gates_share_wire() {
        let mut dag = CircuitDag::new(1).unwrap();
        let a = dag.add(Gate::h(QubitId(0))).unwrap();
        let b = dag.add(Gate::x(QubitId(0))).unwrap();
        assert!(dag.has_edge(a, b));
        assert_eq!(dag.node(b).unwrap().predecessors(), &[a]);
        assert_eq!(dag.node(a).unwrap().successors(), &[b]);
    }

    #[test]
    fn test_shared_predecessor_yields_single_edge() {
        // Both qubits of the second gate come from the same predecessor;
        // only one edge may be added.
        let mut dag = CircuitDag::new(2).unwrap();
        let a = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();
        let b = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();
        assert_eq!(dag.node(a).unwrap().successors(), &[b]);
        assert_eq!(dag.node(b).unwrap().predecessors(), &[a]);
        assert_eq!(dag.edges(), vec![(a, b)]);
    }

    #[test]
    fn test_bell_dependencies() {
        let dag = bell_dag();
        assert_eq!(dag.num_nodes(), 2);
        assert!(dag.has_edge(NodeId(0), NodeId(1)));
        assert_eq!(dag.sources(), vec![NodeId(0)]);
        assert_eq!(dag.sinks(), vec![NodeId(1)]);
    }

    #[test]
    fn test_last_on_tracks_wire_heads() {
        let mut dag = CircuitDag::new(2).unwrap();
        assert_eq!(dag.last_on(QubitId(0)), None);
        let a = dag.add(Gate::h(QubitId(0))).unwrap();
        let b = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();
        assert_eq!(dag.last_on(QubitId(0)), Some(b));
        assert_eq!(dag.last_on(QubitId(1)), Some(b));
        dag.remove(b).unwrap();
        assert_eq!(dag.last_on(QubitId(0)), Some(a));
        assert_eq!(dag.last_on(QubitId(1)), None);
    }

    #[test]
    fn test_remove_unknown_node() {
        let mut dag = CircuitDag::new(1).unwrap();
        assert_eq!(
            dag.remove(NodeId(7)).unwrap_err(),
            IrError::NodeNotFound(NodeId(7))
        );
    }

    #[test]
    fn test_remove_reconnects_chain() {
        let mut dag = CircuitDag::new(1).unwrap();
        let a = dag.add(Gate::h(QubitId(0))).unwrap();
        let b = dag.add(Gate::t(QubitId(0))).unwrap();
        let c = dag.add(Gate::x(QubitId(0))).unwrap();

        let removed = dag.remove(b).unwrap();
        assert_eq!(removed, Gate::t(QubitId(0)));
        assert!(dag.has_edge(a, c));
        assert_eq!(dag.node(c).unwrap().predecessors(), &[a]);
        assert_eq!(dag.last_on(QubitId(0)), Some(c));
    }

    #[test]
    fn test_remove_avoids_duplicate_bridge_edges() {
        // a touches both wires of b; removing b must not double the a -> c
        // edge even though a and c share two wires through b.
        let mut dag = CircuitDag::new(2).unwrap();
        let a = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();
        let b = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();
        let c = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();

        dag.remove(b).unwrap();
        assert_eq!(dag.node(a).unwrap().successors(), &[c]);
        assert_eq!(dag.node(c).unwrap().predecessors(), &[a]);
    }

    #[test]
    fn test_remove_repairs_last_to_latest_predecessor() {
        // c has two predecessors touching qubit 0 (a through the q1 wire,
        // b through the q0 wire); the repair must pick the most recent one.
        let mut dag = CircuitDag::new(2).unwrap();
        let a = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();
        let b = dag.add(Gate::h(QubitId(0))).unwrap();
        let c = dag.add(Gate::cnot(QubitId(0), QubitId(1)).unwrap()).unwrap();

        // Predecessors of c are both a (wire q1) and b (wire q0).
        let mut preds = dag.node(c).unwrap().predecessors().to_vec();
        preds.sort_unstable();
        assert_eq!(preds, vec![a, b]);

        dag.remove(c).unwrap();
        assert_eq!(dag.last_on(QubitId(0)), Some(b));
        assert_eq!(dag.last_on(QubitId(1)), Some(a));
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut dag = CircuitDag::new(1).unwrap();
        let a = dag.add(Gate::h(QubitId(0))).unwrap();
        dag.remove(a).unwrap();
        let b = dag.add(Gate::x(QubitId(0))).unwrap();
        assert_ne!(a, b);
        assert!(!dag.has_node(a));
    }

    #[test]
    fn test_wire_path_invariant_survives_removals() {
        // After arbitrary interleaved removals, any two present nodes that
        // share a qubit must still be connected by a directed path.
        let mut circuit = Circuit::new(3).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        circuit.t(QubitId(1)).unwrap();
        circuit.cnot(QubitId(1), QubitId(2)).unwrap();
        circuit.x(QubitId(2)).unwrap();
        circuit.cnot(QubitId(0), QubitId(2)).unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit);

        dag.remove(NodeId(2)).unwrap();
        dag.remove(NodeId(4)).unwrap();

        let ids = dag.node_ids();
        for (i, &u) in ids.iter().enumerate() {
            for &v in &ids[i + 1..] {
                let gu = dag.node(u).unwrap().gate().clone();
                let gv = dag.node(v).unwrap().gate().clone();
                let share = gu.qubits().iter().any(|q| gv.touches(*q));
                if share {
                    assert!(has_path(&dag, u, v), "no path {u} -> {v}");
                }
            }
        }
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(2)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        circuit.cnot(QubitId(1), QubitId(2)).unwrap();
        let dag = CircuitDag::from_circuit(&circuit);

        let order = dag.topological_order().unwrap();
        assert_eq!(order.len(), dag.num_nodes());
        let position: FxHashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        for (from, to) in dag.edges() {
            assert!(position[&from] < position[&to]);
        }
    }

    #[test]
    fn test_layers_partition_and_depth() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        circuit.z(QubitId(0)).unwrap();
        let dag = CircuitDag::from_circuit(&circuit);

        let layers = dag.layers().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], vec![NodeId(0), NodeId(1)]);
        assert_eq!(layers[1], vec![NodeId(2)]);
        assert_eq!(layers[2], vec![NodeId(3)]);
        assert_eq!(dag.depth().unwrap(), layers.len());

        let total: usize = layers.iter().map(Vec::len).sum();
        assert_eq!(total, dag.num_nodes());
    }

    #[test]
    fn test_round_trip_preserves_wire_order() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.rz(PI / 4.0, QubitId(1)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        circuit.x(QubitId(2)).unwrap();
        circuit.cnot(QubitId(1), QubitId(2)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let recovered = CircuitDag::from_circuit(&circuit).to_circuit().unwrap();
        assert_eq!(recovered.num_qubits(), circuit.num_qubits());
        assert_eq!(recovered.len(), circuit.len());

        for q in 0..3 {
            let qubit = QubitId(q);
            let original: Vec<&Gate> =
                circuit.iter().filter(|g| g.touches(qubit)).collect();
            let round_tripped: Vec<&Gate> =
                recovered.iter().filter(|g| g.touches(qubit)).collect();
            assert_eq!(original, round_tripped, "wire q{q} reordered");
        }
    }

    #[test]
    fn test_gate_mut_rewrites_angle() {
        let mut dag = CircuitDag::new(1).unwrap();
        let id = dag.add(Gate::rz(0.25, QubitId(0))).unwrap();
        if let Some(gate) = dag.gate_mut(id) {
            *gate = Gate::rz(0.5, QubitId(0));
        }
        assert_eq!(dag.node(id).unwrap().gate().angle(), Some(0.5));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut dag = bell_dag();
        dag.clear();
        assert!(dag.is_empty());
        assert_eq!(dag.last_on(QubitId(0)), None);
        let id = dag.add(Gate::h(QubitId(0))).unwrap();
        assert_eq!(id, NodeId(0));
    }
}
