//! SABRE-style heuristic routing.
//!
//! Reference: Li, Ding, and Xie, "Tackling the Qubit Mapping Problem for
//! NISQ-Era Quantum Devices", ASPLOS 2019.

use alsvid_ir::{Circuit, CircuitDag, Gate, NodeId, QubitId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument};

use crate::error::{CompileError, CompileResult};
use crate::routing::{identity_mapping, validate_route_inputs, Router, RoutingResult};
use crate::topology::Topology;

/// Heuristic SWAP-inserting router.
///
/// The router walks the circuit DAG front layer, emitting every gate whose
/// physical operands are adjacent. When the front is fully blocked it
/// scores candidate SWAPs on edges touching the blocked gates' physical
/// qubits and applies the one that most reduces the summed distances of
/// the front layer plus a bounded lookahead set.
///
/// Deterministic: candidates are scored in lexicographic edge order and
/// the first best wins.
///
/// ```rust
/// use alsvid_compile::{Router, SabreRouter, Topology};
/// use alsvid_ir::{Circuit, QubitId};
///
/// let mut circuit = Circuit::new(4).unwrap();
/// circuit.cnot(QubitId(0), QubitId(3)).unwrap();
/// let topology = Topology::linear(4).unwrap();
///
/// let result = SabreRouter::new().route(&circuit, &topology).unwrap();
/// assert!(result.swaps_inserted > 0);
/// ```
pub struct SabreRouter {
    lookahead: usize,
    extended_set_weight: f64,
    decay: f64,
}

impl SabreRouter {
    /// Create a router with the default parameters.
    pub fn new() -> Self {
        Self {
            lookahead: 20,
            extended_set_weight: 0.5,
            decay: 0.5,
        }
    }

    /// Bound the size of the lookahead set.
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Weight of the lookahead term in the SWAP score.
    #[must_use]
    pub fn with_extended_set_weight(mut self, weight: f64) -> Self {
        self.extended_set_weight = weight;
        self
    }

    /// Decay factor applied uniformly to lookahead contributions.
    #[must_use]
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Pick the SWAP whose simulated application minimizes the heuristic
    /// score, or `None` when no candidate strictly beats the current
    /// mapping.
    fn select_swap(
        &self,
        dag: &CircuitDag,
        topology: &Topology,
        mapping: &[u32],
        reverse: &[Option<u32>],
        front: &[NodeId],
    ) -> CompileResult<Option<(u32, u32)>> {
        // Logical operand pairs of the blocked front gates, and the
        // physical qubits they currently occupy.
        let mut front_pairs: Vec<(usize, usize)> = Vec::new();
        let mut active: FxHashSet<u32> = FxHashSet::default();
        for &id in front {
            let gate = dag.node(id)?.gate();
            if let [q0, q1] = gate.qubits() {
                front_pairs.push((q0.index(), q1.index()));
                active.insert(mapping[q0.index()]);
                active.insert(mapping[q1.index()]);
            }
        }

        // Lookahead: the first successors of the front, bounded.
        let mut ext_pairs: Vec<(usize, usize)> = Vec::new();
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        'collect: for &id in front {
            for &succ in dag.node(id)?.successors() {
                if seen.contains(&succ) {
                    continue;
                }
                if seen.len() >= self.lookahead {
                    break 'collect;
                }
                seen.insert(succ);
                let gate = dag.node(succ)?.gate();
                if let [q0, q1] = gate.qubits() {
                    ext_pairs.push((q0.index(), q1.index()));
                }
            }
        }

        let mut candidates: Vec<(u32, u32)> = topology
            .edges()
            .iter()
            .copied()
            .filter(|&(a, b)| active.contains(&a) || active.contains(&b))
            .collect();
        candidates.sort_unstable();

        let ext_weight = self.decay * self.extended_set_weight;
        let current = heuristic_score(topology, mapping, &front_pairs, &ext_pairs, ext_weight);

        let mut best: Option<(u32, u32)> = None;
        let mut best_score = f64::INFINITY;
        for &(a, b) in &candidates {
            let trial = simulate_swap(mapping, reverse, a, b);
            let score = heuristic_score(topology, &trial, &front_pairs, &ext_pairs, ext_weight);
            if score < best_score {
                best_score = score;
                best = Some((a, b));
            }
        }

        if best_score < current {
            Ok(best)
        } else {
            Ok(None)
        }
    }
}

impl Default for SabreRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for SabreRouter {
    fn name(&self) -> &str {
        "SabreRouter"
    }

    #[instrument(skip(self, circuit, topology))]
    fn route(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<RoutingResult> {
        validate_route_inputs(circuit, topology)?;

        if circuit.is_empty() {
            let mapping = identity_mapping(circuit.num_qubits());
            return Ok(RoutingResult {
                routed_circuit: Circuit::new(topology.num_qubits())?,
                initial_mapping: mapping.clone(),
                final_mapping: mapping,
                swaps_inserted: 0,
                original_depth: 0,
                final_depth: 0,
                original_gate_count: 0,
                final_gate_count: 0,
            });
        }

        // Logical -> physical starts as the identity; the reverse map
        // tracks which logical qubit occupies each physical site.
        let mut mapping = identity_mapping(circuit.num_qubits());
        let mut reverse: Vec<Option<u32>> = vec![None; topology.num_qubits() as usize];
        for (logical, &physical) in mapping.iter().enumerate() {
            reverse[physical as usize] = Some(logical as u32);
        }

        let dag = CircuitDag::from_circuit(circuit);
        let mut in_degree: FxHashMap<NodeId, usize> = FxHashMap::default();
        for id in dag.node_ids() {
            in_degree.insert(id, dag.node(id)?.in_degree());
        }

        let mut routed = Circuit::new(topology.num_qubits())?;
        let mut front = dag.sources();
        let mut swaps = 0usize;

        while !front.is_empty() {
            let mut executed: Vec<NodeId> = Vec::new();
            let mut blocked: Vec<NodeId> = Vec::new();

            for &id in &front {
                let gate = dag.node(id)?.gate();
                match gate.qubits() {
                    [q] => {
                        let p = mapping[q.index()];
                        routed.push(Gate::new(*gate.kind(), vec![QubitId(p)])?)?;
                        executed.push(id);
                    }
                    [q0, q1] => {
                        let a = mapping[q0.index()];
                        let b = mapping[q1.index()];
                        if topology.connected(a, b) {
                            routed
                                .push(Gate::new(*gate.kind(), vec![QubitId(a), QubitId(b)])?)?;
                            executed.push(id);
                        } else {
                            blocked.push(id);
                        }
                    }
                    _ => {}
                }
            }

            if !executed.is_empty() {
                for &id in &executed {
                    for &succ in dag.node(id)?.successors() {
                        if let Some(degree) = in_degree.get_mut(&succ) {
                            *degree -= 1;
                            if *degree == 0 {
                                blocked.push(succ);
                            }
                        }
                    }
                }
                front = blocked;
                continue;
            }

            // Fully blocked: insert the best SWAP, or walk the shortest
            // path of the first blocked gate when the heuristic stalls.
            let choice = self.select_swap(&dag, topology, &mapping, &reverse, &front)?;
            let (a, b) = match choice {
                Some(edge) => edge,
                None => {
                    let gate = dag.node(front[0])?.gate();
                    let p0 = mapping[gate.qubits()[0].index()];
                    let p1 = mapping[gate.qubits()[1].index()];
                    let path = topology.shortest_path(p0, p1).ok_or(
                        CompileError::Disconnected { from: p0, to: p1 },
                    )?;
                    match path[..] {
                        [first, second, ..] => (first, second),
                        _ => return Err(CompileError::Disconnected { from: p0, to: p1 }),
                    }
                }
            };

            routed.push(Gate::swap(QubitId(a), QubitId(b))?)?;
            apply_swap(&mut mapping, &mut reverse, a, b);
            swaps += 1;
            debug!(a, b, "inserted swap");
        }

        Ok(RoutingResult {
            final_depth: routed.depth(),
            final_gate_count: routed.len(),
            routed_circuit: routed,
            initial_mapping: identity_mapping(circuit.num_qubits()),
            final_mapping: mapping,
            swaps_inserted: swaps,
            original_depth: circuit.depth(),
            original_gate_count: circuit.len(),
        })
    }
}

/// Summed front-layer distances plus weighted lookahead distances under a
/// mapping. Lower is better.
fn heuristic_score(
    topology: &Topology,
    mapping: &[u32],
    front_pairs: &[(usize, usize)],
    ext_pairs: &[(usize, usize)],
    ext_weight: f64,
) -> f64 {
    let mut score = 0.0;
    for &(l0, l1) in front_pairs {
        score += topology.distance(mapping[l0], mapping[l1]) as f64;
    }
    for &(l0, l1) in ext_pairs {
        score += ext_weight * topology.distance(mapping[l0], mapping[l1]) as f64;
    }
    score
}

/// The mapping that would result from exchanging the logical occupants of
/// physical qubits `a` and `b`.
fn simulate_swap(mapping: &[u32], reverse: &[Option<u32>], a: u32, b: u32) -> Vec<u32> {
    let mut result = mapping.to_vec();
    if let Some(l) = reverse[a as usize] {
        result[l as usize] = b;
    }
    if let Some(l) = reverse[b as usize] {
        result[l as usize] = a;
    }
    result
}

/// Atomically exchange the logical occupants of physical qubits `a` and `b`.
fn apply_swap(mapping: &mut [u32], reverse: &mut [Option<u32>], a: u32, b: u32) {
    let la = reverse[a as usize];
    let lb = reverse[b as usize];
    if let Some(l) = la {
        mapping[l as usize] = b;
    }
    if let Some(l) = lb {
        mapping[l as usize] = a;
    }
    reverse[a as usize] = lb;
    reverse[b as usize] = la;
}
