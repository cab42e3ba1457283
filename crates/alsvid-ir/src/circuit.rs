//! Linear circuit representation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::QubitId;

/// A quantum circuit: a qubit register and a gate sequence in program order.
///
/// The builder methods mirror the [`Gate`] factories and can be chained:
///
/// ```rust
/// use alsvid_ir::{Circuit, QubitId};
///
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.h(QubitId(0)).unwrap();
/// circuit.cnot(QubitId(0), QubitId(1)).unwrap();
///
/// assert_eq!(circuit.len(), 2);
/// assert_eq!(circuit.depth(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: u32,
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> IrResult<Self> {
        if num_qubits == 0 {
            return Err(IrError::EmptyRegister);
        }
        Ok(Self {
            num_qubits,
            gates: vec![],
        })
    }

    /// Append a gate, validating that its operands lie in the register.
    pub fn push(&mut self, gate: Gate) -> IrResult<()> {
        for &q in gate.qubits() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    gate: gate.name(),
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::h(qubit))?;
        Ok(self)
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::x(qubit))?;
        Ok(self)
    }

    /// Apply a Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::y(qubit))?;
        Ok(self)
    }

    /// Apply a Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::z(qubit))?;
        Ok(self)
    }

    /// Apply an S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::s(qubit))?;
        Ok(self)
    }

    /// Apply an S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::sdg(qubit))?;
        Ok(self)
    }

    /// Apply a T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::t(qubit))?;
        Ok(self)
    }

    /// Apply a T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::tdg(qubit))?;
        Ok(self)
    }

    /// Apply an Rx rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::rx(theta, qubit))?;
        Ok(self)
    }

    /// Apply an Ry rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::ry(theta, qubit))?;
        Ok(self)
    }

    /// Apply an Rz rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::rz(theta, qubit))?;
        Ok(self)
    }

    /// Apply a CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::cnot(control, target)?)?;
        Ok(self)
    }

    /// Apply a CZ gate.
    pub fn cz(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::cz(a, b)?)?;
        Ok(self)
    }

    /// Apply a SWAP gate.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::swap(a, b)?)?;
        Ok(self)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The register size.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The number of gates.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Get the gate at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Gate> {
        self.gates.get(index)
    }

    /// Iterate over the gates in program order.
    pub fn iter(&self) -> std::slice::Iter<'_, Gate> {
        self.gates.iter()
    }

    /// Circuit depth: the length of the longest per-qubit chain of gates.
    pub fn depth(&self) -> usize {
        let mut per_qubit = vec![0usize; self.num_qubits as usize];
        let mut max_depth = 0;
        for gate in &self.gates {
            let level = 1 + gate
                .qubits()
                .iter()
                .map(|q| per_qubit[q.index()])
                .max()
                .unwrap_or(0);
            for q in gate.qubits() {
                per_qubit[q.index()] = level;
            }
            max_depth = max_depth.max(level);
        }
        max_depth
    }

    /// Count gates by kind name.
    pub fn gate_counts(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for gate in &self.gates {
            *counts.entry(gate.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Lower this circuit into its dependency DAG.
    pub fn into_dag(self) -> CircuitDag {
        CircuitDag::from_circuit(&self)
    }

    /// Rebuild a circuit from a DAG, emitting gates in topological order.
    pub fn from_dag(dag: &CircuitDag) -> IrResult<Self> {
        dag.to_circuit()
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
