//! Physical qubit connectivity.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::OnceLock;

use crate::error::{CompileError, CompileResult};

/// All-pairs shortest-path data, computed by BFS from each vertex.
///
/// `dist[from][to]` is the hop count (`Topology::INFINITE` when
/// unreachable); `pred[from][to]` is the vertex preceding `to` on the
/// shortest path from `from`.
#[derive(Debug, Clone)]
struct DistanceCache {
    dist: Vec<Vec<u32>>,
    pred: Vec<Vec<u32>>,
}

/// Undirected connectivity graph of a quantum device.
///
/// Vertices are physical qubits; an edge means the pair can execute a
/// two-qubit gate directly. Distances count hops, not metric weight.
///
/// The all-pairs distance and predecessor matrices are computed on first
/// query and dropped whenever the edge set changes.
///
/// ```rust
/// use alsvid_compile::Topology;
///
/// let t = Topology::linear(5).unwrap();
/// assert!(t.connected(0, 1));
/// assert!(!t.connected(0, 2));
/// assert_eq!(t.distance(0, 4), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    num_qubits: u32,
    /// Stored as `(min, max)` pairs in insertion order.
    edges: Vec<(u32, u32)>,
    /// Adjacency lists, rebuilt from `edges` after deserialization.
    #[serde(skip)]
    adjacency: Vec<Vec<u32>>,
    #[serde(skip)]
    cache: OnceLock<DistanceCache>,
}

impl Topology {
    /// Sentinel distance for unreachable pairs.
    pub const INFINITE: u32 = u32::MAX;

    /// Create a topology with `num_qubits` qubits and no edges.
    pub fn new(num_qubits: u32) -> CompileResult<Self> {
        if num_qubits == 0 {
            return Err(CompileError::InvalidTopology(
                "topology must have at least one qubit".into(),
            ));
        }
        Ok(Self {
            num_qubits,
            edges: vec![],
            adjacency: vec![vec![]; num_qubits as usize],
            cache: OnceLock::new(),
        })
    }

    /// Rebuild the adjacency lists from the edge list. Must be called after
    /// deserialization, which skips the derived fields.
    pub fn rebuild_caches(&mut self) {
        self.adjacency = vec![vec![]; self.num_qubits as usize];
        for &(p, q) in &self.edges {
            self.adjacency[p as usize].push(q);
            self.adjacency[q as usize].push(p);
        }
        self.cache = OnceLock::new();
    }

    /// Add an undirected edge. Duplicate adds (in either order) are
    /// ignored; the distance cache is invalidated when the edge is new.
    pub fn add_edge(&mut self, p: u32, q: u32) -> CompileResult<()> {
        self.validate_qubit(p)?;
        self.validate_qubit(q)?;
        if p == q {
            return Err(CompileError::SelfLoop(p));
        }
        if self.connected(p, q) {
            return Ok(());
        }
        self.edges.push((p.min(q), p.max(q)));
        self.adjacency[p as usize].push(q);
        self.adjacency[q as usize].push(p);
        self.cache.take();
        Ok(())
    }

    /// The number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// All edges as `(min, max)` pairs.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Check if two qubits are directly connected. A qubit is considered
    /// connected to itself.
    pub fn connected(&self, p: u32, q: u32) -> bool {
        if p >= self.num_qubits || q >= self.num_qubits {
            return false;
        }
        if p == q {
            return true;
        }
        self.adjacency[p as usize].contains(&q)
    }

    /// The directly connected neighbors of a qubit. Out-of-range indices
    /// have no neighbors.
    pub fn neighbors(&self, p: u32) -> &[u32] {
        self.adjacency
            .get(p as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest-path hop count between two qubits, or
    /// [`Topology::INFINITE`] when unreachable.
    pub fn distance(&self, p: u32, q: u32) -> u32 {
        if p >= self.num_qubits || q >= self.num_qubits {
            return Self::INFINITE;
        }
        if p == q {
            return 0;
        }
        self.distances().dist[p as usize][q as usize]
    }

    /// The shortest path from `from` to `to`, endpoints inclusive.
    /// Returns `None` when the qubits are unreachable from each other.
    /// Deterministic given the adjacency-list insertion order.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        if from >= self.num_qubits || to >= self.num_qubits {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }
        let cache = self.distances();
        if cache.dist[from as usize][to as usize] == Self::INFINITE {
            return None;
        }

        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let pred = cache.pred[from as usize][current as usize];
            if pred == Self::INFINITE {
                return None;
            }
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Some(path)
    }

    /// Check if every qubit can reach every other qubit.
    pub fn is_connected(&self) -> bool {
        if self.num_qubits <= 1 {
            return true;
        }
        let mut visited = vec![false; self.num_qubits as usize];
        let mut queue = VecDeque::from([0u32]);
        visited[0] = true;
        let mut count = 1u32;
        while let Some(current) = queue.pop_front() {
            for &next in &self.adjacency[current as usize] {
                if !visited[next as usize] {
                    visited[next as usize] = true;
                    count += 1;
                    queue.push_back(next);
                }
            }
        }
        count == self.num_qubits
    }

    // =========================================================================
    // Factories
    // =========================================================================

    /// Chain topology `0-1-...-n-1`.
    pub fn linear(n: u32) -> CompileResult<Self> {
        let mut t = Self::new(n)?;
        for i in 0..n.saturating_sub(1) {
            t.add_edge(i, i + 1)?;
        }
        Ok(t)
    }

    /// Ring topology: a chain with the ends joined. Requires `n >= 2`.
    pub fn ring(n: u32) -> CompileResult<Self> {
        if n < 2 {
            return Err(CompileError::InvalidTopology(
                "ring topology requires at least 2 qubits".into(),
            ));
        }
        let mut t = Self::linear(n)?;
        t.add_edge(0, n - 1)?;
        Ok(t)
    }

    /// Rectangular grid with nearest-neighbor connectivity, numbered
    /// row-major: qubit `(r, c)` is `r * cols + c`.
    pub fn grid(rows: u32, cols: u32) -> CompileResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(CompileError::InvalidTopology(
                "grid dimensions must be positive".into(),
            ));
        }
        let mut t = Self::new(rows * cols)?;
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    t.add_edge(q, q + 1)?;
                }
                if r + 1 < rows {
                    t.add_edge(q, q + cols)?;
                }
            }
        }
        Ok(t)
    }

    /// Heavy-hex lattice parameterized by distance.
    ///
    /// For `d == 1` this is the 7-qubit unit cell: a 6-cycle `0..5` with a
    /// hub qubit 6 connected to every cycle vertex. For `d >= 2` it builds
    /// a `(2d+1) x (2d+1)` lattice with full horizontal connectivity and
    /// vertical edges where the column and row parities agree. That is a
    /// simplified rectangular approximation of the IBM heavy-hex layout,
    /// not the exact lattice.
    pub fn heavy_hex(d: u32) -> CompileResult<Self> {
        if d == 0 {
            return Err(CompileError::InvalidTopology(
                "heavy-hex distance must be positive".into(),
            ));
        }
        if d == 1 {
            let mut t = Self::new(7)?;
            for i in 0..6 {
                t.add_edge(i, (i + 1) % 6)?;
                t.add_edge(6, i)?;
            }
            return Ok(t);
        }

        let rows = 2 * d + 1;
        let cols = 2 * d + 1;
        let mut t = Self::new(rows * cols)?;
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    t.add_edge(q, q + 1)?;
                }
                if r + 1 < rows && c % 2 == r % 2 {
                    t.add_edge(q, q + cols)?;
                }
            }
        }
        Ok(t)
    }

    /// Build a topology from a raw edge list over `n` qubits.
    pub fn from_edges(n: u32, edges: &[(u32, u32)]) -> CompileResult<Self> {
        let mut t = Self::new(n)?;
        for &(p, q) in edges {
            t.add_edge(p, q)?;
        }
        Ok(t)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn validate_qubit(&self, q: u32) -> CompileResult<()> {
        if q >= self.num_qubits {
            return Err(CompileError::QubitOutOfBounds {
                qubit: q,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn distances(&self) -> &DistanceCache {
        self.cache.get_or_init(|| {
            let n = self.num_qubits as usize;
            let mut dist = vec![vec![Self::INFINITE; n]; n];
            let mut pred = vec![vec![Self::INFINITE; n]; n];

            for src in 0..n {
                dist[src][src] = 0;
                let mut queue = VecDeque::from([src as u32]);
                while let Some(current) = queue.pop_front() {
                    let cur = current as usize;
                    for &next in &self.adjacency[cur] {
                        let nxt = next as usize;
                        if dist[src][nxt] == Self::INFINITE {
                            dist[src][nxt] = dist[src][cur] + 1;
                            pred[src][nxt] = current;
                            queue.push_back(next);
                        }
                    }
                }
            }

            DistanceCache { dist, pred }
        })
    }
}
