//! `PropertySet` and related types for pass communication.
//!
//! Passes share a [`PropertySet`]: the layout and routing passes use its
//! dedicated fields, and any pass can stash a typed value for later passes
//! or for the caller (the commutation rewriter stores its report there).
//!
//! ```
//! use qopt_compile::{CouplingMap, PropertySet};
//!
//! let props = PropertySet::new().with_coupling_map(CouplingMap::linear(5));
//! let cm = props.coupling_map.as_ref().unwrap();
//! assert!(cm.is_connected(0, 1));
//! assert!(!cm.is_connected(0, 2));
//! ```

use std::any::{Any, TypeId};
use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qopt_ir::QubitId;

/// A bijective mapping between logical qubits and physical qubits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    logical_to_physical: FxHashMap<QubitId, u32>,
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl Layout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical qubit i on physical qubit i.
    pub fn trivial(num_qubits: u32) -> Self {
        let mut layout = Self::new();
        for i in 0..num_qubits {
            layout.add(QubitId(i), i);
        }
        layout
    }

    /// Map `logical` to `physical`, dropping any mapping either side had.
    pub fn add(&mut self, logical: QubitId, physical: u32) {
        if let Some(old_logical) = self.physical_to_logical.insert(physical, logical) {
            if old_logical != logical {
                self.logical_to_physical.remove(&old_logical);
            }
        }
        if let Some(old_physical) = self.logical_to_physical.insert(logical, physical) {
            if old_physical != physical {
                self.physical_to_logical.remove(&old_physical);
            }
        }
    }

    /// Get the physical qubit for a logical qubit.
    pub fn get_physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit for a physical qubit.
    pub fn get_logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Exchange the logical qubits held by two physical qubits.
    ///
    /// Either side may be empty; an empty side simply moves.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.remove(&p1);
        let l2 = self.physical_to_logical.remove(&p2);
        if let Some(l1) = l1 {
            self.logical_to_physical.insert(l1, p2);
            self.physical_to_logical.insert(p2, l1);
        }
        if let Some(l2) = l2 {
            self.logical_to_physical.insert(l2, p1);
            self.physical_to_logical.insert(p1, l2);
        }
    }

    /// Get the number of mapped qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }
}

/// Target device connectivity.
///
/// Undirected edges between physical qubits; two-qubit gates are only
/// allowed across an edge.
#[derive(Debug, Clone)]
pub struct CouplingMap {
    num_qubits: u32,
    edges: Vec<(u32, u32)>,
    adjacency: Vec<Vec<u32>>,
}

impl CouplingMap {
    /// Create a coupling map with no edges.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            edges: vec![],
            adjacency: vec![vec![]; num_qubits as usize],
        }
    }

    /// Build from an edge list; the qubit count is one past the largest
    /// endpoint.
    pub fn from_edges(edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let edges: Vec<_> = edges.into_iter().collect();
        let num_qubits = edges
            .iter()
            .map(|&(a, b)| a.max(b) + 1)
            .max()
            .unwrap_or(0);
        let mut map = Self::new(num_qubits);
        for (a, b) in edges {
            map.add_edge(a, b);
        }
        map
    }

    /// Linear chain `0-1-2-…-(n-1)`.
    pub fn linear(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 1..n {
            map.add_edge(i - 1, i);
        }
        map
    }

    /// Every pair connected.
    pub fn full(n: u32) -> Self {
        let mut map = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                map.add_edge(i, j);
            }
        }
        map
    }

    /// Add an undirected edge. Duplicates and self-loops are ignored; the
    /// map grows to cover both endpoints.
    pub fn add_edge(&mut self, q1: u32, q2: u32) {
        if q1 == q2 || self.is_connected(q1, q2) {
            return;
        }
        let needed = q1.max(q2) + 1;
        if needed > self.num_qubits {
            self.num_qubits = needed;
            self.adjacency.resize(needed as usize, vec![]);
        }
        self.edges.push((q1, q2));
        self.adjacency[q1 as usize].push(q2);
        self.adjacency[q2 as usize].push(q1);
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        self.adjacency
            .get(q1 as usize)
            .is_some_and(|n| n.contains(&q2))
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the coupling edges in insertion order.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Shortest path from `from` to `to`, both ends included.
    ///
    /// Breadth-first; neighbours are explored in edge insertion order so the
    /// result is deterministic.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        let n = self.num_qubits as usize;
        if from as usize >= n || to as usize >= n {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut prev = vec![None; n];
        prev[from as usize] = Some(from);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            for &next in &self.adjacency[current as usize] {
                if prev[next as usize].is_some() {
                    continue;
                }
                prev[next as usize] = Some(current);
                if next == to {
                    let mut path = vec![to];
                    let mut node = to;
                    while node != from {
                        node = prev[node as usize]?;
                        path.push(node);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// Number of edges on the shortest path, if any.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        self.shortest_path(from, to)
            .map(|p| u32::try_from(p.len() - 1).unwrap_or(u32::MAX))
    }
}

/// Properties shared between compilation passes.
///
/// | Field | Set by | Used by |
/// |-------|--------|---------|
/// | `coupling_map` | caller | layout, routing |
/// | `layout` | `TrivialLayout` | `BasicRouting` |
///
/// Anything else goes in the typed store via [`insert`](Self::insert) and
/// [`get`](Self::get); one value per type.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Logical-to-physical qubit mapping.
    pub layout: Option<Layout>,

    /// Target connectivity.
    pub coupling_map: Option<CouplingMap>,

    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coupling map.
    #[must_use]
    pub fn with_coupling_map(mut self, coupling_map: CouplingMap) -> Self {
        self.coupling_map = Some(coupling_map);
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Insert a custom property, replacing any value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
