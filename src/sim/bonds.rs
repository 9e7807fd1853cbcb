//! Bond storage
//!
//! Bonds live in a single edge set keyed by the unordered atom-id pair, so a
//! bond is symmetric by construction: there is no per-atom list that could
//! disagree with its partner. An atom's bond count is the number of edges
//! touching it, cached in an adjacency index that only `try_link` and
//! `clear` write to.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;

/// Stable identifier of an atom within one level instance
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AtomId(pub u32);

/// An unordered atom pair, stored as (low, high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bond {
    lo: AtomId,
    hi: AtomId,
}

impl Bond {
    /// Normalize a pair; `None` for a self-pair
    pub fn new(a: AtomId, b: AtomId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn ends(&self) -> (AtomId, AtomId) {
        (self.lo, self.hi)
    }
}

/// Result of a bond attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Formed,
    AlreadyBonded,
    SelfPair,
    /// At least one side has no free valence
    AtCapacity,
}

/// The bonded graph of a level instance
///
/// Serialized as its edge list; the adjacency index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Bond>", from = "Vec<Bond>")]
pub struct BondGraph {
    edges: BTreeSet<Bond>,
    adjacency: BTreeMap<AtomId, BTreeSet<AtomId>>,
}

impl From<Vec<Bond>> for BondGraph {
    fn from(bonds: Vec<Bond>) -> Self {
        let mut graph = Self::default();
        for bond in bonds {
            graph.insert(bond);
        }
        graph
    }
}

impl From<BondGraph> for Vec<Bond> {
    fn from(graph: BondGraph) -> Self {
        graph.edges.into_iter().collect()
    }
}

impl BondGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bonds in the system
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, a: AtomId, b: AtomId) -> bool {
        Bond::new(a, b).is_some_and(|bond| self.edges.contains(&bond))
    }

    /// Number of bonds touching `id`
    pub fn degree(&self, id: AtomId) -> usize {
        self.adjacency.get(&id).map_or(0, BTreeSet::len)
    }

    /// Whether an atom of `kind` can take one more bond
    #[inline]
    pub fn has_capacity(&self, id: AtomId, kind: ElementKind) -> bool {
        self.degree(id) < kind.max_bonds()
    }

    /// Atoms bonded to `id`, in ascending id order
    pub fn neighbors(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bond> {
        self.edges.iter()
    }

    /// Form a bond if both sides have free valence.
    ///
    /// This is the only way an edge enters the graph, so capacity holds for
    /// every atom at all times.
    pub fn try_link(
        &mut self,
        a: AtomId,
        a_kind: ElementKind,
        b: AtomId,
        b_kind: ElementKind,
    ) -> LinkOutcome {
        let Some(bond) = Bond::new(a, b) else {
            return LinkOutcome::SelfPair;
        };
        if self.edges.contains(&bond) {
            return LinkOutcome::AlreadyBonded;
        }
        if !self.has_capacity(a, a_kind) || !self.has_capacity(b, b_kind) {
            return LinkOutcome::AtCapacity;
        }
        self.insert(bond);
        LinkOutcome::Formed
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.adjacency.clear();
    }

    fn insert(&mut self, bond: Bond) {
        if self.edges.insert(bond) {
            let (lo, hi) = bond.ends();
            self.adjacency.entry(lo).or_default().insert(hi);
            self.adjacency.entry(hi).or_default().insert(lo);
        }
    }

    /// Breadth-first walk over bond edges from `start`
    pub fn reachable_from(&self, start: AtomId) -> BTreeSet<AtomId> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }
}
