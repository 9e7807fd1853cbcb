//! Level completion detection
//!
//! A level is solved when the bond count equals the target and the bonded
//! graph is one component spanning every atom. Detection is a two-state
//! machine: `Pending -> Complete` is the only transition, so completion is
//! reported at most once per level instance.

use serde::{Deserialize, Serialize};

use super::bonds::BondGraph;
use super::state::{Atom, World};

/// Completion state of one level instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    #[default]
    Pending,
    Complete,
}

/// Whether `atoms` form a single molecule with exactly `target_bonds` bonds.
///
/// An empty atom list is never solved, whatever the target.
pub fn is_solved(atoms: &[Atom], bonds: &BondGraph, target_bonds: usize) -> bool {
    if bonds.len() != target_bonds {
        return false;
    }
    let Some(first) = atoms.first() else {
        return false;
    };
    bonds.reachable_from(first.id).len() == atoms.len()
}

/// Polled once per frame after the step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionDetector {
    state: Completion,
}

impl CompletionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> Completion {
        self.state
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == Completion::Complete
    }

    /// Check the world; returns true only on the frame the level is first solved
    pub fn observe(&mut self, world: &World, target_bonds: usize) -> bool {
        if self.state == Completion::Complete {
            return false;
        }
        if !is_solved(&world.atoms, &world.bonds, target_bonds) {
            return false;
        }
        self.state = Completion::Complete;
        log::info!(
            "Molecule complete: {} atoms, {} bonds after {} frames",
            world.atoms.len(),
            world.bonds.len(),
            world.frame
        );
        true
    }
}
