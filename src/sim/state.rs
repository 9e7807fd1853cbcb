//! Simulation world and core types
//!
//! Everything one level instance mutates lives in `World`: the atoms (in
//! render order, topmost last), the bond graph, and the pointer state written
//! by input handlers and read by the next tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonds::{AtomId, BondGraph};
use crate::consts::*;
use crate::elements::{ElementDef, ElementKind};
use crate::levels::Level;
use crate::{canvas_center, polar_offset};

/// One atom instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub id: AtomId,
    pub kind: ElementKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Pointer-controlled: position follows the pointer exactly
    pub dragging: bool,
}

impl Atom {
    pub fn new(id: AtomId, kind: ElementKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            dragging: false,
        }
    }

    #[inline]
    pub fn def(&self) -> &'static ElementDef {
        self.kind.def()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    /// Whether `point` is within `radius² * tolerance` of the center
    #[inline]
    pub fn hit(&self, point: Vec2, tolerance: f32) -> bool {
        let r = self.radius();
        point.distance_squared(self.pos) < r * r * tolerance
    }
}

/// Pointer state shared between input handlers and the tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// Last pointer position in simulation space
    pub pos: Vec2,
    /// Atom currently held, if any
    pub drag_target: Option<AtomId>,
    /// Atom under the pointer (render feedback only)
    pub hovered: Option<AtomId>,
}

/// Complete world state of one level instance (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Seed the spawn layout was generated from
    pub seed: u64,
    /// Atoms in render order (last is drawn on top)
    pub atoms: Vec<Atom>,
    /// Bonded graph
    pub bonds: BondGraph,
    pub pointer: PointerState,
    /// Simulation clock (phase of the idle float)
    pub time: f32,
    /// Frames stepped since spawn
    pub frame: u64,
    next_id: u32,
}

impl World {
    /// An empty world
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            atoms: Vec::new(),
            bonds: BondGraph::new(),
            pointer: PointerState::default(),
            time: 0.0,
            frame: 0,
            next_id: 1,
        }
    }

    /// Spawn a level's atoms on a jittered circle around the canvas center
    pub fn from_level(level: &Level, seed: u64) -> Self {
        let mut world = Self::new(seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        let center = canvas_center();
        let count = level.atoms.len();

        for (index, &kind) in level.atoms.iter().enumerate() {
            let angle = index as f32 / count as f32 * std::f32::consts::TAU;
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * SPAWN_JITTER,
                (rng.random::<f32>() - 0.5) * SPAWN_JITTER,
            );
            let pos = polar_offset(center, SPAWN_SPREAD, angle) + jitter;
            world.spawn_atom(kind, pos);
        }

        log::info!(
            "Spawned {} atoms for {} (seed {})",
            world.atoms.len(),
            level.molecule_name,
            seed
        );
        world
    }

    /// Allocate a new atom ID
    fn next_atom_id(&mut self) -> AtomId {
        let id = AtomId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an atom on top of the render order
    pub fn spawn_atom(&mut self, kind: ElementKind, pos: Vec2) -> AtomId {
        let id = self.next_atom_id();
        self.atoms.push(Atom::new(id, kind, pos));
        id
    }

    pub fn index_of(&self, id: AtomId) -> Option<usize> {
        self.atoms.iter().position(|a| a.id == id)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.id == id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.iter_mut().find(|a| a.id == id)
    }

    /// Partners of `id`, ascending
    pub fn bonds_of(&self, id: AtomId) -> Vec<AtomId> {
        self.bonds.neighbors(id).collect()
    }

    #[inline]
    pub fn bond_count(&self, id: AtomId) -> usize {
        self.bonds.degree(id)
    }

    /// Move the atom at `index` to the top of the render order
    pub fn bring_to_front(&mut self, index: usize) {
        if index < self.atoms.len() {
            let atom = self.atoms.remove(index);
            self.atoms.push(atom);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.drag_target.is_some()
    }
}
