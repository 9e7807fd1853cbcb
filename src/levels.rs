//! Level feed
//!
//! An ordered, read-only list of puzzles. The simulation only reads the atom
//! list and the target bond count; the rest is display metadata.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::ElementKind;

/// Errors loading a custom level pack
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level pack: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level pack contains no levels")]
    Empty,
}

/// One puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub molecule_name: String,
    pub formula: String,
    #[serde(default)]
    pub description: String,
    /// Atom kinds to spawn, in spawn order
    pub atoms: Vec<ElementKind>,
    /// Win condition: total bond count of the single connected molecule
    pub target_bonds: usize,
}

impl Level {
    pub fn new(
        id: u32,
        molecule_name: &str,
        formula: &str,
        description: &str,
        atoms: &[ElementKind],
        target_bonds: usize,
    ) -> Self {
        Self {
            id,
            name: format!("Level {}", id),
            molecule_name: molecule_name.to_string(),
            formula: formula.to_string(),
            description: description.to_string(),
            atoms: atoms.to_vec(),
            target_bonds,
        }
    }

    /// Upper bound on bonds the atom list could ever hold
    pub fn bond_capacity(&self) -> usize {
        self.atoms.iter().map(|k| k.max_bonds()).sum::<usize>() / 2
    }

    /// Whether the target can be met by a single connected molecule.
    ///
    /// Unreachable levels are still playable; they simply never complete.
    pub fn is_reachable(&self) -> bool {
        if self.atoms.is_empty() {
            return false;
        }
        let spanning = self.atoms.len() - 1;
        self.target_bonds >= spanning && self.target_bonds <= self.bond_capacity()
    }
}

/// The ordered level list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<Level>,
}

impl LevelPack {
    /// The built-in course
    pub fn builtin() -> Self {
        use ElementKind::*;

        Self {
            levels: vec![
                Level::new(
                    1,
                    "Molecular Hydrogen",
                    "H₂",
                    "The simplest molecule. Bond two Hydrogen atoms.",
                    &[Hydrogen, Hydrogen],
                    1,
                ),
                Level::new(
                    2,
                    "Water",
                    "H₂O",
                    "Life's essential solvent. One Oxygen, two Hydrogens.",
                    &[Hydrogen, Oxygen, Hydrogen],
                    2,
                ),
                Level::new(
                    3,
                    "Methane",
                    "CH₄",
                    "The primary component of natural gas.",
                    &[Carbon, Hydrogen, Hydrogen, Hydrogen, Hydrogen],
                    4,
                ),
                Level::new(
                    4,
                    "Ammonia",
                    "NH₃",
                    "A common nitrogenous waste product.",
                    &[Nitrogen, Hydrogen, Hydrogen, Hydrogen],
                    3,
                ),
                // Counted as connections: O-C-O is two edges
                Level::new(
                    5,
                    "Carbon Dioxide",
                    "CO₂",
                    "Double bonds are tricky! Simulated as single connections here, but topologically similar.",
                    &[Oxygen, Carbon, Oxygen],
                    2,
                ),
            ],
        }
    }

    /// Parse a custom pack from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let pack: LevelPack = serde_json::from_str(json)?;
        if pack.levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for level in &pack.levels {
            if !level.is_reachable() {
                log::warn!(
                    "Level {} ({}) can never complete: target {} bonds, {} atoms",
                    level.id,
                    level.molecule_name,
                    level.target_bonds,
                    level.atoms.len()
                );
            }
        }
        log::info!("Loaded level pack with {} levels", pack.levels.len());
        Ok(pack)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }
}

impl Default for LevelPack {
    fn default() -> Self {
        Self::builtin()
    }
}
