//! Element property table
//!
//! Static, read-only physical constants per element kind. The simulation
//! treats this as configuration: nothing here is mutated at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element kinds available to levels, serialized by symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ElementKind {
    Hydrogen,
    Oxygen,
    Carbon,
    Nitrogen,
}

#[derive(Debug, Error)]
#[error("unknown element symbol `{0}`")]
pub struct UnknownElement(pub String);

/// Physical and display properties of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementDef {
    pub symbol: &'static str,
    pub name: &'static str,
    /// Render colour as 0xRRGGBB
    pub color: u32,
    /// Collision (and hit-test) radius in simulation units
    pub radius: f32,
    /// Valence capacity: maximum simultaneous bonds
    pub max_bonds: usize,
    /// Force response is divided by this
    pub mass: f32,
}

const HYDROGEN: ElementDef = ElementDef {
    symbol: "H",
    name: "Hydrogen",
    color: 0xFFFFFF,
    radius: 20.0,
    max_bonds: 1,
    mass: 1.0,
};

const OXYGEN: ElementDef = ElementDef {
    symbol: "O",
    name: "Oxygen",
    color: 0xEF4444,
    radius: 30.0,
    max_bonds: 2,
    mass: 16.0,
};

const CARBON: ElementDef = ElementDef {
    symbol: "C",
    name: "Carbon",
    color: 0x171717,
    radius: 32.0,
    max_bonds: 4,
    mass: 12.0,
};

const NITROGEN: ElementDef = ElementDef {
    symbol: "N",
    name: "Nitrogen",
    color: 0x3B82F6,
    radius: 30.0,
    max_bonds: 3,
    mass: 14.0,
};

impl ElementKind {
    /// Every kind, in valence-reference order
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Hydrogen,
        ElementKind::Oxygen,
        ElementKind::Nitrogen,
        ElementKind::Carbon,
    ];

    /// Static definition for this kind
    #[inline]
    pub fn def(self) -> &'static ElementDef {
        match self {
            ElementKind::Hydrogen => &HYDROGEN,
            ElementKind::Oxygen => &OXYGEN,
            ElementKind::Carbon => &CARBON,
            ElementKind::Nitrogen => &NITROGEN,
        }
    }

    #[inline]
    pub fn radius(self) -> f32 {
        self.def().radius
    }

    #[inline]
    pub fn max_bonds(self) -> usize {
        self.def().max_bonds
    }

    #[inline]
    pub fn mass(self) -> f32 {
        self.def().mass
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.trim() {
            "H" => Some(ElementKind::Hydrogen),
            "O" => Some(ElementKind::Oxygen),
            "C" => Some(ElementKind::Carbon),
            "N" => Some(ElementKind::Nitrogen),
            _ => None,
        }
    }

    /// Label colour that stays readable on top of the element colour
    pub fn label_color(self) -> u32 {
        match self {
            ElementKind::Hydrogen => 0x1E293B,
            _ => 0xFFFFFF,
        }
    }
}

impl TryFrom<String> for ElementKind {
    type Error = UnknownElement;

    fn try_from(symbol: String) -> Result<Self, Self::Error> {
        Self::from_symbol(&symbol).ok_or(UnknownElement(symbol))
    }
}

impl From<ElementKind> for &'static str {
    fn from(kind: ElementKind) -> Self {
        kind.def().symbol
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().symbol)
    }
}

/// Format a 0xRRGGBB colour as a CSS hex string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06X}", rgb & 0xFF_FFFF)
}
