//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed increment per frame
//! - Seeded RNG only (spawn layout)
//! - Stable iteration order (render order, pairs as `(i, j)` with `i < j`)
//! - No rendering or platform dependencies

pub mod bonds;
pub mod completion;
pub mod contact;
pub mod state;
pub mod tick;

pub use bonds::{AtomId, Bond, BondGraph, LinkOutcome};
pub use completion::{Completion, CompletionDetector, is_solved};
pub use contact::PairGeometry;
pub use state::{Atom, PointerState, World};
pub use tick::{TickReport, tick};
