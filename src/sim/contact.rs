//! Pairwise contact geometry and response
//!
//! Pure helpers: each takes the geometry of one atom pair (or one atom and
//! the canvas walls) and returns the correction to apply. The tick decides
//! who receives it.

use glam::Vec2;

use super::state::Atom;
use crate::settings::Settings;

/// Geometry of an (a, b) atom pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    /// Unit vector from a toward b
    pub dir: Vec2,
    pub dist: f32,
    /// Sum of radii
    pub min_dist: f32,
}

impl PairGeometry {
    /// `None` for coincident atoms (no direction to push along)
    pub fn between(a: &Atom, b: &Atom) -> Option<Self> {
        let delta = b.pos - a.pos;
        let dist = delta.length();
        if dist == 0.0 {
            return None;
        }
        Some(Self {
            dir: delta / dist,
            dist,
            min_dist: a.radius() + b.radius(),
        })
    }

    #[inline]
    pub fn overlapping(&self) -> bool {
        self.dist < self.min_dist
    }

    /// Close enough to bond, but not so deep that the pair is degenerate
    #[inline]
    pub fn in_snap_range(&self, settings: &Settings) -> bool {
        self.dist < settings.snap_distance && self.dist > self.min_dist * 0.5
    }

    /// Close enough for a refused bond to push back
    #[inline]
    pub fn in_reject_range(&self, settings: &Settings) -> bool {
        self.dist < settings.snap_distance * settings.reject_ratio
    }
}

/// Spring force on `a` (the negation acts on `b`).
///
/// Positive when stretched past the rest length, pulling a toward b.
#[inline]
pub fn spring_force(geom: &PairGeometry, settings: &Settings) -> Vec2 {
    geom.dir * (geom.dist - settings.bond_distance) * settings.bond_strength
}

/// Half the overlap along the pair axis; `a` moves by `-c`, `b` by `+c`
#[inline]
pub fn overlap_correction(geom: &PairGeometry) -> Option<Vec2> {
    if geom.overlapping() {
        Some(geom.dir * (geom.min_dist - geom.dist) * 0.5)
    } else {
        None
    }
}

/// Rejection impulse on `a` (the negation acts on `b`)
#[inline]
pub fn repulsion(geom: &PairGeometry, settings: &Settings) -> Vec2 {
    -geom.dir * settings.repel_force
}

/// Clamp an atom inside the canvas, inverting and damping velocity on the
/// touched axis. Returns true on wall contact.
pub fn bounce_off_walls(atom: &mut Atom, bounds: Vec2, elasticity: f32) -> bool {
    let r = atom.radius();
    let mut hit = false;

    if atom.pos.x < r {
        atom.pos.x = r;
        atom.vel.x *= -elasticity;
        hit = true;
    }
    if atom.pos.x > bounds.x - r {
        atom.pos.x = bounds.x - r;
        atom.vel.x *= -elasticity;
        hit = true;
    }
    if atom.pos.y < r {
        atom.pos.y = r;
        atom.vel.y *= -elasticity;
        hit = true;
    }
    if atom.pos.y > bounds.y - r {
        atom.pos.y = bounds.y - r;
        atom.vel.y *= -elasticity;
        hit = true;
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use crate::sim::bonds::AtomId;

    fn atom(kind: ElementKind, x: f32, y: f32) -> Atom {
        Atom::new(AtomId(0), kind, Vec2::new(x, y))
    }

    #[test]
    fn coincident_pair_has_no_geometry() {
        let a = atom(ElementKind::Hydrogen, 10.0, 10.0);
        assert!(PairGeometry::between(&a, &a.clone()).is_none());
    }

    #[test]
    fn snap_and_reject_ranges() {
        let settings = Settings::default();
        let a = atom(ElementKind::Hydrogen, 0.0, 0.0);

        // H+H min_dist 40: snap window is (20, 90)
        let geom = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 60.0, 0.0)).unwrap();
        assert!(geom.in_snap_range(&settings));
        assert!(geom.in_reject_range(&settings));

        let geom = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 80.0, 0.0)).unwrap();
        assert!(geom.in_snap_range(&settings));
        assert!(!geom.in_reject_range(&settings));

        let geom = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 10.0, 0.0)).unwrap();
        assert!(!geom.in_snap_range(&settings));

        let geom = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 95.0, 0.0)).unwrap();
        assert!(!geom.in_snap_range(&settings));
    }

    #[test]
    fn spring_pulls_when_stretched_and_pushes_when_compressed() {
        let settings = Settings::default();
        let a = atom(ElementKind::Hydrogen, 0.0, 0.0);

        let stretched = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 100.0, 0.0)).unwrap();
        let f = spring_force(&stretched, &settings);
        assert!((f.x - 1.5).abs() < 1e-5);

        let compressed = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 50.0, 0.0)).unwrap();
        assert!(spring_force(&compressed, &settings).x < 0.0);

        let rest = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 70.0, 0.0)).unwrap();
        assert!(spring_force(&rest, &settings).length() < 1e-6);
    }

    #[test]
    fn overlap_splits_evenly() {
        let a = atom(ElementKind::Hydrogen, 0.0, 0.0);
        let geom = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 30.0, 0.0)).unwrap();
        let c = overlap_correction(&geom).unwrap();
        assert!((c.x - 5.0).abs() < 1e-5);

        let apart = PairGeometry::between(&a, &atom(ElementKind::Hydrogen, 50.0, 0.0)).unwrap();
        assert!(overlap_correction(&apart).is_none());
    }

    #[test]
    fn repulsion_points_away_from_partner() {
        let settings = Settings::default();
        let a = atom(ElementKind::Hydrogen, 0.0, 0.0);
        let geom = PairGeometry::between(&a, &atom(ElementKind::Carbon, 0.0, 60.0)).unwrap();
        let impulse = repulsion(&geom, &settings);
        assert!(impulse.y < 0.0);
        assert!((impulse.length() - settings.repel_force).abs() < 1e-5);
    }

    #[test]
    fn walls_clamp_and_damp() {
        let bounds = Vec2::new(800.0, 500.0);
        let mut a = atom(ElementKind::Hydrogen, 5.0, 250.0);
        a.vel = Vec2::new(-10.0, 0.0);
        assert!(bounce_off_walls(&mut a, bounds, 0.6));
        assert_eq!(a.pos.x, 20.0);
        assert!((a.vel.x - 6.0).abs() < 1e-5);

        let mut b = atom(ElementKind::Hydrogen, 400.0, 250.0);
        assert!(!bounce_off_walls(&mut b, bounds, 0.6));
    }
}
