//! Pointer input and hit-testing
//!
//! Maps device coordinates into simulation space and turns press / move /
//! release into drag state on the world. Nothing here touches bonds: input
//! only toggles `dragging` and the pointer fields read by the next tick.

use glam::Vec2;

use crate::consts::{GRAB_TOLERANCE, INTERNAL_HEIGHT, INTERNAL_WIDTH};
use crate::sim::{AtomId, World};

/// Raw pointer events in device (client) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    /// Pointer left the canvas; treated as a release
    Leave,
}

/// On-screen rectangle the canvas is displayed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// A viewport showing the canvas at 1:1
    pub fn unscaled() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: INTERNAL_WIDTH,
            height: INTERNAL_HEIGHT,
        }
    }

    /// Display-to-simulation scale factor per axis
    pub fn scale(&self) -> Vec2 {
        let axis = |internal: f32, shown: f32| if shown > 0.0 { internal / shown } else { 1.0 };
        Vec2::new(axis(INTERNAL_WIDTH, self.width), axis(INTERNAL_HEIGHT, self.height))
    }

    /// Map client coordinates into simulation space
    pub fn to_sim(&self, x: f32, y: f32) -> Vec2 {
        (Vec2::new(x, y) - Vec2::new(self.left, self.top)) * self.scale()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::unscaled()
    }
}

/// Index of the topmost atom whose center is within `radius² * tolerance`
pub fn hit_test(world: &World, point: Vec2, tolerance: f32) -> Option<usize> {
    world.atoms.iter().rposition(|atom| atom.hit(point, tolerance))
}

/// Grab the topmost atom under `point` and bring it to the front
pub fn press(world: &mut World, point: Vec2) -> Option<AtomId> {
    world.pointer.pos = point;

    let index = hit_test(world, point, GRAB_TOLERANCE)?;
    let atom = &mut world.atoms[index];
    atom.dragging = true;
    atom.vel = Vec2::ZERO;
    let id = atom.id;

    world.bring_to_front(index);
    world.pointer.drag_target = Some(id);
    log::debug!("Grabbed atom #{} at ({:.0}, {:.0})", id.0, point.x, point.y);
    Some(id)
}

/// Record the pointer position and recompute hover
pub fn move_to(world: &mut World, point: Vec2) -> Option<AtomId> {
    world.pointer.pos = point;
    let hovered = hit_test(world, point, 1.0).map(|index| world.atoms[index].id);
    world.pointer.hovered = hovered;
    hovered
}

/// Drop whatever is held. Clears every atom's flag, not just the target.
pub fn release(world: &mut World) {
    for atom in world.atoms.iter_mut() {
        atom.dragging = false;
    }
    world.pointer.drag_target = None;
}

/// Routes device events into the world through the current viewport
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerController {
    viewport: Viewport,
}

impl PointerController {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Call when the canvas is resized or moved on screen
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn handle(&self, world: &mut World, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => {
                press(world, self.viewport.to_sim(x, y));
            }
            PointerEvent::Move { x, y } => {
                move_to(world, self.viewport.to_sim(x, y));
            }
            PointerEvent::Up => release(world),
            PointerEvent::Leave => {
                release(world);
                world.pointer.hovered = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind::*;

    fn two_atoms() -> (World, AtomId, AtomId) {
        let mut world = World::new(0);
        let a = world.spawn_atom(Hydrogen, Vec2::new(100.0, 100.0));
        let b = world.spawn_atom(Carbon, Vec2::new(110.0, 100.0));
        (world, a, b)
    }

    #[test]
    fn viewport_scales_into_sim_space() {
        let viewport = Viewport {
            left: 10.0,
            top: 20.0,
            width: 400.0,
            height: 250.0,
        };
        assert_eq!(viewport.to_sim(10.0, 20.0), Vec2::ZERO);
        assert_eq!(viewport.to_sim(410.0, 270.0), Vec2::new(800.0, 500.0));
        assert_eq!(Viewport::unscaled().to_sim(33.0, 44.0), Vec2::new(33.0, 44.0));
    }

    #[test]
    fn degenerate_viewport_does_not_blow_up() {
        let viewport = Viewport {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        assert!(viewport.to_sim(5.0, 5.0).is_finite());
    }

    #[test]
    fn press_picks_topmost_and_brings_it_front() {
        let (mut world, a, b) = two_atoms();
        // Move a on top, then press where both overlap
        world.bring_to_front(0);
        assert_eq!(press(&mut world, Vec2::new(105.0, 100.0)), Some(a));
        assert_eq!(world.atoms.last().unwrap().id, a);
        assert!(world.atom(a).unwrap().dragging);
        assert!(!world.atom(b).unwrap().dragging);

        release(&mut world);
        assert_eq!(press(&mut world, Vec2::new(105.0, 100.0)), Some(a));
    }

    #[test]
    fn press_zeroes_velocity() {
        let (mut world, _, b) = two_atoms();
        world.atom_mut(b).unwrap().vel = Vec2::new(3.0, 4.0);
        press(&mut world, Vec2::new(110.0, 100.0));
        assert_eq!(world.atom(b).unwrap().vel, Vec2::ZERO);
        assert_eq!(world.pointer.drag_target, Some(b));
    }

    #[test]
    fn grab_is_more_generous_than_hover() {
        let mut world = World::new(0);
        let h = world.spawn_atom(Hydrogen, Vec2::new(200.0, 200.0));
        // 25 units away: outside r=20, inside r*sqrt(2)
        let point = Vec2::new(225.0, 200.0);

        assert_eq!(move_to(&mut world, point), None);
        assert_eq!(press(&mut world, point), Some(h));
    }

    #[test]
    fn press_on_empty_space_grabs_nothing() {
        let (mut world, _, _) = two_atoms();
        assert_eq!(press(&mut world, Vec2::new(600.0, 400.0)), None);
        assert!(!world.is_dragging());
        assert_eq!(world.pointer.pos, Vec2::new(600.0, 400.0));
    }

    #[test]
    fn release_clears_every_flag() {
        let (mut world, a, b) = two_atoms();
        world.atom_mut(a).unwrap().dragging = true;
        world.atom_mut(b).unwrap().dragging = true;
        release(&mut world);
        assert!(world.atoms.iter().all(|atom| !atom.dragging));
        assert_eq!(world.pointer.drag_target, None);
    }

    #[test]
    fn controller_routes_scaled_events() {
        let (mut world, _, b) = two_atoms();
        let controller = PointerController::new(Viewport {
            left: 0.0,
            top: 0.0,
            width: 400.0,
            height: 250.0,
        });

        controller.handle(&mut world, PointerEvent::Move { x: 55.0, y: 50.0 });
        assert_eq!(world.pointer.hovered, Some(b));

        controller.handle(&mut world, PointerEvent::Down { x: 55.0, y: 50.0 });
        assert_eq!(world.pointer.drag_target, Some(b));

        controller.handle(&mut world, PointerEvent::Leave);
        assert!(!world.is_dragging());
        assert_eq!(world.pointer.hovered, None);
    }
}
