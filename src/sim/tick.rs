//! Per-frame simulation step
//!
//! Advances the world by one fixed increment: integrate every atom, then
//! evaluate every unordered pair once in render order `(i, j)` with `i < j`.
//! Bonding is decided fresh each frame from distance and current capacity,
//! so an over-capacity bond can never form.

use glam::Vec2;

use super::bonds::{Bond, LinkOutcome};
use super::contact::{PairGeometry, bounce_off_walls, overlap_correction, repulsion, spring_force};
use super::state::World;
use crate::consts::*;
use crate::settings::Settings;

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Bonds formed this frame, in formation order
    pub formed: Vec<Bond>,
    /// Pairs pushed apart because one side was saturated
    pub rejections: u32,
    /// Atoms that touched a wall
    pub wall_hits: u32,
}

/// Advance the world by one frame
pub fn tick(world: &mut World, settings: &Settings) -> TickReport {
    world.time += FRAME_TIME_STEP;
    world.frame += 1;

    let mut report = TickReport::default();
    integrate(world, settings, &mut report);
    resolve_pairs(world, settings, &mut report);
    report
}

/// Move every atom: dragged atoms snap to the pointer, free atoms coast
fn integrate(world: &mut World, settings: &Settings, report: &mut TickReport) {
    let bounds = Vec2::new(INTERNAL_WIDTH, INTERNAL_HEIGHT);
    let pointer = world.pointer.pos;
    let time = world.time;
    let bonds = &world.bonds;

    for atom in world.atoms.iter_mut() {
        if atom.dragging {
            // Velocity is only kept for the motion trail
            atom.vel = (pointer - atom.pos) * settings.follow_gain;
            atom.pos = pointer;
            continue;
        }

        atom.vel *= settings.drag;

        // Idle float keeps loose atoms alive
        if bonds.degree(atom.id) == 0 {
            atom.vel.x += (time + atom.pos.x).sin() * settings.float_amplitude;
            atom.vel.y += (time + atom.pos.y).cos() * settings.float_amplitude;
        }

        atom.pos += atom.vel;

        if bounce_off_walls(atom, bounds, settings.elasticity) {
            report.wall_hits += 1;
        }
    }
}

/// Springs, overlap correction, bonding and rejection for every pair
fn resolve_pairs(world: &mut World, settings: &Settings, report: &mut TickReport) {
    let count = world.atoms.len();

    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = world.atoms.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let Some(geom) = PairGeometry::between(a, b) else {
                continue;
            };

            if world.bonds.contains(a.id, b.id) {
                // Dragged atoms still pull on their partner
                let force = spring_force(&geom, settings);
                if !a.dragging {
                    a.vel += force / a.kind.mass();
                }
                if !b.dragging {
                    b.vel -= force / b.kind.mass();
                }
                continue;
            }

            if let Some(correction) = overlap_correction(&geom) {
                if !a.dragging {
                    a.pos -= correction;
                    a.vel -= correction * settings.overlap_nudge;
                }
                if !b.dragging {
                    b.pos += correction;
                    b.vel += correction * settings.overlap_nudge;
                }
            }

            if !geom.in_snap_range(settings) {
                continue;
            }

            let a_free = world.bonds.has_capacity(a.id, a.kind);
            let b_free = world.bonds.has_capacity(b.id, b.kind);

            if a_free && b_free {
                if a.dragging || b.dragging {
                    continue;
                }
                if world.bonds.try_link(a.id, a.kind, b.id, b.kind) == LinkOutcome::Formed {
                    log::debug!(
                        "Bond formed: {}#{} - {}#{} at {:.1}",
                        a.kind,
                        a.id.0,
                        b.kind,
                        b.id.0,
                        geom.dist
                    );
                    if let Some(bond) = Bond::new(a.id, b.id) {
                        report.formed.push(bond);
                    }
                }
            } else if geom.in_reject_range(settings) {
                let impulse = repulsion(&geom, settings);
                if !a.dragging {
                    a.vel += impulse;
                }
                if !b.dragging {
                    b.vel -= impulse;
                }
                report.rejections += 1;
            }
        }
    }
}
