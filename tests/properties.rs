//! Property tests driving the full game with random pointer scripts

use std::cell::Cell;
use std::rc::Rc;

use molecule_snap::consts::{INTERNAL_HEIGHT, INTERNAL_WIDTH};
use molecule_snap::input::PointerEvent;
use molecule_snap::sim::{AtomId, BondGraph};
use molecule_snap::{ElementKind, Game, LevelPack, Settings};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Down(f32, f32),
    Move(f32, f32),
    Up,
    Leave,
    Frames(u8),
}

fn step() -> impl Strategy<Value = Step> {
    let x = 0.0..INTERNAL_WIDTH;
    let y = 0.0..INTERNAL_HEIGHT;
    prop_oneof![
        1 => (x.clone(), y.clone()).prop_map(|(x, y)| Step::Down(x, y)),
        3 => (x, y).prop_map(|(x, y)| Step::Move(x, y)),
        1 => Just(Step::Up),
        1 => Just(Step::Leave),
        3 => (1u8..20).prop_map(Step::Frames),
    ]
}

fn script() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step(), 1..60)
}

fn play(game: &mut Game, steps: &[Step]) {
    for step in steps {
        match *step {
            Step::Down(x, y) => game.pointer(PointerEvent::Down { x, y }),
            Step::Move(x, y) => game.pointer(PointerEvent::Move { x, y }),
            Step::Up => game.pointer(PointerEvent::Up),
            Step::Leave => game.pointer(PointerEvent::Leave),
            Step::Frames(n) => {
                for _ in 0..n {
                    game.frame();
                }
            }
        }
    }
}

fn game_at(level: usize, seed: u64) -> Game {
    let mut game = Game::new(LevelPack::builtin(), Settings::default(), seed);
    game.select_level(level);
    game
}

proptest! {
    #[test]
    fn bonds_never_exceed_capacity(level in 0usize..5, seed: u64, steps in script()) {
        let mut game = game_at(level, seed);
        play(&mut game, &steps);

        let world = game.world();
        for atom in &world.atoms {
            prop_assert!(world.bond_count(atom.id) <= atom.kind.max_bonds());
            prop_assert!(atom.pos.is_finite() && atom.vel.is_finite());
        }
        for bond in world.bonds.iter() {
            let (a, b) = bond.ends();
            prop_assert_ne!(a, b);
            prop_assert!(world.atom(a).is_some() && world.atom(b).is_some());
            prop_assert!(world.bonds.contains(a, b) && world.bonds.contains(b, a));
        }
    }

    #[test]
    fn completion_fires_at_most_once(level in 0usize..5, seed: u64, steps in script()) {
        let mut game = game_at(level, seed);
        let fired = Rc::new(Cell::new(0u32));
        let counter = fired.clone();
        game.set_on_complete(move || counter.set(counter.get() + 1));

        play(&mut game, &steps);
        prop_assert!(fired.get() <= 1);
        prop_assert_eq!(fired.get() == 1, game.is_complete());

        // Once complete, it stays complete whatever the board does next
        if game.is_complete() {
            play(&mut game, &steps);
            prop_assert!(game.is_complete());
            prop_assert_eq!(fired.get(), 1);
        }
    }

    #[test]
    fn reset_restores_a_clean_instance(level in 0usize..5, seed: u64, steps in script()) {
        let mut game = game_at(level, seed);
        play(&mut game, &steps);
        game.reset();

        let expected = game.level().map(|l| l.atoms.len()).unwrap_or(0);
        let world = game.world();
        prop_assert_eq!(world.atoms.len(), expected);
        prop_assert!(world.bonds.is_empty());
        prop_assert!(world.atoms.iter().all(|a| !a.dragging));
        prop_assert!(world.pointer.drag_target.is_none());
        prop_assert!(!game.is_complete());
    }

    #[test]
    fn same_seed_same_script_same_world(level in 0usize..5, seed: u64, steps in script()) {
        let mut a = game_at(level, seed);
        let mut b = game_at(level, seed);
        play(&mut a, &steps);
        play(&mut b, &steps);
        prop_assert_eq!(a.world(), b.world());
        prop_assert_eq!(a.is_complete(), b.is_complete());
    }

    #[test]
    fn bond_graph_stays_symmetric(
        kinds in prop::collection::vec(0usize..4, 2..7),
        edges in prop::collection::vec((0usize..7, 0usize..7), 0..16),
    ) {
        let kinds: Vec<ElementKind> = kinds.into_iter().map(|k| ElementKind::ALL[k]).collect();
        let id = |i: usize| AtomId(i.min(kinds.len() - 1) as u32);
        let kind = |i: usize| kinds[i.min(kinds.len() - 1)];

        let mut graph = BondGraph::new();
        for &(a, b) in &edges {
            graph.try_link(id(a), kind(a), id(b), kind(b));
        }

        for i in 0..kinds.len() {
            prop_assert!(!graph.contains(id(i), id(i)));
            prop_assert!(graph.degree(id(i)) <= kinds[i].max_bonds());
            prop_assert_eq!(graph.degree(id(i)), graph.neighbors(id(i)).count());
            for j in 0..kinds.len() {
                prop_assert_eq!(graph.contains(id(i), id(j)), graph.contains(id(j), id(i)));
            }
        }
        let degree_sum: usize = (0..kinds.len()).map(|i| graph.degree(id(i))).sum();
        prop_assert_eq!(degree_sum, 2 * graph.len());
    }
}
