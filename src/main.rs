//! Molecule Snap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlTextAreaElement};

    use molecule_snap::consts::*;
    use molecule_snap::elements::css_color;
    use molecule_snap::facts::{FactSource, StaticFacts};
    use molecule_snap::input::{PointerEvent, Viewport};
    use molecule_snap::{Game, GameEvent, LevelPack, Settings};

    /// Game instance holding all state
    struct App {
        game: Game,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        facts: Arc<dyn FactSource>,
    }

    impl App {
        /// Keep hit-testing correct however the canvas is scaled on screen
        fn sync_viewport(&mut self) {
            let rect = self.canvas.get_bounding_client_rect();
            self.game.set_viewport(Viewport {
                left: rect.left() as f32,
                top: rect.top() as f32,
                width: rect.width() as f32,
                height: rect.height() as f32,
            });
        }

        fn frame(&mut self) {
            self.game.frame();

            for event in self.game.drain_events() {
                match event {
                    GameEvent::LevelLoaded { .. } => self.update_level_text(),
                    GameEvent::LevelComplete { index } => {
                        log::info!("Level {} complete", index + 1);
                        self.game.request_fact(self.facts.clone());
                    }
                    GameEvent::CourseComplete => log::info!("Course completed!"),
                    _ => {}
                }
            }

            if let Some(fact) = self.game.fact() {
                set_text("fact", fact.display_text());
            }

            self.draw();
        }

        fn update_level_text(&self) {
            if let Some(level) = self.game.level() {
                set_text("level-title", &level.molecule_name);
                set_text("level-formula", &level.formula);
                set_text("level-description", &level.description);
            }
            set_text("fact", "");
        }

        fn draw(&self) {
            let ctx = &self.ctx;
            let world = self.game.world();
            ctx.clear_rect(0.0, 0.0, INTERNAL_WIDTH as f64, INTERNAL_HEIGHT as f64);

            // Bonds
            ctx.set_line_cap("round");
            ctx.set_line_width(10.0);
            ctx.set_stroke_style_str("#94a3b8");
            for bond in world.bonds.iter() {
                let (a, b) = bond.ends();
                if let (Some(a), Some(b)) = (world.atom(a), world.atom(b)) {
                    ctx.begin_path();
                    ctx.move_to(a.pos.x as f64, a.pos.y as f64);
                    ctx.line_to(b.pos.x as f64, b.pos.y as f64);
                    ctx.stroke();
                }
            }

            // Atoms, bottom to top
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            for atom in &world.atoms {
                let def = atom.def();
                let hovered = world.pointer.hovered == Some(atom.id);

                ctx.begin_path();
                let _ = ctx.arc(
                    atom.pos.x as f64,
                    atom.pos.y as f64,
                    def.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str(&css_color(def.color));
                ctx.fill();
                ctx.set_line_width(if hovered || atom.dragging { 3.0 } else { 1.0 });
                ctx.set_stroke_style_str(if hovered { "#6366f1" } else { "#0f172a" });
                ctx.stroke();

                ctx.set_fill_style_str(&css_color(atom.kind.label_color()));
                ctx.set_font(&format!("bold {}px monospace", def.radius));
                let _ = ctx.fill_text(def.symbol, atom.pos.x as f64, atom.pos.y as f64 + 2.0);
            }
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut()>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Molecule Snap starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas element")
            .dyn_into()
            .expect("canvas is not a canvas");
        canvas.set_width(INTERNAL_WIDTH as u32);
        canvas.set_height(INTERNAL_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(LevelPack::builtin(), Settings::load(), seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            canvas: canvas.clone(),
            ctx,
            facts: Arc::new(StaticFacts::builtin()),
        }));
        app.borrow().update_level_text();

        setup_pointer(app.clone(), &canvas);
        setup_buttons(app.clone());

        // Frame loop
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::new(move || {
            app.borrow_mut().frame();
            if let Some(cb) = f.borrow().as_ref() {
                request_animation_frame(cb);
            }
        }));
        if let Some(cb) = g.borrow().as_ref() {
            request_animation_frame(cb);
        }
    }

    fn setup_pointer(app: Rc<RefCell<App>>, canvas: &HtmlCanvasElement) {
        let bind = |name: &str, map: fn(&web_sys::PointerEvent) -> PointerEvent| {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.sync_viewport();
                a.game.pointer(map(&event));
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        };

        bind("pointerdown", |e| PointerEvent::Down {
            x: e.client_x() as f32,
            y: e.client_y() as f32,
        });
        bind("pointermove", |e| PointerEvent::Move {
            x: e.client_x() as f32,
            y: e.client_y() as f32,
        });
        bind("pointerup", |_| PointerEvent::Up);
        bind("pointerleave", |_| PointerEvent::Leave);
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("next-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                if a.game.is_complete() {
                    a.game.next_level();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tuning editor: apply the JSON in the textarea and persist it
        let editor = document
            .get_element_by_id("settings-json")
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok());
        let Some(editor) = editor else {
            return;
        };
        if let Ok(json) = app.borrow().game.settings().to_json() {
            editor.set_value(&json);
        }

        if let Some(btn) = document.get_element_by_id("settings-apply-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                match a.game.apply_settings_json(&editor.value()) {
                    Ok(settings) => settings.save(),
                    Err(e) => log::warn!("Rejected settings: {}", e),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Molecule Snap (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build to play");

    demo::solve_course();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless playthrough: drags every atom onto the level's hub with scripted
/// pointer events and reports how each level went.
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use glam::Vec2;
    use molecule_snap::facts::StaticFacts;
    use molecule_snap::input::PointerEvent;
    use molecule_snap::polar_offset;
    use molecule_snap::sim::AtomId;
    use molecule_snap::{Game, GameEvent, LevelPack, Settings};

    const PLACE_DISTANCE: f32 = 65.0;
    const SETTLE_FRAMES: usize = 30;
    const FRAME_BUDGET: usize = 600;

    pub fn solve_course() {
        let mut game = Game::new(LevelPack::builtin(), Settings::load(), 0x5EED);
        let solved = Rc::new(Cell::new(0u32));
        let counter = solved.clone();
        game.set_on_complete(move || counter.set(counter.get() + 1));

        let facts = Arc::new(StaticFacts::builtin());
        let levels = game.levels().len();

        for _ in 0..levels {
            let Some(level) = game.level().cloned() else { break };
            let frames = solve_level(&mut game);
            let rejected: u32 = game
                .drain_events()
                .iter()
                .map(|e| match e {
                    GameEvent::BondRejected { count } => *count,
                    _ => 0,
                })
                .sum();

            if game.is_complete() {
                game.request_fact(facts.clone());
                // Keep simulating while the lookup is outstanding
                while game.fact().is_some_and(|fact| fact.is_pending()) {
                    game.frame();
                }
                println!(
                    "✓ {} ({}) solved in {} frames, {} rejections",
                    level.molecule_name, level.formula, frames, rejected
                );
                if let Some(fact) = game.fact() {
                    println!("  {}", fact.display_text());
                }
            } else {
                println!(
                    "✗ {} ({}) unsolved after {} frames",
                    level.molecule_name, level.formula, frames
                );
            }
            game.next_level();
        }

        println!("\nSolved {}/{} levels", solved.get(), levels);
    }

    /// The atom with the most valence; everything else is dragged onto it
    fn hub(game: &Game) -> Option<AtomId> {
        game.world()
            .atoms
            .iter()
            .max_by_key(|a| a.kind.max_bonds())
            .map(|a| a.id)
    }

    fn solve_level(game: &mut Game) -> usize {
        let Some(hub) = hub(game) else { return 0 };
        let others: Vec<AtomId> = game
            .world()
            .atoms
            .iter()
            .map(|a| a.id)
            .filter(|&id| id != hub)
            .collect();

        let mut frames = 0;
        let spokes = others.len().max(1) as f32;
        for (k, id) in others.iter().enumerate() {
            let angle = k as f32 / spokes * std::f32::consts::TAU;
            let (Some(from), Some(center)) = (
                game.world().atom(*id).map(|a| a.pos),
                game.world().atom(hub).map(|a| a.pos),
            ) else {
                continue;
            };
            let to = polar_offset(center, PLACE_DISTANCE, angle);
            frames += drag(game, from, to);
            for _ in 0..SETTLE_FRAMES {
                game.frame();
                frames += 1;
            }
        }

        while !game.is_complete() && frames < FRAME_BUDGET {
            game.frame();
            frames += 1;
        }
        frames
    }

    fn drag(game: &mut Game, from: Vec2, to: Vec2) -> usize {
        game.pointer(PointerEvent::Down { x: from.x, y: from.y });
        let steps = 10;
        for i in 1..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            game.pointer(PointerEvent::Move { x: p.x, y: p.y });
            game.frame();
        }
        // Let the trail velocity settle before letting go
        game.frame();
        game.pointer(PointerEvent::Up);
        steps + 1
    }
}
