//! Level session
//!
//! Owns the world of the current level instance and drives it one frame at a
//! time: step, then completion check. The host feeds pointer events in,
//! calls `frame()` once per animation frame, and reacts to the completion
//! callback and the drained events.
//!
//! A fact lookup started for a level instance belongs to that instance:
//! `frame()` polls it, and discarding the instance drops it, so a late answer
//! never lands on a different level.

use std::sync::Arc;

use crate::facts::{FactRequest, FactSource};
use crate::input::{PointerController, PointerEvent, Viewport};
use crate::levels::{Level, LevelPack};
use crate::settings::{Settings, SettingsError};
use crate::sim::{Bond, CompletionDetector, TickReport, World, tick};

/// Notable things that happened, for audio / UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh level instance was spawned
    LevelLoaded { index: usize },
    BondFormed(Bond),
    /// Saturated pairs pushed apart this frame
    BondRejected { count: u32 },
    /// Fired at most once per level instance
    LevelComplete { index: usize },
    /// Advanced past the final level; the course starts over
    CourseComplete,
}

/// One playthrough of a level pack
pub struct Game {
    settings: Settings,
    levels: LevelPack,
    level_index: usize,
    world: World,
    detector: CompletionDetector,
    controller: PointerController,
    /// Base seed; each level instance derives its own from it
    seed: u64,
    /// Increments every time a level instance is discarded
    instance: u64,
    events: Vec<GameEvent>,
    on_complete: Option<Box<dyn FnMut()>>,
    fact: Option<FactRequest>,
}

impl Game {
    pub fn new(levels: LevelPack, settings: Settings, seed: u64) -> Self {
        let mut game = Self {
            settings,
            levels,
            level_index: 0,
            world: World::new(seed),
            detector: CompletionDetector::new(),
            controller: PointerController::default(),
            seed,
            instance: 0,
            events: Vec::new(),
            on_complete: None,
            fact: None,
        };
        game.load_instance();
        game
    }

    /// Built-in course with default tuning
    pub fn builtin(seed: u64) -> Self {
        Self::new(LevelPack::builtin(), Settings::default(), seed)
    }

    /// Register the zero-argument completion callback
    pub fn set_on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn level(&self) -> Option<&Level> {
        self.levels.get(self.level_index)
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn levels(&self) -> &LevelPack {
        &self.levels
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Parse, validate and apply new tuning. Invalid input leaves the
    /// current settings untouched.
    pub fn apply_settings_json(&mut self, json: &str) -> Result<&Settings, SettingsError> {
        let settings = Settings::from_json(json)?;
        log::info!("Applied new settings");
        self.settings = settings;
        Ok(&self.settings)
    }

    /// Start a fact lookup for the current level without blocking
    pub fn request_fact(&mut self, source: Arc<dyn FactSource>) -> bool {
        let Some(level) = self.level() else {
            return false;
        };
        let request = FactRequest::spawn(source, &level.molecule_name, &level.formula);
        self.fact = Some(request);
        true
    }

    /// The current instance's fact lookup, if one was started
    pub fn fact(&self) -> Option<&FactRequest> {
        self.fact.as_ref()
    }

    /// Generation counter of the current level instance
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn is_complete(&self) -> bool {
        self.detector.is_complete()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.controller.set_viewport(viewport);
    }

    /// Route a device pointer event into the world
    pub fn pointer(&mut self, event: PointerEvent) {
        self.controller.handle(&mut self.world, event);
    }

    /// Advance one animation frame: step, then completion check
    pub fn frame(&mut self) -> TickReport {
        let report = tick(&mut self.world, &self.settings);

        if let Some(fact) = self.fact.as_mut() {
            fact.poll();
        }

        self.events
            .extend(report.formed.iter().copied().map(GameEvent::BondFormed));
        if report.rejections > 0 {
            self.events.push(GameEvent::BondRejected {
                count: report.rejections,
            });
        }

        if let Some(target) = self.level().map(|level| level.target_bonds) {
            if self.detector.observe(&self.world, target) {
                self.events.push(GameEvent::LevelComplete {
                    index: self.level_index,
                });
                if let Some(callback) = self.on_complete.as_mut() {
                    callback();
                }
            }
        }

        report
    }

    /// Discard the current atoms and respawn the same level
    pub fn reset(&mut self) {
        log::info!("Resetting level {}", self.level_index + 1);
        self.load_instance();
    }

    /// Move to the next level. Past the last level the course wraps to the
    /// first one and `false` is returned.
    pub fn next_level(&mut self) -> bool {
        let advanced = self.level_index + 1 < self.levels.len();
        if advanced {
            self.level_index += 1;
        } else {
            log::info!("Course completed, restarting from level 1");
            self.level_index = 0;
            self.events.push(GameEvent::CourseComplete);
        }
        self.load_instance();
        advanced
    }

    /// Jump to a specific level; out-of-range indices are ignored
    pub fn select_level(&mut self, index: usize) -> bool {
        if index >= self.levels.len() {
            return false;
        }
        self.level_index = index;
        self.load_instance();
        true
    }

    /// Drain events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the world with a fresh instance of the current level
    fn load_instance(&mut self) {
        self.instance += 1;
        let seed = instance_seed(self.seed, self.instance);

        self.world = match self.levels.get(self.level_index) {
            Some(level) => World::from_level(level, seed),
            None => {
                log::warn!("No level at index {}", self.level_index);
                World::new(seed)
            }
        };
        self.detector = CompletionDetector::new();
        self.fact = None;
        self.events.push(GameEvent::LevelLoaded {
            index: self.level_index,
        });
    }
}

/// Deterministic per-instance seed
fn instance_seed(base: u64, instance: u64) -> u64 {
    base ^ instance.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
