//! Molecule fact lookup
//!
//! A best-effort text service consulted once a level is solved. Sources are
//! asynchronous and never gate the frame loop: a `FactRequest` drives the
//! lookup on a worker thread (native) or the browser's task queue (wasm),
//! and the host polls it each frame. Failures are logged and replaced with
//! fixed fallback text.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use thiserror::Error;

use crate::elements::ElementKind;

/// Shown when the lookup fails
pub const FACT_FALLBACK: &str = "Could not retrieve molecule data at this time.";
/// Shown when the service answers with nothing
pub const FACT_EMPTY: &str = "No fact available.";
/// Shown while a request is outstanding
pub const FACT_PENDING: &str = "Analyzing molecular structure...";
/// Shown when the bonding hint lookup fails
pub const HINT_FALLBACK: &str = "Check the number of free connections available on each atom.";

/// Lookup failures (never surfaced past this module)
#[derive(Debug, Error)]
pub enum FactError {
    #[error("fact service unavailable: {0}")]
    Unavailable(String),

    #[error("fact service returned no text")]
    Empty,
}

/// Pending answer from a `FactSource`
pub type FactFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FactError>> + 'a>>;

/// An asynchronous text generator for molecule facts and bonding hints
pub trait FactSource: Send + Sync {
    fn molecule_fact<'a>(&'a self, molecule_name: &'a str, formula: &'a str) -> FactFuture<'a>;

    fn bonding_hint(&self, first: ElementKind, second: ElementKind) -> FactFuture<'_>;
}

/// Prompt for a short fact about a molecule
pub fn fact_prompt(molecule_name: &str, formula: &str) -> String {
    format!(
        "Tell me a fascinating, brief scientific fact (max 2 sentences) about the molecule \
         {} ({}). Focus on its role in nature or industry.",
        molecule_name, formula
    )
}

/// Prompt for a one-line bonding hint between two elements
pub fn hint_prompt(first: ElementKind, second: ElementKind) -> String {
    format!(
        "Explain in one short sentence why bonding {} and {} might be tricky or what their \
         valence electron counts are.",
        first.def().name,
        second.def().name
    )
}

/// Fetch a fact, falling back to fixed text on any failure
pub async fn molecule_fact(source: &dyn FactSource, molecule_name: &str, formula: &str) -> String {
    match source.molecule_fact(molecule_name, formula).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(FactError::Empty) => FACT_EMPTY.to_string(),
        Err(e) => {
            log::error!("Fact lookup for {} failed: {}", molecule_name, e);
            FACT_FALLBACK.to_string()
        }
    }
}

/// Fetch a bonding hint, falling back to fixed text on any failure
pub async fn bonding_hint(
    source: &dyn FactSource,
    first: ElementKind,
    second: ElementKind,
) -> String {
    match source.bonding_hint(first, second).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => HINT_FALLBACK.to_string(),
        Err(e) => {
            log::error!("Hint lookup for {}/{} failed: {}", first, second, e);
            HINT_FALLBACK.to_string()
        }
    }
}

/// Offline source with canned facts for the built-in course
#[derive(Debug, Clone, Default)]
pub struct StaticFacts {
    facts: HashMap<String, String>,
}

impl StaticFacts {
    pub fn builtin() -> Self {
        let entries = [
            (
                "H₂",
                "Hydrogen is the most abundant molecule in the universe and fuels the fusion \
                 that powers stars.",
            ),
            (
                "H₂O",
                "Water's hydrogen bonds give it an unusually high boiling point, which keeps \
                 most of Earth's surface water liquid.",
            ),
            (
                "CH₄",
                "Methane traps roughly 80 times more heat than carbon dioxide over twenty years \
                 and is the main component of natural gas.",
            ),
            (
                "NH₃",
                "Ammonia made by the Haber-Bosch process feeds fertilizer production that \
                 sustains about half the world's population.",
            ),
            (
                "CO₂",
                "Plants fix carbon dioxide into sugars during photosynthesis, pulling billions \
                 of tonnes of carbon from the air each year.",
            ),
        ];
        Self {
            facts: entries
                .iter()
                .map(|(formula, fact)| (formula.to_string(), fact.to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, formula: &str, fact: &str) {
        self.facts.insert(formula.to_string(), fact.to_string());
    }
}

impl FactSource for StaticFacts {
    fn molecule_fact<'a>(&'a self, molecule_name: &'a str, formula: &'a str) -> FactFuture<'a> {
        let fact = self
            .facts
            .get(formula)
            .cloned()
            .ok_or_else(|| FactError::Unavailable(format!("no entry for {}", molecule_name)));
        Box::pin(std::future::ready(fact))
    }

    fn bonding_hint(&self, first: ElementKind, second: ElementKind) -> FactFuture<'_> {
        Box::pin(std::future::ready(Ok::<_, FactError>(format!(
            "{} can hold {} bond{} and {} can hold {}.",
            first.def().name,
            first.max_bonds(),
            if first.max_bonds() == 1 { "" } else { "s" },
            second.def().name,
            second.max_bonds()
        ))))
    }
}

/// What a request asks its source for
#[derive(Debug, Clone)]
enum Query {
    Fact { molecule_name: String, formula: String },
    Hint(ElementKind, ElementKind),
}

impl Query {
    async fn run(self, source: &dyn FactSource) -> String {
        match self {
            Query::Fact {
                molecule_name,
                formula,
            } => molecule_fact(source, &molecule_name, &formula).await,
            Query::Hint(first, second) => bonding_hint(source, first, second).await,
        }
    }
}

/// Progress of a background lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactStatus {
    Pending,
    Ready(String),
}

/// Non-blocking handle to an outstanding fact lookup
#[derive(Debug)]
pub struct FactRequest {
    rx: Option<Receiver<String>>,
    status: FactStatus,
}

impl FactRequest {
    /// Start a molecule fact lookup without blocking the caller
    pub fn spawn(source: Arc<dyn FactSource>, molecule_name: &str, formula: &str) -> Self {
        Self::start(
            source,
            Query::Fact {
                molecule_name: molecule_name.to_string(),
                formula: formula.to_string(),
            },
        )
    }

    /// Start a bonding hint lookup without blocking the caller
    pub fn hint(source: Arc<dyn FactSource>, first: ElementKind, second: ElementKind) -> Self {
        Self::start(source, Query::Hint(first, second))
    }

    fn start(source: Arc<dyn FactSource>, query: Query) -> Self {
        let (tx, rx) = mpsc::channel();

        // The receiver may be gone by the time the answer lands (level discarded)
        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let text = pollster::block_on(query.run(source.as_ref()));
            let _ = tx.send(text);
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let text = query.run(source.as_ref()).await;
            let _ = tx.send(text);
        });

        Self {
            rx: Some(rx),
            status: FactStatus::Pending,
        }
    }

    /// An already-resolved request
    pub fn ready(text: impl Into<String>) -> Self {
        Self {
            rx: None,
            status: FactStatus::Ready(text.into()),
        }
    }

    /// Check for a result without blocking
    pub fn poll(&mut self) -> &FactStatus {
        if let Some(rx) = &self.rx {
            match rx.try_recv() {
                Ok(text) => {
                    self.status = FactStatus::Ready(text);
                    self.rx = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Fact lookup worker vanished");
                    self.status = FactStatus::Ready(FACT_FALLBACK.to_string());
                    self.rx = None;
                }
            }
        }
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == FactStatus::Pending
    }

    /// Text to render right now
    pub fn display_text(&self) -> &str {
        match &self.status {
            FactStatus::Pending => FACT_PENDING,
            FactStatus::Ready(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use pollster::block_on;

    struct Offline;

    impl FactSource for Offline {
        fn molecule_fact<'a>(&'a self, _: &'a str, _: &'a str) -> FactFuture<'a> {
            Box::pin(async { Err::<String, _>(FactError::Unavailable("network down".into())) })
        }

        fn bonding_hint(&self, _: ElementKind, _: ElementKind) -> FactFuture<'_> {
            Box::pin(async { Err::<String, _>(FactError::Unavailable("network down".into())) })
        }
    }

    struct Blank;

    impl FactSource for Blank {
        fn molecule_fact<'a>(&'a self, _: &'a str, _: &'a str) -> FactFuture<'a> {
            Box::pin(async { Ok::<_, FactError>("   ".to_string()) })
        }

        fn bonding_hint(&self, _: ElementKind, _: ElementKind) -> FactFuture<'_> {
            Box::pin(async { Ok::<_, FactError>(String::new()) })
        }
    }

    fn wait_ready(request: &mut FactRequest) -> String {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let FactStatus::Ready(text) = request.poll() {
                return text.clone();
            }
            assert!(Instant::now() < deadline, "lookup never resolved");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn failures_become_fallback_text() {
        assert_eq!(block_on(molecule_fact(&Offline, "Water", "H₂O")), FACT_FALLBACK);
        assert_eq!(
            block_on(bonding_hint(&Offline, ElementKind::Carbon, ElementKind::Hydrogen)),
            HINT_FALLBACK
        );
    }

    #[test]
    fn blank_answers_use_defaults() {
        assert_eq!(block_on(molecule_fact(&Blank, "Water", "H₂O")), FACT_EMPTY);
        assert_eq!(
            block_on(bonding_hint(&Blank, ElementKind::Oxygen, ElementKind::Oxygen)),
            HINT_FALLBACK
        );
    }

    #[test]
    fn static_facts_cover_builtin_course() {
        let facts = StaticFacts::builtin();
        for level in &crate::levels::LevelPack::builtin().levels {
            let text = block_on(molecule_fact(&facts, &level.molecule_name, &level.formula));
            assert_ne!(text, FACT_FALLBACK, "missing fact for {}", level.formula);
        }
        let hint = block_on(bonding_hint(&facts, ElementKind::Hydrogen, ElementKind::Carbon));
        assert_eq!(hint, "Hydrogen can hold 1 bond and Carbon can hold 4.");
    }

    #[test]
    fn hint_request_resolves_in_background() {
        let source: Arc<dyn FactSource> = Arc::new(StaticFacts::builtin());
        let mut request = FactRequest::hint(source, ElementKind::Oxygen, ElementKind::Nitrogen);
        assert_eq!(
            wait_ready(&mut request),
            "Oxygen can hold 2 bonds and Nitrogen can hold 3."
        );
    }

    #[test]
    fn request_resolves_in_background() {
        let mut request = FactRequest::spawn(Arc::new(StaticFacts::builtin()), "Water", "H₂O");
        let text = wait_ready(&mut request);
        assert!(text.contains("hydrogen bonds"));
        assert!(!request.is_pending());
        assert_eq!(request.display_text(), text);
    }

    #[test]
    fn failed_request_resolves_to_fallback() {
        let mut request = FactRequest::spawn(Arc::new(Offline), "Water", "H₂O");
        assert_eq!(wait_ready(&mut request), FACT_FALLBACK);
    }

    #[test]
    fn pending_shows_placeholder() {
        let request = FactRequest {
            rx: None,
            status: FactStatus::Pending,
        };
        assert_eq!(request.display_text(), FACT_PENDING);
        assert_eq!(FactRequest::ready("done").display_text(), "done");
    }

    #[test]
    fn prompts_name_their_subjects() {
        assert!(fact_prompt("Methane", "CH₄").contains("Methane (CH₄)"));
        assert!(hint_prompt(ElementKind::Nitrogen, ElementKind::Oxygen).contains("Nitrogen and Oxygen"));
    }
}
