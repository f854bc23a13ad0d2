#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Falling-object matching mini-game played after the puzzle is solved.
//!
//! Shapes and labels for random regions fall from above the screen. Clicking a
//! shape and the label of the same region scores; letting any object fall off
//! the bottom costs a life. The engine is driven exclusively through [`apply`].

use std::time::Duration;

use pinpin_catalog::{LabelTable, RegionCatalog};
use pinpin_core::{Command, Event, ObjectId, ObjectKind, Point, RegionId, ScreenSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

mod objects;
mod spawner;

use objects::FallingObject;
use spawner::Spawner;

const DEFAULT_MATCH_SEED: u64 = 0x4c56_4c32_6d61_7463;

/// Configuration parameters required to construct the matching engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Lives available at the start of a session.
    pub initial_lives: u32,
    /// Delay before the first spawn attempt.
    pub initial_spawn_interval: Duration,
    /// Shortest delay the spawn interval decays to.
    pub min_spawn_interval: Duration,
    /// Amount the spawn interval shrinks after every spawn attempt.
    pub spawn_interval_step: Duration,
    /// Score awarded for each matched pair.
    pub match_reward: u32,
    /// Slowest fall speed in pixels per second.
    pub min_fall_speed: f32,
    /// Fastest fall speed in pixels per second.
    pub max_fall_speed: f32,
    /// Horizontal distance kept between spawn positions and the screen edges.
    pub spawn_margin_x: f32,
    /// Vertical spawn position of shapes.
    pub shape_spawn_y: f32,
    /// Vertical spawn position of labels.
    pub label_spawn_y: f32,
    /// Screen the objects fall across; objects below its height are missed.
    pub screen: ScreenSize,
    /// Seed for region choice, spawn positions, and fall speeds.
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_lives: 5,
            initial_spawn_interval: Duration::from_millis(2_000),
            min_spawn_interval: Duration::from_millis(500),
            spawn_interval_step: Duration::from_millis(50),
            match_reward: 10,
            min_fall_speed: 50.0,
            max_fall_speed: 150.0,
            spawn_margin_x: 100.0,
            shape_spawn_y: -100.0,
            label_spawn_y: -200.0,
            screen: ScreenSize::default(),
            rng_seed: DEFAULT_MATCH_SEED,
        }
    }
}

/// Lifecycle of a matching session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    /// Objects spawn, fall, and accept clicks.
    #[default]
    Running,
    /// Lives are exhausted; only [`MatchEngine::restart`] resumes play.
    GameOver,
}

/// Authoritative state of the matching mini-game.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: Config,
    regions: Vec<(RegionId, String)>,
    labels: LabelTable,
    objects: Vec<FallingObject>,
    spawner: Spawner,
    rng: ChaCha8Rng,
    selected: Option<ObjectId>,
    score: u32,
    lives: u32,
    phase: MatchPhase,
    next_object: u32,
    tick_index: u64,
}

impl MatchEngine {
    /// Creates a running session over every region of the catalog.
    #[must_use]
    pub fn new(catalog: &RegionCatalog, labels: LabelTable, config: Config) -> Self {
        let regions = catalog
            .iter()
            .map(|region| (region.id(), region.name().to_owned()))
            .collect();
        Self {
            config,
            regions,
            labels,
            objects: Vec::new(),
            spawner: Spawner::new(&config),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            selected: None,
            score: 0,
            lives: config.initial_lives,
            phase: MatchPhase::Running,
            next_object: 0,
            tick_index: 0,
        }
    }

    /// Reinitialises score, lives, cadence, objects, and rng from the config.
    pub fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.objects.clear();
        self.spawner = Spawner::new(&self.config);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.rng_seed);
        self.selected = None;
        self.score = 0;
        self.lives = self.config.initial_lives;
        self.phase = MatchPhase::Running;
        self.next_object = 0;
        self.tick_index = 0;
        out_events.push(Event::ScoreChanged { score: self.score });
        out_events.push(Event::LivesChanged { lives: self.lives });
    }

    /// Objects still in play, in spawn order.
    #[must_use]
    pub fn unresolved_objects(&self) -> Vec<UnresolvedObject> {
        self.objects
            .iter()
            .map(|object| UnresolvedObject {
                object: object.id,
                kind: object.kind,
                region: object.region,
                position: object.position,
            })
            .collect()
    }

    /// Shape/label pairs currently in play that would score if clicked in turn.
    ///
    /// Each object appears in at most one pair; shapes are paired in spawn order.
    #[must_use]
    pub fn pending_pairs(&self) -> Vec<PendingPair> {
        let mut used: Vec<ObjectId> = Vec::new();
        let mut pairs = Vec::new();
        for shape in self
            .objects
            .iter()
            .filter(|object| object.kind == ObjectKind::Shape)
        {
            let partner = self
                .objects
                .iter()
                .find(|label| shape.pairs_with(label) && !used.contains(&label.id));
            if let Some(label) = partner {
                used.push(label.id);
                pairs.push(PendingPair {
                    region: shape.region,
                    shape: shape.id,
                    label: label.id,
                });
            }
        }
        pairs
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase == MatchPhase::GameOver {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        if self.spawner.advance(dt) {
            self.spawn_pair(out_events);
        }

        let dt_secs = dt.as_secs_f32();
        let tick_index = self.tick_index;
        for object in self
            .objects
            .iter_mut()
            .filter(|object| object.born_tick != tick_index)
        {
            object.fall(dt_secs);
        }

        self.resolve_misses(out_events);
    }

    fn spawn_pair(&mut self, out_events: &mut Vec<Event>) {
        if self.regions.is_empty() {
            return;
        }

        let index = self.rng.gen_range(0..self.regions.len());
        let Some((region, name)) = self.regions.get(index) else {
            return;
        };
        let region = *region;
        let Some(label) = self.labels.label_for(region) else {
            warn!(region = %region, name = %name, "no label for region, skipping spawn");
            return;
        };
        let label = label.to_owned();
        let name = name.clone();

        debug!(region = %region, interval = ?self.spawner.interval(), "spawning pair");
        let shape_y = self.config.shape_spawn_y;
        let label_y = self.config.label_spawn_y;
        self.spawn_object(ObjectKind::Shape, region, name, shape_y, out_events);
        self.spawn_object(ObjectKind::Label, region, label, label_y, out_events);
    }

    fn spawn_object(
        &mut self,
        kind: ObjectKind,
        region: RegionId,
        text: String,
        y: f32,
        out_events: &mut Vec<Event>,
    ) {
        let width = self.config.screen.width();
        let margin = self.config.spawn_margin_x;
        let x = sample(&mut self.rng, margin, width - margin);
        let speed = sample(
            &mut self.rng,
            self.config.min_fall_speed,
            self.config.max_fall_speed,
        );

        let id = ObjectId::new(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        let position = Point::new(x, y);
        self.objects.push(FallingObject {
            id,
            kind,
            region,
            text,
            position,
            speed,
            born_tick: self.tick_index,
        });
        out_events.push(Event::ObjectSpawned {
            object: id,
            kind,
            region,
            position,
        });
    }

    fn resolve_misses(&mut self, out_events: &mut Vec<Event>) {
        let height = self.config.screen.height();
        let mut index = 0;
        while index < self.objects.len() {
            let missed = self
                .objects
                .get(index)
                .is_some_and(|object| {
                    object.born_tick != self.tick_index && object.position.y() > height
                });
            if !missed {
                index += 1;
                continue;
            }

            let object = self.objects.remove(index);
            if self.selected == Some(object.id) {
                self.selected = None;
            }
            out_events.push(Event::ObjectMissed {
                object: object.id,
                region: object.region,
            });

            self.lives = self.lives.saturating_sub(1);
            out_events.push(Event::LivesChanged { lives: self.lives });
            if self.lives == 0 {
                self.phase = MatchPhase::GameOver;
                info!(score = self.score, "matching session over");
                out_events.push(Event::GameOver);
                return;
            }
        }
    }

    fn click(&mut self, clicked: ObjectId, out_events: &mut Vec<Event>) {
        if self.phase == MatchPhase::GameOver || self.find(clicked).is_none() {
            return;
        }

        let Some(selected) = self.selected else {
            self.selected = Some(clicked);
            out_events.push(Event::ObjectSelected { object: clicked });
            return;
        };

        self.selected = None;
        if selected == clicked {
            out_events.push(Event::ObjectDeselected { object: clicked });
            return;
        }

        let pair = match (self.find(selected), self.find(clicked)) {
            (Some(first), Some(second)) if first.pairs_with(second) => {
                if first.kind == ObjectKind::Shape {
                    Some((first.region, first.id, second.id))
                } else {
                    Some((first.region, second.id, first.id))
                }
            }
            _ => None,
        };

        let Some((region, shape, label)) = pair else {
            out_events.push(Event::ObjectMismatched { selected, clicked });
            out_events.push(Event::ObjectDeselected { object: selected });
            return;
        };

        self.objects
            .retain(|object| object.id != shape && object.id != label);
        self.score = self.score.saturating_add(self.config.match_reward);
        debug!(region = %region, score = self.score, "pair matched");
        out_events.push(Event::ObjectMatched {
            region,
            shape,
            label,
        });
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn find(&self, id: ObjectId) -> Option<&FallingObject> {
        self.objects.iter().find(|object| object.id == id)
    }
}

/// Debug summary of an object still in play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnresolvedObject {
    /// Identifier of the object.
    pub object: ObjectId,
    /// Whether the object is a shape or a label.
    pub kind: ObjectKind,
    /// Region the object represents.
    pub region: RegionId,
    /// Current screen-space position.
    pub position: Point,
}

/// Shape and label of the same region that are both in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingPair {
    /// Region shared by both objects.
    pub region: RegionId,
    /// Shape object of the pair.
    pub shape: ObjectId,
    /// Label object of the pair.
    pub label: ObjectId,
}

/// Applies the provided command to the engine, mutating state deterministically.
pub fn apply(engine: &mut MatchEngine, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => engine.tick(dt, out_events),
        Command::ClickObject { object } => engine.click(object, out_events),
        Command::PointerDown { .. } | Command::PointerMove { .. } | Command::PointerUp { .. } => {}
    }
}

fn sample(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Query functions that provide read-only access to the engine state.
pub mod query {
    use std::time::Duration;

    use pinpin_core::{ObjectId, ObjectKind, Point, RegionId};

    use super::{MatchEngine, MatchPhase};

    /// Current score.
    #[must_use]
    pub fn score(engine: &MatchEngine) -> u32 {
        engine.score
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(engine: &MatchEngine) -> u32 {
        engine.lives
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(engine: &MatchEngine) -> MatchPhase {
        engine.phase
    }

    /// Currently selected object, if any.
    #[must_use]
    pub fn selected(engine: &MatchEngine) -> Option<ObjectId> {
        engine.selected
    }

    /// Delay the spawner currently waits between spawn attempts.
    #[must_use]
    pub fn spawn_interval(engine: &MatchEngine) -> Duration {
        engine.spawner.interval()
    }

    /// Captures a read-only view of every object in play.
    #[must_use]
    pub fn object_view(engine: &MatchEngine) -> ObjectView {
        let mut snapshots: Vec<ObjectSnapshot> = engine
            .objects
            .iter()
            .map(|object| ObjectSnapshot {
                id: object.id,
                kind: object.kind,
                region: object.region,
                text: object.text.clone(),
                position: object.position,
                speed: object.speed,
                selected: engine.selected == Some(object.id),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        ObjectView { snapshots }
    }

    /// Read-only snapshot describing all falling objects.
    #[derive(Clone, Debug)]
    pub struct ObjectView {
        snapshots: Vec<ObjectSnapshot>,
    }

    impl ObjectView {
        /// Iterator over the captured snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &ObjectSnapshot> {
            self.snapshots.iter()
        }

        /// Number of objects in play.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no object is in play.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<ObjectSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single falling object used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct ObjectSnapshot {
        /// Identifier of the object.
        pub id: ObjectId,
        /// Whether the object is a shape or a label.
        pub kind: ObjectKind,
        /// Region the object represents.
        pub region: RegionId,
        /// Region name for shapes, capital name for labels.
        pub text: String,
        /// Current screen-space position.
        pub position: Point,
        /// Fall speed in pixels per second.
        pub speed: f32,
        /// Indicates whether the object is the current selection.
        pub selected: bool,
    }
}
