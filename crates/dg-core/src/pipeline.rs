//! Staged generation pipeline
//!
//! Drives the layout through `Idle -> Partitioning -> Connecting -> Pruning
//! -> Validating -> Published`. Each stage is a sequence of atomic edits
//! (one split, one door, one pruned room). Between edits the pipeline
//! notifies step observers, sleeps for the configured stage delay, and
//! checks the cancel token. A cancelled run resets back to `Idle`.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::dungeon::{
    ConnectivityValidator, DoorPlacer, DoorRecord, LayoutStats, NodeGraph, PruneOutcome,
    PruneStep, RectSplitter, RoomPruner, SplitRecord, count_components,
};
use crate::error::{ConfigError, GenerationError, GenerationIssue};
use crate::rng::DungeonRng;

/// Pipeline stage
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    strum::Display,
    strum::IntoStaticStr,
)]
pub enum PipelineState {
    #[default]
    Idle,
    Partitioning,
    Connecting,
    Pruning,
    Validating,
    Published,
}

/// Shared flag used to stop a running generation between steps
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One atomic edit, or a stage boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    StageEntered(PipelineState),
    Split(SplitRecord),
    DoorPlaced(DoorRecord),
    RoomPruned(PruneStep),
}

/// What a finished generation produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub state: PipelineState,
    pub splits: usize,
    pub rooms_before_pruning: usize,
    pub doors_before_pruning: usize,
    pub prune_budget: usize,
    pub rooms_pruned: usize,
    pub stats: LayoutStats,
    pub issues: Vec<GenerationIssue>,
}

impl GenerationReport {
    /// False when the published graph is split into several components
    pub fn is_connected(&self) -> bool {
        !self.issues.iter().any(GenerationIssue::breaks_connectivity)
    }

    pub fn has_issue(&self, matcher: impl Fn(&GenerationIssue) -> bool) -> bool {
        self.issues.iter().any(matcher)
    }
}

/// Marker for a stage stopped by the cancel token
struct Cancelled;

/// Step hook shared by every stage: notify observers, pace, check cancel
struct Pacer<'a> {
    observers: &'a mut [StepCallback],
    delay: Duration,
    cancel: &'a CancelToken,
}

impl<'a> Pacer<'a> {
    fn new(
        observers: &'a mut [StepCallback],
        config: &GeneratorConfig,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            observers,
            delay: config.stage_delay(),
            cancel,
        }
    }

    fn step(&mut self, event: StepEvent, graph: &NodeGraph) -> ControlFlow<Cancelled> {
        for observer in self.observers.iter_mut() {
            observer(&event, graph);
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.cancel.is_cancelled() {
            ControlFlow::Break(Cancelled)
        } else {
            ControlFlow::Continue(())
        }
    }
}

type CompleteCallback = Box<dyn FnMut(&GenerationReport, &NodeGraph)>;
type ResetCallback = Box<dyn FnMut(&NodeGraph)>;
type StepCallback = Box<dyn FnMut(&StepEvent, &NodeGraph)>;

/// Owns the node graph and runs the generation stages over it
pub struct GenerationPipeline {
    config: GeneratorConfig,
    rng: DungeonRng,
    graph: NodeGraph,
    state: PipelineState,
    cancel: CancelToken,
    last_report: Option<GenerationReport>,
    on_complete: Vec<CompleteCallback>,
    on_reset: Vec<ResetCallback>,
    on_step: Vec<StepCallback>,
}

impl std::fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("config", &self.config)
            .field("seed", &self.rng.seed())
            .field("state", &self.state)
            .field("nodes", &self.graph.len())
            .field("on_complete", &self.on_complete.len())
            .field("on_reset", &self.on_reset.len())
            .field("on_step", &self.on_step.len())
            .finish()
    }
}

impl GenerationPipeline {
    /// Validate the config and seed the graph with the start room
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Self::rng_for(&config);
        let graph = NodeGraph::with_room(config.start_rect());
        Ok(Self {
            config,
            rng,
            graph,
            state: PipelineState::Idle,
            cancel: CancelToken::new(),
            last_report: None,
            on_complete: Vec::new(),
            on_reset: Vec::new(),
            on_step: Vec::new(),
        })
    }

    fn rng_for(config: &GeneratorConfig) -> DungeonRng {
        match config.seed {
            Some(seed) => DungeonRng::new(seed),
            None => DungeonRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Read-only view of the current node collection
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Seed of the current (or most recent) generation
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Report of the last published generation, cleared on reset
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Handle that stops the running generation at the next step boundary
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Register a callback fired when a generation is published
    pub fn on_complete(&mut self, callback: impl FnMut(&GenerationReport, &NodeGraph) + 'static) {
        self.on_complete.push(Box::new(callback));
    }

    /// Register a callback fired every time the pipeline returns to `Idle`
    pub fn on_reset(&mut self, callback: impl FnMut(&NodeGraph) + 'static) {
        self.on_reset.push(Box::new(callback));
    }

    /// Register a callback fired after every atomic edit
    pub fn on_step(&mut self, callback: impl FnMut(&StepEvent, &NodeGraph) + 'static) {
        self.on_step.push(Box::new(callback));
    }

    /// Discard the graph, reseed the start room and return to `Idle`
    pub fn reset(&mut self) {
        self.graph.clear();
        self.graph.add_room(self.config.start_rect());
        self.state = PipelineState::Idle;
        self.last_report = None;
        self.cancel.clear();

        for callback in &mut self.on_reset {
            callback(&self.graph);
        }
        debug!("pipeline reset");
    }

    /// Run every stage and publish the result
    ///
    /// Layout problems do not fail the call; they are listed on the
    /// returned report. Only cancellation returns an error, after which the
    /// pipeline is back in `Idle`.
    pub fn generate(&mut self) -> Result<GenerationReport, GenerationError> {
        self.reset();
        self.rng = Self::rng_for(&self.config);

        let seed = self.rng.seed();
        info!(
            seed,
            width = self.config.start_size.width,
            height = self.config.start_size.height,
            "generating dungeon"
        );

        let mut issues = Vec::new();

        let splits = self.partition()?;
        if splits == 0 && self.config.is_degenerate() {
            info!("start room below split threshold, keeping a single room");
            issues.push(GenerationIssue::DegenerateConfig);
        }

        self.connect()?;
        let rooms_before_pruning = self.graph.room_count();
        let doors_before_pruning = self.graph.door_count();

        let pruning = self.prune(&mut issues)?;
        self.validate(&mut issues)?;

        self.state = PipelineState::Published;
        let report = GenerationReport {
            seed,
            state: self.state,
            splits,
            rooms_before_pruning,
            doors_before_pruning,
            prune_budget: pruning.budget,
            rooms_pruned: pruning.removed.len(),
            stats: LayoutStats::of(&self.graph),
            issues,
        };
        info!(
            rooms = report.stats.rooms,
            doors = report.stats.doors,
            pruned = report.rooms_pruned,
            connected = report.is_connected(),
            "dungeon published"
        );

        for callback in &mut self.on_complete {
            callback(&report, &self.graph);
        }
        self.last_report = Some(report.clone());
        Ok(report)
    }

    fn enter(&mut self, state: PipelineState) -> Result<(), GenerationError> {
        self.state = state;
        debug!(stage = %state, nodes = self.graph.len(), "entering stage");
        let mut pacer = Pacer::new(&mut self.on_step, &self.config, &self.cancel);
        let flow = pacer.step(StepEvent::StageEntered(state), &self.graph);
        self.finish_stage(flow)
    }

    /// Unwrap a stage result, resetting to `Idle` if it was cancelled
    fn finish_stage<T>(&mut self, flow: ControlFlow<Cancelled, T>) -> Result<T, GenerationError> {
        match flow {
            ControlFlow::Continue(value) => Ok(value),
            ControlFlow::Break(Cancelled) => {
                let stage = self.state;
                info!(stage = %stage, "generation cancelled");
                self.reset();
                Err(GenerationError::Cancelled { stage })
            }
        }
    }

    fn partition(&mut self) -> Result<usize, GenerationError> {
        self.enter(PipelineState::Partitioning)?;
        let splitter = RectSplitter::new(self.config.min_room_size);

        let mut pacer = Pacer::new(&mut self.on_step, &self.config, &self.cancel);
        let flow = splitter.split_all_with(&mut self.graph, &mut self.rng, |record, graph| {
            pacer.step(StepEvent::Split(*record), graph)
        });
        let splits = self.finish_stage(flow)?;
        info!(splits, rooms = self.graph.room_count(), "partitioning done");
        Ok(splits)
    }

    fn connect(&mut self) -> Result<(), GenerationError> {
        self.enter(PipelineState::Connecting)?;
        let placer = DoorPlacer::new();

        let mut pacer = Pacer::new(&mut self.on_step, &self.config, &self.cancel);
        let flow = placer.connect_all_with(&mut self.graph, &mut self.rng, |record, graph| {
            pacer.step(StepEvent::DoorPlaced(*record), graph)
        });
        let doors = self.finish_stage(flow)?;
        info!(doors, "connecting done");
        Ok(())
    }

    fn prune(
        &mut self,
        issues: &mut Vec<GenerationIssue>,
    ) -> Result<PruneOutcome, GenerationError> {
        self.enter(PipelineState::Pruning)?;
        let pruner = RoomPruner::new(self.config.prune_fraction);

        let mut pacer = Pacer::new(&mut self.on_step, &self.config, &self.cancel);
        let flow = pruner.prune_with(&mut self.graph, |step, graph| {
            pacer.step(StepEvent::RoomPruned(*step), graph)
        });
        let outcome = self.finish_stage(flow)?;

        if let Some(room) = outcome.disconnected_by() {
            issues.push(GenerationIssue::PruningDisconnected { room: room.0 });
        }
        info!(budget = outcome.budget, pruned = outcome.removed.len(), "pruning done");
        Ok(outcome)
    }

    fn validate(&mut self, issues: &mut Vec<GenerationIssue>) -> Result<(), GenerationError> {
        self.enter(PipelineState::Validating)?;
        if !ConnectivityValidator::new().validate(&self.graph) {
            let components = count_components(&self.graph);
            warn!(components, "final layout is not connected");
            issues.push(GenerationIssue::ConnectivityFailed { components });
        }
        Ok(())
    }
}
