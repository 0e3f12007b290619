//! The interactive session.
//!
//! [`Explorer`] owns one loaded graph and everything drawn and tracked for
//! it. Hosts drive it with [`ExplorerCommand`]s, raw [`InputEvent`]s or
//! key strings, and call [`Explorer::tick`] once per animation frame.
//!
//! [`InputEvent`]: crate::input::InputEvent

mod accessors;
pub mod command;
mod execute;
mod input;
mod options;

use std::fmt;

use web_time::{Duration, Instant};

pub use self::command::{ExplorerCommand, NavDirection};
use crate::animation::{AmbientDirector, LayoutTransition, TransitionStatus};
use crate::camera::CameraController;
use crate::error::AtlasError;
use crate::graph::GraphIndex;
use crate::input::InputProcessor;
use crate::interaction::{
    CameraRequest, ControllerContext, Controllers, HighlightLayers,
    NodePositions,
};
use crate::layout::{LayoutKind, LayoutResult};
use crate::options::{millis, Options};
use crate::renderer::{RenderAdapter, RenderBackend};
use crate::state::{InteractionState, StateKey, StateValue};

/// Upper bound on controller dispatch rounds per flush. Controllers
/// answer changes with further writes; a chain longer than this means two
/// controllers are feeding each other.
const MAX_DISPATCH_ROUNDS: usize = 8;

/// One explorer session over one graph.
///
/// # Construction
///
/// [`Explorer::new`] takes an already parsed [`GraphIndex`];
/// [`Explorer::from_json`] parses the payload first. Either way the
/// initial layout is applied without animation and the camera framed on
/// it.
///
/// # Frame loop
///
/// ```ignore
/// explorer.handle_input(event, now);
/// explorer.tick(now);
/// ```
///
/// Everything time-based (layout transitions, ambient overlays, camera
/// flights, search debounce) advances inside [`Explorer::tick`].
pub struct Explorer<B: RenderBackend> {
    graph: GraphIndex,
    backend: B,
    adapter: RenderAdapter,
    state: InteractionState,
    layers: HighlightLayers,
    controllers: Controllers,
    transition: LayoutTransition,
    ambient: AmbientDirector,
    camera: CameraController,
    input: InputProcessor,
    options: Options,
    layout: LayoutKind,
    camera_requests: Vec<CameraRequest>,
    constellation: Option<usize>,
}

impl<B: RenderBackend> fmt::Debug for Explorer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Explorer")
            .field("channels", &self.graph.channel_count())
            .field("blocks", &self.graph.block_count())
            .field("layout", &self.layout)
            .field("ambient", &self.ambient.mode())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<B: RenderBackend> Explorer<B> {
    /// Session over `graph`, drawing through `backend`.
    pub fn new(
        mut backend: B,
        graph: GraphIndex,
        options: Options,
        viewport: (u32, u32),
        now: Instant,
    ) -> Self {
        backend.set_bloom_strength(options.post_processing.bloom_strength);
        let pick_interval =
            Duration::from_millis(options.interaction.pick_interval_ms);
        let mut adapter = RenderAdapter::new(&mut backend, &graph, pick_interval);

        let layout = options.layout.initial;
        let initial = compute_layout(&graph, layout, &options);
        let mut transition = LayoutTransition::new();
        transition.apply_immediate(&mut adapter, &mut backend, &initial);

        let mut camera = CameraController::new(&options.camera, viewport, now);
        camera.fit_to_positions(&initial.all_positions());
        backend.set_camera(camera.camera());

        log::info!(
            "explorer ready: {} channels, {} blocks, {} edges, layout {}",
            graph.channel_count(),
            graph.block_count(),
            graph.edges().len(),
            layout.name()
        );

        let mut explorer = Self {
            controllers: Controllers::new(&graph),
            input: InputProcessor::with_keybindings(options.keybindings.clone()),
            graph,
            backend,
            adapter,
            state: InteractionState::new(),
            layers: HighlightLayers::default(),
            transition,
            ambient: AmbientDirector::new(),
            camera,
            options,
            layout,
            camera_requests: Vec::new(),
            constellation: None,
        };
        let _ = explorer.state.batch([
            (StateKey::Layout, StateValue::Layout(layout)),
            (StateKey::Ambient, StateValue::Ambient(explorer.ambient.mode())),
            (StateKey::Constellation, StateValue::Bool(false)),
            (StateKey::Orbiting, StateValue::Bool(false)),
        ]);
        explorer.flush(now);
        explorer
    }

    /// Parse a graph payload and open a session over it.
    ///
    /// # Errors
    ///
    /// Any load error from [`GraphIndex::from_json`]; nothing is drawn
    /// for a payload that fails to load.
    pub fn from_json(
        backend: B,
        json: &str,
        options: Options,
        viewport: (u32, u32),
        now: Instant,
    ) -> Result<Self, AtlasError> {
        let graph = GraphIndex::from_json(json)?;
        Ok(Self::new(backend, graph, options, viewport, now))
    }
}

// =============================================================================
// Frame loop
// =============================================================================

impl<B: RenderBackend> Explorer<B> {
    /// Advance every time-based subsystem to `now`.
    pub fn tick(&mut self, now: Instant) {
        let status =
            self.transition
                .tick(&mut self.adapter, &mut self.backend, now);
        if !matches!(status, TransitionStatus::Idle) {
            self.redraw_constellation();
        }

        self.ambient.tick(
            &mut self.adapter,
            &mut self.backend,
            &self.options.ambient,
            now,
        );
        let _ = self.camera.tick(now);
        self.backend.set_camera(self.camera.camera());

        let mut ctx = ControllerContext {
            graph: &self.graph,
            state: &mut self.state,
            layers: &mut self.layers,
            camera_requests: &mut self.camera_requests,
            positions: NodePositions::new(&self.adapter),
            camera: self.camera.camera(),
            options: &self.options.interaction,
            now,
        };
        self.controllers.tick(&mut ctx);
        self.flush(now);
    }

    /// Route queued state changes to the controllers until quiet, then
    /// apply the highlight stack and any camera requests.
    pub(crate) fn flush(&mut self, now: Instant) {
        let mut rounds = 0;
        loop {
            let changes = self.state.take_changes();
            if changes.is_empty() {
                if !self.layers.take_dirty() {
                    break;
                }
                self.adapter.apply_highlight(
                    &mut self.backend,
                    &self.layers,
                    self.options.interaction.dim,
                );
                let _ = self.state.set(
                    StateKey::HighlightCount,
                    StateValue::Count(self.layers.lit_count()),
                );
                continue;
            }

            rounds += 1;
            if rounds > MAX_DISPATCH_ROUNDS {
                log::warn!(
                    "state still changing after {MAX_DISPATCH_ROUNDS} rounds; \
                     dropping {} changes",
                    changes.len()
                );
                break;
            }
            for change in &changes {
                let mut ctx = ControllerContext {
                    graph: &self.graph,
                    state: &mut self.state,
                    layers: &mut self.layers,
                    camera_requests: &mut self.camera_requests,
                    positions: NodePositions::new(&self.adapter),
                    camera: self.camera.camera(),
                    options: &self.options.interaction,
                    now,
                };
                self.controllers.dispatch(change, &mut ctx);
            }
        }

        for request in std::mem::take(&mut self.camera_requests) {
            match request {
                CameraRequest::FlyTo(target) => self.camera.fly_to(target, now),
            }
        }
    }

    /// Start a transition to `kind`. `on_complete` runs once when the
    /// transition lands; a transition superseded before landing drops its
    /// callback unrun.
    ///
    /// A running ambient overlay is stopped first so the transition starts
    /// from the unanimated base positions.
    pub fn transition_to(
        &mut self,
        kind: LayoutKind,
        now: Instant,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) {
        self.stop_ambient();
        let target = compute_layout(&self.graph, kind, &self.options);
        let duration = millis(self.options.layout.transition_ms);
        self.transition
            .animate_to(&self.adapter, target, duration, now, on_complete);
        self.layout = kind;
        let _ = self.state.set(StateKey::Layout, StateValue::Layout(kind));
        log::info!("layout -> {}", kind.name());
        self.flush(now);
    }

    /// Stop any ambient overlay, restoring what it animated.
    fn stop_ambient(&mut self) {
        if self.ambient.stop(&mut self.adapter, &mut self.backend) {
            self.layers.mark_dirty();
            let _ = self.state.set(
                StateKey::Ambient,
                StateValue::Ambient(self.ambient.mode()),
            );
        }
    }

    /// Rebuild the constellation overlay from current positions.
    fn redraw_constellation(&mut self) {
        let Some(channel) = self.constellation else {
            return;
        };
        let mut members: Vec<(i64, usize)> = self
            .graph
            .blocks_of_channel(channel)
            .iter()
            .map(|&b| {
                let t = self
                    .graph
                    .block(b)
                    .and_then(|blk| blk.created_at)
                    .unwrap_or(i64::MAX);
                (t, b)
            })
            .collect();
        members.sort_unstable();
        let points: Vec<_> = members
            .iter()
            .filter_map(|&(_, b)| self.adapter.blocks().position(b))
            .collect();
        let color = self.graph.channel_color(channel);
        self.adapter
            .edges_mut()
            .show_constellation(&mut self.backend, &points, color);
    }
}

fn compute_layout(
    graph: &GraphIndex,
    kind: LayoutKind,
    options: &Options,
) -> LayoutResult {
    kind.compute(graph).scaled(options.layout.scale)
}
