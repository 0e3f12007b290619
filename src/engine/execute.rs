//! Command execution for [`Explorer`].

use web_time::Instant;

use super::command::ExplorerCommand;
use super::Explorer;
use crate::animation::AmbientMode;
use crate::graph::NodeRef;
use crate::interaction::{KeyboardNavigator, NodePositions, PathFinder};
use crate::renderer::RenderBackend;
use crate::state::{StateKey, StateValue};

impl<B: RenderBackend> Explorer<B> {
    /// Perform one command, then route the resulting state changes.
    ///
    /// Every command is either one state write (or one atomic batch) or
    /// one call into a subsystem. Commands naming nodes that do not exist
    /// are accepted and come to nothing.
    pub fn execute(&mut self, command: ExplorerCommand, now: Instant) {
        log::trace!("execute {command:?}");
        match command {
            // ── Hover / selection ──
            ExplorerCommand::Hover { node } => {
                let _ = self.state.set(StateKey::Hovered, node_value(node));
            }
            ExplorerCommand::Select { node } => {
                let _ = self.state.set(StateKey::Selected, StateValue::Node(node));
            }
            ExplorerCommand::ClearSelection => {
                let _ = self.state.batch([
                    (StateKey::Selected, StateValue::None),
                    (StateKey::PathStart, StateValue::None),
                    (StateKey::PathEnd, StateValue::None),
                    (StateKey::SimilarityTarget, StateValue::None),
                ]);
            }

            // ── Path finder ──
            ExplorerCommand::PathPoint { node } => {
                let start = self.state.get(StateKey::PathStart).as_node();
                let end = self.state.get(StateKey::PathEnd).as_node();
                let _ = self.state.batch(PathFinder::capture(start, end, node));
            }
            ExplorerCommand::ClearPath => {
                let _ = self.state.batch([
                    (StateKey::PathStart, StateValue::None),
                    (StateKey::PathEnd, StateValue::None),
                ]);
            }

            // ── Search / filters ──
            ExplorerCommand::Search { query } => {
                let value = if query.trim().is_empty() {
                    StateValue::None
                } else {
                    StateValue::Text(query)
                };
                let _ = self.state.set(StateKey::SearchQuery, value);
            }
            ExplorerCommand::SetTypeFilter { classes } => {
                let value = if classes.is_empty() {
                    StateValue::None
                } else {
                    StateValue::Classes(classes)
                };
                let _ = self.state.set(StateKey::TypeFilter, value);
            }
            ExplorerCommand::ToggleType { class } => {
                let mut classes = match self.state.get(StateKey::TypeFilter) {
                    StateValue::Classes(c) => c.clone(),
                    _ => Default::default(),
                };
                if !classes.remove(&class) {
                    let _ = classes.insert(class);
                }
                self.execute(ExplorerCommand::SetTypeFilter { classes }, now);
                return;
            }
            ExplorerCommand::SetChannelFilter { channel } => {
                let value = channel.map_or(StateValue::None, StateValue::Index);
                let _ = self.state.set(StateKey::ChannelFilter, value);
            }
            ExplorerCommand::SetTagFilter { tag } => {
                let value = match tag {
                    Some(t) if !t.is_empty() => StateValue::Text(t),
                    _ => StateValue::None,
                };
                let _ = self.state.set(StateKey::TagFilter, value);
            }
            ExplorerCommand::SetTimeline { lo, hi } => {
                let (lo, hi) = (clamp_unit(lo), clamp_unit(hi));
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                let _ = self
                    .state
                    .set(StateKey::TimelineRange, StateValue::Range(lo, hi));
            }
            ExplorerCommand::ClearFilters => {
                let _ = self.state.batch([
                    (StateKey::SearchQuery, StateValue::None),
                    (StateKey::TypeFilter, StateValue::None),
                    (StateKey::ChannelFilter, StateValue::None),
                    (StateKey::TagFilter, StateValue::None),
                    (StateKey::TimelineRange, StateValue::None),
                ]);
            }

            // ── Similarity / navigation ──
            ExplorerCommand::FindSimilar { block } => {
                let _ = self
                    .state
                    .set(StateKey::SimilarityTarget, StateValue::Index(block));
            }
            ExplorerCommand::ClearSimilar => {
                let _ = self.state.clear(StateKey::SimilarityTarget);
            }
            ExplorerCommand::Navigate { direction } => {
                let from = self
                    .state
                    .get(StateKey::Selected)
                    .as_node()
                    .or_else(|| self.state.get(StateKey::Hovered).as_node());
                let next = from.and_then(|from| {
                    KeyboardNavigator::navigate(
                        &self.graph,
                        &NodePositions::new(&self.adapter),
                        self.camera.camera(),
                        from,
                        direction,
                    )
                });
                if let Some(next) = next {
                    let _ = self.state.set(StateKey::Selected, StateValue::Node(next));
                }
            }

            // ── Layout ──
            ExplorerCommand::SetLayout { kind } => {
                let name = kind.name();
                self.transition_to(
                    kind,
                    now,
                    Some(Box::new(move || log::debug!("layout {name} settled"))),
                );
            }
            ExplorerCommand::NextLayout => {
                let kind = self.layout.next();
                self.execute(ExplorerCommand::SetLayout { kind }, now);
                return;
            }

            // ── Ambient ──
            ExplorerCommand::SetAmbient { mode } => self.set_ambient(mode, now),
            ExplorerCommand::ToggleLiving => {
                self.toggle_ambient(AmbientMode::Living, now);
            }
            ExplorerCommand::ToggleAurora => {
                self.toggle_ambient(AmbientMode::Aurora, now);
            }

            // ── Overlays ──
            ExplorerCommand::ShowConstellation { channel } => {
                if channel < self.graph.channel_count() {
                    self.constellation = Some(channel);
                    self.redraw_constellation();
                    let _ = self
                        .state
                        .set(StateKey::Constellation, StateValue::Bool(true));
                }
            }
            ExplorerCommand::ToggleConstellation => {
                if self.constellation.is_some() {
                    self.hide_constellation();
                } else if let Some(channel) = self.constellation_channel() {
                    self.execute(ExplorerCommand::ShowConstellation { channel }, now);
                    return;
                }
            }
            ExplorerCommand::HideConstellation => self.hide_constellation(),

            // ── Camera ──
            ExplorerCommand::FlyTo { target } => self.camera.fly_to(target, now),
            ExplorerCommand::FlyToNode { node } => {
                if let Some(p) = self.adapter.position(node) {
                    self.camera.fly_to(p, now);
                }
            }
            ExplorerCommand::StartOrbit => {
                self.camera.start_orbit();
                self.sync_orbit_state();
            }
            ExplorerCommand::StopOrbit => {
                self.camera.stop_orbit();
                self.sync_orbit_state();
            }
            ExplorerCommand::ToggleOrbit => {
                let _ = self.camera.toggle_orbit();
                self.sync_orbit_state();
            }
            ExplorerCommand::ResetCamera => {
                let positions = self.adapter.current_layout().all_positions();
                self.camera.fly_to_fit(&positions, now);
            }
            ExplorerCommand::RotateCamera { delta } => {
                self.camera.note_input(now);
                self.camera.rotate(delta);
            }
            ExplorerCommand::PanCamera { delta } => {
                self.camera.note_input(now);
                self.camera.pan(delta);
            }
            ExplorerCommand::Zoom { delta } => {
                self.camera.note_input(now);
                self.camera.zoom(delta);
            }
            ExplorerCommand::Resize { width, height } => {
                self.camera.resize(width, height);
            }
        }
        self.flush(now);
    }

    fn set_ambient(&mut self, mode: AmbientMode, now: Instant) {
        self.settle_transition();
        let was_active = self.ambient.is_active();
        let _ = self.ambient.set_mode(
            mode,
            &mut self.adapter,
            &mut self.backend,
            &self.options.ambient,
            now,
        );
        self.after_ambient_change(was_active);
    }

    fn toggle_ambient(&mut self, mode: AmbientMode, now: Instant) {
        self.settle_transition();
        let was_active = self.ambient.is_active();
        let _ = self.ambient.toggle(
            mode,
            &mut self.adapter,
            &mut self.backend,
            &self.options.ambient,
            now,
        );
        self.after_ambient_change(was_active);
    }

    fn after_ambient_change(&mut self, was_active: bool) {
        let mode = self.ambient.mode();
        if was_active && mode == AmbientMode::Off {
            // The snapshot held whatever highlight was showing when the
            // overlay started; re-apply the current one.
            self.layers.mark_dirty();
        }
        log::info!("ambient -> {}", mode.name());
        let _ = self.state.set(StateKey::Ambient, StateValue::Ambient(mode));
    }

    /// Land an in-flight layout transition at once so an ambient overlay
    /// snapshots settled positions.
    fn settle_transition(&mut self) {
        if let Some(target) = self.transition.target().cloned() {
            self.transition
                .apply_immediate(&mut self.adapter, &mut self.backend, &target);
            self.redraw_constellation();
        }
    }

    fn hide_constellation(&mut self) {
        self.constellation = None;
        self.adapter.edges_mut().clear_constellation(&mut self.backend);
        let _ = self
            .state
            .set(StateKey::Constellation, StateValue::Bool(false));
    }

    /// Channel whose constellation a toggle shows: the selected channel,
    /// or the first channel of the selected block.
    fn constellation_channel(&self) -> Option<usize> {
        match self.state.get(StateKey::Selected).as_node()? {
            NodeRef::Channel(c) => Some(c),
            NodeRef::Block(b) => self.graph.channels_of_block(b).first().copied(),
        }
    }

    fn sync_orbit_state(&mut self) {
        let _ = self.state.set(
            StateKey::Orbiting,
            StateValue::Bool(self.camera.is_orbiting()),
        );
    }
}

fn node_value(node: Option<NodeRef>) -> StateValue {
    node.map_or(StateValue::None, StateValue::Node)
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
