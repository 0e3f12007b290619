//! Read-only queries and host hooks for [`Explorer`].

use super::Explorer;
use crate::animation::AmbientMode;
use crate::camera::{Camera, CameraController};
use crate::graph::{GraphIndex, NodeRef};
use crate::interaction::{GraphStats, HighlightLayers};
use crate::layout::LayoutKind;
use crate::renderer::{RenderAdapter, RenderBackend};
use crate::state::{InteractionState, StateChange, StateKey, SubscriberId};

// ── Graph and rendering ──

impl<B: RenderBackend> Explorer<B> {
    /// The loaded graph.
    pub fn graph(&self) -> &GraphIndex {
        &self.graph
    }

    /// The render backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The render backend, for host-side work such as presenting frames.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Node, edge and pick renderers.
    pub fn adapter(&self) -> &RenderAdapter {
        &self.adapter
    }

    /// Graph summary.
    pub fn stats(&self) -> &GraphStats {
        self.controllers.gallery.stats()
    }
}

// ── State ──

impl<B: RenderBackend> Explorer<B> {
    /// Observable interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Listen for changes to `key` (or every key when `None`). Listeners
    /// run synchronously, after a whole batch has been applied.
    pub fn subscribe(
        &mut self,
        key: Option<StateKey>,
        listener: impl FnMut(&StateChange) + 'static,
    ) -> SubscriberId {
        self.state.subscribe(key, listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.state.unsubscribe(id)
    }

    /// The highlight stack as last applied.
    pub fn highlights(&self) -> &HighlightLayers {
        &self.layers
    }

    /// Hovered node.
    pub fn hovered(&self) -> Option<NodeRef> {
        self.state.get(StateKey::Hovered).as_node()
    }

    /// Selected node.
    pub fn selected(&self) -> Option<NodeRef> {
        self.state.get(StateKey::Selected).as_node()
    }

    /// Active layout.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Whether a layout transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_animating()
    }

    /// Running ambient mode.
    pub fn ambient_mode(&self) -> AmbientMode {
        self.ambient.mode()
    }

    /// Channel whose constellation is showing.
    pub fn constellation(&self) -> Option<usize> {
        self.constellation
    }
}

// ── Camera ──

impl<B: RenderBackend> Explorer<B> {
    /// The current camera.
    pub fn camera(&self) -> &Camera {
        self.camera.camera()
    }

    /// The camera state machine.
    pub fn camera_controller(&self) -> &CameraController {
        &self.camera
    }
}
