//! The explorer's complete interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a key press, a mouse
//! gesture, a UI control, or a programmatic call, is one
//! [`ExplorerCommand`]. Hosts build commands and hand them to
//! [`Explorer::execute`](super::Explorer::execute); each one maps to a
//! single state write or a single controller call.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use crate::animation::AmbientMode;
use crate::graph::{BlockClass, NodeRef};
use crate::layout::LayoutKind;

/// Direction for keyboard spatial navigation, relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    /// Screen left.
    Left,
    /// Screen right.
    Right,
    /// Screen up.
    Up,
    /// Screen down.
    Down,
}

impl NavDirection {
    /// `(right, up)` components of this direction in screen space.
    pub fn screen_axes(self) -> Vec2 {
        match self {
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
        }
    }
}

/// A discrete or parameterized operation the explorer can perform.
///
/// ```ignore
/// explorer.execute(ExplorerCommand::Search { query: "sea".into() }, now);
/// explorer.execute(ExplorerCommand::SetLayout { kind: LayoutKind::Galaxy }, now);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerCommand {
    // ── Hover / selection ───────────────────────────────────────────
    /// Set (or clear) the node under the cursor.
    Hover {
        /// Hovered node, `None` for background.
        node: Option<NodeRef>,
    },
    /// Select a node and fly the camera to it.
    Select {
        /// Node to select.
        node: NodeRef,
    },
    /// Clear the selection, path, and similarity highlight.
    ClearSelection,

    // ── Path finder ─────────────────────────────────────────────────
    /// Capture a path endpoint. The second capture runs the search; a
    /// third starts over.
    PathPoint {
        /// Endpoint node.
        node: NodeRef,
    },
    /// Forget both path endpoints.
    ClearPath,

    // ── Search / filters ────────────────────────────────────────────
    /// Replace the search text. Applied after the debounce interval.
    Search {
        /// Raw query text.
        query: String,
    },
    /// Keep only the given classes; empty keeps all.
    SetTypeFilter {
        /// Classes to keep.
        classes: BTreeSet<BlockClass>,
    },
    /// Add or remove one class from the type filter.
    ToggleType {
        /// Class to toggle.
        class: BlockClass,
    },
    /// Keep only blocks of one channel.
    SetChannelFilter {
        /// Channel index, `None` to clear.
        channel: Option<usize>,
    },
    /// Keep only blocks carrying one tag.
    SetTagFilter {
        /// Tag, `None` to clear.
        tag: Option<String>,
    },
    /// Keep only blocks created inside a normalized time window.
    SetTimeline {
        /// Window start in `[0, 1]`.
        lo: f32,
        /// Window end in `[0, 1]`.
        hi: f32,
    },
    /// Clear search text and every filter.
    ClearFilters,

    // ── Similarity / navigation ─────────────────────────────────────
    /// Highlight blocks sharing tags with `block`.
    FindSimilar {
        /// Target block index.
        block: usize,
    },
    /// Clear the similarity highlight.
    ClearSimilar,
    /// Move the selection to the neighbor best aligned with a screen
    /// direction.
    Navigate {
        /// Pressed direction.
        direction: NavDirection,
    },

    // ── Layout ──────────────────────────────────────────────────────
    /// Transition to a layout.
    SetLayout {
        /// Target layout.
        kind: LayoutKind,
    },
    /// Transition to the next layout in cycling order.
    NextLayout,

    // ── Ambient ─────────────────────────────────────────────────────
    /// Switch ambient animation mode.
    SetAmbient {
        /// Mode to activate; `Off` stops the current one.
        mode: AmbientMode,
    },
    /// Start Living, or stop it when active.
    ToggleLiving,
    /// Start Aurora, or stop it when active.
    ToggleAurora,

    // ── Overlays ────────────────────────────────────────────────────
    /// Draw the dashed constellation through a channel's blocks in
    /// creation order.
    ShowConstellation {
        /// Channel index.
        channel: usize,
    },
    /// Draw the constellation for the selected channel, or hide it.
    ToggleConstellation,
    /// Hide the constellation.
    HideConstellation,

    // ── Camera ──────────────────────────────────────────────────────
    /// Fly the camera to look at a point.
    FlyTo {
        /// World-space focus point.
        target: Vec3,
    },
    /// Fly the camera to look at a node.
    FlyToNode {
        /// Node to frame.
        node: NodeRef,
    },
    /// Start orbiting the current focus.
    StartOrbit,
    /// Stop orbiting.
    StopOrbit,
    /// Toggle orbit.
    ToggleOrbit,
    /// Frame the whole graph.
    ResetCamera,
    /// Rotate by a drag delta in pixels.
    RotateCamera {
        /// Drag delta.
        delta: Vec2,
    },
    /// Pan by a drag delta in pixels.
    PanCamera {
        /// Drag delta.
        delta: Vec2,
    },
    /// Zoom (positive = in).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
    /// The viewport changed size.
    Resize {
        /// Width in physical pixels.
        width: u32,
        /// Height in physical pixels.
        height: u32,
    },
}
