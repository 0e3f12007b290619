//! Hover and selection highlighting.

use super::{neighborhood, CameraRequest, Controller, ControllerContext, LayerKind};
use crate::graph::NodeRef;
use crate::state::{StateChange, StateKey};

/// Lights the one-hop neighborhood of the hovered and selected nodes.
///
/// The hovered node grows by the hover scale and the selected node by the
/// selection scale. Both layers are rebuilt from scratch on every change,
/// so the previously hovered node falls back to baseline (or to its
/// selection boost) without any bookkeeping. Selecting also asks the
/// camera to fly to the node.
#[derive(Debug, Clone, Default)]
pub struct HoverSelect;

impl HoverSelect {
    fn layer_for(
        kind: LayerKind,
        node: Option<NodeRef>,
        scale: f32,
        ctx: &mut ControllerContext<'_>,
    ) {
        let Some(node) = node else {
            ctx.layers.clear(kind);
            return;
        };
        let mut h = neighborhood(ctx.graph, node);
        if h.is_empty() {
            ctx.layers.clear(kind);
            return;
        }
        h.boost(node, scale);
        ctx.layers.set(kind, h);
    }
}

impl Controller for HoverSelect {
    fn on_change(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>) {
        match change.key {
            StateKey::Hovered => {
                let node = change.new.as_node();
                Self::layer_for(LayerKind::Hover, node, ctx.options.hover_scale, ctx);
            }
            StateKey::Selected => {
                let node = change.new.as_node();
                Self::layer_for(
                    LayerKind::Selection,
                    node,
                    ctx.options.selection_scale,
                    ctx,
                );
                if let Some(p) = node.and_then(|n| ctx.positions.get(n)) {
                    ctx.camera_requests.push(CameraRequest::FlyTo(p));
                }
                log::debug!("selected {node:?}");
            }
            _ => {}
        }
    }
}
