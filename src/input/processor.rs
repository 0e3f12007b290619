//! Converts raw platform events into explorer commands.
//!
//! [`InputProcessor`] owns the transient input state (cursor tracking, drag
//! detection, double-click timing, the shift modifier) and the key map. It
//! is the only thing between raw events and
//! [`Explorer::execute`](crate::engine::Explorer::execute).

use glam::Vec2;
use web_time::Instant;

use super::event::{InputEvent, MouseButton};
use super::mouse::{ClickResult, ClickState};
use crate::engine::command::ExplorerCommand;
use crate::graph::NodeRef;
use crate::options::KeybindingOptions;
use crate::renderer::PickTarget;

/// Squared pixel distance a pressed cursor must travel to count as a drag.
const DRAG_THRESHOLD_SQ: f32 = 1.0;

/// Turns [`InputEvent`]s and key strings into [`ExplorerCommand`]s.
///
/// Gestures:
/// - drag on background: rotate (pan with shift)
/// - scroll: zoom
/// - click a node: select (path endpoint with shift)
/// - double-click a block: find similar
/// - click background: clear selection
#[derive(Debug, Clone)]
pub struct InputProcessor {
    clicks: ClickState,
    mouse_pressed: bool,
    shift_pressed: bool,
    keybindings: KeybindingOptions,
}

impl InputProcessor {
    /// Processor with default key bindings.
    pub fn new() -> Self {
        Self::with_keybindings(KeybindingOptions::default())
    }

    /// Processor with the given key bindings.
    pub fn with_keybindings(keybindings: KeybindingOptions) -> Self {
        Self {
            clicks: ClickState::new(),
            mouse_pressed: false,
            shift_pressed: false,
            keybindings,
        }
    }

    /// Last cursor position in physical pixels.
    pub fn cursor(&self) -> Option<Vec2> {
        self.clicks.cursor.map(|(x, y)| Vec2::new(x, y))
    }

    /// Whether the primary button is held.
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Whether shift is held.
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// The key map.
    pub fn keybindings(&self) -> &KeybindingOptions {
        &self.keybindings
    }

    /// Replace the key map.
    pub fn set_keybindings(&mut self, keybindings: KeybindingOptions) {
        self.keybindings = keybindings;
    }

    /// Command for a key press, if the key is bound and applicable.
    pub fn handle_key_press(
        &self,
        key: &str,
        selected: Option<NodeRef>,
    ) -> Option<ExplorerCommand> {
        self.keybindings.lookup(key)?.to_command(selected)
    }

    /// Process one event. `hovered` is what the picker last reported
    /// under the cursor.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        hovered: PickTarget,
        now: Instant,
    ) -> Option<ExplorerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                if button != MouseButton::Left {
                    return None;
                }
                if pressed {
                    self.clicks.press(hovered);
                    self.mouse_pressed = true;
                    return None;
                }
                self.mouse_pressed = false;
                self.mouse_up(hovered, now)
            }
            InputEvent::Scroll { delta } => Some(ExplorerCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn cursor_moved(&mut self, x: f32, y: f32) -> Option<ExplorerCommand> {
        let (dx, dy) = self.clicks.move_to(x, y);
        if !self.mouse_pressed || !self.clicks.down_target.is_none() {
            return None;
        }
        let delta = Vec2::new(dx, dy);
        if delta.length_squared() > DRAG_THRESHOLD_SQ {
            self.clicks.dragging = true;
        }
        Some(if self.shift_pressed {
            ExplorerCommand::PanCamera { delta }
        } else {
            ExplorerCommand::RotateCamera { delta }
        })
    }

    fn mouse_up(
        &mut self,
        hovered: PickTarget,
        now: Instant,
    ) -> Option<ExplorerCommand> {
        match self.clicks.release(hovered, self.shift_pressed, now) {
            ClickResult::NoAction => None,
            ClickResult::Background => Some(ExplorerCommand::ClearSelection),
            ClickResult::SingleClick { target, shift_held } => {
                let node = target.node()?;
                Some(if shift_held {
                    ExplorerCommand::PathPoint { node }
                } else {
                    ExplorerCommand::Select { node }
                })
            }
            ClickResult::DoubleClick { target } => match target {
                PickTarget::Block(block) => {
                    Some(ExplorerCommand::FindSimilar { block })
                }
                PickTarget::Channel(channel) => {
                    Some(ExplorerCommand::ShowConstellation { channel })
                }
                PickTarget::None => None,
            },
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}
