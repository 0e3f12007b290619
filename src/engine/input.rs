//! Raw input handling for [`Explorer`].

use web_time::Instant;

use super::command::ExplorerCommand;
use super::Explorer;
use crate::input::InputEvent;
use crate::renderer::{PickTarget, RenderBackend};
use crate::state::StateKey;

impl<B: RenderBackend> Explorer<B> {
    /// Process a platform-agnostic input event.
    ///
    /// Cursor moves pick (throttled) and update the hover; button events
    /// pick at once so clicks always resolve against what is under the
    /// cursor right now. Gestures become commands through the
    /// [`InputProcessor`](crate::input::InputProcessor).
    ///
    /// ```ignore
    /// explorer.handle_input(InputEvent::CursorMoved { x, y }, now);
    /// explorer.handle_input(InputEvent::Scroll { delta: 1.0 }, now);
    /// ```
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        let hovered = match event {
            InputEvent::MouseButton { .. } => self.pick_at_cursor(now, true),
            _ => self.adapter.picker().last(),
        };
        if let Some(command) = self.input.handle_event(event, hovered, now) {
            self.execute(command, now);
        }

        if matches!(event, InputEvent::CursorMoved { .. })
            && !self.input.mouse_pressed()
        {
            let target = self.pick_at_cursor(now, false);
            self.execute(ExplorerCommand::Hover { node: target.node() }, now);
        }
    }

    /// Handle a key press by its binding name (e.g. `"KeyL"`, `"ArrowLeft"`).
    /// Returns whether the key was bound and applicable.
    pub fn handle_key(&mut self, key: &str, now: Instant) -> bool {
        let selected = self.state.get(StateKey::Selected).as_node();
        let Some(command) = self.input.handle_key_press(key, selected) else {
            return false;
        };
        self.execute(command, now);
        true
    }

    /// What is under the cursor. Throttled unless `force`.
    fn pick_at_cursor(&mut self, now: Instant, force: bool) -> PickTarget {
        let Some(cursor) = self.input.cursor() else {
            return PickTarget::None;
        };
        let viewport = self.camera.viewport();
        let camera = self.camera.camera();
        if force {
            self.adapter
                .pick_now(&mut self.backend, camera, cursor, viewport, now)
        } else {
            self.adapter
                .pick(&mut self.backend, camera, cursor, viewport, now)
        }
    }
}
