use web_time::{Duration, Instant};

use crate::renderer::PickTarget;

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Result of a mouse-up through the click state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClickResult {
    /// Drag, or down and up on different targets.
    NoAction,
    /// Single click on a node.
    SingleClick {
        /// Node clicked.
        target: PickTarget,
        /// Shift held at release.
        shift_held: bool,
    },
    /// Second click on the same node inside the threshold.
    DoubleClick {
        /// Node clicked.
        target: PickTarget,
    },
    /// Click on empty space.
    Background,
}

/// Cursor tracking, drag detection, and double-click timing.
#[derive(Debug, Clone)]
pub(crate) struct ClickState {
    pub(crate) cursor: Option<(f32, f32)>,
    pub(crate) down_target: PickTarget,
    pub(crate) dragging: bool,
    last_click: Option<(Instant, PickTarget)>,
}

impl ClickState {
    pub(crate) fn new() -> Self {
        Self {
            cursor: None,
            down_target: PickTarget::None,
            dragging: false,
            last_click: None,
        }
    }

    /// Record the cursor and return the delta since the last move.
    pub(crate) fn move_to(&mut self, x: f32, y: f32) -> (f32, f32) {
        let delta = self.cursor.map_or((0.0, 0.0), |(lx, ly)| (x - lx, y - ly));
        self.cursor = Some((x, y));
        delta
    }

    pub(crate) fn press(&mut self, target: PickTarget) {
        self.down_target = target;
        self.dragging = false;
    }

    pub(crate) fn release(
        &mut self,
        target: PickTarget,
        shift_held: bool,
        now: Instant,
    ) -> ClickResult {
        let down = std::mem::take(&mut self.down_target);
        let was_dragging = std::mem::replace(&mut self.dragging, false);

        if was_dragging || down != target {
            self.last_click = None;
            return ClickResult::NoAction;
        }
        if target.is_none() {
            self.last_click = None;
            return ClickResult::Background;
        }

        let repeat = self.last_click.is_some_and(|(at, last)| {
            last == target
                && now.saturating_duration_since(at) < DOUBLE_CLICK_THRESHOLD
        });
        if repeat {
            self.last_click = None;
            ClickResult::DoubleClick { target }
        } else {
            self.last_click = Some((now, target));
            ClickResult::SingleClick { target, shift_held }
        }
    }
}
