use serde::{Deserialize, Serialize};

use crate::engine::command::{ExplorerCommand, NavDirection};
use crate::graph::NodeRef;

/// Explorer actions that can be bound to keys.
///
/// Serializes as `snake_case` so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// next_layout = "KeyL"
/// toggle_aurora = "KeyA"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Cycle to the next layout.
    NextLayout,
    /// Toggle the Living ambient mode.
    ToggleLiving,
    /// Toggle the Aurora ambient mode.
    ToggleAurora,
    /// Toggle camera orbit.
    ToggleOrbit,
    /// Toggle the constellation of the selected channel.
    ToggleConstellation,
    /// Find blocks similar to the selected block.
    FindSimilar,
    /// Frame the whole graph.
    ResetCamera,
    /// Move the selection left.
    NavigateLeft,
    /// Move the selection right.
    NavigateRight,
    /// Move the selection up.
    NavigateUp,
    /// Move the selection down.
    NavigateDown,
    /// Clear selection and overlays.
    Cancel,
}

impl KeyAction {
    /// The command this action stands for. `selected` is consulted by
    /// actions that operate on the current selection; they yield `None`
    /// when nothing suitable is selected.
    pub fn to_command(self, selected: Option<NodeRef>) -> Option<ExplorerCommand> {
        let cmd = match self {
            Self::NextLayout => ExplorerCommand::NextLayout,
            Self::ToggleLiving => ExplorerCommand::ToggleLiving,
            Self::ToggleAurora => ExplorerCommand::ToggleAurora,
            Self::ToggleOrbit => ExplorerCommand::ToggleOrbit,
            Self::ToggleConstellation => ExplorerCommand::ToggleConstellation,
            Self::FindSimilar => match selected? {
                NodeRef::Block(block) => ExplorerCommand::FindSimilar { block },
                NodeRef::Channel(_) => return None,
            },
            Self::ResetCamera => ExplorerCommand::ResetCamera,
            Self::NavigateLeft => nav(NavDirection::Left),
            Self::NavigateRight => nav(NavDirection::Right),
            Self::NavigateUp => nav(NavDirection::Up),
            Self::NavigateDown => nav(NavDirection::Down),
            Self::Cancel => ExplorerCommand::ClearSelection,
        };
        Some(cmd)
    }
}

const fn nav(direction: NavDirection) -> ExplorerCommand {
    ExplorerCommand::Navigate { direction }
}
