//! Input handling: event types, the click state machine, and the
//! processor that turns raw events into explorer commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// Click and drag state machine.
pub(crate) mod mouse;
/// Converts raw events into explorer commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use processor::InputProcessor;
