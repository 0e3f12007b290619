use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Action to key-string bindings.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `next_layout` → `"KeyL"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Key string → action. Rebuilt after deserialization.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::NextLayout, "KeyL".into()),
            (KeyAction::ToggleLiving, "KeyV".into()),
            (KeyAction::ToggleAurora, "KeyA".into()),
            (KeyAction::ToggleOrbit, "KeyO".into()),
            (KeyAction::ToggleConstellation, "KeyC".into()),
            (KeyAction::FindSimilar, "KeyS".into()),
            (KeyAction::ResetCamera, "KeyQ".into()),
            (KeyAction::NavigateLeft, "ArrowLeft".into()),
            (KeyAction::NavigateRight, "ArrowRight".into()),
            (KeyAction::NavigateUp, "ArrowUp".into()),
            (KeyAction::NavigateDown, "ArrowDown".into()),
            (KeyAction::Cancel, "Escape".into()),
        ]);
        let mut opts = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the key → action map from `bindings`.
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Bind `action` to `key`, replacing its previous key.
    pub fn bind(&mut self, action: KeyAction, key: &str) {
        let _ = self.bindings.insert(action, key.to_owned());
        self.rebuild_reverse_map();
    }

    /// Action bound to `key`.
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}
