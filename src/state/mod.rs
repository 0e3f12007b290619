//! Observable interaction state.
//!
//! A small typed key/value store. Every write that changes a value emits a
//! [`StateChange`] carrying old and new values. Changes go to host
//! listeners registered with [`InteractionState::subscribe`] and are queued
//! for the explorer, which drains them with
//! [`InteractionState::take_changes`] and routes them to the controllers.
//!
//! [`InteractionState::batch`] applies every write before any listener
//! runs, so no listener ever observes half a batch.

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::animation::AmbientMode;
use crate::graph::{BlockClass, NodeRef};
use crate::layout::LayoutKind;

/// Every key controllers and UI read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    /// Node under the cursor.
    Hovered,
    /// Selected node.
    Selected,
    /// First path endpoint.
    PathStart,
    /// Second path endpoint.
    PathEnd,
    /// Nodes of the current path, endpoints included.
    Path,
    /// Number of hops in the current path, or `Unreachable`.
    PathLength,
    /// Raw search text.
    SearchQuery,
    /// Blocks matching the search text.
    SearchResults,
    /// Classes to keep; empty keeps all.
    TypeFilter,
    /// Channel whose blocks are kept.
    ChannelFilter,
    /// Tag whose blocks are kept.
    TagFilter,
    /// Normalized `[lo, hi]` window over creation time.
    TimelineRange,
    /// Blocks passing every active filter.
    FilterResult,
    /// `FilterResult` length.
    FilterCount,
    /// Block whose similar blocks are shown.
    SimilarityTarget,
    /// `(block, shared tag count)`, best first.
    SimilarityResults,
    /// Active layout.
    Layout,
    /// Active ambient mode.
    Ambient,
    /// Whether the constellation overlay is showing.
    Constellation,
    /// Highlighted blocks with thumbnails.
    Gallery,
    /// Nodes lit by the top highlight layer.
    HighlightCount,
    /// Whether the camera is orbiting.
    Orbiting,
}

/// Values stored under a [`StateKey`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StateValue {
    /// Unset.
    #[default]
    None,
    /// A query ran and found no answer, e.g. no path joins two nodes.
    Unreachable,
    /// Boolean flag.
    Bool(bool),
    /// A graph node.
    Node(NodeRef),
    /// A dense channel or block index.
    Index(usize),
    /// A count.
    Count(usize),
    /// Free text.
    Text(String),
    /// A closed float range.
    Range(f32, f32),
    /// A set of block classes.
    Classes(BTreeSet<BlockClass>),
    /// Dense block indices.
    Indices(Vec<usize>),
    /// Graph nodes in order.
    Nodes(Vec<NodeRef>),
    /// Scored block indices.
    Scores(Vec<(usize, u32)>),
    /// A layout.
    Layout(LayoutKind),
    /// An ambient mode.
    Ambient(AmbientMode),
}

impl StateValue {
    /// The node, if this is a node.
    pub fn as_node(&self) -> Option<NodeRef> {
        match self {
            Self::Node(n) => Some(*n),
            _ => None,
        }
    }

    /// The index, if this is an index.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// Whether this marks a query with no answer.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable)
    }

    /// The count, or 0.
    pub fn as_count(&self) -> usize {
        match self {
            Self::Count(n) => *n,
            _ => 0,
        }
    }

    /// The text, or `""`.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            _ => "",
        }
    }

    /// The flag, or `false`.
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// The range, if this is a range.
    pub fn as_range(&self) -> Option<(f32, f32)> {
        match self {
            Self::Range(lo, hi) => Some((*lo, *hi)),
            _ => None,
        }
    }

    /// The indices, or an empty slice.
    pub fn as_indices(&self) -> &[usize] {
        match self {
            Self::Indices(v) => v,
            _ => &[],
        }
    }

    /// The nodes, or an empty slice.
    pub fn as_nodes(&self) -> &[NodeRef] {
        match self {
            Self::Nodes(v) => v,
            _ => &[],
        }
    }

    /// The scores, or an empty slice.
    pub fn as_scores(&self) -> &[(usize, u32)] {
        match self {
            Self::Scores(v) => v,
            _ => &[],
        }
    }

    /// Whether this is [`StateValue::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One applied write.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    /// Key written.
    pub key: StateKey,
    /// Value before.
    pub old: StateValue,
    /// Value after.
    pub new: StateValue,
}

/// Handle returned by [`InteractionState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Listener = Box<dyn FnMut(&StateChange)>;

struct Subscriber {
    id: SubscriberId,
    key: Option<StateKey>,
    listener: Listener,
}

static UNSET: StateValue = StateValue::None;

/// The store. One per explorer session.
#[derive(Default)]
pub struct InteractionState {
    values: FxHashMap<StateKey, StateValue>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
    pending: Vec<StateChange>,
}

impl fmt::Debug for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionState")
            .field("values", &self.values)
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl InteractionState {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, [`StateValue::None`] when unset.
    pub fn get(&self, key: StateKey) -> &StateValue {
        self.values.get(&key).unwrap_or(&UNSET)
    }

    /// Write one value. Returns `false` (and emits nothing) when the value
    /// is unchanged.
    pub fn set(&mut self, key: StateKey, value: StateValue) -> bool {
        match self.apply(key, value) {
            Some(change) => {
                self.emit(vec![change]);
                true
            }
            None => false,
        }
    }

    /// Reset `key` to [`StateValue::None`].
    pub fn clear(&mut self, key: StateKey) -> bool {
        self.set(key, StateValue::None)
    }

    /// Write every value, then emit every resulting change in write order.
    /// Returns the number of values that actually changed.
    pub fn batch(
        &mut self,
        writes: impl IntoIterator<Item = (StateKey, StateValue)>,
    ) -> usize {
        let changes: Vec<StateChange> = writes
            .into_iter()
            .filter_map(|(key, value)| self.apply(key, value))
            .collect();
        let n = changes.len();
        self.emit(changes);
        n
    }

    /// Call `listener` for every change to `key`, or to any key when
    /// `key` is `None`.
    pub fn subscribe(
        &mut self,
        key: Option<StateKey>,
        listener: impl FnMut(&StateChange) + 'static,
    ) -> SubscriberId {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.subscribers.push(Subscriber {
            id,
            key,
            listener: Box::new(listener),
        });
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Drain changes queued since the last call.
    pub fn take_changes(&mut self) -> Vec<StateChange> {
        std::mem::take(&mut self.pending)
    }

    /// Whether changes are waiting to be drained.
    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    fn apply(&mut self, key: StateKey, value: StateValue) -> Option<StateChange> {
        if self.get(key) == &value {
            return None;
        }
        let old = if value.is_none() {
            self.values.remove(&key)
        } else {
            self.values.insert(key, value.clone())
        };
        Some(StateChange {
            key,
            old: old.unwrap_or_default(),
            new: value,
        })
    }

    fn emit(&mut self, changes: Vec<StateChange>) {
        for change in &changes {
            for sub in &mut self.subscribers {
                if sub.key.is_none_or(|k| k == change.key) {
                    (sub.listener)(change);
                }
            }
        }
        self.pending.extend(changes);
    }
}
