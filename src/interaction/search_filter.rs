//! Debounced search plus the type, channel, tag and timeline filters.

use std::collections::BTreeSet;

use web_time::{Duration, Instant};

use super::{Controller, ControllerContext, Highlight, LayerKind};
use crate::graph::GraphIndex;
use crate::state::{InteractionState, StateChange, StateKey, StateValue};

#[derive(Debug, Clone)]
struct Pending {
    query: String,
    due: Instant,
}

/// Combines every active filter by intersection into one lit set.
///
/// Search text settles for the debounce interval before it is run; an
/// empty query clears the search immediately. A timeline window covering
/// `[0, 1]` counts as no filter at all.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pending: Option<Pending>,
}

impl SearchFilter {
    /// Whether a query is waiting out its debounce.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn run_search(query: &str, ctx: &mut ControllerContext<'_>) {
        let results = ctx.graph.search(query);
        log::debug!("search {query:?}: {} blocks", results.len());
        let _ = ctx
            .state
            .set(StateKey::SearchResults, StateValue::Indices(results));
    }

    fn refilter(ctx: &mut ControllerContext<'_>) {
        match active_filter(ctx.graph, ctx.state) {
            None => {
                let _ = ctx.state.batch([
                    (StateKey::FilterResult, StateValue::None),
                    (StateKey::FilterCount, StateValue::None),
                ]);
                ctx.layers.clear(LayerKind::Filter);
            }
            Some(blocks) => {
                let count = blocks.len();
                log::debug!("filters keep {count} blocks");
                ctx.layers
                    .set(LayerKind::Filter, Highlight::blocks(blocks.iter().copied()));
                let _ = ctx.state.batch([
                    (StateKey::FilterResult, StateValue::Indices(blocks)),
                    (StateKey::FilterCount, StateValue::Count(count)),
                ]);
            }
        }
    }
}

impl Controller for SearchFilter {
    fn on_change(&mut self, change: &StateChange, ctx: &mut ControllerContext<'_>) {
        match change.key {
            StateKey::SearchQuery => {
                let query = change.new.as_text().trim();
                if query.is_empty() {
                    self.pending = None;
                    let _ = ctx.state.clear(StateKey::SearchResults);
                } else {
                    let debounce = Duration::from_millis(ctx.options.search_debounce_ms);
                    self.pending = Some(Pending {
                        query: query.to_owned(),
                        due: ctx.now + debounce,
                    });
                }
            }
            StateKey::SearchResults
            | StateKey::TypeFilter
            | StateKey::ChannelFilter
            | StateKey::TagFilter
            | StateKey::TimelineRange => Self::refilter(ctx),
            _ => {}
        }
    }

    fn tick(&mut self, ctx: &mut ControllerContext<'_>) {
        let now = ctx.now;
        if let Some(pending) = self.pending.take_if(|p| now >= p.due) {
            Self::run_search(&pending.query, ctx);
        }
    }
}

/// Intersection of every active filter, ascending, or `None` when no
/// filter is active.
pub fn active_filter(graph: &GraphIndex, state: &InteractionState) -> Option<Vec<usize>> {
    let mut sets: Vec<BTreeSet<usize>> = Vec::new();

    if let StateValue::Indices(found) = state.get(StateKey::SearchResults) {
        sets.push(found.iter().copied().collect());
    }
    if let StateValue::Classes(classes) = state.get(StateKey::TypeFilter) {
        if !classes.is_empty() {
            sets.push(
                graph
                    .blocks()
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| classes.contains(&b.class))
                    .map(|(i, _)| i)
                    .collect(),
            );
        }
    }
    if let Some(channel) = state.get(StateKey::ChannelFilter).as_index() {
        sets.push(graph.blocks_of_channel(channel).iter().copied().collect());
    }
    let tag = state.get(StateKey::TagFilter).as_text();
    if !tag.is_empty() {
        sets.push(graph.blocks_with_tag(tag).iter().copied().collect());
    }
    if let Some((lo, hi)) = state.get(StateKey::TimelineRange).as_range() {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if lo > 0.0 || hi < 1.0 {
            sets.push(graph.blocks_in_time_window(lo, hi).into_iter().collect());
        }
    }

    let mut iter = sets.into_iter();
    let first = iter.next()?;
    let kept = iter.fold(first, |acc, set| acc.intersection(&set).copied().collect());
    Some(kept.into_iter().collect())
}
