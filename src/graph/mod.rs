//! Graph ingestion and derived lookups.
//!
//! [`GraphIndex::build`] parses the raw payload once into typed channels,
//! blocks, and edges, then derives everything the rest of the crate queries:
//! dense id ↔ index maps, undirected adjacency, block ↔ channel membership,
//! palette colors, a token search index, a tag index, and timestamp order.
//! The index is immutable after construction.
//!
//! Only a missing `elements.nodes`/`elements.edges` array or malformed JSON
//! is fatal. Dangling edges, unknown block classes, and missing optional
//! fields are resolved with defaults and logged.

pub mod palette;
pub mod path;
pub mod raw;
pub mod search;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use self::palette::{channel_color, CROSS_LINK_COLOR, NEUTRAL_GRAY};
use self::path::Adjacency;
use self::raw::{id_string, url_string, RawGraph, RawNodeData};
use self::search::SearchIndex;
use crate::error::AtlasError;

/// A node in the bipartite graph, addressed by dense index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    /// Channel at the given dense index.
    Channel(usize),
    /// Block at the given dense index.
    Block(usize),
}

/// Content class of a block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum BlockClass {
    /// Image upload or scraped image.
    Image,
    /// Embedded media (video, audio, rich embed).
    Media,
    /// Web link.
    Link,
    /// Plain text.
    Text,
    /// File attachment.
    Attachment,
}

impl BlockClass {
    /// All classes in display order.
    pub const ALL: [BlockClass; 5] = [
        BlockClass::Image,
        BlockClass::Media,
        BlockClass::Link,
        BlockClass::Text,
        BlockClass::Attachment,
    ];

    /// Parse a payload `type` string (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "media" | "embed" => Some(Self::Media),
            "link" => Some(Self::Link),
            "text" => Some(Self::Text),
            "attachment" => Some(Self::Attachment),
            _ => None,
        }
    }

    /// Canonical class name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Media => "Media",
            Self::Link => "Link",
            Self::Text => "Text",
            Self::Attachment => "Attachment",
        }
    }
}

/// A named collection of blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Payload id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Visual weight; defaults to the linked block count.
    pub size: f32,
    /// Number of linked blocks present in this payload.
    pub block_count: usize,
}

/// A content-bearing leaf node.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Payload id.
    pub id: String,
    /// Content class.
    pub class: BlockClass,
    /// Display label (empty when absent).
    pub label: String,
    /// Text content.
    pub content: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Thumbnail URL.
    pub thumb: Option<String>,
    /// Source URL.
    pub source: Option<String>,
    /// Creation time in unix seconds, when known.
    pub created_at: Option<i64>,
    /// Tags like `"artist:x"`; deduplicated, payload order.
    pub auto_tags: Vec<String>,
}

/// A channel → block membership edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    /// Source channel index.
    pub channel: usize,
    /// Target block index.
    pub block: usize,
}

/// Parsed graph plus every derived lookup. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    channels: Vec<Channel>,
    blocks: Vec<Block>,
    edges: Vec<GraphEdge>,
    channel_index_map: FxHashMap<String, usize>,
    block_index_map: FxHashMap<String, usize>,
    block_channels: Vec<Vec<usize>>,
    channel_blocks: Vec<Vec<usize>>,
    adjacency: Adjacency,
    channel_colors: Vec<[f32; 3]>,
    block_colors: Vec<[f32; 3]>,
    search_index: SearchIndex,
    auto_tag_index: BTreeMap<String, Vec<usize>>,
    sorted_timestamps: Vec<(i64, usize)>,
    fetched_at: Option<String>,
}

impl GraphIndex {
    /// Parse a JSON document and build the index.
    pub fn from_json(text: &str) -> Result<Self, AtlasError> {
        let raw: RawGraph = serde_json::from_str(text)?;
        Self::build(raw)
    }

    /// Parse JSON bytes and build the index.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AtlasError> {
        let raw: RawGraph = serde_json::from_slice(bytes)?;
        Self::build(raw)
    }

    /// Read a JSON file from disk and build the index.
    pub fn load(path: &Path) -> Result<Self, AtlasError> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Build the index from an already-deserialized payload.
    ///
    /// Fails only when `elements.nodes` or `elements.edges` is missing.
    pub fn build(raw: RawGraph) -> Result<Self, AtlasError> {
        let elements =
            raw.elements.ok_or(AtlasError::MissingField("elements"))?;
        let nodes =
            elements.nodes.ok_or(AtlasError::MissingField("elements.nodes"))?;
        let raw_edges =
            elements.edges.ok_or(AtlasError::MissingField("elements.edges"))?;

        let mut index = Self {
            fetched_at: raw.meta.fetched_at.as_ref().and_then(id_string),
            ..Self::default()
        };

        for node in nodes {
            index.push_node(node.data);
        }
        let mut seen_edges = FxHashSet::default();
        for edge in raw_edges {
            let (Some(source), Some(target)) =
                (id_string(&edge.data.source), id_string(&edge.data.target))
            else {
                log::warn!("skipping edge without source/target");
                continue;
            };
            index.push_edge(&source, &target, &mut seen_edges);
        }

        index.derive_membership();
        index.derive_colors();
        index.derive_tags(raw.meta.auto_tag_index.as_ref());
        index.derive_search(raw.meta.search_index.as_ref());
        index.derive_timestamps();

        let declared = raw.meta.block_count.unwrap_or(0) as usize;
        if declared != 0 && declared != index.blocks.len() {
            log::warn!(
                "payload declares {declared} blocks, parsed {}",
                index.blocks.len()
            );
        }
        log::info!(
            "graph loaded: {} channels, {} blocks, {} edges, {} cross-linked",
            index.channels.len(),
            index.blocks.len(),
            index.edges.len(),
            index.cross_linked_count()
        );
        Ok(index)
    }

    fn push_node(&mut self, data: RawNodeData) {
        let Some(id) = id_string(&data.id) else {
            log::warn!("skipping node without id");
            return;
        };
        let kind = data.kind.as_deref().unwrap_or("Text");
        if kind.eq_ignore_ascii_case("channel") {
            if self.channel_index_map.contains_key(&id) {
                log::warn!("duplicate channel id {id}");
                return;
            }
            let _ = self
                .channel_index_map
                .insert(id.clone(), self.channels.len());
            self.channels.push(Channel {
                label: data.label.unwrap_or_else(|| id.clone()),
                id,
                size: data.size.unwrap_or(0.0) as f32,
                block_count: data.block_count.unwrap_or(0) as usize,
            });
            return;
        }

        if self.block_index_map.contains_key(&id) {
            log::warn!("duplicate block id {id}");
            return;
        }
        let class = BlockClass::from_name(kind).unwrap_or_else(|| {
            log::warn!("unknown block class {kind:?} on {id}, using Text");
            BlockClass::Text
        });
        let mut auto_tags: Vec<String> = Vec::new();
        for tag in data.auto_tags.unwrap_or_default() {
            if !auto_tags.contains(&tag) {
                auto_tags.push(tag);
            }
        }
        let _ = self.block_index_map.insert(id.clone(), self.blocks.len());
        self.blocks.push(Block {
            id,
            class,
            label: data.label.unwrap_or_default(),
            content: data.content,
            description: data.description,
            thumb: data.thumb.as_ref().and_then(url_string),
            source: data.source.as_ref().and_then(url_string),
            created_at: data.created_at.as_ref().and_then(parse_timestamp),
            auto_tags,
        });
    }

    fn push_edge(
        &mut self,
        source: &str,
        target: &str,
        seen: &mut FxHashSet<(usize, usize)>,
    ) {
        let edge = match (
            self.channel_index_map.get(source),
            self.block_index_map.get(target),
        ) {
            (Some(&channel), Some(&block)) => GraphEdge { channel, block },
            _ => match (
                self.channel_index_map.get(target),
                self.block_index_map.get(source),
            ) {
                (Some(&channel), Some(&block)) => GraphEdge { channel, block },
                _ => {
                    log::warn!("dangling edge {source} -> {target}");
                    return;
                }
            },
        };
        if seen.insert((edge.channel, edge.block)) {
            self.edges.push(edge);
        }
    }

    fn derive_membership(&mut self) {
        self.block_channels = vec![Vec::new(); self.blocks.len()];
        self.channel_blocks = vec![Vec::new(); self.channels.len()];
        self.adjacency = Adjacency::new(self.channels.len(), self.blocks.len());
        for edge in &self.edges {
            self.block_channels[edge.block].push(edge.channel);
            self.channel_blocks[edge.channel].push(edge.block);
            self.adjacency.link(edge.channel, edge.block);
        }
        for (channel, blocks) in
            self.channels.iter_mut().zip(&self.channel_blocks)
        {
            channel.block_count = blocks.len();
            if channel.size <= 0.0 {
                channel.size = blocks.len() as f32;
            }
        }
    }

    fn derive_colors(&mut self) {
        self.channel_colors =
            (0..self.channels.len()).map(channel_color).collect();
        self.block_colors = self
            .block_channels
            .iter()
            .map(|channels| match channels.as_slice() {
                [] => NEUTRAL_GRAY,
                [only] => self.channel_colors[*only],
                _ => CROSS_LINK_COLOR,
            })
            .collect();
    }

    fn derive_tags(&mut self, meta: Option<&BTreeMap<String, Vec<Value>>>) {
        if let Some(meta) = meta {
            for (tag, refs) in meta {
                let targets: Vec<usize> = refs
                    .iter()
                    .filter_map(|r| self.resolve_block_ref(r))
                    .collect();
                for block in targets {
                    let tags = &mut self.blocks[block].auto_tags;
                    if !tags.contains(tag) {
                        tags.push(tag.clone());
                    }
                }
            }
        }
        let mut tag_index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, block) in self.blocks.iter().enumerate() {
            for tag in &block.auto_tags {
                tag_index.entry(tag.clone()).or_default().push(i);
            }
        }
        self.auto_tag_index = tag_index;
    }

    fn derive_search(&mut self, meta: Option<&BTreeMap<String, Vec<Value>>>) {
        let mut index = SearchIndex::new();
        for (i, block) in self.blocks.iter().enumerate() {
            index.insert_text(i, &block.label);
            index.insert_text(i, block.class.name());
            if let Some(content) = &block.content {
                index.insert_text(i, content);
            }
            if let Some(description) = &block.description {
                index.insert_text(i, description);
            }
            for tag in &block.auto_tags {
                index.insert_text(i, tag);
            }
            for &channel in &self.block_channels[i] {
                index.insert_text(i, &self.channels[channel].label);
            }
        }
        if let Some(meta) = meta {
            for (key, refs) in meta {
                for block in refs.iter().filter_map(|r| self.resolve_block_ref(r))
                {
                    index.insert_text(block, key);
                }
            }
        }
        self.search_index = index;
    }

    fn derive_timestamps(&mut self) {
        let mut stamps: Vec<(i64, usize)> = self
            .blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.created_at.map(|t| (t, i)))
            .collect();
        stamps.sort_unstable();
        self.sorted_timestamps = stamps;
    }

    /// Numbers are dense block indices, strings are block ids.
    fn resolve_block_ref(&self, value: &Value) -> Option<usize> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .map(|i| i as usize)
                .filter(|&i| i < self.blocks.len()),
            Value::String(id) => self.block_index_map.get(id).copied(),
            _ => None,
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// All channels in dense index order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// All blocks in dense index order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// All resolved edges in payload order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Channel at `index`.
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Block at `index`.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// `fetchedAt` from the payload metadata.
    pub fn fetched_at(&self) -> Option<&str> {
        self.fetched_at.as_deref()
    }

    // ── Id ↔ index ───────────────────────────────────────────────────

    /// Dense index of the block with payload id `id`.
    pub fn block_index(&self, id: &str) -> Option<usize> {
        self.block_index_map.get(id).copied()
    }

    /// Dense index of the channel with payload id `id`.
    pub fn channel_index(&self, id: &str) -> Option<usize> {
        self.channel_index_map.get(id).copied()
    }

    /// Resolve a payload id to a node. Channels win on id collision.
    pub fn resolve(&self, id: &str) -> Option<NodeRef> {
        self.channel_index(id)
            .map(NodeRef::Channel)
            .or_else(|| self.block_index(id).map(NodeRef::Block))
    }

    /// Payload id of `node`.
    pub fn node_id(&self, node: NodeRef) -> Option<&str> {
        match node {
            NodeRef::Channel(i) => self.channels.get(i).map(|c| c.id.as_str()),
            NodeRef::Block(i) => self.blocks.get(i).map(|b| b.id.as_str()),
        }
    }

    // ── Membership ───────────────────────────────────────────────────

    /// Channels containing block `block`, in edge order.
    pub fn channels_of_block(&self, block: usize) -> &[usize] {
        self.block_channels
            .get(block)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Blocks in channel `channel`, in edge order.
    pub fn blocks_of_channel(&self, channel: usize) -> &[usize] {
        self.channel_blocks
            .get(channel)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `block` belongs to more than one channel.
    pub fn is_cross_linked(&self, block: usize) -> bool {
        self.channels_of_block(block).len() > 1
    }

    /// Number of cross-linked blocks.
    pub fn cross_linked_count(&self) -> usize {
        self.block_channels.iter().filter(|c| c.len() > 1).count()
    }

    /// `block` plus every block sharing at least one channel with it.
    ///
    /// Out-of-range indices yield an empty set.
    pub fn block_neighborhood(&self, block: usize) -> FxHashSet<usize> {
        let mut set = FxHashSet::default();
        if block >= self.blocks.len() {
            return set;
        }
        let _ = set.insert(block);
        for &channel in self.channels_of_block(block) {
            set.extend(self.blocks_of_channel(channel).iter().copied());
        }
        set
    }

    /// Undirected channel/block adjacency.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Shortest path between two nodes. See [`Adjacency::bfs_path`].
    pub fn bfs_path(&self, from: NodeRef, to: NodeRef) -> Vec<NodeRef> {
        self.adjacency.bfs_path(from, to)
    }

    /// Shortest path between two payload ids, as payload ids.
    ///
    /// Unknown ids yield an empty path.
    pub fn bfs_path_ids(&self, from: &str, to: &str) -> Vec<String> {
        let (Some(a), Some(b)) = (self.resolve(from), self.resolve(to)) else {
            return Vec::new();
        };
        self.bfs_path(a, b)
            .into_iter()
            .filter_map(|n| self.node_id(n).map(str::to_owned))
            .collect()
    }

    // ── Colors ───────────────────────────────────────────────────────

    /// Palette color of `channel`; neutral gray when out of range.
    pub fn channel_color(&self, channel: usize) -> [f32; 3] {
        self.channel_colors.get(channel).copied().unwrap_or(NEUTRAL_GRAY)
    }

    /// Color of `block`: its channel's color, the cross-link color, or
    /// neutral gray for unconnected or out-of-range blocks.
    pub fn block_color(&self, block: usize) -> [f32; 3] {
        self.block_colors.get(block).copied().unwrap_or(NEUTRAL_GRAY)
    }

    // ── Search, tags, time ───────────────────────────────────────────

    /// Blocks matching every token of `query` by prefix, ascending.
    pub fn search(&self, query: &str) -> Vec<usize> {
        self.search_index.query(query)
    }

    /// The token search index.
    pub fn search_index(&self) -> &SearchIndex {
        &self.search_index
    }

    /// Blocks carrying `tag`, ascending.
    pub fn blocks_with_tag(&self, tag: &str) -> &[usize] {
        self.auto_tag_index
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every known tag with its block count, sorted by tag.
    pub fn tags(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.auto_tag_index
            .iter()
            .map(|(tag, blocks)| (tag.as_str(), blocks.len()))
    }

    /// `(unix seconds, block index)` for every dated block, ascending.
    pub fn sorted_timestamps(&self) -> &[(i64, usize)] {
        &self.sorted_timestamps
    }

    /// Earliest and latest block timestamps.
    pub fn timestamp_range(&self) -> Option<(i64, i64)> {
        let first = self.sorted_timestamps.first()?.0;
        let last = self.sorted_timestamps.last()?.0;
        Some((first, last))
    }

    /// Blocks whose timestamp falls inside a normalized `[lo, hi]` window
    /// over the timestamp range, ascending by index.
    ///
    /// `[0, 1]` (or wider) returns every block, dated or not. Narrower
    /// windows only return dated blocks and may be empty. A NaN bound
    /// matches nothing.
    pub fn blocks_in_time_window(&self, lo: f32, hi: f32) -> Vec<usize> {
        if lo.is_nan() || hi.is_nan() {
            return Vec::new();
        }
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if lo <= 0.0 && hi >= 1.0 {
            return (0..self.blocks.len()).collect();
        }
        let Some((first, last)) = self.timestamp_range() else {
            return Vec::new();
        };
        let span = (last - first) as f64;
        let t_lo = first as f64 + span * f64::from(lo.clamp(0.0, 1.0));
        let t_hi = first as f64 + span * f64::from(hi.clamp(0.0, 1.0));

        let start = self
            .sorted_timestamps
            .partition_point(|&(t, _)| (t as f64) < t_lo);
        let mut out: Vec<usize> = self.sorted_timestamps[start..]
            .iter()
            .take_while(|&&(t, _)| t as f64 <= t_hi)
            .map(|&(_, i)| i)
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of blocks per class, in [`BlockClass::ALL`] order.
    pub fn class_histogram(&self) -> [(BlockClass, usize); 5] {
        BlockClass::ALL.map(|class| {
            (class, self.blocks.iter().filter(|b| b.class == class).count())
        })
    }
}

/// Unix seconds from an ISO-8601 string or a numeric timestamp. Numbers at
/// or above 1e11 are taken as milliseconds.
fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().filter(|v| v.is_finite())?;
            Some(if v.abs() >= 1e11 { (v / 1000.0) as i64 } else { v as i64 })
        }
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
    {
        return Some(naive.and_utc().timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 3 channels, 5 blocks; block b1 is in c1 and c2.
    pub(crate) const FIXTURE: &str = r#"{
        "meta": { "channelCount": 3, "blockCount": 5, "fetchedAt": "2024-05-01" },
        "elements": {
            "nodes": [
                { "data": { "id": "c1", "type": "channel", "label": "Sea" } },
                { "data": { "id": "c2", "type": "channel", "label": "Stone" } },
                { "data": { "id": "c3", "type": "channel", "label": "Sky" } },
                { "data": { "id": "b0", "type": "Image", "label": "wave study",
                            "createdAt": "2020-01-01T00:00:00Z",
                            "autoTags": ["theme:sea", "medium:ink"] } },
                { "data": { "id": "b1", "type": "Text", "label": "tide pool",
                            "createdAt": "2021-01-01T00:00:00Z",
                            "autoTags": ["theme:sea", "theme:stone"] } },
                { "data": { "id": "b2", "type": "Link", "label": "granite quarry",
                            "createdAt": "2022-01-01T00:00:00Z",
                            "autoTags": ["theme:stone"] } },
                { "data": { "id": "b3", "type": "Media", "label": "cloud timelapse",
                            "createdAt": "2023-01-01T00:00:00Z",
                            "thumb": "https://img/b3.png",
                            "autoTags": ["theme:sky", "medium:ink"] } },
                { "data": { "id": "b4", "type": "Mystery", "label": "loose note" } }
            ],
            "edges": [
                { "data": { "id": "e0", "source": "c1", "target": "b0" } },
                { "data": { "id": "e1", "source": "c1", "target": "b1" } },
                { "data": { "id": "e2", "source": "c2", "target": "b1" } },
                { "data": { "id": "e3", "source": "c2", "target": "b2" } },
                { "data": { "id": "e4", "source": "c3", "target": "b3" } },
                { "data": { "id": "e5", "source": "c3", "target": "missing" } }
            ]
        }
    }"#;

    pub(crate) fn fixture() -> GraphIndex {
        GraphIndex::from_json(FIXTURE).unwrap()
    }

    #[test]
    fn id_index_round_trip() {
        let g = fixture();
        for (i, b) in g.blocks().iter().enumerate() {
            assert_eq!(g.block_index(&b.id), Some(i));
        }
        for (i, c) in g.channels().iter().enumerate() {
            assert_eq!(g.channel_index(&c.id), Some(i));
        }
        assert_eq!(g.block_count(), 5);
        assert_eq!(g.channel_count(), 3);
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let g = fixture();
        assert_eq!(g.edges().len(), 5);
    }

    #[test]
    fn unknown_class_defaults_to_text() {
        let g = fixture();
        assert_eq!(g.block(4).unwrap().class, BlockClass::Text);
    }

    #[test]
    fn membership_and_cross_links() {
        let g = fixture();
        assert_eq!(g.channels_of_block(1), &[0, 1]);
        assert!(g.is_cross_linked(1));
        assert!(!g.is_cross_linked(0));
        assert_eq!(g.cross_linked_count(), 1);
        assert_eq!(g.channel(0).unwrap().block_count, 2);
        assert_eq!(g.channel(1).unwrap().size, 2.0);
    }

    #[test]
    fn colors_follow_membership() {
        let g = fixture();
        assert_eq!(g.block_color(0), g.channel_color(0));
        assert_eq!(g.block_color(2), g.channel_color(1));
        assert_eq!(g.block_color(1), CROSS_LINK_COLOR);
        assert_eq!(g.block_color(4), NEUTRAL_GRAY);
        assert_eq!(g.block_color(999), NEUTRAL_GRAY);
        assert_eq!(g.channel_color(999), NEUTRAL_GRAY);
    }

    #[test]
    fn neighborhood_spans_all_shared_channels() {
        let g = fixture();
        let n = g.block_neighborhood(1);
        let mut v: Vec<usize> = n.into_iter().collect();
        v.sort_unstable();
        assert_eq!(v, vec![0, 1, 2]);
        assert_eq!(g.block_neighborhood(4).len(), 1);
        assert!(g.block_neighborhood(99).is_empty());
    }

    #[test]
    fn bfs_by_id() {
        let g = fixture();
        assert_eq!(g.bfs_path_ids("b0", "b0"), vec!["b0"]);
        assert_eq!(g.bfs_path_ids("b0", "b2"), vec!["b0", "c1", "b1", "c2", "b2"]);
        assert!(g.bfs_path_ids("b0", "b3").is_empty());
        assert!(g.bfs_path_ids("b0", "nope").is_empty());
    }

    #[test]
    fn search_covers_labels_tags_and_channels() {
        let g = fixture();
        assert_eq!(g.search("tide"), vec![1]);
        assert_eq!(g.search("sea"), vec![0, 1]);
        assert_eq!(g.search("stone sea"), g.search("sea stone"));
        assert_eq!(g.search("sea stone"), vec![1]);
        assert_eq!(g.search("theme:sea"), vec![0, 1]);
        assert_eq!(g.search("medium:ink theme:sky"), vec![3]);
        assert!(g.search("").is_empty());
    }

    #[test]
    fn tag_index() {
        let g = fixture();
        assert_eq!(g.blocks_with_tag("theme:sea"), &[0, 1]);
        assert_eq!(g.blocks_with_tag("medium:ink"), &[0, 3]);
        assert!(g.blocks_with_tag("nope").is_empty());
    }

    #[test]
    fn timeline_windows() {
        let g = fixture();
        assert_eq!(g.blocks_in_time_window(0.0, 1.0), vec![0, 1, 2, 3, 4]);
        assert_eq!(g.sorted_timestamps().len(), 4);
        let late = g.blocks_in_time_window(0.9, 1.0);
        assert_eq!(late, vec![3]);
        // Midpoint of 2020..2023 falls between samples.
        assert!(g.blocks_in_time_window(0.5, 0.5).is_empty());
        // Exact endpoint collapses onto the first sample.
        assert_eq!(g.blocks_in_time_window(0.0, 0.0), vec![0]);
    }

    #[test]
    fn point_window_keeps_a_block_stamped_exactly_there() {
        let g = GraphIndex::from_json(
            r#"{"elements":{"nodes":[
                {"data":{"id":"a","type":"Text","createdAt":1000000000}},
                {"data":{"id":"b","type":"Text","createdAt":1000000100}},
                {"data":{"id":"c","type":"Text","createdAt":1000000200}}
            ],"edges":[]}}"#,
        )
        .unwrap();
        assert_eq!(g.blocks_in_time_window(0.5, 0.5), vec![1]);
        assert_eq!(g.blocks_in_time_window(1.0, 1.0), vec![2]);
        assert_eq!(g.blocks_in_time_window(0.0, 0.0), vec![0]);
        assert!(g.blocks_in_time_window(0.25, 0.25).is_empty());
    }

    #[test]
    fn non_finite_window_bounds() {
        let g = fixture();
        assert_eq!(
            g.blocks_in_time_window(f32::NEG_INFINITY, f32::INFINITY),
            vec![0, 1, 2, 3, 4]
        );
        assert_eq!(g.blocks_in_time_window(f32::INFINITY, f32::INFINITY), vec![3]);
        assert!(g.blocks_in_time_window(f32::NAN, 1.0).is_empty());
        assert!(g.blocks_in_time_window(0.0, f32::NAN).is_empty());
    }

    #[test]
    fn repeated_and_reversed_edges_collapse() {
        let g = GraphIndex::from_json(
            r#"{"elements":{"nodes":[
                {"data":{"id":"c","type":"channel"}},
                {"data":{"id":"b","type":"Text"}}
            ],"edges":[
                {"data":{"id":"e0","source":"c","target":"b"}},
                {"data":{"id":"e1","source":"c","target":"b"}},
                {"data":{"id":"e2","source":"b","target":"c"}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(g.edges(), &[GraphEdge { channel: 0, block: 0 }]);
        assert_eq!(g.channels_of_block(0), &[0]);
    }

    #[test]
    fn thumbnails_and_metadata() {
        let g = fixture();
        assert_eq!(g.block(3).unwrap().thumb.as_deref(), Some("https://img/b3.png"));
        assert_eq!(g.block(0).unwrap().thumb, None);
        assert_eq!(g.fetched_at(), Some("2024-05-01"));
    }

    #[test]
    fn missing_arrays_are_fatal() {
        assert!(matches!(
            GraphIndex::from_json(r#"{"elements":{"nodes":[]}}"#),
            Err(AtlasError::MissingField("elements.edges"))
        ));
        assert!(matches!(
            GraphIndex::from_json(r"{}"),
            Err(AtlasError::MissingField("elements"))
        ));
        assert!(matches!(
            GraphIndex::from_json("not json"),
            Err(AtlasError::GraphParse(_))
        ));
    }

    #[test]
    fn empty_graph_is_valid() {
        let g = GraphIndex::from_json(r#"{"elements":{"nodes":[],"edges":[]}}"#)
            .unwrap();
        assert_eq!(g.block_count(), 0);
        assert!(g.blocks_in_time_window(0.2, 0.4).is_empty());
        assert!(g.timestamp_range().is_none());
    }

    #[test]
    fn numeric_timestamps() {
        assert_eq!(parse_timestamp(&Value::from(1_600_000_000_000_i64)), Some(1_600_000_000));
        assert_eq!(parse_timestamp(&Value::from(1_600_000_000_i64)), Some(1_600_000_000));
        assert_eq!(parse_timestamp(&Value::from("2020-01-01")), Some(1_577_836_800));
        assert_eq!(parse_timestamp(&Value::from("garbage")), None);
    }
}
