//! GPU hit-testing through a pick-ID color buffer.
//!
//! Every block and channel instance carries a constant pick color that
//! encodes `id = index + 1` in its RGB bytes (0 means no hit). The picker
//! renders the pick meshes through a one-pixel view offset at the cursor,
//! reads that pixel back, and decodes it to a typed target.
//!
//! Readback stalls the pipeline, so calls are throttled: inside the
//! minimum interval the previous result is returned without touching the
//! backend.

use glam::Vec2;
use web_time::{Duration, Instant};

use super::backend::{MeshHandle, RenderBackend};
use crate::camera::core::Camera;
use crate::graph::NodeRef;

/// Largest pick ID that fits in three color bytes.
pub const MAX_PICK_ID: u32 = 0x00ff_ffff;

/// Pack a pick ID into RGB bytes, least significant byte first.
pub fn encode_pick_id(id: u32) -> [u8; 3] {
    let [r, g, b, _] = id.min(MAX_PICK_ID).to_le_bytes();
    [r, g, b]
}

/// Recover a pick ID from a read-back RGBA pixel. Alpha is ignored.
pub fn decode_pick_pixel(pixel: [u8; 4]) -> u32 {
    u32::from_le_bytes([pixel[0], pixel[1], pixel[2], 0])
}

/// A typed pick target resolved from a raw pick ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickTarget {
    /// No target (background or outside the viewport).
    #[default]
    None,
    /// A block, by dense index.
    Block(usize),
    /// A channel, by dense index.
    Channel(usize),
}

impl PickTarget {
    /// Block index as `i32`, or `-1` for anything that is not a block.
    pub fn as_block_i32(&self) -> i32 {
        match *self {
            Self::Block(i) => i as i32,
            _ => -1,
        }
    }

    /// The graph node under the cursor, if any.
    pub fn node(&self) -> Option<NodeRef> {
        match *self {
            Self::None => None,
            Self::Block(i) => Some(NodeRef::Block(i)),
            Self::Channel(i) => Some(NodeRef::Channel(i)),
        }
    }

    /// Returns `true` if this target is `None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Maps raw pick IDs to typed [`PickTarget`] values.
///
/// Pick IDs are contiguous:
/// - `0` → no hit
/// - `1..=block_count` → block (ID = block index + 1)
/// - `block_count+1..=block_count+channel_count` → channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickMap {
    block_count: u32,
    channel_count: u32,
}

impl PickMap {
    /// Create a pick map for the given entity counts.
    pub fn new(block_count: usize, channel_count: usize) -> Self {
        let clamp = |n: usize| u32::try_from(n).unwrap_or(MAX_PICK_ID);
        let blocks = clamp(block_count).min(MAX_PICK_ID);
        Self {
            block_count: blocks,
            channel_count: clamp(channel_count).min(MAX_PICK_ID - blocks),
        }
    }

    /// ID offset of the first channel (IDs are `offset + index + 1`).
    pub fn channel_offset(&self) -> u32 {
        self.block_count
    }

    /// Pick ID of block `index`.
    pub fn block_id(&self, index: usize) -> u32 {
        index as u32 + 1
    }

    /// Pick ID of channel `index`.
    pub fn channel_id(&self, index: usize) -> u32 {
        self.block_count + index as u32 + 1
    }

    /// Resolve a raw pick ID to a typed target.
    pub fn resolve(&self, raw_id: u32) -> PickTarget {
        if raw_id == 0 {
            return PickTarget::None;
        }
        let idx = raw_id - 1; // pick IDs are 1-based
        if idx < self.block_count {
            return PickTarget::Block(idx as usize);
        }
        let channel = idx - self.block_count;
        if channel < self.channel_count {
            return PickTarget::Channel(channel as usize);
        }
        PickTarget::None
    }
}

/// Throttled one-pixel picker.
#[derive(Debug, Clone)]
pub struct Picker {
    map: PickMap,
    min_interval: Duration,
    last_at: Option<Instant>,
    last: PickTarget,
}

impl Picker {
    /// Picker resolving through `map`, reading back at most once per
    /// `min_interval`.
    pub fn new(map: PickMap, min_interval: Duration) -> Self {
        Self {
            map,
            min_interval,
            last_at: None,
            last: PickTarget::None,
        }
    }

    /// The pick map.
    pub fn map(&self) -> &PickMap {
        &self.map
    }

    /// Most recent result.
    pub fn last(&self) -> PickTarget {
        self.last
    }

    /// Change the throttle interval.
    pub fn set_min_interval(&mut self, min_interval: Duration) {
        self.min_interval = min_interval;
    }

    /// Pick at `cursor`, unless the previous readback was less than the
    /// minimum interval ago, in which case the previous result is returned.
    pub fn pick<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        meshes: &[MeshHandle],
        camera: &Camera,
        cursor: Vec2,
        viewport: (u32, u32),
        now: Instant,
    ) -> PickTarget {
        if let Some(at) = self.last_at {
            if now.saturating_duration_since(at) < self.min_interval {
                return self.last;
            }
        }
        self.pick_now(backend, meshes, camera, cursor, viewport, now)
    }

    /// Pick at `cursor` regardless of the throttle (used for clicks).
    pub fn pick_now<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        meshes: &[MeshHandle],
        camera: &Camera,
        cursor: Vec2,
        viewport: (u32, u32),
        now: Instant,
    ) -> PickTarget {
        self.last_at = Some(now);
        self.last = match camera.pick_view(cursor, viewport) {
            Some(view) => {
                let pixel = backend.read_pick_pixel(meshes, &view);
                self.map.resolve(decode_pick_pixel(pixel))
            }
            None => PickTarget::None,
        };
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_ids_survive_the_color_round_trip() {
        for id in [0, 1, 42, 255, 256, 65_535, 65_536, MAX_PICK_ID] {
            let [r, g, b] = encode_pick_id(id);
            assert_eq!(decode_pick_pixel([r, g, b, 255]), id);
        }
    }

    #[test]
    fn map_splits_blocks_and_channels() {
        let map = PickMap::new(100, 3);
        assert_eq!(map.resolve(0), PickTarget::None);
        assert_eq!(map.resolve(43), PickTarget::Block(42));
        assert_eq!(map.resolve(map.block_id(42)), PickTarget::Block(42));
        assert_eq!(map.resolve(101), PickTarget::Channel(0));
        assert_eq!(map.resolve(map.channel_id(2)), PickTarget::Channel(2));
        assert_eq!(map.resolve(104), PickTarget::None);
    }

    #[test]
    fn no_hit_is_minus_one() {
        assert_eq!(PickTarget::None.as_block_i32(), -1);
        assert_eq!(PickTarget::Channel(3).as_block_i32(), -1);
        assert_eq!(PickTarget::Block(42).as_block_i32(), 42);
        assert_eq!(PickTarget::Block(7).node(), Some(NodeRef::Block(7)));
    }
}
