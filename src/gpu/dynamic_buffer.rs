//! Storage buffers that grow on demand.
//!
//! Instance counts are fixed per session, so growth only happens when a
//! mesh is first filled past its initial allocation; the returned flag
//! tells the owner to rebuild bind groups.

use std::marker::PhantomData;

/// A typed GPU buffer with 2x growth. Never shrinks.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

/// Smallest allocation; wgpu rejects zero-sized storage bindings.
const MIN_BYTES: usize = 64;

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Room for `capacity` items.
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: allocate(device, label, bytes_for::<T>(capacity), usage),
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Upload `data`, reallocating if it does not fit.
    ///
    /// Returns `true` when the underlying buffer was replaced.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let reallocated = if data.len() > self.capacity {
            let grown = (data.len() * 2).max(self.capacity + 16);
            self.buffer =
                allocate(device, &self.label, bytes_for::<T>(grown), self.usage);
            log::debug!("{}: grew to {grown} items", self.label);
            self.capacity = grown;
            true
        } else {
            false
        };
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = data.len();
        reallocated
    }

    /// The wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Items written by the last upload.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last upload was empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocated item capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn bytes_for<T>(items: usize) -> u64 {
    (items * size_of::<T>()).max(MIN_BYTES) as u64
}

fn allocate(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
