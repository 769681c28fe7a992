//! Growable GPU buffers for per-frame data whose size follows the scene.

use std::marker::PhantomData;

/// Smallest allocation, in bytes.
const MIN_CAPACITY: u64 = 256;

/// Capacity to allocate for `needed` bytes when `capacity` is too small:
/// 2x growth, never below [`MIN_CAPACITY`].
fn grown_capacity(needed: u64, capacity: u64) -> u64 {
    if needed <= capacity {
        capacity
    } else {
        (needed * 2).max(MIN_CAPACITY)
    }
}

/// A GPU buffer of `T` that grows when written past its capacity.
///
/// Never shrinks. A write that reallocates returns `true` so the owner can
/// rebuild bind groups that reference the old buffer.
pub struct DynamicBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: u64,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DynamicBuffer<T> {
    /// Buffer with room for `items` elements.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        items: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = ((items * size_of::<T>()) as u64).max(MIN_CAPACITY);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
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

    /// Replace the contents, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len() as u64;
        let capacity = grown_capacity(needed, self.capacity);
        let reallocated = capacity != self.capacity;
        if reallocated {
            log::debug!("growing {} to {capacity} bytes", self.label);
            self.buffer = Self::allocate(device, &self.label, capacity, self.usage);
            self.capacity = capacity;
        }
        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.count = data.len();
        reallocated
    }

    /// Underlying buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of elements written by the last [`write`](Self::write).
    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_doubles_and_respects_minimum() {
        assert_eq!(grown_capacity(10, 0), MIN_CAPACITY);
        assert_eq!(grown_capacity(1000, 256), 2000);
        assert_eq!(grown_capacity(200, 256), 256);
        assert_eq!(grown_capacity(256, 256), 256);
    }
}
