//! Dense row-major 2-D buffers.
//!
//! The same type backs the colour target (`FrameBuffer<Rgba>`), the depth
//! target (`FrameBuffer<f32>`) and texture storage.

use std::slice::ChunksMut;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> FrameBuffer<T> {
    /// Allocate `width * height` cells set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major vector. Returns `None` on a size mismatch.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index_of(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index_of(x, y);
        self.data[i] = value;
    }

    #[inline]
    pub fn get_index(&self, index: usize) -> T {
        self.data[index]
    }

    #[inline]
    pub fn set_index(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Reallocate for a new resolution; every cell is reset to `value`.
    pub fn resize(&mut self, width: usize, height: usize, value: T) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, value);
    }

    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, T> {
        // `chunks_mut(0)` panics; a zero-width buffer has no rows anyway.
        self.data.chunks_mut(self.width.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
