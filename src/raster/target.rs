//! Shared render target used by the raster workers.
//!
//! Colour and depth are split into rows and every row sits behind its own
//! `Mutex`. A worker locks one row, does its read-test-write work on that row
//! and releases it, so two primitives that touch the same row from different
//! threads never lose each other's updates. Different rows never contend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{color::Color, raster::buffer::FrameBuffer, renderer::Rgba};

/// Mutable view of one output row.
pub struct Row<'a> {
    pub color: &'a mut [Rgba],
    pub depth: &'a mut [f32],
}

pub struct FrameTarget<'a> {
    width: usize,
    height: usize,
    rows: Vec<Mutex<Row<'a>>>,
}

impl<'a> FrameTarget<'a> {
    /// Borrow both buffers for the duration of a frame.
    pub fn new(color: &'a mut FrameBuffer<Rgba>, depth: &'a mut FrameBuffer<f32>) -> Self {
        debug_assert_eq!(
            (color.width(), color.height()),
            (depth.width(), depth.height())
        );
        let width = color.width();
        let height = color.height();
        let rows = color
            .rows_mut()
            .zip(depth.rows_mut())
            .take(height)
            .map(|(color, depth)| Mutex::new(Row { color, depth }))
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Exclusive access to row `y` for as long as the guard lives.
    #[inline]
    pub fn lock_row(&self, y: usize) -> MutexGuard<'_, Row<'a>> {
        // A poisoned row still holds valid pixels; the panic that poisoned it
        // is reported by the worker pool.
        self.rows[y].lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Overwrite one colour cell. Out-of-bounds writes are dropped.
    pub fn plot(&self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let mut row = self.lock_row(y as usize);
        row.color[x as usize] = color.to_rgb();
    }

    /// Source-over blend `color` onto the existing cell with weight `alpha`.
    /// Out-of-bounds writes are dropped.
    pub fn blend(&self, x: i32, y: i32, color: Color, alpha: f32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let mut row = self.lock_row(y as usize);
        let cell = &mut row.color[x as usize];
        let dst = Color::from_rgb(*cell);
        *cell = dst.lerp(color, alpha.clamp(0.0, 1.0)).to_rgb();
    }

    /// Read one colour cell, `None` outside the target.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Rgba> {
        self.in_bounds(x, y)
            .then(|| self.lock_row(y as usize).color[x as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffers(w: usize, h: usize) -> (FrameBuffer<Rgba>, FrameBuffer<f32>) {
        (FrameBuffer::filled(w, h, 0), FrameBuffer::filled(w, h, 0.0))
    }

    #[test]
    fn plot_and_blend_respect_bounds() {
        let (mut color, mut depth) = buffers(4, 4);
        {
            let target = FrameTarget::new(&mut color, &mut depth);
            target.plot(-1, 0, Color::WHITE);
            target.plot(4, 0, Color::WHITE);
            target.blend(0, 4, Color::WHITE, 1.0);
            target.plot(1, 2, Color::RED);
            assert_eq!(target.color_at(1, 2), Some(0x00_FF0000));
            assert_eq!(target.color_at(9, 9), None);
        }
        assert_eq!(color.as_slice().iter().filter(|&&px| px != 0).count(), 1);
        assert_eq!(color.get(1, 2), 0x00_FF0000);
    }

    #[test]
    fn blend_mixes_with_existing_content() {
        let (mut color, mut depth) = buffers(2, 1);
        color.fill(Color::BLUE.to_rgb());
        {
            let target = FrameTarget::new(&mut color, &mut depth);
            target.blend(0, 0, Color::RED, 0.5);
        }
        assert_eq!(color.get(0, 0), 0x00_800080);
        assert_eq!(color.get(1, 0), 0x00_0000FF);
    }

    #[test]
    fn row_lock_exposes_both_buffers() {
        let (mut color, mut depth) = buffers(3, 2);
        {
            let target = FrameTarget::new(&mut color, &mut depth);
            let mut row = target.lock_row(1);
            row.color[2] = 0x123456;
            row.depth[2] = 0.25;
        }
        assert_eq!(color.get(2, 1), 0x123456);
        assert_eq!(depth.get(2, 1), 0.25);
    }
}
