//! Drawing primitives effects use to paint a [`PixelBuffer`].
//!
//! A `GraphicsSurface` borrows a Site's buffer for the duration of one
//! `render()` call; it never outlives that borrow and is never shared across
//! threads (see the Site render thread's exclusive-write invariant).

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// Sub-pixel drawing surface over a [`PixelBuffer`].
pub struct GraphicsSurface<'a> {
    buffer: &'a mut PixelBuffer,
}

impl<'a> GraphicsSurface<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self { buffer }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn fill_solid(&mut self, color: Pixel) {
        for p in self.buffer.as_mut_slice() {
            *p = color;
        }
    }

    /// Overwrites the pixel at `i`. Out-of-range indices are silently clipped.
    pub fn draw_pixel(&mut self, i: isize, color: Pixel) {
        if let Some(p) = self.pixel_mut(i) {
            *p = color;
        }
    }

    /// Saturating add of `color` into the pixel at `i`. Out-of-range indices
    /// are silently clipped.
    pub fn blend_pixel(&mut self, i: isize, color: Pixel) {
        if let Some(p) = self.pixel_mut(i) {
            *p = p.saturating_add(color);
        }
    }

    pub fn fade_to_black_by(&mut self, i: isize, factor: f64) {
        if let Some(p) = self.pixel_mut(i) {
            *p = p.fade(factor);
        }
    }

    /// Anti-aliased run of `count` pixels' worth of `color`, starting at the
    /// real-valued position `start`.
    ///
    /// The leading and trailing partial pixels are blended with coverage
    /// proportional to how much of their width the run actually occupies;
    /// fully covered interior pixels are blended unfaded. A `count` of zero
    /// is a no-op; a negative `count` is treated as zero. Any pixel index the
    /// run would touch outside `[0, len())` is silently clipped.
    pub fn draw_pixels(&mut self, start: f64, count: f64, color: Pixel) {
        let count = count.max(0.0);
        if count == 0.0 {
            return;
        }

        let head = start.ceil() - start;
        let first_index = start.floor() as isize;
        let first_coverage = head.min(count);
        self.blend_pixel(first_index, color.fade(1.0 - first_coverage));

        let cursor = start.ceil() as isize;
        let remaining = count - first_coverage;
        let full_pixels = remaining.floor();
        let trailing_frac = remaining - full_pixels;

        for k in 0..(full_pixels as i64) {
            self.blend_pixel(cursor + k as isize, color);
        }
        if trailing_frac > 0.0 {
            self.blend_pixel(cursor + full_pixels as isize, color.fade(1.0 - trailing_frac));
        }
    }

    /// Pixel `i` = `HSV((start_hue_deg + i * delta_hue_deg) mod 360, 1, 1)`.
    ///
    /// `delta_hue_deg = 0` degenerates to [`Self::fill_solid`] with
    /// `HSV(start_hue_deg, 1, 1)`, since every pixel then shares one hue.
    pub fn fill_rainbow(&mut self, start_hue_deg: f64, delta_hue_deg: f64) {
        for (i, p) in self.buffer.as_mut_slice().iter_mut().enumerate() {
            let hue = start_hue_deg + (i as f64) * delta_hue_deg;
            *p = Pixel::from_hsv(hue, 1.0, 1.0);
        }
    }

    /// 1-D box blur with edge-clamped sampling.
    pub fn blur(&mut self, radius: usize) {
        if radius == 0 {
            return;
        }
        let len = self.buffer.len();
        if len == 0 {
            return;
        }
        let src = self.buffer.as_slice().to_vec();
        let window = 2 * radius + 1;
        for i in 0..len {
            let mut r_sum = 0u32;
            let mut g_sum = 0u32;
            let mut b_sum = 0u32;
            for k in -(radius as isize)..=(radius as isize) {
                let idx = (i as isize + k).clamp(0, len as isize - 1) as usize;
                let p = src[idx];
                r_sum += u32::from(p.r);
                g_sum += u32::from(p.g);
                b_sum += u32::from(p.b);
            }
            self.buffer.as_mut_slice()[i] = Pixel::new(
                (r_sum / window as u32) as u8,
                (g_sum / window as u32) as u8,
                (b_sum / window as u32) as u8,
            );
        }
    }

    fn pixel_mut(&mut self, i: isize) -> Option<&mut Pixel> {
        if i < 0 {
            return None;
        }
        self.buffer.as_mut_slice().get_mut(i as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(len: usize) -> PixelBuffer {
        PixelBuffer::new(len)
    }

    #[test]
    fn fill_solid_sets_every_pixel() {
        let mut b = buf(3);
        GraphicsSurface::new(&mut b).fill_solid(Pixel::WHITE);
        assert!(b.as_slice().iter().all(|p| *p == Pixel::WHITE));
    }

    #[test]
    fn draw_pixel_clips_out_of_range() {
        let mut b = buf(3);
        let mut s = GraphicsSurface::new(&mut b);
        s.draw_pixel(-1, Pixel::WHITE);
        s.draw_pixel(3, Pixel::WHITE);
        assert!(b.as_slice().iter().all(|p| *p == Pixel::BLACK));
    }

    #[test]
    fn blend_pixel_saturates() {
        let mut b = buf(1);
        let mut s = GraphicsSurface::new(&mut b);
        s.blend_pixel(0, Pixel::new(200, 0, 0));
        s.blend_pixel(0, Pixel::new(100, 0, 0));
        assert_eq!(b.as_slice()[0], Pixel::new(255, 0, 0));
    }

    #[test]
    fn draw_pixels_negative_start_touches_only_right_half_of_index_zero() {
        let mut b = buf(3);
        GraphicsSurface::new(&mut b).draw_pixels(-0.5, 1.0, Pixel::WHITE);
        assert_eq!(b.as_slice()[0], Pixel::new(128, 128, 128));
        assert_eq!(b.as_slice()[1], Pixel::BLACK);
        assert_eq!(b.as_slice()[2], Pixel::BLACK);
    }

    #[test]
    fn draw_pixels_trailing_edge_touches_only_left_half_of_last_index() {
        let mut b = buf(3);
        GraphicsSurface::new(&mut b).draw_pixels(2.5, 1.0, Pixel::WHITE);
        assert_eq!(b.as_slice()[2], Pixel::new(128, 128, 128));
    }

    #[test]
    fn draw_pixels_zero_count_is_noop() {
        let mut b = buf(3);
        GraphicsSurface::new(&mut b).draw_pixels(1.0, 0.0, Pixel::WHITE);
        assert!(b.as_slice().iter().all(|p| *p == Pixel::BLACK));
    }

    #[test]
    fn draw_pixels_covers_interior_pixels_unfaded() {
        let mut b = buf(5);
        GraphicsSurface::new(&mut b).draw_pixels(1.0, 3.0, Pixel::WHITE);
        assert_eq!(b.as_slice()[0], Pixel::BLACK);
        assert_eq!(b.as_slice()[1], Pixel::WHITE);
        assert_eq!(b.as_slice()[2], Pixel::WHITE);
        assert_eq!(b.as_slice()[3], Pixel::WHITE);
        assert_eq!(b.as_slice()[4], Pixel::BLACK);
    }

    #[test]
    fn fade_to_black_by_clips_out_of_range() {
        let mut b = buf(1);
        GraphicsSurface::new(&mut b).fade_to_black_by(5, 0.5);
    }

    #[test]
    fn fill_rainbow_zero_delta_matches_fill_solid() {
        let mut a = buf(4);
        let mut b = buf(4);
        GraphicsSurface::new(&mut a).fill_rainbow(90.0, 0.0);
        GraphicsSurface::new(&mut b).fill_solid(Pixel::from_hsv(90.0, 1.0, 1.0));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn blur_is_noop_on_uniform_buffer() {
        let mut b = buf(5);
        GraphicsSurface::new(&mut b).fill_solid(Pixel::new(10, 20, 30));
        GraphicsSurface::new(&mut b).blur(1);
        assert!(b.as_slice().iter().all(|p| *p == Pixel::new(10, 20, 30)));
    }

    #[test]
    fn blur_clamps_at_edges() {
        let mut b = buf(3);
        b.as_mut_slice()[1] = Pixel::new(255, 0, 0);
        GraphicsSurface::new(&mut b).blur(1);
        // Edge pixel 0 averages {clamp(-1)=0(black), 0(black), 1(red)} -> 1/3 red.
        assert_eq!(b.as_slice()[0].r, 85);
    }
}
