use std::time::SystemTime;

use nd_core::{GraphicsSurface, Pixel};

use crate::effect::Effect;

/// Fills the whole buffer with one fixed color every tick.
pub struct SolidColor {
    color: Pixel,
}

impl SolidColor {
    #[must_use]
    pub fn new(color: Pixel) -> Self {
        Self { color }
    }
}

impl Effect for SolidColor {
    fn render(&mut self, surface: &mut GraphicsSurface<'_>, _now: SystemTime) {
        surface.fill_solid(self.color);
    }

    fn name(&self) -> &str {
        "solid_color"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::PixelBuffer;

    #[test]
    fn fills_every_pixel_with_its_color() {
        let mut buf = PixelBuffer::new(4);
        let mut effect = SolidColor::new(Pixel::new(1, 2, 3));
        effect.render(&mut GraphicsSurface::new(&mut buf), SystemTime::now());
        assert!(buf.as_slice().iter().all(|p| *p == Pixel::new(1, 2, 3)));
    }
}
