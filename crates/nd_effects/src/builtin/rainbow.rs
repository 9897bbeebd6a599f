use std::time::SystemTime;

use nd_core::GraphicsSurface;

use crate::effect::Effect;

/// A static rainbow gradient across the strip; `delta_hue_deg` controls how
/// many hue cycles fit across the buffer.
pub struct Rainbow {
    start_hue_deg: f64,
    delta_hue_deg: f64,
}

impl Rainbow {
    #[must_use]
    pub fn new(start_hue_deg: f64, delta_hue_deg: f64) -> Self {
        Self {
            start_hue_deg,
            delta_hue_deg,
        }
    }
}

impl Effect for Rainbow {
    fn render(&mut self, surface: &mut GraphicsSurface<'_>, _now: SystemTime) {
        surface.fill_rainbow(self.start_hue_deg, self.delta_hue_deg);
    }

    fn name(&self) -> &str {
        "rainbow"
    }
}
