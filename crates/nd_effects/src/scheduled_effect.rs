//! Pairs an [`Effect`] with the [`Schedule`] window it is eligible to run in.

use std::time::SystemTime;

use chrono::NaiveDateTime;
use nd_core::GraphicsSurface;

use crate::effect::Effect;
use crate::schedule::Schedule;

pub struct ScheduledEffect {
    effect: Box<dyn Effect>,
    schedule: Schedule,
}

impl ScheduledEffect {
    #[must_use]
    pub fn new(effect: Box<dyn Effect>, schedule: Schedule) -> Self {
        Self { effect, schedule }
    }

    #[must_use]
    pub fn is_active(&self, now_local: NaiveDateTime) -> bool {
        self.schedule.is_active(now_local)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.effect.name()
    }

    pub fn render(&mut self, surface: &mut GraphicsSurface<'_>, now: SystemTime) {
        self.effect.render(surface, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::solid::SolidColor;
    use chrono::NaiveDate;
    use nd_core::{Pixel, PixelBuffer};

    #[test]
    fn reports_effect_name_and_honors_schedule() {
        let se = ScheduledEffect::new(
            Box::new(SolidColor::new(Pixel::WHITE)),
            Schedule::always(),
        );
        assert_eq!(se.name(), "solid_color");
        let now = NaiveDate::from_ymd_opt(2023, 11, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert!(se.is_active(now));
    }

    #[test]
    fn render_delegates_to_wrapped_effect() {
        let mut se = ScheduledEffect::new(
            Box::new(SolidColor::new(Pixel::new(9, 9, 9))),
            Schedule::always(),
        );
        let mut buf = PixelBuffer::new(2);
        se.render(&mut GraphicsSurface::new(&mut buf), SystemTime::now());
        assert!(buf.as_slice().iter().all(|p| *p == Pixel::new(9, 9, 9)));
    }
}
