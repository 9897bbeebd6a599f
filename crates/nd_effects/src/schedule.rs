//! Weekly activation window for a [`crate::scheduled_effect::ScheduledEffect`].

use chrono::{Datelike, NaiveDateTime, Timelike};

/// `days_of_week` is a bitmask, bit 0 = Monday through bit 6 = Sunday, matching
/// [`chrono::Weekday::num_days_from_monday`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub days_of_week: u8,
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_hour: u32,
    pub end_minute: u32,
}

impl Schedule {
    #[must_use]
    pub fn new(
        days_of_week: u8,
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Self {
        Self {
            days_of_week,
            start_hour,
            start_minute,
            end_hour,
            end_minute,
        }
    }

    /// Every day, all day.
    #[must_use]
    pub fn always() -> Self {
        Self::new(0x7F, 0, 0, 23, 60)
    }

    /// True iff `now_local`'s day-of-week bit is set and its time of day falls
    /// in `[start_hour:start_minute, end_hour:end_minute]` inclusive at minute
    /// resolution. An `start_hour > end_hour` schedule never activates — per
    /// the source, overnight (wrap-past-midnight) windows are not supported.
    #[must_use]
    pub fn is_active(&self, now_local: NaiveDateTime) -> bool {
        if self.start_hour > self.end_hour {
            return false;
        }
        let day_bit = 1u8 << now_local.weekday().num_days_from_monday();
        if self.days_of_week & day_bit == 0 {
            return false;
        }
        let minutes_of_day = now_local.hour() * 60 + now_local.minute();
        let start = self.start_hour * 60 + self.start_minute;
        let end = self.end_hour * 60 + self.end_minute;
        minutes_of_day >= start && minutes_of_day <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weekday_mask(day: chrono::Weekday) -> u8 {
        1u8 << day.num_days_from_monday()
    }

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    // Mon..Fri, 09:00..17:00 — spec scenario 5.
    fn weekday_business_hours() -> Schedule {
        let mask = weekday_mask(chrono::Weekday::Mon)
            | weekday_mask(chrono::Weekday::Tue)
            | weekday_mask(chrono::Weekday::Wed)
            | weekday_mask(chrono::Weekday::Thu)
            | weekday_mask(chrono::Weekday::Fri);
        Schedule::new(mask, 9, 0, 17, 0)
    }

    #[test]
    fn saturday_noon_is_inactive() {
        // 2023-11-25 is a Saturday.
        let s = weekday_business_hours();
        assert!(!s.is_active(dt(2023, 11, 25, 12, 0, 0)));
    }

    #[test]
    fn monday_before_open_is_inactive() {
        // 2023-11-20 is a Monday.
        let s = weekday_business_hours();
        assert!(!s.is_active(dt(2023, 11, 20, 8, 59, 59)));
    }

    #[test]
    fn monday_at_open_is_active() {
        let s = weekday_business_hours();
        assert!(s.is_active(dt(2023, 11, 20, 9, 0, 0)));
    }

    #[test]
    fn monday_just_before_close_minute_rolls_over_is_active() {
        let s = weekday_business_hours();
        assert!(s.is_active(dt(2023, 11, 20, 17, 0, 59)));
    }

    #[test]
    fn monday_one_minute_past_close_is_inactive() {
        let s = weekday_business_hours();
        assert!(!s.is_active(dt(2023, 11, 20, 17, 1, 0)));
    }

    #[test]
    fn always_is_active_any_day_and_hour() {
        let s = Schedule::always();
        assert!(s.is_active(dt(2023, 11, 25, 3, 30, 0)));
        assert!(s.is_active(dt(2023, 11, 20, 23, 59, 0)));
    }

    #[test]
    fn start_hour_after_end_hour_never_activates() {
        let s = Schedule::new(0x7F, 18, 0, 6, 0);
        assert!(!s.is_active(dt(2023, 11, 20, 20, 0, 0)));
    }
}
