//! A Site owns one pixel buffer and the strips that carve it up, and drives
//! them with a single render thread.
//!
//! [`Site::tick`] is the pure core: given a snapshot of monotonic and
//! wall-clock time it renders exactly once and dispatches the result. It
//! takes no locks of its own and spawns no threads, so it's exercised
//! directly in tests. [`Site::start`] is the thin threaded driver that calls
//! `tick` in a loop at `target_fps`, matching the engine/frontend split the
//! source's own render loop uses.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use chrono::NaiveDateTime;
use nd_core::{present_time_parts, GraphicsSurface, PixelBuffer};
use nd_effects::{pick_effect_index, select_active, ScheduledEffect};
use nd_net::{ConnectionState, StripClient};
use parking_lot::Mutex;

use crate::error::{Result, SiteError};

/// One strip's placement within the site buffer plus its wire client.
pub struct StripSpec {
    pub offset: usize,
    pub length: usize,
    pub reversed: bool,
    pub client: StripClient,
}

/// Status of one strip, for the external status line (§6).
pub struct StripStatus {
    pub queue_depth: usize,
    pub connected: bool,
    pub drops_total: u64,
}

/// What happened during one [`Site::tick`] call, for tests and the render
/// loop driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub rendered: bool,
    pub effect_name: Option<String>,
}

/// Read-only handle to a running Site, for status reporting.
#[derive(Clone)]
pub struct SiteHandle {
    pub name: String,
    target_fps: f64,
    current_effect_name: Arc<Mutex<String>>,
    spare_ms: Arc<AtomicI64>,
    strips: Arc<Vec<StripClient>>,
}

impl SiteHandle {
    #[must_use]
    pub fn current_effect_name(&self) -> String {
        self.current_effect_name.lock().clone()
    }

    #[must_use]
    pub fn spare_ms(&self) -> i64 {
        self.spare_ms.load(Ordering::Relaxed)
    }

    /// Frame rate actually sustained over the last ~1 s window, derived from
    /// `spare_ms`: a period that ran with no spare time at all is running at
    /// `target_fps`; one that overran is running slower.
    #[must_use]
    pub fn fps_actual(&self) -> f64 {
        let period_ms = 1000.0 / self.target_fps;
        let spare = self.spare_ms() as f64;
        if spare >= 0.0 {
            self.target_fps
        } else {
            1000.0 / (period_ms - spare)
        }
    }

    #[must_use]
    pub fn strip_statuses(&self) -> Vec<StripStatus> {
        self.strips
            .iter()
            .map(|c| StripStatus {
                queue_depth: c.queue_len(),
                connected: c.state() == ConnectionState::Connected,
                drops_total: c.drop_count(),
            })
            .collect()
    }
}

pub struct Site {
    name: String,
    buffer: PixelBuffer,
    strips: Vec<StripSpec>,
    schedules: Vec<ScheduledEffect>,
    target_fps: f64,
    /// `None` means schedule activation falls back to `TZ`/`America/Los_Angeles`
    /// (see `env_timezone`); `Some` pins it to one IANA zone, for a site
    /// physically elsewhere.
    timezone: Option<chrono_tz::Tz>,
    current_effect_name: Arc<Mutex<String>>,
    spare_ms: Arc<AtomicI64>,
}

impl Site {
    /// Validates that every strip's `[offset, offset+length)` lies within
    /// `pixel_count`, per invariant 2.
    pub fn new(
        name: impl Into<String>,
        pixel_count: usize,
        strips: Vec<StripSpec>,
        schedules: Vec<ScheduledEffect>,
        target_fps: f64,
        timezone: Option<chrono_tz::Tz>,
    ) -> Result<Self> {
        let name = name.into();
        for (i, s) in strips.iter().enumerate() {
            let end = s.offset + s.length;
            if end > pixel_count {
                return Err(SiteError::StripOutOfBounds {
                    site_name: name.clone(),
                    strip_index: i,
                    offset: s.offset,
                    end,
                    buffer_len: pixel_count,
                });
            }
        }
        if schedules.is_empty() {
            return Err(SiteError::NoEffects(name));
        }
        Ok(Self {
            name,
            buffer: PixelBuffer::new(pixel_count),
            strips,
            schedules,
            target_fps,
            timezone,
            current_effect_name: Arc::new(Mutex::new(String::new())),
            spare_ms: Arc::new(AtomicI64::new(0)),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders at most once and dispatches to every strip, per §4.5's tick
    /// algorithm. `elapsed_since_start` drives the effect rotation;
    /// `now_utc`/`now_local` are the wall-clock and local-civil-time readings
    /// for this tick.
    pub fn tick(
        &mut self,
        elapsed_since_start: Duration,
        now_utc: SystemTime,
        now_local: NaiveDateTime,
    ) -> TickOutcome {
        let active = select_active(&self.schedules, now_local);
        let outcome = if active.is_empty() {
            // Open question, resolved: dispatch the stale buffer unchanged
            // rather than clearing to black. See SPEC_FULL.md.
            TickOutcome {
                rendered: false,
                effect_name: None,
            }
        } else {
            let index = pick_effect_index(elapsed_since_start.as_secs_f64(), active.len());
            let chosen = active[index];
            let mut surface = GraphicsSurface::new(&mut self.buffer);
            self.schedules[chosen].render(&mut surface, now_utc);
            let name = self.schedules[chosen].name().to_string();
            *self.current_effect_name.lock() = name.clone();
            TickOutcome {
                rendered: true,
                effect_name: Some(name),
            }
        };

        let (seconds, micros) = present_time_parts(now_utc);
        for strip in &self.strips {
            // enqueue checks readiness itself and drops+counts when not
            // ready; gating the call here would make that branch dead code.
            let slice = self.buffer.extract(strip.offset, strip.length, strip.reversed);
            strip.client.enqueue(&slice, seconds, micros);
        }

        outcome
    }

    /// Spawns every strip's send worker and the render thread, and returns a
    /// read-only status handle. Runs until process exit.
    #[must_use]
    pub fn start(self) -> SiteHandle {
        let strip_clients: Vec<StripClient> = self.strips.iter().map(|s| s.client.clone()).collect();
        for s in &strip_clients {
            s.spawn_worker();
        }

        let handle = SiteHandle {
            name: self.name.clone(),
            target_fps: self.target_fps,
            current_effect_name: Arc::clone(&self.current_effect_name),
            spare_ms: Arc::clone(&self.spare_ms),
            strips: Arc::new(strip_clients),
        };

        let mut site = self;
        let spare_ms = Arc::clone(&handle.spare_ms);
        std::thread::Builder::new()
            .name(format!("nd-site-{}", handle.name))
            .spawn(move || site.run_forever(&spare_ms))
            .expect("failed to spawn site render thread");

        handle
    }

    fn run_forever(&mut self, spare_ms: &AtomicI64) -> ! {
        let period = Duration::from_secs_f64(1.0 / self.target_fps);
        let start = Instant::now();
        let mut window_min_spare_ms = i64::MAX;
        let mut window_start = Instant::now();

        loop {
            let t0 = Instant::now();
            let now_local = self.local_now();
            self.tick(t0.duration_since(start), SystemTime::now(), now_local);
            let elapsed = t0.elapsed();

            if elapsed > period {
                log::warn!(
                    "site \"{}\": frame overran target period by {:?}",
                    self.name,
                    elapsed - period
                );
            } else {
                std::thread::sleep(period - elapsed);
            }

            let spare_this_tick_ms = period.as_millis() as i64 - elapsed.as_millis() as i64;
            window_min_spare_ms = window_min_spare_ms.min(spare_this_tick_ms);
            if window_start.elapsed() >= Duration::from_secs(1) {
                spare_ms.store(window_min_spare_ms, Ordering::Relaxed);
                window_min_spare_ms = i64::MAX;
                window_start = Instant::now();
            }
        }
    }
}

impl Site {
    fn local_now(&self) -> NaiveDateTime {
        let tz = self.timezone.unwrap_or_else(env_timezone);
        chrono::Utc::now().with_timezone(&tz).naive_local()
    }
}

/// `TZ` controls schedule evaluation when a site doesn't pin its own zone,
/// per §6; the source falls back to `America/Los_Angeles` when `TZ` is unset
/// or unrecognized, so this does too rather than trusting the host's
/// system-configured zone (often UTC in a container, which the source never
/// defaulted to).
fn env_timezone() -> chrono_tz::Tz {
    std::env::var("TZ")
        .ok()
        .and_then(|name| name.parse::<chrono_tz::Tz>().ok())
        .unwrap_or(chrono_tz::America::Los_Angeles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nd_core::Pixel;
    use nd_effects::{Schedule, SolidColor};
    use std::net::ToSocketAddrs;

    fn any_addr() -> std::net::SocketAddr {
        "127.0.0.1:0".to_socket_addrs().unwrap().next().unwrap()
    }

    fn midday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn rejects_strip_extent_outside_buffer() {
        let strips = vec![StripSpec {
            offset: 8,
            length: 5,
            reversed: false,
            client: StripClient::new(any_addr(), 1, false),
        }];
        let schedules = vec![ScheduledEffect::new(
            Box::new(SolidColor::new(Pixel::WHITE)),
            Schedule::always(),
        )];
        let err = Site::new("test", 10, strips, schedules, 22.0, None).unwrap_err();
        assert!(matches!(err, SiteError::StripOutOfBounds { .. }));
    }

    #[test]
    fn rejects_site_with_no_schedules() {
        let err = Site::new("test", 10, Vec::new(), Vec::new(), 22.0, None).unwrap_err();
        assert!(matches!(err, SiteError::NoEffects(_)));
    }

    #[test]
    fn tick_with_no_active_schedule_leaves_buffer_untouched_and_still_dispatches() {
        let client = StripClient::new(any_addr(), 1, false);
        let strips = vec![StripSpec {
            offset: 0,
            length: 4,
            reversed: false,
            client: client.clone(),
        }];
        // Weekends only, so midday on a Monday is inactive.
        let weekend_mask = 1u8 << chrono::Weekday::Sat.num_days_from_monday()
            | 1u8 << chrono::Weekday::Sun.num_days_from_monday();
        let schedules = vec![ScheduledEffect::new(
            Box::new(SolidColor::new(Pixel::WHITE)),
            nd_effects::Schedule::new(weekend_mask, 0, 0, 23, 60),
        )];
        let mut site = Site::new("test", 4, strips, schedules, 22.0, None).unwrap();

        let outcome = site.tick(Duration::from_secs(0), SystemTime::now(), midday());
        assert!(!outcome.rendered);
        assert_eq!(outcome.effect_name, None);
        assert!(site.buffer.as_slice().iter().all(|p| *p == Pixel::BLACK));
    }

    #[test]
    fn tick_renders_exactly_once_and_records_effect_name() {
        let strips = vec![StripSpec {
            offset: 0,
            length: 4,
            reversed: false,
            client: StripClient::new(any_addr(), 1, false),
        }];
        let schedules = vec![ScheduledEffect::new(
            Box::new(SolidColor::new(Pixel::new(7, 7, 7))),
            Schedule::always(),
        )];
        let mut site = Site::new("test", 4, strips, schedules, 22.0, None).unwrap();

        let outcome = site.tick(Duration::from_secs(0), SystemTime::now(), midday());
        assert!(outcome.rendered);
        assert_eq!(outcome.effect_name.as_deref(), Some("solid_color"));
        assert!(site.buffer.as_slice().iter().all(|p| *p == Pixel::new(7, 7, 7)));
    }

    fn site_with_timezone(tz: Option<chrono_tz::Tz>) -> Site {
        Site::new(
            "test",
            1,
            Vec::new(),
            vec![ScheduledEffect::new(
                Box::new(SolidColor::new(Pixel::BLACK)),
                Schedule::always(),
            )],
            22.0,
            tz,
        )
        .unwrap()
    }

    #[test]
    fn local_now_uses_the_configured_timezone_when_set() {
        let tz: chrono_tz::Tz = "Pacific/Kiritimati".parse().unwrap(); // UTC+14, no DST
        let site = site_with_timezone(Some(tz));

        let expected = chrono::Utc::now().with_timezone(&tz).naive_local();
        let actual = site.local_now();
        assert!((expected - actual).num_seconds().abs() <= 1);
    }

    #[test]
    fn local_now_falls_back_to_env_timezone_when_unset() {
        let site = site_with_timezone(None);
        let expected_tz = env_timezone();
        let expected = chrono::Utc::now().with_timezone(&expected_tz).naive_local();
        let actual = site.local_now();
        assert!((expected - actual).num_seconds().abs() <= 1);
    }

    #[test]
    fn tick_drops_and_counts_for_strips_that_are_not_ready() {
        // Never-connected client: enqueue is still called every tick, but its
        // own readiness check drops and counts instead of pushing.
        let client = StripClient::new(any_addr(), 1, false);
        let strips = vec![StripSpec {
            offset: 0,
            length: 2,
            reversed: false,
            client: client.clone(),
        }];
        let schedules = vec![ScheduledEffect::new(
            Box::new(SolidColor::new(Pixel::WHITE)),
            Schedule::always(),
        )];
        let mut site = Site::new("test", 2, strips, schedules, 22.0, None).unwrap();
        site.tick(Duration::from_secs(0), SystemTime::now(), midday());
        assert_eq!(client.queue_len(), 0);
        assert_eq!(client.drop_count(), 1);
    }
}
