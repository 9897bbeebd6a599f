//! Periodic status line printer (§6): a read-only observer thread, one of
//! the "0 or more observer threads" named in the concurrency model.

use std::time::Duration;

use nd_site::SiteRegistry;
use serde::Serialize;

#[derive(Serialize)]
struct StripStatusLine {
    queue_depth: usize,
    connected: bool,
    drops_total: u64,
}

#[derive(Serialize)]
struct SiteStatusLine {
    name: String,
    fps_actual: f64,
    spare_ms: i64,
    current_effect: String,
    per_strip: Vec<StripStatusLine>,
}

/// Prints one JSON status line per Site, every `interval`, forever.
pub fn run_status_loop(registry: &SiteRegistry, interval: Duration) -> ! {
    loop {
        std::thread::sleep(interval);
        for handle in registry.handles() {
            let line = SiteStatusLine {
                name: handle.name.clone(),
                fps_actual: handle.fps_actual(),
                spare_ms: handle.spare_ms(),
                current_effect: handle.current_effect_name(),
                per_strip: handle
                    .strip_statuses()
                    .into_iter()
                    .map(|s| StripStatusLine {
                        queue_depth: s.queue_depth,
                        connected: s.connected,
                        drops_total: s.drops_total,
                    })
                    .collect(),
            };
            match serde_json::to_string(&line) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("failed to serialize status line for site \"{}\": {e}", handle.name),
            }
        }
    }
}
