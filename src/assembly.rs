//! Turns a loaded [`crate::config::RootConfig`] into running [`nd_site::Site`]
//! values: resolving strip addresses, instantiating built-in effects, and
//! wiring schedules.

use nd_core::Pixel;
use nd_effects::{Effect, Rainbow, Schedule, ScheduledEffect, SolidColor};
use nd_net::StripClient;
use nd_site::{Site, StripSpec};

use crate::config::{EffectConfig, RootConfig, ScheduleConfig, SiteConfig, StripConfig};

/// Errors that can surface while turning validated config into running
/// Sites: either a site-level invariant violation or (defensively, since
/// config validation already checks this) an unresolvable timezone.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Site(#[from] nd_site::SiteError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Builds every configured Site. Propagates as a fatal startup failure,
/// matching the config/invariant rows of the error table.
pub fn build_sites(config: &RootConfig) -> Result<Vec<Site>, BuildError> {
    config.sites.iter().map(build_site).collect()
}

fn build_site(site: &SiteConfig) -> Result<Site, BuildError> {
    let strips = site
        .strips
        .iter()
        .map(|s| build_strip(&site.name, s))
        .collect();
    let schedules = site.schedules.iter().map(build_scheduled_effect).collect();
    let timezone = site.resolve_timezone()?;
    Site::new(
        site.name.as_str(),
        site.pixel_count,
        strips,
        schedules,
        site.target_fps,
        timezone,
    )
    .map_err(BuildError::from)
}

fn build_strip(site_name: &str, strip: &StripConfig) -> StripSpec {
    let addr = strip
        .resolve_addr(site_name)
        .expect("address resolution is validated at config load time");
    StripSpec {
        offset: strip.offset_in_site,
        length: strip.length,
        reversed: strip.reversed,
        client: StripClient::new(addr, strip.channel_mask, strip.compress),
    }
}

fn build_scheduled_effect(schedule: &ScheduleConfig) -> ScheduledEffect {
    let effect: Box<dyn Effect> = match schedule.effect {
        EffectConfig::Solid { r, g, b } => Box::new(SolidColor::new(Pixel::new(r, g, b))),
        EffectConfig::Rainbow {
            start_hue_deg,
            delta_hue_deg,
        } => Box::new(Rainbow::new(start_hue_deg, delta_hue_deg)),
    };
    let window = Schedule::new(
        schedule.days_of_week,
        schedule.start_hour,
        schedule.start_minute,
        schedule.end_hour,
        schedule.end_minute,
    );
    ScheduledEffect::new(effect, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_site_from_the_demo_config() {
        let config = RootConfig::demo();
        let sites = build_sites(&config).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name(), "demo");
    }
}
