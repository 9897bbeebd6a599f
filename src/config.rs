//! Site configuration: which strips exist, where they point, and when each
//! scheduled effect is active.
//!
//! Configuration / site enumeration is named an external collaborator in the
//! source (§1 Out of scope); this module is the input data model an operator
//! fills in, loaded from an optional JSON file via `serde`.

use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Strip controllers listen here unless a strip overrides it.
pub const DEFAULT_PORT: u16 = 49152;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("strip \"{strip}\" of site \"{site}\" has an unresolvable host: {host}")]
    UnresolvableHost {
        site: String,
        strip: String,
        host: String,
    },

    #[error("site \"{0}\" declares zero strips")]
    NoStrips(String),

    #[error("site \"{0}\" declares zero schedules")]
    NoSchedules(String),

    #[error("site \"{site}\" has an unrecognized IANA timezone: \"{timezone}\"")]
    InvalidTimezone { site: String, timezone: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Bitmask, bit 0 = Monday .. bit 6 = Sunday.
    pub days_of_week: u8,
    pub start_hour: u32,
    #[serde(default)]
    pub start_minute: u32,
    pub end_hour: u32,
    #[serde(default = "default_end_minute")]
    pub end_minute: u32,
    /// Which built-in effect this schedule activates: `"solid"` or `"rainbow"`.
    pub effect: EffectConfig,
}

fn default_end_minute() -> u32 {
    60
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    Solid { r: u8, g: u8, b: u8 },
    Rainbow {
        start_hue_deg: f64,
        delta_hue_deg: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripConfig {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub length: usize,
    #[serde(default = "default_channel_mask")]
    pub channel_mask: u16,
    pub offset_in_site: usize,
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub compress: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_channel_mask() -> u16 {
    0xFFFF
}

impl StripConfig {
    pub(crate) fn resolve_addr(&self, site_name: &str) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::UnresolvableHost {
                site: site_name.to_string(),
                strip: self.name.clone(),
                host: self.host.clone(),
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub pixel_count: usize,
    #[serde(default = "default_target_fps")]
    pub target_fps: f64,
    /// IANA zone name (e.g. `"America/Los_Angeles"`) schedule activation is
    /// evaluated in. Omitted means the host's system-local time, which is
    /// fine for a single-site deployment but wrong once sites span zones.
    #[serde(default)]
    pub timezone: Option<String>,
    pub strips: Vec<StripConfig>,
    pub schedules: Vec<ScheduleConfig>,
}

fn default_target_fps() -> f64 {
    22.0
}

impl SiteConfig {
    pub(crate) fn resolve_timezone(&self) -> Result<Option<chrono_tz::Tz>> {
        match &self.timezone {
            None => Ok(None),
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidTimezone {
                    site: self.name.clone(),
                    timezone: name.clone(),
                }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootConfig {
    pub sites: Vec<SiteConfig>,
}

impl RootConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: RootConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// One site, one strip, a rainbow effect all day every day — used when no
    /// `--config` is given, so the process is runnable out of the box.
    #[must_use]
    pub fn demo() -> Self {
        RootConfig {
            sites: vec![SiteConfig {
                name: "demo".to_string(),
                pixel_count: 144,
                target_fps: default_target_fps(),
                timezone: None,
                strips: vec![StripConfig {
                    name: "strip-0".to_string(),
                    host: "127.0.0.1".to_string(),
                    port: DEFAULT_PORT,
                    length: 144,
                    channel_mask: default_channel_mask(),
                    offset_in_site: 0,
                    reversed: false,
                    compress: false,
                }],
                schedules: vec![ScheduleConfig {
                    days_of_week: 0x7F,
                    start_hour: 0,
                    start_minute: 0,
                    end_hour: 23,
                    end_minute: 60,
                    effect: EffectConfig::Rainbow {
                        start_hue_deg: 0.0,
                        delta_hue_deg: 10.0,
                    },
                }],
            }],
        }
    }

    fn validate(&self) -> Result<()> {
        for site in &self.sites {
            if site.strips.is_empty() {
                return Err(ConfigError::NoStrips(site.name.clone()));
            }
            if site.schedules.is_empty() {
                return Err(ConfigError::NoSchedules(site.name.clone()));
            }
            site.resolve_timezone()?;
            for strip in &site.strips {
                strip.resolve_addr(&site.name)?;
            }
        }
        Ok(())
    }
}
