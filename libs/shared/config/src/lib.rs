use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::warn;

/// Minutes added to "now" before a slot may be offered when its window has already opened.
pub const DEFAULT_GRACE_BUFFER_MINUTES: i64 = 10;

/// Maximum lookahead for availability queries, in calendar months.
pub const DEFAULT_HORIZON_MONTHS: u32 = 1;

/// Accepted grace buffer, at most one day.
pub const GRACE_BUFFER_MINUTES_RANGE: RangeInclusive<i64> = 0..=1440;

/// Accepted horizon, one month to one year.
pub const HORIZON_MONTHS_RANGE: RangeInclusive<u32> = 1..=12;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySettings {
    pub grace_buffer_minutes: i64,
    pub horizon_months: u32,
}

impl AvailabilitySettings {
    /// Clamp both values into their accepted ranges.
    pub fn clamped(self) -> Self {
        Self {
            grace_buffer_minutes: self.grace_buffer_minutes.clamp(
                *GRACE_BUFFER_MINUTES_RANGE.start(),
                *GRACE_BUFFER_MINUTES_RANGE.end(),
            ),
            horizon_months: self.horizon_months.clamp(
                *HORIZON_MONTHS_RANGE.start(),
                *HORIZON_MONTHS_RANGE.end(),
            ),
        }
    }
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            grace_buffer_minutes: DEFAULT_GRACE_BUFFER_MINUTES,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub port: u16,
    pub availability: AvailabilitySettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            port: parse_or_default("PORT", DEFAULT_PORT),
            availability: AvailabilitySettings {
                grace_buffer_minutes: parse_in_range(
                    "SLOT_GRACE_BUFFER_MINUTES",
                    DEFAULT_GRACE_BUFFER_MINUTES,
                    GRACE_BUFFER_MINUTES_RANGE,
                ),
                horizon_months: parse_in_range(
                    "AVAILABILITY_HORIZON_MONTHS",
                    DEFAULT_HORIZON_MONTHS,
                    HORIZON_MONTHS_RANGE,
                ),
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_in_range<T>(key: &str, default: T, range: RangeInclusive<T>) -> T
where
    T: FromStr + Copy + PartialOrd + std::fmt::Display,
{
    let value = parse_or_default(key, default);
    if range.contains(&value) {
        value
    } else {
        warn!(
            "{} value {} outside {}..={}, using default {}",
            key, value, range.start(), range.end(), default
        );
        default
    }
}
