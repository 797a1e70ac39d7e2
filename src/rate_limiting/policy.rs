use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::forms::FormKind;

/// No more than `max_attempts` within `window_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub max_attempts: u32,
    pub window_secs: u64,
}

impl Limit {
    pub const fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window_secs,
        }
    }

    pub const fn per_minutes(max_attempts: u32, minutes: u64) -> Self {
        Self::new(max_attempts, minutes * 60)
    }

    /// Saturates at [`Duration::MAX`] for windows chrono cannot represent.
    pub fn window(&self) -> Duration {
        i64::try_from(self.window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

/// Limits for one form. A submission is allowed only while both the caller's
/// IP and the submitted email address have quota left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRateLimit {
    pub ip: Limit,
    pub email: Limit,
}

impl FormRateLimit {
    /// Built-in policy for each form.
    pub const fn default_for(kind: FormKind) -> Self {
        match kind {
            FormKind::TourBooking => Self {
                ip: Limit::per_minutes(3, 10),
                email: Limit::per_minutes(2, 5),
            },
            FormKind::AirportPickup => Self {
                ip: Limit::per_minutes(5, 15),
                email: Limit::per_minutes(3, 10),
            },
            FormKind::Contact => Self {
                ip: Limit::per_minutes(8, 10),
                email: Limit::per_minutes(5, 10),
            },
            // One signup per address per hour
            FormKind::Newsletter => Self {
                ip: Limit::per_minutes(10, 60),
                email: Limit::per_minutes(1, 60),
            },
        }
    }
}

/// Global rate limiting configuration.
///
/// Forms without an entry in `forms` use [`FormRateLimit::default_for`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Per-form overrides, keyed by form kind (`tour_booking`, `contact`, ...)
    #[serde(default)]
    pub forms: HashMap<String, FormRateLimit>,
}

fn default_enabled() -> bool {
    true
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            forms: HashMap::new(),
        }
    }
}

impl RateLimitConfig {
    pub fn limit_for(&self, kind: FormKind) -> FormRateLimit {
        self.forms
            .get(kind.as_str())
            .copied()
            .unwrap_or_else(|| FormRateLimit::default_for(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_overrides() {
        let config = RateLimitConfig::default();

        let tour = config.limit_for(FormKind::TourBooking);
        assert_eq!(tour.ip, Limit::new(3, 600));
        assert_eq!(tour.email, Limit::new(2, 300));

        let newsletter = config.limit_for(FormKind::Newsletter);
        assert_eq!(newsletter.email, Limit::new(1, 3600));
    }

    #[test]
    fn test_huge_window_saturates() {
        assert_eq!(Limit::new(1, u64::MAX).window(), Duration::MAX);
        assert_eq!(Limit::new(1, 10_000_000_000_000_000).window(), Duration::MAX);
        assert_eq!(Limit::per_minutes(3, 10).window(), Duration::minutes(10));
    }

    #[test]
    fn test_override_replaces_single_form() {
        let mut config = RateLimitConfig::default();
        config.forms.insert(
            "contact".to_string(),
            FormRateLimit {
                ip: Limit::new(100, 60),
                email: Limit::new(50, 60),
            },
        );

        assert_eq!(config.limit_for(FormKind::Contact).ip.max_attempts, 100);
        assert_eq!(
            config.limit_for(FormKind::AirportPickup),
            FormRateLimit::default_for(FormKind::AirportPickup)
        );
    }
}
