use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use super::{
    action::{Dimension, RateLimitAction},
    policy::{Limit, RateLimitConfig},
    store::{MemoryStore, RateLimitEntry, RateLimitKey, RateLimitStore},
};
use crate::{
    clock::{Clock, SystemClock},
    forms::FormKind,
};

/// Outcome of checking a single counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub success: bool,
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
    pub message: Option<String>,
}

/// A form submission refused by one of its two dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRejection {
    pub dimension: Dimension,
    pub message: String,
    pub reset_time: DateTime<Utc>,
    pub retry_after: Duration,
}

/// Fixed-window rate limiter shared by all form submissions.
///
/// Cloning is cheap and every clone sees the same counters.
#[derive(Clone, Debug)]
pub struct RateLimitState {
    config: Arc<RateLimitConfig>,
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    // Serializes check-and-increment across all keys
    guard: Arc<Mutex<()>>,
}

impl RateLimitState {
    /// Create a limiter with an in-memory store and the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn with_store(
        config: RateLimitConfig,
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock,
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one attempt of `action` by `identifier` against `limit`.
    ///
    /// Rejected attempts are not counted.
    pub fn check(
        &self,
        action: &RateLimitAction,
        identifier: &str,
        limit: Limit,
    ) -> RateLimitDecision {
        let key = RateLimitKey::new(action, identifier);

        // The lock is never held across an await point
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if self.store.delete_if_expired(&key, now) {
            trace!(key = %key, "Rate limit window expired");
        }

        let mut entry = self
            .store
            .get(&key)
            .unwrap_or_else(|| RateLimitEntry::fresh(now, limit.window()));

        if entry.attempts >= limit.max_attempts {
            let minutes = minutes_until(now, entry.reset_time);
            debug!(
                key = %key,
                attempts = entry.attempts,
                max_attempts = limit.max_attempts,
                minutes,
                "Rate limit exceeded"
            );

            return RateLimitDecision {
                success: false,
                remaining: 0,
                reset_time: entry.reset_time,
                message: Some(format!(
                    "Too many attempts. Please try again in {minutes} {}.",
                    plural_minutes(minutes)
                )),
            };
        }

        entry.attempts += 1;
        let decision = RateLimitDecision {
            success: true,
            remaining: limit.max_attempts - entry.attempts,
            reset_time: entry.reset_time,
            message: None,
        };
        self.store.set(key, entry);

        decision
    }

    /// Check both dimensions of a form submission.
    ///
    /// The IP dimension is checked first; when it refuses, the email counter
    /// is left untouched. An empty email skips the email dimension.
    pub fn check_form(
        &self,
        kind: FormKind,
        ip: &str,
        email: &str,
    ) -> Result<(), RateLimitRejection> {
        if !self.config.enabled {
            return Ok(());
        }

        let limits = self.config.limit_for(kind);

        let by_ip = self.check(
            &RateLimitAction::for_form(kind, Dimension::Ip),
            ip,
            limits.ip,
        );
        if !by_ip.success {
            return Err(self.rejection(kind, Dimension::Ip, by_ip.reset_time));
        }

        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(());
        }

        let by_email = self.check(
            &RateLimitAction::for_form(kind, Dimension::Email),
            &email,
            limits.email,
        );
        if !by_email.success {
            return Err(self.rejection(kind, Dimension::Email, by_email.reset_time));
        }

        Ok(())
    }

    fn rejection(
        &self,
        kind: FormKind,
        dimension: Dimension,
        reset_time: DateTime<Utc>,
    ) -> RateLimitRejection {
        let now = self.clock.now();
        let minutes = minutes_until(now, reset_time);

        let message = if kind == FormKind::Newsletter && dimension == Dimension::Email {
            "This email address is already subscribed to our newsletter.".to_string()
        } else {
            format!(
                "Too many {} attempts. Please try again in {minutes} {}, or contact us directly by phone or WhatsApp.",
                kind.attempt_noun(),
                plural_minutes(minutes)
            )
        };

        RateLimitRejection {
            dimension,
            message,
            reset_time,
            retry_after: (reset_time - now).max(Duration::zero()),
        }
    }
}

/// Whole minutes until `reset_time`, rounded up, never less than one.
fn minutes_until(now: DateTime<Utc>, reset_time: DateTime<Utc>) -> i64 {
    let millis = (reset_time - now).num_milliseconds();
    ((millis + 59_999) / 60_000).max(1)
}

fn plural_minutes(minutes: i64) -> &'static str {
    if minutes == 1 {
        "minute"
    } else {
        "minutes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::MockClock, rate_limiting::policy::FormRateLimit};

    fn limiter(config: RateLimitConfig) -> (RateLimitState, MockClock) {
        let clock = MockClock::default();
        let state = RateLimitState::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(clock.clone()),
        );
        (state, clock)
    }

    #[test]
    fn test_allows_up_to_max_attempts_with_decreasing_remaining() {
        let (state, _) = limiter(RateLimitConfig::default());
        let action = RateLimitAction::new("test");
        let limit = Limit::per_minutes(5, 10);

        let remaining: Vec<u32> = (0..5)
            .map(|_| {
                let decision = state.check(&action, "127.0.0.1", limit);
                assert!(decision.success);
                decision.remaining
            })
            .collect();

        assert_eq!(remaining, vec![4, 3, 2, 1, 0]);
        assert!(!state.check(&action, "127.0.0.1", limit).success);
    }

    #[test]
    fn test_rejected_attempts_are_not_counted() {
        let (state, clock) = limiter(RateLimitConfig::default());
        let action = RateLimitAction::new("test");
        let limit = Limit::per_minutes(3, 10);

        for _ in 0..3 {
            assert!(state.check(&action, "ip", limit).success);
        }

        let first_rejection = state.check(&action, "ip", limit);
        for _ in 0..5 {
            let decision = state.check(&action, "ip", limit);
            assert!(!decision.success);
            assert_eq!(decision.remaining, 0);
            assert_eq!(decision.message, first_rejection.message);
            assert_eq!(decision.reset_time, first_rejection.reset_time);
        }

        // A single fresh attempt is allowed after the window, not a backlog
        clock.advance(Duration::minutes(10) + Duration::seconds(1));
        assert_eq!(state.check(&action, "ip", limit).remaining, 2);
    }

    #[test]
    fn test_window_reset_behaves_like_first_call() {
        let (state, clock) = limiter(RateLimitConfig::default());
        let action = RateLimitAction::new("test");
        let limit = Limit::per_minutes(2, 5);

        let first = state.check(&action, "ip", limit);
        state.check(&action, "ip", limit);
        assert!(!state.check(&action, "ip", limit).success);

        clock.advance(Duration::minutes(6));

        let after_reset = state.check(&action, "ip", limit);
        assert!(after_reset.success);
        assert_eq!(after_reset.remaining, first.remaining);
        assert_eq!(after_reset.reset_time, clock.now() + Duration::minutes(5));
    }

    #[test]
    fn test_window_is_still_live_at_reset_time() {
        let (state, clock) = limiter(RateLimitConfig::default());
        let action = RateLimitAction::new("test");
        let limit = Limit::per_minutes(1, 1);

        assert!(state.check(&action, "ip", limit).success);
        clock.advance(Duration::minutes(1));
        assert!(!state.check(&action, "ip", limit).success);
    }

    #[test]
    fn test_rejection_message_rounds_minutes_up() {
        let (state, clock) = limiter(RateLimitConfig::default());
        let action = RateLimitAction::new("test");
        let limit = Limit::per_minutes(1, 10);

        state.check(&action, "ip", limit);
        clock.advance(Duration::seconds(30));

        let decision = state.check(&action, "ip", limit);
        assert_eq!(
            decision.message.as_deref(),
            Some("Too many attempts. Please try again in 10 minutes.")
        );

        clock.advance(Duration::seconds(9 * 60));
        let decision = state.check(&action, "ip", limit);
        assert_eq!(
            decision.message.as_deref(),
            Some("Too many attempts. Please try again in 1 minute.")
        );
    }

    #[test]
    fn test_identifiers_and_actions_are_independent() {
        let (state, _) = limiter(RateLimitConfig::default());
        let limit = Limit::per_minutes(1, 10);

        assert!(state.check(&"a".into(), "ip-1", limit).success);
        assert!(state.check(&"a".into(), "ip-2", limit).success);
        assert!(state.check(&"b".into(), "ip-1", limit).success);
        assert!(!state.check(&"a".into(), "ip-1", limit).success);
    }

    #[test]
    fn test_ip_rejection_leaves_email_counter_untouched() {
        let (state, _) = limiter(RateLimitConfig::default());

        // Tour booking: 3 per IP, 2 per email. Spread emails so only the IP runs out.
        assert!(state.check_form(FormKind::TourBooking, "1.1.1.1", "a@x.com").is_ok());
        assert!(state.check_form(FormKind::TourBooking, "1.1.1.1", "b@x.com").is_ok());
        assert!(state.check_form(FormKind::TourBooking, "1.1.1.1", "c@x.com").is_ok());

        for _ in 0..3 {
            let rejection = state
                .check_form(FormKind::TourBooking, "1.1.1.1", "victim@x.com")
                .unwrap_err();
            assert_eq!(rejection.dimension, Dimension::Ip);
        }

        // The email dimension still has its full quota of 2
        assert!(state.check_form(FormKind::TourBooking, "2.2.2.2", "victim@x.com").is_ok());
        assert!(state.check_form(FormKind::TourBooking, "3.3.3.3", "victim@x.com").is_ok());
        let rejection = state
            .check_form(FormKind::TourBooking, "4.4.4.4", "victim@x.com")
            .unwrap_err();
        assert_eq!(rejection.dimension, Dimension::Email);
    }

    #[test]
    fn test_email_dimension_ignores_case_and_whitespace() {
        let (state, _) = limiter(RateLimitConfig::default());

        assert!(state.check_form(FormKind::TourBooking, "1.1.1.1", "John@Example.com").is_ok());
        assert!(state.check_form(FormKind::TourBooking, "2.2.2.2", " john@example.com ").is_ok());
        assert!(state.check_form(FormKind::TourBooking, "3.3.3.3", "JOHN@EXAMPLE.COM").is_err());
    }

    #[test]
    fn test_newsletter_second_signup_is_already_subscribed() {
        let (state, clock) = limiter(RateLimitConfig::default());

        assert!(state.check_form(FormKind::Newsletter, "1.1.1.1", "reader@x.com").is_ok());

        let rejection = state
            .check_form(FormKind::Newsletter, "2.2.2.2", "reader@x.com")
            .unwrap_err();
        assert_eq!(rejection.dimension, Dimension::Email);
        assert!(rejection.message.contains("already subscribed"));
        assert!(!rejection.message.contains("Too many"));

        clock.advance(Duration::minutes(61));
        assert!(state.check_form(FormKind::Newsletter, "2.2.2.2", "reader@x.com").is_ok());
    }

    #[test]
    fn test_generic_rejection_mentions_wait_and_alternative_contact() {
        let (state, _) = limiter(RateLimitConfig::default());

        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            state.check_form(FormKind::TourBooking, "1.1.1.1", email).unwrap();
        }

        let rejection = state
            .check_form(FormKind::TourBooking, "1.1.1.1", "d@x.com")
            .unwrap_err();
        assert!(rejection.message.contains("10 minutes"));
        assert!(rejection.message.contains("WhatsApp"));
        assert_eq!(rejection.retry_after, Duration::minutes(10));
    }

    #[test]
    fn test_disabled_rate_limiting() {
        let (state, _) = limiter(RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        });

        for _ in 0..100 {
            assert!(state.check_form(FormKind::Newsletter, "ip", "same@x.com").is_ok());
        }
    }

    #[test]
    fn test_configured_override_is_used() {
        let mut config = RateLimitConfig::default();
        config.forms.insert(
            "contact".to_string(),
            FormRateLimit {
                ip: Limit::per_minutes(1, 10),
                email: Limit::per_minutes(10, 10),
            },
        );
        let (state, _) = limiter(config);

        assert!(state.check_form(FormKind::Contact, "ip", "a@x.com").is_ok());
        assert!(state.check_form(FormKind::Contact, "ip", "b@x.com").is_err());
    }

    #[test]
    fn test_oversized_configured_window_still_limits() {
        let (state, _) = limiter(RateLimitConfig::default());
        let action = RateLimitAction::new("test");
        let limit = Limit::new(1, u64::MAX);

        assert!(state.check(&action, "127.0.0.1", limit).success);

        let refused = state.check(&action, "127.0.0.1", limit);
        assert!(!refused.success);
        assert_eq!(refused.reset_time, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_concurrent_checks_never_undercount() {
        let (state, _) = limiter(RateLimitConfig::default());
        let limit = Limit::per_minutes(50, 10);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || {
                    (0..20)
                        .filter(|_| state.check(&"burst".into(), "ip", limit).success)
                        .count()
                })
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 50);
    }
}
