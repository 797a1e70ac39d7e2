use std::fmt::{self, Display, Formatter};

use crate::forms::FormKind;

/// Identifies a specific action for rate limiting purposes.
///
/// Each form is throttled along two dimensions, so every form kind owns two
/// actions, e.g. `tour_booking_ip` and `tour_booking_email`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitAction(pub String);

/// The value a form submission is throttled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Ip,
    Email,
}

impl Dimension {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Email => "email",
        }
    }
}

impl RateLimitAction {
    /// Create a new rate limit action identifier
    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    /// The action used to throttle one dimension of a form.
    pub fn for_form(kind: FormKind, dimension: Dimension) -> Self {
        Self(format!("{}_{}", kind.as_str(), dimension.as_str()))
    }

    /// Get the action name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RateLimitAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RateLimitAction {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_actions_are_named_after_dimension() {
        assert_eq!(
            RateLimitAction::for_form(FormKind::TourBooking, Dimension::Email).as_str(),
            "tour_booking_email"
        );
        assert_eq!(
            RateLimitAction::for_form(FormKind::Newsletter, Dimension::Ip).as_str(),
            "newsletter_ip"
        );
    }
}
