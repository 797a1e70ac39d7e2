pub mod action;
pub mod policy;
pub mod rate_limit_state;
pub mod store;

pub use action::{Dimension, RateLimitAction};
pub use policy::{FormRateLimit, Limit, RateLimitConfig};
pub use rate_limit_state::{RateLimitDecision, RateLimitRejection, RateLimitState};
pub use store::{MemoryStore, RateLimitEntry, RateLimitKey, RateLimitStore};
