//! Provider registry module.
//!
//! This module provides orchestration for quote providers, including:
//! - Provider registration and priority ordering
//! - Rate limiting per provider
//! - The process-wide rate-limit cooldown

mod cooldown;
mod rate_limiter;
mod registry;

pub use cooldown::{CooldownTracker, DEFAULT_COOLDOWN_WINDOW};
pub use rate_limiter::RateLimiter;
pub use registry::{BatchFetch, ProviderRegistry};
