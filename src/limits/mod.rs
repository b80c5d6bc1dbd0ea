//! Request admission control.
//!
//! Two independent layers gate every API call:
//!
//! - [`ClientRateLimiterRegistry`]: one aggregate limiter per credential
//!   identity, shared by every client instance using those credentials
//! - [`MethodRateLimiterRegistry`]: one limiter per `(identity, method)`
//!   pair for methods that declare a [`MethodRateLimit`]
//!
//! Both registries evict idle entries on a periodic background sweep.

mod bucket;
mod client;
mod method;
mod sweeper;

pub use bucket::{RateLimitConfig, RateLimiter};
pub use client::{ClientLimiterStats, ClientRateLimiterRegistry, InstanceHandle};
pub use method::{MethodKey, MethodLimiterStats, MethodRateLimit, MethodRateLimiterRegistry};
