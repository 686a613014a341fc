//! Rendered page caching and invalidation.
//!
//! ```text
//! GET /api/site/{locale}/{page} → RenderCache (DashMap) → page composition (store)
//!                                        ↑
//!          reconcile commit ──→ InvalidationHook::invalidate(&[PathSpec])
//! ```
//!
//! Cache keys are logical render paths such as `/en` or `/en/gallery`.
//! Writers describe what went stale with [`PathSpec`] patterns instead of
//! concrete keys, so one spec covers every locale.

pub mod hook;
pub mod path;
pub mod render;

pub use hook::{CacheError, InvalidationHook, NoopInvalidation};
pub use path::{PathKind, PathSpec};
pub use render::{CacheStats, RenderCache};
