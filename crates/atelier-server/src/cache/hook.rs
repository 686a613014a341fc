use async_trait::async_trait;

use super::path::PathSpec;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache invalidation failed: {0}")]
    Invalidation(String),
}

/// Receives "these rendered paths are stale" signals after content changes.
///
/// Callers treat this as fire-and-forget: an error is reported but never
/// undoes the write that triggered it.
#[async_trait]
pub trait InvalidationHook: Send + Sync {
    async fn invalidate(&self, paths: &[PathSpec]) -> Result<(), CacheError>;
}

/// Hook used when page caching is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidation;

#[async_trait]
impl InvalidationHook for NoopInvalidation {
    async fn invalidate(&self, paths: &[PathSpec]) -> Result<(), CacheError> {
        tracing::trace!(count = paths.len(), "cache disabled, nothing to invalidate");
        Ok(())
    }
}
