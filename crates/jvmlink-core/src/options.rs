//! Application-supplied calling-convention configuration.
//!
//! The options are carried as-is until the runtime transitions to
//! Created; validation happens at the transition, not at assignment, and
//! an invalid configuration is fatal there (see the crate's error docs).

use std::fmt;

use crate::Promisify;

/// Recognized calling-convention options.
///
/// - `sync_suffix`: naming suffix for blocking-call variants. Mandatory
///   whenever options are supplied at all.
/// - `async_suffix`: naming suffix for callback-call variants. The
///   callback variant is only attached when this is a configured string
///   distinct from `sync_suffix`.
/// - `promise_suffix` + `promisify`: co-required pair enabling
///   promise-returning variants for construct/instance-call/static-call
///   and for `launch` itself.
///
/// When no options are supplied at all, the defaults apply:
/// `sync_suffix = "Sync"`, `async_suffix = ""` (bare name = callback
/// convention), no promises.
#[derive(Clone, Default)]
pub struct AsyncOptions {
    pub sync_suffix: Option<String>,
    pub async_suffix: Option<String>,
    pub promise_suffix: Option<String>,
    pub promisify: Option<Promisify>,
}

impl AsyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.sync_suffix = Some(suffix.into());
        self
    }

    pub fn with_async_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.async_suffix = Some(suffix.into());
        self
    }

    /// Configure the promise pair. Both halves are required together;
    /// supplying only one is a configuration error at launch.
    pub fn with_promises(mut self, suffix: impl Into<String>, promisify: Promisify) -> Self {
        self.promise_suffix = Some(suffix.into());
        self.promisify = Some(promisify);
        self
    }
}

// Manual Debug: `promisify` is an unnameable closure.
impl fmt::Debug for AsyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOptions")
            .field("sync_suffix", &self.sync_suffix)
            .field("async_suffix", &self.async_suffix)
            .field("promise_suffix", &self.promise_suffix)
            .field("promisify", &self.promisify.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promisify_deferred;

    #[test]
    fn builder_sets_fields() {
        let options = AsyncOptions::new()
            .with_sync_suffix("Sync")
            .with_async_suffix("Async")
            .with_promises("P", promisify_deferred());
        assert_eq!(options.sync_suffix.as_deref(), Some("Sync"));
        assert_eq!(options.async_suffix.as_deref(), Some("Async"));
        assert_eq!(options.promise_suffix.as_deref(), Some("P"));
        assert!(options.promisify.is_some());
    }

    #[test]
    fn debug_elides_the_transform() {
        let options = AsyncOptions::new().with_promises("P", promisify_deferred());
        let rendered = format!("{options:?}");
        assert!(rendered.contains("promise_suffix"));
        assert!(rendered.contains("<fn>"));
    }
}
