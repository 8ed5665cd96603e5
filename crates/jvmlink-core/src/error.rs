//! Unified error types for jvmlink.
//!
//! This module provides a consistent error type hierarchy for every layer
//! of the bridge: configuration, launch lifecycle, hook execution, the
//! native bridge itself, and generated class proxies.
//!
//! ## Error Hierarchy
//!
//! ```text
//! JvmError (top-level wrapper)
//! ├── ConfigurationError - invalid calling-convention configuration
//! ├── LifecycleError     - launch state machine violations
//! ├── HookError          - a before/after hook reported failure
//! ├── BridgeError        - errors propagated verbatim from the bridge
//! └── ProxyError         - unmirrored member / inactive call variant
//! ```
//!
//! ## Delivery channels
//!
//! The families differ in *how* they reach the caller, not just in what
//! they describe:
//!
//! - [`ConfigurationError`] is a programmer error. It is fatal and
//!   surfaces out of the scheduler turn that attempted the Created
//!   transition, never through a launch callback.
//! - [`LifecycleError`] is delivered through the offending call's
//!   completion channel when one exists, and as a synchronous `Err`
//!   otherwise.
//! - [`HookError`] aborts the remaining stages of its phase and is
//!   surfaced verbatim as the launch completion error.
//! - [`BridgeError`] and [`ProxyError`] are synchronous at the moment the
//!   offending call is made.

use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors in the application-supplied calling-convention configuration.
///
/// Validated when the runtime transitions to Created. These are fatal:
/// they abort the scheduler turn performing the transition and leave the
/// lifecycle state at NotCreated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Options were supplied without the mandatory blocking-call suffix.
    #[error("async options: sync_suffix must be set when options are supplied")]
    MissingSyncSuffix,

    /// Only one half of the promise pair was supplied.
    #[error("async options: promise_suffix and promisify must be set together")]
    MismatchedPromisePair,
}

// ============================================================================
// Lifecycle Errors
// ============================================================================

/// Launch state machine violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// `launch` was called after the runtime was already created.
    #[error("launch called after the runtime was already created")]
    AlreadyLaunched,

    /// `launch` was called while another launch was still pending.
    ///
    /// The pending launch is not affected; only the second call fails.
    #[error("launch called while another launch is pending")]
    LaunchInFlight,

    /// `register_hook` was called after the runtime was already created.
    #[error("register_hook called after the runtime was already created")]
    HookAfterCreate,

    /// Async options cannot be replaced once the runtime exists.
    #[error("async options cannot change after the runtime was created")]
    OptionsAfterCreate,

    /// The promise form of `launch` was used without a configured
    /// promisify transform.
    #[error("promise-form launch requires a configured promisify transform")]
    CallbackRequired,

    /// A call that requires a live runtime was made before creation.
    #[error("call made before the runtime was created")]
    NotCreated,
}

// ============================================================================
// Hook Errors
// ============================================================================

/// A before/after hook reported failure.
///
/// The message is whatever the hook passed to its completion callback and
/// is surfaced verbatim as the launch completion error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    /// The failure reported by the hook.
    pub message: String,
}

impl HookError {
    /// Create a hook error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Bridge Errors
// ============================================================================

/// Errors propagated verbatim from the native bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The foreign class could not be resolved.
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// The foreign runtime could not be instantiated.
    #[error("runtime creation failed: {0}")]
    CreationFailed(String),

    /// No such static field on the foreign class.
    #[error("field not found: {class}.{field}")]
    FieldNotFound {
        /// The foreign class name.
        class: String,
        /// The missing field name.
        field: String,
    },

    /// No such method on the foreign class, or no overload accepted the
    /// supplied arguments.
    #[error("method not found: {class}.{method}")]
    MethodNotFound {
        /// The foreign class name.
        class: String,
        /// The missing method name.
        method: String,
    },

    /// The referenced foreign instance is no longer alive.
    #[error("stale instance reference: {0}")]
    StaleInstance(String),

    /// The foreign runtime rejected an otherwise well-formed invocation.
    #[error("{0}")]
    Call(String),
}

// ============================================================================
// Proxy Errors
// ============================================================================

/// Errors raised by a generated class proxy.
///
/// These cover access to names that were never mirrored (not public
/// static on the foreign class) and call variants that the active
/// calling-convention configuration did not enable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// No mirrored static field with this name.
    #[error("no mirrored static field '{0}'")]
    UnknownField(String),

    /// No mirrored static method with this name.
    #[error("no mirrored static method '{0}'")]
    UnknownMethod(String),

    /// No mirrored nested class with this simple name.
    #[error("no mirrored nested class '{0}'")]
    UnknownNestedClass(String),

    /// The requested call variant is not active under the current
    /// calling-convention configuration.
    #[error("the {variant} call variant is not configured")]
    VariantNotConfigured {
        /// The variant that was requested ("callback" or "promise").
        variant: &'static str,
    },
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for all jvmlink operations.
///
/// Each variant uses `#[from]` to enable automatic conversion with the
/// `?` operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JvmError {
    /// A calling-convention configuration error.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A lifecycle state machine violation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A hook reported failure.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// An error propagated from the native bridge.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// A generated-proxy access error.
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl JvmError {
    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, JvmError::Configuration(_))
    }

    /// Check if this is a lifecycle error.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, JvmError::Lifecycle(_))
    }

    /// Check if this is a hook error.
    pub fn is_hook(&self) -> bool {
        matches!(self, JvmError::Hook(_))
    }

    /// Check if this is a bridge error.
    pub fn is_bridge(&self) -> bool {
        matches!(self, JvmError::Bridge(_))
    }

    /// Check if this is a proxy error.
    pub fn is_proxy(&self) -> bool {
        matches!(self, JvmError::Proxy(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
