//! Core types for jvmlink.
//!
//! Leaf crate of the workspace: the error hierarchy, the JVM reflection
//! modifier bitmask, the marshalled value type, reflective member
//! descriptors, calling-convention options, the single-threaded promise
//! pair, and the cooperative scheduler. The bridge trait lives in
//! `jvmlink-bridge`; the lifecycle controller and proxy builder live in
//! the root `jvmlink` crate.

mod descriptor;
mod error;
mod hook;
mod modifiers;
mod options;
mod promise;
mod schedule;
mod state;
mod value;

pub use descriptor::{MemberDescriptor, NestedClassDescriptor};
pub use error::{
    BridgeError, ConfigurationError, HookError, JvmError, LifecycleError, ProxyError,
};
pub use hook::{HookAction, HookDone, HookEntry, hook};
pub use modifiers::Modifiers;
pub use options::AsyncOptions;
pub use promise::{
    CallbackOp, Deferred, Promise, PromiseOp, Promisify, ValueCallback, promisify_deferred,
};
pub use schedule::Scheduler;
pub use state::LifecycleState;
pub use value::{InstanceRef, Value};
