//! Dynamic class proxies and launch lifecycle for an in-process JVM
//! behind a native bridge.
//!
//! The native binding that actually embeds the foreign runtime and
//! marshals values is an external collaborator, consumed through the
//! [`Bridge`] trait. This crate owns the layer on top of it:
//!
//! - a one-shot launch lifecycle ([`Jvm`]) with ordered before/after
//!   hooks and a dual callback/promise completion protocol,
//! - a calling-convention resolver ([`Conventions`]) selecting which of
//!   the blocking/callback/promise variants exist,
//! - a reflection-driven proxy builder ([`ClassProxy`]) mirroring a
//!   foreign class's public static fields, overloaded static methods,
//!   and nested classes (lazily, memoized per proxy).
//!
//! Scheduling is single-threaded and cooperative: the application owns a
//! [`Scheduler`] and drives it; launch stages and callback completions
//! run as queued turns, never from within the frame that initiated them.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use jvmlink::{Jvm, Scheduler, Value};
//!
//! let scheduler = Scheduler::new();
//! let jvm = Jvm::new(native_bridge, scheduler.clone());
//!
//! jvm.launch_with(|err| assert!(err.is_none()));
//! scheduler.run_until_idle()?;
//!
//! let string = jvm.import("java.lang.String")?;
//! let out = string.call_sync(
//!     "format",
//!     &[Value::from("%s--%s"), Value::from("hello"), Value::from("world")],
//! )?;
//! assert_eq!(out.as_str(), Some("hello--world"));
//! ```

pub mod convention;
mod hooks;
pub mod jvm;
pub mod proxy;

pub use convention::{CallConvention, Conventions, PromisedOps};
pub use jvm::{Jvm, LaunchCallback};
pub use proxy::{ClassProxy, Member};

pub use jvmlink_core::{
    AsyncOptions, BridgeError, ConfigurationError, Deferred, HookAction, HookDone, HookEntry,
    HookError, InstanceRef, JvmError, LifecycleError, LifecycleState, MemberDescriptor, Modifiers,
    NestedClassDescriptor, Promise, Promisify, ProxyError, Scheduler, Value, ValueCallback, hook,
    promisify_deferred,
};

pub use jvmlink_bridge::{Bridge, ClassHandle};
