//! Calling-convention resolver.
//!
//! Derives the active set of call variants from the application-supplied
//! [`AsyncOptions`] once the foreign runtime exists, and augments the
//! three bridge-level operations (construct instance, call instance
//! method, call static method) with promise-returning forms when the
//! promise pair is configured.
//!
//! Validation happens here, at the Created transition. An invalid
//! configuration is a programmer error: it is raised fatally out of the
//! scheduler turn performing the transition and never reaches a launch
//! callback.

use std::rc::Rc;

use jvmlink_core::{
    AsyncOptions, CallbackOp, ConfigurationError, InstanceRef, Promise, Promisify, Value,
};

use jvmlink_bridge::Bridge;

/// Completion protocol of a bridged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    /// Blocking; the result returns from the call itself.
    Sync,
    /// Error-first callback delivered on a later turn.
    Callback,
    /// Promise settled on a later turn.
    Promise,
}

/// The validated, active calling conventions.
///
/// Built from [`AsyncOptions`] when the runtime transitions to Created;
/// snapshotted by every class proxy built afterwards.
pub struct Conventions {
    sync_suffix: String,
    async_suffix: Option<String>,
    promise_suffix: Option<String>,
    promisify: Option<Promisify>,
}

impl std::fmt::Debug for Conventions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conventions")
            .field("sync_suffix", &self.sync_suffix)
            .field("async_suffix", &self.async_suffix)
            .field("promise_suffix", &self.promise_suffix)
            .field("promisify", &self.promisify.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Conventions {
    /// Validate options into the active conventions.
    ///
    /// With no options at all, the defaults apply: `sync_suffix = "Sync"`
    /// and the bare name (`async_suffix = ""`) is the callback
    /// convention.
    pub(crate) fn from_options(options: Option<&AsyncOptions>) -> Result<Self, ConfigurationError> {
        let Some(options) = options else {
            return Ok(Self {
                sync_suffix: "Sync".to_string(),
                async_suffix: Some(String::new()),
                promise_suffix: None,
                promisify: None,
            });
        };
        let sync_suffix = options
            .sync_suffix
            .clone()
            .ok_or(ConfigurationError::MissingSyncSuffix)?;
        match (&options.promise_suffix, &options.promisify) {
            (Some(_), Some(_)) | (None, None) => {}
            _ => return Err(ConfigurationError::MismatchedPromisePair),
        }
        Ok(Self {
            sync_suffix,
            async_suffix: options.async_suffix.clone(),
            promise_suffix: options.promise_suffix.clone(),
            promisify: options.promisify.clone(),
        })
    }

    /// Suffix of the blocking variant. Always present.
    pub fn sync_suffix(&self) -> &str {
        &self.sync_suffix
    }

    /// Suffix of the callback variant, when configured.
    pub fn async_suffix(&self) -> Option<&str> {
        self.async_suffix.as_deref()
    }

    /// Suffix of the promise variant, when configured.
    pub fn promise_suffix(&self) -> Option<&str> {
        self.promise_suffix.as_deref()
    }

    /// The configured promisify transform, when the promise pair is
    /// active.
    pub fn promisify(&self) -> Option<&Promisify> {
        self.promisify.as_ref()
    }

    /// The callback variant exists only when `async_suffix` is a
    /// configured string distinct from `sync_suffix`.
    pub fn has_callback_variant(&self) -> bool {
        self.async_suffix
            .as_deref()
            .is_some_and(|suffix| suffix != self.sync_suffix)
    }

    /// The promise variant exists only when the promise pair is
    /// configured.
    pub fn has_promise_variant(&self) -> bool {
        self.promisify.is_some()
    }

    /// The surface name a method would carry under the suffix naming
    /// scheme, or `None` when the variant is not active.
    pub fn accessor_name(&self, base: &str, convention: CallConvention) -> Option<String> {
        match convention {
            CallConvention::Sync => Some(format!("{base}{}", self.sync_suffix)),
            CallConvention::Callback => self
                .has_callback_variant()
                .then(|| format!("{base}{}", self.async_suffix.as_deref().unwrap_or(""))),
            CallConvention::Promise => self
                .promise_suffix
                .as_deref()
                .map(|suffix| format!("{base}{suffix}")),
        }
    }

    /// Promise-returning forms of the bridge-level operations, when the
    /// promise pair is active.
    pub(crate) fn promisified(&self, bridge: Rc<dyn Bridge>) -> Option<PromisedOps> {
        self.promisify
            .clone()
            .map(|promisify| PromisedOps { bridge, promisify })
    }
}

/// The three bridge-level operations, lifted through the configured
/// promisify transform.
pub struct PromisedOps {
    bridge: Rc<dyn Bridge>,
    promisify: Promisify,
}

impl PromisedOps {
    /// Construct a new foreign instance, promise form.
    pub fn new_instance(&self, class: &str, args: Vec<Value>) -> Promise<Value> {
        let bridge = self.bridge.clone();
        let class = class.to_string();
        let op: CallbackOp =
            Rc::new(move |args, callback| bridge.new_instance_cb(&class, args, callback));
        let lifted = (*self.promisify)(op);
        (*lifted)(args)
    }

    /// Call a static method, promise form.
    pub fn call_static(&self, class: &str, method: &str, args: Vec<Value>) -> Promise<Value> {
        let bridge = self.bridge.clone();
        let class = class.to_string();
        let method = method.to_string();
        let op: CallbackOp =
            Rc::new(move |args, callback| bridge.call_static_cb(&class, &method, args, callback));
        let lifted = (*self.promisify)(op);
        (*lifted)(args)
    }

    /// Call an instance method, promise form.
    pub fn call_method(&self, instance: &InstanceRef, method: &str, args: Vec<Value>) -> Promise<Value> {
        let bridge = self.bridge.clone();
        let instance = instance.clone();
        let method = method.to_string();
        let op: CallbackOp =
            Rc::new(move |args, callback| bridge.call_method_cb(&instance, &method, args, callback));
        let lifted = (*self.promisify)(op);
        (*lifted)(args)
    }
}
