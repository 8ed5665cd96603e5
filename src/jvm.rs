//! The lifecycle controller.
//!
//! [`Jvm`] is an explicit context object owned by the application entry
//! point: it holds the bridge, the scheduler, the one-shot lifecycle
//! state, the registered hooks, and the calling-convention configuration.
//! There is no process-wide singleton; everything that needs the context
//! is handed a (cheap) clone.
//!
//! # Launch protocol
//!
//! `launch_with` is the callback form; `launch` is the promise form and
//! requires a configured `promisify`. The launch work itself always runs
//! on later scheduler turns: before-hooks, the blocking runtime-creation
//! call, convention activation, after-hooks, completion. Any failure
//! leaves the state at NotCreated and the hooks registered, so a retry
//! is permitted.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use jvmlink::{Jvm, Scheduler, Value};
//!
//! let scheduler = Scheduler::new();
//! let jvm = Jvm::new(bridge, scheduler.clone());
//! jvm.launch_with(|err| assert!(err.is_none()));
//! scheduler.run_until_idle()?;
//!
//! let string = jvm.import("java.lang.String")?;
//! let out = string.call_sync("format", &[Value::from("%s!"), Value::from("hi")])?;
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use jvmlink_core::{
    AsyncOptions, CallbackOp, ConfigurationError, HookAction, HookEntry, JvmError,
    LifecycleError, LifecycleState, Promise, Scheduler, Value, ValueCallback,
};

use jvmlink_bridge::Bridge;

use crate::convention::{Conventions, PromisedOps};
use crate::hooks::{self, HookList, Phase};
use crate::proxy::{self, ClassProxy};

/// Error-first completion callback for the callback-form launch.
/// `None` means the runtime was created.
pub type LaunchCallback = Box<dyn FnOnce(Option<JvmError>)>;

struct JvmInner {
    bridge: Rc<dyn Bridge>,
    scheduler: Rc<Scheduler>,
    state: Cell<LifecycleState>,
    launch_in_flight: Cell<bool>,
    hooks: HookList,
    options: RefCell<Option<AsyncOptions>>,
    conventions: RefCell<Option<Rc<Conventions>>>,
    promised: RefCell<Option<Rc<PromisedOps>>>,
}

/// The application-facing context over one foreign runtime.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Jvm {
    inner: Rc<JvmInner>,
}

impl Jvm {
    /// Create a context over the given bridge. The runtime does not
    /// exist until a launch succeeds.
    pub fn new(bridge: Rc<dyn Bridge>, scheduler: Rc<Scheduler>) -> Self {
        Self {
            inner: Rc::new(JvmInner {
                bridge,
                scheduler,
                state: Cell::new(LifecycleState::NotCreated),
                launch_in_flight: Cell::new(false),
                hooks: Rc::new(RefCell::new(Vec::new())),
                options: RefCell::new(None),
                conventions: RefCell::new(None),
                promised: RefCell::new(None),
            }),
        }
    }

    /// True once the foreign runtime has been created.
    pub fn is_created(&self) -> bool {
        self.inner.state.get().is_created()
    }

    /// The scheduler driving this context's turns.
    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.inner.scheduler
    }

    /// Register a before/after hook pair around runtime creation.
    ///
    /// Rejected once the runtime exists. Hooks run in registration
    /// order; a failed launch leaves them registered.
    pub fn register_hook(
        &self,
        before: Option<HookAction>,
        after: Option<HookAction>,
    ) -> Result<(), LifecycleError> {
        if self.is_created() {
            return Err(LifecycleError::HookAfterCreate);
        }
        self.inner.hooks.borrow_mut().push(HookEntry::new(before, after));
        Ok(())
    }

    /// Supply the calling-convention configuration.
    ///
    /// Carried as-is until launch; validated at the Created transition.
    /// Rejected once the runtime exists.
    pub fn set_async_options(&self, options: AsyncOptions) -> Result<(), LifecycleError> {
        if self.is_created() {
            return Err(LifecycleError::OptionsAfterCreate);
        }
        *self.inner.options.borrow_mut() = Some(options);
        Ok(())
    }

    /// The active conventions, once the runtime exists.
    pub fn conventions(&self) -> Option<Rc<Conventions>> {
        self.inner.conventions.borrow().clone()
    }

    /// Promise-returning forms of the bridge-level operations, once the
    /// runtime exists and the promise pair is configured.
    pub fn promised(&self) -> Option<Rc<PromisedOps>> {
        self.inner.promised.borrow().clone()
    }

    /// Launch the foreign runtime, callback form.
    ///
    /// Completion is always delivered on a later scheduler turn: `None`
    /// on success, the first encountered error otherwise. A call after
    /// creation or while a launch is pending fails that call only.
    pub fn launch_with(&self, callback: impl FnOnce(Option<JvmError>) + 'static) {
        let callback: LaunchCallback = Box::new(callback);
        if self.is_created() {
            self.inner.scheduler.schedule(move || {
                callback(Some(LifecycleError::AlreadyLaunched.into()))
            });
            return;
        }
        if self.inner.launch_in_flight.get() {
            self.inner.scheduler.schedule(move || {
                callback(Some(LifecycleError::LaunchInFlight.into()))
            });
            return;
        }
        self.inner.launch_in_flight.set(true);
        log::debug!("launch scheduled");
        let jvm = self.clone();
        self.inner
            .scheduler
            .schedule(move || jvm.run_before_phase(callback));
    }

    /// Launch the foreign runtime, promise form.
    ///
    /// Requires a configured `promisify`; fails synchronously with
    /// [`LifecycleError::CallbackRequired`] otherwise. The callback-form
    /// launch is wrapped through `promisify` freshly on every call. The
    /// returned promise resolves with [`Value::Null`] exactly when
    /// [`Jvm::is_created`] becomes true.
    pub fn launch(&self) -> Result<Promise<Value>, LifecycleError> {
        let promisify = self
            .inner
            .options
            .borrow()
            .as_ref()
            .and_then(|options| options.promisify.clone())
            .ok_or(LifecycleError::CallbackRequired)?;

        let jvm = self.clone();
        let op: CallbackOp = Rc::new(move |_args: Vec<Value>, callback: ValueCallback| {
            jvm.launch_with(move |error| match error {
                None => callback(Ok(Value::Null)),
                Some(error) => callback(Err(error)),
            });
        });
        let lifted = (*promisify)(op);
        Ok((*lifted)(Vec::new()))
    }

    /// Build a class proxy over the named foreign class.
    ///
    /// Synchronous; requires a created runtime. Each call produces an
    /// independent proxy.
    pub fn import(&self, class_name: &str) -> Result<ClassProxy, JvmError> {
        let conventions = self
            .inner
            .conventions
            .borrow()
            .clone()
            .ok_or(LifecycleError::NotCreated)?;
        proxy::build(self.inner.bridge.clone(), conventions, class_name)
    }

    // === launch pipeline stages ===

    fn run_before_phase(&self, callback: LaunchCallback) {
        let jvm = self.clone();
        hooks::run_phase(
            self.inner.hooks.clone(),
            Phase::Before,
            self.inner.scheduler.clone(),
            Box::new(move |result| match result {
                Err(error) => jvm.finish_launch(callback, Some(error.into())),
                Ok(()) => {
                    let next = jvm.clone();
                    jvm.inner
                        .scheduler
                        .schedule_fallible(move || next.create_and_configure(callback));
                }
            }),
        );
    }

    /// The creation turn: the blocking bridge call, then convention
    /// activation. An invalid configuration aborts this turn fatally;
    /// it never reaches the launch callback.
    fn create_and_configure(&self, callback: LaunchCallback) -> Result<(), ConfigurationError> {
        log::debug!("creating foreign runtime");
        if let Err(error) = self.inner.bridge.create_runtime() {
            self.finish_launch(callback, Some(error.into()));
            return Ok(());
        }

        let conventions = match Conventions::from_options(self.inner.options.borrow().as_ref()) {
            Ok(conventions) => Rc::new(conventions),
            Err(error) => {
                self.inner.launch_in_flight.set(false);
                return Err(error);
            }
        };
        let promised = conventions
            .promisified(self.inner.bridge.clone())
            .map(Rc::new);
        *self.inner.conventions.borrow_mut() = Some(conventions);
        *self.inner.promised.borrow_mut() = promised;

        // suspension point: the after phase starts on its own turn
        let jvm = self.clone();
        self.inner
            .scheduler
            .schedule(move || jvm.run_after_phase(callback));
        Ok(())
    }

    fn run_after_phase(&self, callback: LaunchCallback) {
        let jvm = self.clone();
        hooks::run_phase(
            self.inner.hooks.clone(),
            Phase::After,
            self.inner.scheduler.clone(),
            Box::new(move |result| match result {
                Err(error) => jvm.finish_launch(callback, Some(error.into())),
                Ok(()) => {
                    jvm.inner.state.set(LifecycleState::Created);
                    jvm.finish_launch(callback, None);
                }
            }),
        );
    }

    fn finish_launch(&self, callback: LaunchCallback, error: Option<JvmError>) {
        self.inner.launch_in_flight.set(false);
        match &error {
            None => log::debug!("foreign runtime created"),
            Some(error) => {
                // a failed launch leaves no active conventions behind;
                // a retry re-activates them
                self.inner.conventions.borrow_mut().take();
                self.inner.promised.borrow_mut().take();
                log::debug!("launch failed: {error}");
            }
        }
        callback(error);
    }
}
