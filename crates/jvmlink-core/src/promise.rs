//! Single-threaded promise machinery for the promise calling convention.
//!
//! The scheduling model is cooperative and single-threaded, so a promise
//! here is a plain settle-once cell (`Rc<RefCell<..>>`), not a thread-safe
//! future. [`Deferred`] is the producer half, [`Promise`] the consumer
//! half.
//!
//! The application chooses its own promise representation by supplying a
//! [`Promisify`] transform in its async options; [`promisify_deferred`] is
//! the stock transform built on the types in this module.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{JvmError, Value};

/// Error-first completion callback for a bridged operation.
pub type ValueCallback = Box<dyn FnOnce(Result<Value, JvmError>)>;

/// A callback-style bridged operation: positional arguments plus an
/// error-first completion callback.
pub type CallbackOp = Rc<dyn Fn(Vec<Value>, ValueCallback)>;

/// A promise-style bridged operation.
pub type PromiseOp = Rc<dyn Fn(Vec<Value>) -> Promise<Value>>;

/// Application-supplied transform lifting a callback-style operation into
/// a promise-style one.
pub type Promisify = Rc<dyn Fn(CallbackOp) -> PromiseOp>;

struct Shared<T> {
    settled: Option<Result<T, JvmError>>,
    waiters: Vec<Box<dyn FnOnce(Result<T, JvmError>)>>,
}

/// Consumer half of a settle-once asynchronous result.
pub struct Promise<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("settled", &self.shared.borrow().settled)
            .finish()
    }
}

impl<T: Clone + 'static> Promise<T> {
    /// True once the promise has been resolved or rejected.
    pub fn is_settled(&self) -> bool {
        self.shared.borrow().settled.is_some()
    }

    /// The settled result, if any.
    pub fn state(&self) -> Option<Result<T, JvmError>> {
        self.shared.borrow().settled.clone()
    }

    /// Register a completion callback.
    ///
    /// Runs within the settling call frame, or immediately when the
    /// promise is already settled.
    pub fn then(&self, f: impl FnOnce(Result<T, JvmError>) + 'static) {
        let settled = self.shared.borrow().settled.clone();
        match settled {
            Some(result) => f(result),
            None => self.shared.borrow_mut().waiters.push(Box::new(f)),
        }
    }
}

/// Producer half of a settle-once asynchronous result.
pub struct Deferred<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + 'static> Deferred<T> {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                settled: None,
                waiters: Vec::new(),
            })),
        }
    }

    /// The consumer half observing this deferred.
    pub fn promise(&self) -> Promise<T> {
        Promise {
            shared: self.shared.clone(),
        }
    }

    /// Settle with a result. Settling twice is a no-op; the first result
    /// wins.
    pub fn settle(&self, result: Result<T, JvmError>) {
        let waiters = {
            let mut shared = self.shared.borrow_mut();
            if shared.settled.is_some() {
                return;
            }
            shared.settled = Some(result.clone());
            std::mem::take(&mut shared.waiters)
        };
        for waiter in waiters {
            waiter(result.clone());
        }
    }

    pub fn resolve(&self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(&self, error: JvmError) {
        self.settle(Err(error));
    }
}

impl<T: Clone + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The stock [`Promisify`] transform, built on [`Deferred`].
///
/// Lifts a callback-style operation into one returning a [`Promise`] that
/// settles with whatever the callback was eventually handed.
pub fn promisify_deferred() -> Promisify {
    Rc::new(|op: CallbackOp| {
        Rc::new(move |args: Vec<Value>| {
            let deferred = Deferred::new();
            let promise = deferred.promise();
            (*op)(args, Box::new(move |result| deferred.settle(result)));
            promise
        }) as PromiseOp
    })
}
