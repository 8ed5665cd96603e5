//! Cooperative single-threaded task scheduler.
//!
//! All launch pipeline stages and callback-form completions run as queued
//! turns: a stage never invokes the next stage from within its own call
//! frame, it schedules it. The host drives the queue with
//! [`Scheduler::run_until_idle`] (or turn-by-turn with
//! [`Scheduler::run_one`]).
//!
//! A turn may fail fatally with a [`ConfigurationError`]; that aborts the
//! drain and surfaces to the host, which is the delivery channel for
//! programmer errors that must not reach a launch callback.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::ConfigurationError;

type Task = Box<dyn FnOnce() -> Result<(), ConfigurationError>>;

/// FIFO queue of cooperative turns.
#[derive(Default)]
pub struct Scheduler {
    queue: RefCell<VecDeque<Task>>,
}

impl Scheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Enqueue an infallible turn.
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(move || {
            task();
            Ok(())
        }));
    }

    /// Enqueue a turn that may fail fatally.
    pub fn schedule_fallible(
        &self,
        task: impl FnOnce() -> Result<(), ConfigurationError> + 'static,
    ) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Number of queued turns.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run a single turn. Returns `Ok(false)` when the queue was empty.
    ///
    /// The queue borrow is released before the task runs, so a turn may
    /// freely schedule further turns.
    pub fn run_one(&self) -> Result<bool, ConfigurationError> {
        let task = self.queue.borrow_mut().pop_front();
        match task {
            Some(task) => task().map(|()| true),
            None => Ok(false),
        }
    }

    /// Drain the queue, including turns scheduled while draining.
    ///
    /// Stops at the first fatal error; turns queued behind it are left in
    /// place.
    pub fn run_until_idle(&self) -> Result<(), ConfigurationError> {
        while self.run_one()? {}
        Ok(())
    }
}
