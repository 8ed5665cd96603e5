//! Hook pipeline: ordered before/after actions around runtime creation.
//!
//! A pure sequencing utility over the registered hook list. Only the
//! defined actions of the requested phase run, in registration order,
//! each strictly after the previous one completed; the first failure
//! aborts the rest of the phase and is reported immediately.
//!
//! The walked length is captured when the phase starts, so the set of
//! hooks a phase observes is fixed even if an action registers more.
//! Each action is moved out of its slot for the duration of its
//! synchronous frame and restored afterwards; a failed launch therefore
//! leaves every hook registered, and a retried launch runs them again.

use std::cell::RefCell;
use std::rc::Rc;

use jvmlink_core::{HookAction, HookDone, HookEntry, HookError, Scheduler};

pub(crate) type HookList = Rc<RefCell<Vec<HookEntry>>>;

/// Overall phase completion callback.
pub(crate) type PhaseDone = Box<dyn FnOnce(Result<(), HookError>)>;

/// Which side of runtime creation a phase runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Before,
    After,
}

/// Run every defined action of `phase` in registration order.
///
/// `done` fires with `Ok(())` once all actions completed, or with the
/// first reported failure. Continuation between actions goes through the
/// scheduler; an action's completion never runs the next action from
/// within the completing frame.
pub(crate) fn run_phase(hooks: HookList, phase: Phase, scheduler: Rc<Scheduler>, done: PhaseDone) {
    let len = hooks.borrow().len();
    step(hooks, phase, 0, len, scheduler, done);
}

fn take_action(hooks: &HookList, phase: Phase, index: usize) -> Option<HookAction> {
    let mut list = hooks.borrow_mut();
    match phase {
        Phase::Before => list[index].before.take(),
        Phase::After => list[index].after.take(),
    }
}

fn restore_action(hooks: &HookList, phase: Phase, index: usize, action: HookAction) {
    let mut list = hooks.borrow_mut();
    match phase {
        Phase::Before => list[index].before = Some(action),
        Phase::After => list[index].after = Some(action),
    }
}

fn step(
    hooks: HookList,
    phase: Phase,
    index: usize,
    len: usize,
    scheduler: Rc<Scheduler>,
    done: PhaseDone,
) {
    let mut index = index;
    let mut action = loop {
        if index >= len {
            return done(Ok(()));
        }
        match take_action(&hooks, phase, index) {
            Some(action) => break action,
            None => index += 1,
        }
    };

    let next_hooks = hooks.clone();
    let next_scheduler = scheduler.clone();
    let continue_at = index + 1;
    let completion: HookDone = Box::new(move |result| match result {
        Err(error) => done(Err(error)),
        Ok(()) => {
            let scheduler = next_scheduler.clone();
            next_scheduler.schedule(move || {
                step(next_hooks, phase, continue_at, len, scheduler, done)
            });
        }
    });

    action(completion);
    // the action stays registered; a retried launch runs it again
    restore_action(&hooks, phase, index, action);
}
