//! Hook registration types.
//!
//! A hook is a pair of optional completion-style actions run around the
//! foreign runtime's creation. Actions are reinvocable (`FnMut`): a
//! failed launch leaves its hooks registered, and a retried launch runs
//! them again.

use crate::HookError;

/// Completion callback handed to a hook action. The action calls it
/// exactly once, with `Ok(())` or its failure.
pub type HookDone = Box<dyn FnOnce(Result<(), HookError>)>;

/// A before/after action registered around runtime creation.
pub type HookAction = Box<dyn FnMut(HookDone)>;

/// Box a closure as a [`HookAction`].
pub fn hook(action: impl FnMut(HookDone) + 'static) -> HookAction {
    Box::new(action)
}

/// A registered pair of hooks. Either phase may be absent.
#[derive(Default)]
pub struct HookEntry {
    pub before: Option<HookAction>,
    pub after: Option<HookAction>,
}

impl HookEntry {
    pub fn new(before: Option<HookAction>, after: Option<HookAction>) -> Self {
        Self { before, after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_phases_are_independent() {
        let entry = HookEntry::new(Some(hook(|done| done(Ok(())))), None);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn actions_complete_through_the_callback() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut action = hook(|done| done(Err(HookError::new("dummy error"))));
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        // direct invocation, the pipeline normally drives this
        action(Box::new(move |result| *sink.borrow_mut() = result.err()));
        assert_eq!(*seen.borrow(), Some(HookError::new("dummy error")));
    }
}
