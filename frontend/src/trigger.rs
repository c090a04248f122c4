use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unobserved,
    Armed,
    Fired,
    Done,
}

/// `unobserved -> armed -> fired -> done`, with `armed -> fired` at most once.
///
/// Clones share the same phase so a scheduled task can finish the trigger
/// that started it.
#[derive(Debug, Clone)]
pub struct TriggerOnce {
    phase: Rc<Cell<Phase>>,
}

impl Default for TriggerOnce {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerOnce {
    pub fn new() -> Self {
        Self {
            phase: Rc::new(Cell::new(Phase::Unobserved)),
        }
    }

    pub fn armed() -> Self {
        let trigger = Self::new();
        trigger.arm();
        trigger
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn arm(&self) {
        if self.phase.get() == Phase::Unobserved {
            self.phase.set(Phase::Armed);
        }
    }

    /// True only for the call that moves the trigger out of `Armed`.
    pub fn fire(&self) -> bool {
        if self.phase.get() != Phase::Armed {
            return false;
        }
        self.phase.set(Phase::Fired);
        true
    }

    pub fn finish(&self) {
        if self.phase.get() == Phase::Fired {
            self.phase.set(Phase::Done);
        }
    }

    #[cfg(test)]
    pub fn has_fired(&self) -> bool {
        matches!(self.phase.get(), Phase::Fired | Phase::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once() {
        let trigger = TriggerOnce::armed();
        assert!(trigger.fire());
        assert!(!trigger.fire());
        trigger.finish();
        assert!(!trigger.fire());
        assert_eq!(trigger.phase(), Phase::Done);
    }

    #[test]
    fn unarmed_never_fires() {
        let trigger = TriggerOnce::new();
        assert!(!trigger.fire());
        assert_eq!(trigger.phase(), Phase::Unobserved);
    }

    #[test]
    fn done_cannot_rearm() {
        let trigger = TriggerOnce::armed();
        trigger.fire();
        trigger.finish();
        trigger.arm();
        assert_eq!(trigger.phase(), Phase::Done);
    }

    #[test]
    fn clones_share_phase() {
        let trigger = TriggerOnce::armed();
        let task_copy = trigger.clone();
        assert!(trigger.fire());
        task_copy.finish();
        assert_eq!(trigger.phase(), Phase::Done);
    }
}
