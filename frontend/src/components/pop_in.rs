use std::rc::Rc;

use crate::scheduler::SharedScheduler;
use crate::surface::Surface;
use crate::trigger::TriggerOnce;
use crate::viewport::WatchOptions;

pub const POP_CLASS: &str = "pop";

/// Adds `pop` to each item `index * stagger_ms` after the item is first seen.
pub struct PopInSequencer<E: Surface> {
    items: Vec<E>,
    triggers: Vec<TriggerOnce>,
    stagger_ms: u32,
    scheduler: SharedScheduler,
}

impl<E: Surface> PopInSequencer<E> {
    pub fn new(items: Vec<E>, stagger_ms: u32, scheduler: SharedScheduler) -> Self {
        let triggers = items.iter().map(|_| TriggerOnce::armed()).collect();
        Self {
            items,
            triggers,
            stagger_ms,
            scheduler,
        }
    }

    pub fn watch_options(threshold: f64) -> WatchOptions {
        WatchOptions::new(threshold)
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn delay_for(&self, index: usize) -> u32 {
        u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.stagger_ms)
    }

    /// Returns true as soon as the item fires, before its delay has elapsed.
    pub fn on_enter(&self, index: usize) -> bool {
        let (Some(item), Some(trigger)) = (self.items.get(index), self.triggers.get(index)) else {
            return false;
        };
        if !trigger.fire() {
            return false;
        }
        let item = item.clone();
        let trigger = trigger.clone();
        let scheduler = Rc::clone(&self.scheduler);
        scheduler.after(
            self.delay_for(index),
            Box::new(move || {
                item.add_class(POP_CLASS);
                trigger.finish();
            }),
        );
        true
    }
}
