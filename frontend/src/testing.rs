//! In-memory page pieces for unit tests: a virtual clock, fake elements,
//! a fake video element and a map-backed preference store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::components::cookie_consent::PreferenceStore;
use crate::components::media::MediaElement;
use crate::error::SiteError;
use crate::scheduler::{Scheduler, SharedScheduler, Task};
use crate::surface::{Bounds, Rect, Surface};

pub const FRAME_MS: u64 = 16;

struct Pending {
    due_at: u64,
    order: u64,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now_ms: u64,
    next_order: u64,
    frame_ms: u64,
    pending: Vec<Pending>,
}

impl Queue {
    fn push(&mut self, due_at: u64, task: Task) {
        let order = self.next_order;
        self.next_order += 1;
        self.pending.push(Pending { due_at, order, task });
    }

    fn take_next(&mut self, limit: u64) -> Option<Pending> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_at <= limit)
            .min_by_key(|(_, p)| (p.due_at, p.order))
            .map(|(idx, _)| idx)?;
        Some(self.pending.remove(idx))
    }
}

/// Deterministic event loop. Tasks run in `(due_at, order)` order and may
/// schedule further tasks while running.
#[derive(Clone)]
pub struct VirtualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::with_frame_ms(FRAME_MS)
    }

    pub fn with_frame_ms(frame_ms: u64) -> Self {
        Self {
            queue: Rc::new(RefCell::new(Queue {
                frame_ms,
                ..Queue::default()
            })),
        }
    }

    pub fn shared(&self) -> SharedScheduler {
        Rc::new(self.clone())
    }

    pub fn now_ms(&self) -> u64 {
        self.queue.borrow().now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    pub fn advance(&self, delta_ms: u64) -> usize {
        let target = self.now_ms() + delta_ms;
        self.run_until(target)
    }

    /// Runs everything, jumping the clock forward as needed.
    pub fn flush(&self) -> usize {
        self.run_until(u64::MAX)
    }

    fn run_until(&self, limit: u64) -> usize {
        let mut ran = 0;
        loop {
            // the borrow must end before the task runs
            let next = self.queue.borrow_mut().take_next(limit);
            let Some(pending) = next else { break };
            {
                let mut queue = self.queue.borrow_mut();
                queue.now_ms = queue.now_ms.max(pending.due_at);
            }
            (pending.task)();
            ran += 1;
            assert!(ran < 1_000_000, "runaway timer loop");
        }
        if limit != u64::MAX {
            let mut queue = self.queue.borrow_mut();
            queue.now_ms = queue.now_ms.max(limit);
        }
        ran
    }
}

impl Scheduler for VirtualScheduler {
    fn after(&self, delay_ms: u32, task: Task) {
        let mut queue = self.queue.borrow_mut();
        let due_at = queue.now_ms + u64::from(delay_ms);
        queue.push(due_at, task);
    }

    fn next_frame(&self, task: Task) {
        let mut queue = self.queue.borrow_mut();
        let due_at = queue.now_ms + queue.frame_ms;
        queue.push(due_at, task);
    }
}

#[derive(Debug, Default)]
struct Node {
    text: String,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    bounds: Rect,
    text_history: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    node: Rc<RefCell<Node>>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let element = Self::new();
        element.node.borrow_mut().text = text.to_string();
        element
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.node
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_bounds(self, bounds: Rect) -> Self {
        self.node.borrow_mut().bounds = bounds;
        self
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.node.borrow().styles.get(property).cloned()
    }

    /// Every value passed to `set_text`, in order.
    pub fn text_history(&self) -> Vec<String> {
        self.node.borrow().text_history.clone()
    }
}

impl Surface for FakeElement {
    fn text(&self) -> String {
        self.node.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        let mut node = self.node.borrow_mut();
        node.text = text.to_string();
        node.text_history.push(text.to_string());
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.node.borrow_mut();
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn add_class(&self, class: &str) {
        let mut node = self.node.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.node.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.node.borrow().classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node.borrow().attributes.get(name).cloned()
    }
}

impl Bounds for FakeElement {
    fn bounds(&self) -> Rect {
        self.node.borrow().bounds
    }
}

#[derive(Debug, Default)]
struct MediaLog {
    sources: Vec<String>,
    plays: usize,
    reject_next: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeMedia {
    log: Rc<RefCell<MediaLog>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded_sources(&self) -> Vec<String> {
        self.log.borrow().sources.clone()
    }

    pub fn current_source(&self) -> Option<String> {
        self.log.borrow().sources.last().cloned()
    }

    pub fn play_count(&self) -> usize {
        self.log.borrow().plays
    }

    pub fn reject_next_play(&self, reason: &str) {
        self.log.borrow_mut().reject_next = Some(reason.to_string());
    }
}

impl MediaElement for FakeMedia {
    fn load_source(&self, src: &str) {
        self.log.borrow_mut().sources.push(src.to_string());
    }

    fn play(&self, on_rejected: Box<dyn FnOnce(SiteError)>) {
        let rejected = {
            let mut log = self.log.borrow_mut();
            log.plays += 1;
            log.reject_next.take()
        };
        if let Some(reason) = rejected {
            on_rejected(SiteError::Js(reason));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<BTreeMap<String, String>>>,
    writes: Rc<RefCell<usize>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn seeded(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, SiteError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SiteError> {
        if self.fail_writes {
            return Err(SiteError::StorageUnavailable);
        }
        *self.writes.borrow_mut() += 1;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_run_in_due_order() {
        let clock = VirtualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for (delay, name) in [(30, "c"), (10, "a"), (10, "b")] {
            let seen = seen.clone();
            clock.after(delay, Box::new(move || seen.borrow_mut().push(name)));
        }
        assert_eq!(clock.advance(20), 2);
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
        assert_eq!(clock.now_ms(), 20);
        clock.flush();
        assert_eq!(*seen.borrow(), vec!["a", "b", "c"]);
        assert_eq!(clock.now_ms(), 30);
    }

    #[test]
    fn chained_tasks_observe_their_own_time() {
        let clock = VirtualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        fn tick(clock: VirtualScheduler, hits: Rc<Cell<u32>>) {
            hits.set(hits.get() + 1);
            if hits.get() < 5 {
                let next = clock.clone();
                clock.after(10, Box::new(move || tick(next, hits)));
            }
        }
        {
            let next = clock.clone();
            let hits = hits.clone();
            clock.after(0, Box::new(move || tick(next, hits)));
        }
        clock.advance(25);
        assert_eq!(hits.get(), 3);
        clock.flush();
        assert_eq!(hits.get(), 5);
        assert_eq!(clock.now_ms(), 40);
    }

    #[test]
    fn frames_use_frame_interval() {
        let clock = VirtualScheduler::with_frame_ms(8);
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        clock.next_frame(Box::new(move || flag.set(true)));
        clock.advance(7);
        assert!(!ran.get());
        clock.advance(1);
        assert!(ran.get());
    }
}
