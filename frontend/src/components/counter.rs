use std::rc::Rc;

use crate::config::CounterConfig;
use crate::error::SiteError;
use crate::scheduler::{Scheduler, SharedScheduler};
use crate::surface::Surface;
use crate::trigger::TriggerOnce;
use crate::viewport::WatchOptions;

pub const ANIMATED_CLASS: &str = "animated";
pub const TARGET_ATTRIBUTE: &str = "data-target";

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Intermediate(String),
    Final(String),
}

pub trait Counter {
    fn step(&mut self) -> Frame;
}

fn increment_for(target: f64, config: &CounterConfig) -> f64 {
    let ticks = f64::from(config.duration_ms) / f64::from(config.tick_ms.max(1));
    if ticks > 0.0 {
        target / ticks
    } else {
        target
    }
}

/// Counts up to the number shown in the element's own text ("250+", "98%").
#[derive(Debug, Clone)]
pub struct TextCounter {
    original: String,
    suffix: char,
    target: f64,
    increment: f64,
    current: f64,
}

impl TextCounter {
    pub fn parse(text: &str, config: &CounterConfig) -> Result<Self, SiteError> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(SiteError::MalformedCounter(text.to_string()));
        }
        let target: u64 = digits
            .parse()
            .map_err(|_| SiteError::CounterOverflow(text.to_string()))?;
        let target = target as f64;
        Ok(Self {
            original: text.to_string(),
            suffix: if text.contains('%') { '%' } else { '+' },
            target,
            increment: increment_for(target, config),
            current: 0.0,
        })
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }
}

impl Counter for TextCounter {
    fn step(&mut self) -> Frame {
        self.current += self.increment;
        if self.current >= self.target {
            Frame::Final(self.original.clone())
        } else {
            Frame::Intermediate(format!("{}{}", self.current.floor() as u64, self.suffix))
        }
    }
}

/// Counts up to the integer in `data-target`, rounding intermediate values up.
#[derive(Debug, Clone)]
pub struct AttributeTicker {
    target: u64,
    increment: f64,
    current: f64,
}

impl AttributeTicker {
    pub fn parse(raw: Option<&str>, config: &CounterConfig) -> Result<Self, SiteError> {
        let raw = raw.unwrap_or_default();
        let target: u64 = raw
            .trim()
            .parse()
            .map_err(|_| SiteError::InvalidTickerTarget(raw.to_string()))?;
        Ok(Self {
            target,
            increment: increment_for(target as f64, config),
            current: 0.0,
        })
    }

    #[cfg(test)]
    pub fn target(&self) -> u64 {
        self.target
    }
}

impl Counter for AttributeTicker {
    fn step(&mut self) -> Frame {
        self.current += self.increment;
        if self.current < self.target as f64 {
            Frame::Intermediate(format!("{}", self.current.ceil() as u64))
        } else {
            Frame::Final(self.target.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPolicy {
    /// `.stat-number`: fixed interval ticks, target from text.
    Text,
    /// `.stat-value[data-target]`: one tick per display frame.
    Attribute,
}

#[derive(Clone, Copy)]
enum Cadence {
    Every(u32),
    Frame,
}

impl Cadence {
    fn schedule(self, scheduler: &dyn Scheduler, task: Box<dyn FnOnce()>) {
        match self {
            Cadence::Every(ms) => scheduler.after(ms, task),
            Cadence::Frame => scheduler.next_frame(task),
        }
    }
}

struct CounterRun<E: Surface> {
    element: E,
    counter: Box<dyn Counter>,
    trigger: TriggerOnce,
    scheduler: SharedScheduler,
    cadence: Cadence,
}

fn tick<E: Surface>(mut run: CounterRun<E>) {
    match run.counter.step() {
        Frame::Intermediate(text) => {
            run.element.set_text(&text);
            let scheduler = Rc::clone(&run.scheduler);
            let cadence = run.cadence;
            cadence.schedule(scheduler.as_ref(), Box::new(move || tick(run)));
        }
        Frame::Final(text) => {
            run.element.set_text(&text);
            run.trigger.finish();
        }
    }
}

/// Starts a count-up the first time each element is half visible.
pub struct CounterAnimator<E: Surface> {
    elements: Vec<E>,
    triggers: Vec<TriggerOnce>,
    policy: CounterPolicy,
    config: CounterConfig,
    scheduler: SharedScheduler,
}

impl<E: Surface> CounterAnimator<E> {
    pub fn new(
        elements: Vec<E>,
        policy: CounterPolicy,
        config: &CounterConfig,
        scheduler: SharedScheduler,
    ) -> Self {
        let triggers = elements
            .iter()
            .map(|element| {
                // markup may ship a counter already in its final state
                if policy == CounterPolicy::Text && element.has_class(ANIMATED_CLASS) {
                    TriggerOnce::new()
                } else {
                    TriggerOnce::armed()
                }
            })
            .collect();
        Self {
            elements,
            triggers,
            policy,
            config: config.clone(),
            scheduler,
        }
    }

    pub fn watch_options(config: &CounterConfig) -> WatchOptions {
        WatchOptions::new(config.threshold)
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Returns true when the element should be unobserved.
    pub fn on_enter(&self, index: usize) -> bool {
        let (Some(element), Some(trigger)) = (self.elements.get(index), self.triggers.get(index)) else {
            return false;
        };
        if !trigger.fire() {
            return false;
        }

        let parsed: Result<(Box<dyn Counter>, Cadence), SiteError> = match self.policy {
            CounterPolicy::Text => {
                element.add_class(ANIMATED_CLASS);
                TextCounter::parse(&element.text(), &self.config)
                    .map(|c| (Box::new(c) as Box<dyn Counter>, Cadence::Every(self.config.tick_ms)))
            }
            CounterPolicy::Attribute => {
                AttributeTicker::parse(element.attribute(TARGET_ATTRIBUTE).as_deref(), &self.config)
                    .map(|c| (Box::new(c) as Box<dyn Counter>, Cadence::Frame))
            }
        };

        match parsed {
            Ok((counter, cadence)) => {
                let run = CounterRun {
                    element: element.clone(),
                    counter,
                    trigger: trigger.clone(),
                    scheduler: Rc::clone(&self.scheduler),
                    cadence,
                };
                cadence.schedule(self.scheduler.as_ref(), Box::new(move || tick(run)));
            }
            Err(err) => {
                log::warn!("skipping counter animation: {}", err);
                trigger.finish();
            }
        }
        true
    }

    #[cfg(test)]
    pub fn is_done(&self, index: usize) -> bool {
        self.triggers
            .get(index)
            .is_some_and(|t| t.phase() == crate::trigger::Phase::Done)
    }
}
