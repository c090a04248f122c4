//! Two-paragraph typewriter for the about section.
//!
//! On first sight the section's paragraph texts are captured and cleared.
//! The first paragraph is then typed one character per tick; once it is
//! complete and the pause has elapsed, the second paragraph is typed the same
//! way. The section never narrates twice.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::TypewriterConfig;
use crate::scheduler::SharedScheduler;
use crate::surface::Surface;
use crate::trigger::TriggerOnce;
use crate::viewport::WatchOptions;

pub const NARRATED_CLASS: &str = "narrated";
pub const TYPING_CLASS: &str = "typing";
pub const TYPING_COMPLETE_CLASS: &str = "typing-complete";

const MAX_PARAGRAPHS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct TypedParagraph {
    source: Vec<char>,
    cursor: usize,
}

impl TypedParagraph {
    pub fn capture(text: &str) -> Self {
        Self {
            source: text.chars().collect(),
            cursor: 0,
        }
    }

    pub fn revealed(&self) -> String {
        self.source[..self.cursor].iter().collect()
    }

    /// Reveals one more character; `None` once everything is shown.
    pub fn advance(&mut self) -> Option<String> {
        if self.cursor >= self.source.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.revealed())
    }
}

struct Typing<E: Surface> {
    element: E,
    paragraph: TypedParagraph,
    char_ms: u32,
    scheduler: SharedScheduler,
    then: Option<Box<dyn FnOnce()>>,
}

fn type_step<E: Surface>(mut typing: Typing<E>) {
    match typing.paragraph.advance() {
        Some(text) => {
            typing.element.set_text(&text);
            let scheduler = Rc::clone(&typing.scheduler);
            scheduler.after(typing.char_ms, Box::new(move || type_step(typing)));
        }
        None => {
            typing.element.remove_class(TYPING_CLASS);
            typing.element.add_class(TYPING_COMPLETE_CLASS);
            if let Some(then) = typing.then.take() {
                then();
            }
        }
    }
}

fn start_typing<E: Surface>(typing: Typing<E>) {
    typing.element.add_class(TYPING_CLASS);
    type_step(typing);
}

pub struct Narrator<E: Surface> {
    section: E,
    paragraphs: Vec<E>,
    trigger: TriggerOnce,
    config: TypewriterConfig,
    scheduler: SharedScheduler,
    captured: RefCell<Vec<String>>,
}

impl<E: Surface> Narrator<E> {
    pub fn new(
        section: E,
        paragraphs: Vec<E>,
        config: &TypewriterConfig,
        scheduler: SharedScheduler,
    ) -> Self {
        let paragraphs: Vec<E> = paragraphs.into_iter().take(MAX_PARAGRAPHS).collect();
        let trigger = if section.has_class(NARRATED_CLASS) {
            TriggerOnce::new()
        } else {
            TriggerOnce::armed()
        };
        Self {
            section,
            paragraphs,
            trigger,
            config: config.clone(),
            scheduler,
            captured: RefCell::new(Vec::new()),
        }
    }

    pub fn watch_options(config: &TypewriterConfig) -> WatchOptions {
        WatchOptions::new(config.threshold)
    }

    /// Source texts captured at trigger time.
    #[cfg(test)]
    pub fn captured(&self) -> Vec<String> {
        self.captured.borrow().clone()
    }

    /// Returns true when the section should be unobserved.
    pub fn on_enter(&self) -> bool {
        if !self.trigger.fire() {
            return false;
        }
        self.section.add_class(NARRATED_CLASS);

        let mut typings: Vec<Typing<E>> = self
            .paragraphs
            .iter()
            .map(|element| {
                let text = element.text();
                self.captured.borrow_mut().push(text.clone());
                element.set_text("");
                Typing {
                    element: element.clone(),
                    paragraph: TypedParagraph::capture(&text),
                    char_ms: self.config.char_ms,
                    scheduler: Rc::clone(&self.scheduler),
                    then: None,
                }
            })
            .collect();

        if typings.is_empty() {
            log::debug!("typewriter section has no paragraphs");
            self.trigger.finish();
            return true;
        }

        let trigger = self.trigger.clone();
        let last_done: Box<dyn FnOnce()> = Box::new(move || trigger.finish());

        let second = (typings.len() > 1).then(|| typings.remove(1));
        let mut first = typings.remove(0);
        first.then = Some(match second {
            Some(mut second) => {
                second.then = Some(last_done);
                let pause = self.config.paragraph_pause_ms;
                let scheduler = Rc::clone(&self.scheduler);
                Box::new(move || scheduler.after(pause, Box::new(move || start_typing(second))))
            }
            None => last_done,
        });
        start_typing(first);
        true
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.trigger.phase() == crate::trigger::Phase::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, VirtualScheduler};

    #[test]
    fn section_watch_has_no_margin() {
        let options = Narrator::<FakeElement>::watch_options(&TypewriterConfig::default());
        assert_eq!(options, WatchOptions::new(0.2));
        assert_eq!(options.bottom_margin_px, 0.0);
        assert_eq!(options.root_margin(), "0px");
    }

    fn section(texts: &[&str]) -> (Narrator<FakeElement>, FakeElement, Vec<FakeElement>, VirtualScheduler) {
        let clock = VirtualScheduler::new();
        let section = FakeElement::new();
        let paragraphs: Vec<_> = texts.iter().map(|t| FakeElement::with_text(t)).collect();
        let narrator = Narrator::new(
            section.clone(),
            paragraphs.clone(),
            &TypewriterConfig::default(),
            clock.shared(),
        );
        (narrator, section, paragraphs, clock)
    }

    #[test]
    fn paragraph_advances_one_char_per_tick() {
        let mut paragraph = TypedParagraph::capture("héllo");
        let steps: Vec<_> = std::iter::from_fn(|| paragraph.advance()).collect();
        assert_eq!(steps, ["h", "hé", "hél", "héll", "héllo"]);
        assert_eq!(paragraph.advance(), None);
    }

    #[test]
    fn trigger_captures_and_clears() {
        let (narrator, section, paragraphs, _clock) = section(&["Hello", "World"]);
        assert!(narrator.on_enter());
        assert!(section.has_class(NARRATED_CLASS));
        assert_eq!(narrator.captured(), ["Hello", "World"]);
        // first character goes out immediately
        assert_eq!(paragraphs[0].text(), "H");
        assert_eq!(paragraphs[1].text(), "");
        assert!(paragraphs[0].has_class(TYPING_CLASS));
    }

    #[test]
    fn first_paragraph_types_then_second_waits_for_pause() {
        let (narrator, _section, paragraphs, clock) = section(&["abc", "xy"]);
        narrator.on_enter();

        clock.advance(25);
        assert_eq!(paragraphs[0].text(), "ab");
        clock.advance(25);
        assert_eq!(paragraphs[0].text(), "abc");
        assert!(!paragraphs[0].has_class(TYPING_COMPLETE_CLASS));

        // completion is noticed on the following tick
        clock.advance(25);
        assert!(paragraphs[0].has_class(TYPING_COMPLETE_CLASS));
        assert!(!paragraphs[0].has_class(TYPING_CLASS));
        assert_eq!(clock.now_ms(), 75);

        clock.advance(999);
        assert_eq!(paragraphs[1].text(), "");
        assert!(!paragraphs[1].has_class(TYPING_CLASS));
        clock.advance(1);
        assert_eq!(paragraphs[1].text(), "x");
        assert!(paragraphs[1].has_class(TYPING_CLASS));

        clock.flush();
        assert_eq!(paragraphs[1].text(), "xy");
        assert!(paragraphs[1].has_class(TYPING_COMPLETE_CLASS));
        assert!(narrator.is_done());
    }

    #[test]
    fn text_grows_by_exactly_one_char() {
        let (narrator, _section, paragraphs, clock) = section(&["Wortkraft", "Texte mit Wirkung."]);
        narrator.on_enter();
        clock.flush();
        for (paragraph, original) in paragraphs.iter().zip(["Wortkraft", "Texte mit Wirkung."]) {
            let history = paragraph.text_history();
            // first entry is the clear
            assert_eq!(history[0], "");
            for (n, shown) in history[1..].iter().enumerate() {
                assert_eq!(shown.chars().count(), n + 1);
                assert!(original.starts_with(shown.as_str()));
            }
            assert_eq!(history.last().map(String::as_str), Some(original));
        }
    }

    #[test]
    fn reentering_does_not_restart() {
        let (narrator, _section, paragraphs, clock) = section(&["abc", "de"]);
        assert!(narrator.on_enter());
        clock.advance(30);
        assert!(!narrator.on_enter());
        assert!(!narrator.on_enter());
        clock.flush();
        assert_eq!(paragraphs[0].text(), "abc");
        assert_eq!(paragraphs[1].text(), "de");
        assert_eq!(paragraphs[0].text_history().len(), 4);
    }

    #[test]
    fn single_paragraph_skips_second_step() {
        let (narrator, _section, paragraphs, clock) = section(&["solo"]);
        assert!(narrator.on_enter());
        clock.flush();
        assert_eq!(paragraphs[0].text(), "solo");
        assert!(narrator.is_done());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn extra_paragraphs_are_left_untouched() {
        let (narrator, _section, paragraphs, clock) = section(&["a", "b", "c"]);
        narrator.on_enter();
        clock.flush();
        assert_eq!(paragraphs[2].text(), "c");
        assert!(paragraphs[2].text_history().is_empty());
    }

    #[test]
    fn empty_section_is_fine() {
        let (narrator, section, _paragraphs, clock) = section(&[]);
        assert!(narrator.on_enter());
        assert!(section.has_class(NARRATED_CLASS));
        assert!(narrator.is_done());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn empty_first_paragraph_still_hands_over() {
        let (narrator, _section, paragraphs, clock) = section(&["", "go"]);
        narrator.on_enter();
        assert!(paragraphs[0].has_class(TYPING_COMPLETE_CLASS));
        clock.advance(1000);
        assert_eq!(paragraphs[1].text(), "g");
    }
}
