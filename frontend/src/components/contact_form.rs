use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::config::ContactConfig;
use crate::scheduler::SharedScheduler;
use crate::surface::Surface;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Acknowledges a submission locally; there is no endpoint to send it to.
pub struct ContactForm<E: Surface> {
    button: Option<E>,
    config: ContactConfig,
    scheduler: SharedScheduler,
    // label to restore; kept across quick resubmits
    original_label: Rc<RefCell<Option<String>>>,
}

impl<E: Surface> ContactForm<E> {
    pub fn new(button: Option<E>, config: &ContactConfig, scheduler: SharedScheduler) -> Self {
        Self {
            button,
            config: config.clone(),
            scheduler,
            original_label: Rc::new(RefCell::new(None)),
        }
    }

    /// Call after the form element itself has been reset.
    pub fn on_submitted(&self, message: &ContactMessage) {
        match serde_json::to_string(message) {
            Ok(json) => log::info!("Form submitted: {}", json),
            Err(err) => log::warn!("Form submitted but could not be logged: {}", err),
        }

        let Some(button) = self.button.clone() else {
            return;
        };
        {
            let mut original = self.original_label.borrow_mut();
            if original.is_none() {
                *original = Some(button.text());
            }
        }
        button.set_text(&self.config.sent_label);
        button.set_style("background-color", &self.config.sent_color);

        let original_label = Rc::clone(&self.original_label);
        self.scheduler.after(
            self.config.restore_ms,
            Box::new(move || {
                if let Some(label) = original_label.borrow_mut().take() {
                    button.set_text(&label);
                }
                button.set_style("background-color", "");
            }),
        );
    }
}
