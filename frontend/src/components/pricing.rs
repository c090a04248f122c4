use crate::surface::Surface;

pub const OPTION_ATTRIBUTE: &str = "data-option";
pub const PLAN_ATTRIBUTE: &str = "data-plan";

pub struct PricingSwitch<E: Surface> {
    options: Vec<E>,
    cards: Vec<E>,
}

impl<E: Surface> PricingSwitch<E> {
    pub fn new(options: Vec<E>, cards: Vec<E>) -> Self {
        Self { options, cards }
    }

    pub fn options(&self) -> &[E] {
        &self.options
    }

    pub fn select(&self, index: usize) {
        let Some(selected) = self.options.get(index) else {
            return;
        };
        for option in &self.options {
            option.remove_class("active");
        }
        selected.add_class("active");

        let plan = selected.attribute(OPTION_ATTRIBUTE);
        for card in &self.cards {
            let display = if card.attribute(PLAN_ATTRIBUTE) == plan {
                "block"
            } else {
                "none"
            };
            card.set_style("display", display);
        }
    }
}
