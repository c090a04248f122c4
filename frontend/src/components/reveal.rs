use crate::config::RevealConfig;
use crate::surface::Surface;
use crate::trigger::TriggerOnce;
use crate::viewport::WatchOptions;

/// Fades and slides page regions in the first time they enter the viewport.
pub struct RevealEngine<E: Surface> {
    regions: Vec<E>,
    triggers: Vec<TriggerOnce>,
}

impl<E: Surface> RevealEngine<E> {
    /// Hides every region and arms it for observation.
    pub fn new(regions: Vec<E>, config: &RevealConfig) -> Self {
        let transition = format!(
            "opacity {secs}s ease, transform {secs}s ease",
            secs = config.transition_secs
        );
        let offset = format!("translateY({}px)", config.offset_px);
        for region in &regions {
            region.set_style("opacity", "0");
            region.set_style("transform", &offset);
            region.set_style("transition", &transition);
        }
        let triggers = regions.iter().map(|_| TriggerOnce::armed()).collect();
        Self { regions, triggers }
    }

    pub fn watch_options(config: &RevealConfig) -> WatchOptions {
        WatchOptions::new(config.threshold).with_bottom_margin(config.bottom_margin_px)
    }

    pub fn regions(&self) -> &[E] {
        &self.regions
    }

    /// Returns true when the region should be unobserved.
    pub fn on_enter(&self, index: usize) -> bool {
        let (Some(region), Some(trigger)) = (self.regions.get(index), self.triggers.get(index)) else {
            return false;
        };
        if !trigger.fire() {
            return false;
        }
        region.set_style("opacity", "1");
        region.set_style("transform", "translateY(0)");
        trigger.finish();
        true
    }

    #[cfg(test)]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.triggers.get(index).is_some_and(TriggerOnce::has_fired)
    }
}
