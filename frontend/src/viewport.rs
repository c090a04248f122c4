use crate::surface::Rect;

/// Browsers may report a crossing ratio a hair under the threshold that fired it.
const OBSERVED_RATIO_SLACK: f64 = 1e-3;

/// Options for one viewport watcher, mirroring `IntersectionObserverInit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub threshold: f64,
    /// Strip at the bottom of the viewport that does not count as visible.
    pub bottom_margin_px: f64,
}

impl WatchOptions {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            bottom_margin_px: 0.0,
        }
    }

    pub fn with_bottom_margin(mut self, px: f64) -> Self {
        self.bottom_margin_px = px;
        self
    }

    pub fn root_margin(&self) -> String {
        if self.bottom_margin_px > 0.0 {
            format!("0px 0px -{}px 0px", self.bottom_margin_px)
        } else {
            "0px".to_string()
        }
    }

    /// Fraction of `target` (client coordinates) inside the shrunken viewport.
    pub fn visible_ratio(&self, target: Rect, viewport_width: f64, viewport_height: f64) -> f64 {
        let area = target.width * target.height;
        if area <= 0.0 {
            return 0.0;
        }
        let bottom = viewport_height - self.bottom_margin_px;
        let visible_h = (target.bottom().min(bottom) - target.y.max(0.0)).max(0.0);
        let visible_w = (target.right().min(viewport_width) - target.x.max(0.0)).max(0.0);
        (visible_w * visible_h) / area
    }

    pub fn qualifies(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Acceptance test for an `IntersectionObserverEntry`. The observer has
    /// already applied the threshold, so the ratio only has to be close.
    pub fn accepts_entry(&self, is_intersecting: bool, ratio: f64) -> bool {
        is_intersecting && ratio + OBSERVED_RATIO_SLACK >= self.threshold
    }
}
