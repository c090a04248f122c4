use crate::config::NavigationConfig;
use crate::surface::{Rect, Surface};

pub const ACTIVE_CLASS: &str = "active";

/// Burger button plus the menu it opens. The button's three bars morph into a cross.
pub struct MobileMenu<E: Surface> {
    toggle: E,
    menu: E,
    bars: Vec<E>,
}

impl<E: Surface> MobileMenu<E> {
    pub fn new(toggle: E, menu: E, bars: Vec<E>) -> Self {
        Self { toggle, menu, bars }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.toggle.has_class(ACTIVE_CLASS)
    }

    pub fn toggle(&self) {
        self.menu.toggle_class(ACTIVE_CLASS);
        let open = self.toggle.toggle_class(ACTIVE_CLASS);
        self.draw_bars(open);
    }

    /// Nav link clicked: only collapses on mobile widths.
    pub fn on_link_click(&self, viewport_width: f64, config: &NavigationConfig) {
        if viewport_width <= config.mobile_breakpoint_px {
            self.menu.remove_class(ACTIVE_CLASS);
            self.toggle.remove_class(ACTIVE_CLASS);
            self.draw_bars(false);
        }
    }

    fn draw_bars(&self, open: bool) {
        let styles: [(&str, &str); 3] = if open {
            [
                ("transform", "rotate(45deg) translate(5px, 5px)"),
                ("opacity", "0"),
                ("transform", "rotate(-45deg) translate(7px, -6px)"),
            ]
        } else {
            [("transform", "none"), ("opacity", "1"), ("transform", "none")]
        };
        for (bar, (property, value)) in self.bars.iter().zip(styles) {
            bar.set_style(property, value);
        }
    }
}

/// Id selector to scroll to for an in-page link, or `None` for placeholder links.
pub fn anchor_target(href: &str) -> Option<&str> {
    match href {
        "#" | "#!" => None,
        _ if href.starts_with('#') => Some(href),
        _ => None,
    }
}

/// Scroll position that leaves the fixed navbar clear of the target.
pub fn scroll_top_for(offset_top: f64, config: &NavigationConfig) -> f64 {
    offset_top - config.nav_offset_px
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoVisibility {
    Shown,
    Hidden,
}

impl LogoVisibility {
    pub fn for_scroll(viewport_width: f64, scroll_y: f64, config: &NavigationConfig) -> Self {
        if viewport_width > config.mobile_breakpoint_px && scroll_y > config.logo_hide_after_px {
            LogoVisibility::Hidden
        } else {
            LogoVisibility::Shown
        }
    }

    pub fn apply<E: Surface>(self, logo: &E) {
        match self {
            LogoVisibility::Shown => {
                logo.set_style("opacity", "1");
                logo.set_style("pointer-events", "auto");
            }
            LogoVisibility::Hidden => {
                logo.set_style("opacity", "0");
                logo.set_style("pointer-events", "none");
            }
        }
    }
}

fn card_rotation<E: Surface>(card: &E) -> i32 {
    if card.has_class("card-1") {
        -6
    } else if card.has_class("card-2") {
        3
    } else {
        -3
    }
}

/// Pointer parallax over the hero cards; deeper cards move further.
pub struct HeroParallax<E: Surface> {
    cards: Vec<E>,
    divisor: f64,
}

impl<E: Surface> HeroParallax<E> {
    /// `None` on mobile widths, where the effect is never attached.
    pub fn new(cards: Vec<E>, viewport_width: f64, config: &NavigationConfig) -> Option<Self> {
        if viewport_width <= config.mobile_breakpoint_px {
            return None;
        }
        Some(Self {
            cards,
            divisor: config.parallax_divisor,
        })
    }

    pub fn on_pointer_move(&self, x: f64, y: f64, viewport_width: f64, viewport_height: f64) {
        let move_x = (x - viewport_width / 2.0) / self.divisor;
        let move_y = (y - viewport_height / 2.0) / self.divisor;
        for (index, card) in self.cards.iter().enumerate() {
            let depth = (index + 1) as f64 * 0.5;
            card.set_style(
                "transform",
                &format!(
                    "translate({}px, {}px) rotate({}deg)",
                    move_x * depth,
                    move_y * depth,
                    card_rotation(card)
                ),
            );
        }
    }
}

/// Hover tilt for `[data-tilt]` elements.
pub fn tilt_transform(bounds: Rect, x: f64, y: f64, max_deg: f64) -> String {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return "none".to_string();
    }
    // -1..1 across the element
    let px = (((x - bounds.x) / bounds.width) * 2.0 - 1.0).clamp(-1.0, 1.0);
    let py = (((y - bounds.y) / bounds.height) * 2.0 - 1.0).clamp(-1.0, 1.0);
    let rotate_x = (0.0 - py) * max_deg;
    let rotate_y = px * max_deg;
    format!(
        "perspective(1000px) rotateX({:.2}deg) rotateY({:.2}deg)",
        rotate_x, rotate_y
    )
}
