use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConsentConfig;
use crate::error::SiteError;
use crate::scheduler::SharedScheduler;
use crate::surface::Surface;

pub const PREFERENCE_KEY: &str = "cookiePreference";
pub const SHOW_CLASS: &str = "show";

/// Keyframes for the dismissal; injected once since the stylesheet lacks them.
pub const SLIDE_DOWN_KEYFRAMES: &str =
    "@keyframes slideDown { from { transform: translateY(0); } to { transform: translateY(100%); } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookiePreference {
    All,
    Necessary,
}

impl CookiePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookiePreference::All => "all",
            CookiePreference::Necessary => "necessary",
        }
    }

    pub fn allows_analytics(&self) -> bool {
        matches!(self, CookiePreference::All)
    }
}

impl fmt::Display for CookiePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookiePreference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CookiePreference::All),
            "necessary" => Ok(CookiePreference::Necessary),
            _ => Err(()),
        }
    }
}

/// Browser-local key/value persistence.
pub trait PreferenceStore: 'static {
    fn load(&self, key: &str) -> Result<Option<String>, SiteError>;
    fn save(&self, key: &str, value: &str) -> Result<(), SiteError>;
}

/// Reads the stored choice; unknown values count as unset.
pub fn stored_preference<S: PreferenceStore>(store: &S) -> Option<CookiePreference> {
    match store.load(PREFERENCE_KEY) {
        Ok(value) => value.and_then(|v| v.parse().ok()),
        Err(err) => {
            log::warn!("could not read cookie preference: {}", err);
            None
        }
    }
}

/// Stand-in for loading analytics, which the site has not wired to a provider.
pub fn initialize_optional_scripts(preference: Option<CookiePreference>) -> &'static str {
    let message = if preference.is_some_and(|p| p.allows_analytics()) {
        "Analytics enabled"
    } else {
        "Only necessary cookies enabled"
    };
    log::info!("{}", message);
    message
}

pub struct ConsentBanner<E: Surface, S: PreferenceStore> {
    banner: Option<E>,
    store: S,
    config: ConsentConfig,
    scheduler: SharedScheduler,
    chosen: Cell<bool>,
}

impl<E: Surface, S: PreferenceStore> ConsentBanner<E, S> {
    pub fn new(banner: Option<E>, store: S, config: &ConsentConfig, scheduler: SharedScheduler) -> Self {
        Self {
            banner,
            store,
            config: config.clone(),
            scheduler,
            chosen: Cell::new(false),
        }
    }

    /// Schedules the banner if the visitor has never chosen.
    pub fn init(&self) -> Option<CookiePreference> {
        let preference = stored_preference(&self.store);
        if preference.is_none() {
            if let Some(banner) = self.banner.clone() {
                self.scheduler.after(
                    self.config.show_delay_ms,
                    Box::new(move || banner.add_class(SHOW_CLASS)),
                );
            }
        }
        preference
    }

    /// Persists the first choice of the session and dismisses the banner.
    /// Returns false when a choice was already made.
    pub fn choose(&self, preference: CookiePreference) -> bool {
        if self.chosen.replace(true) {
            return false;
        }
        if let Err(err) = self.store.save(PREFERENCE_KEY, preference.as_str()) {
            log::warn!("could not store cookie preference: {}", err);
        }
        log::info!("cookie preference: {}", preference);
        self.hide();
        true
    }

    fn hide(&self) {
        let Some(banner) = self.banner.clone() else {
            return;
        };
        banner.set_style(
            "animation",
            &format!("slideDown {}s ease-out", f64::from(self.config.hide_ms) / 1000.0),
        );
        let scheduler = Rc::clone(&self.scheduler);
        scheduler.after(
            self.config.hide_ms,
            Box::new(move || {
                banner.remove_class(SHOW_CLASS);
                banner.set_style("animation", "");
            }),
        );
    }
}
