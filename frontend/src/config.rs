use log::Level;
use serde::Deserialize;

use crate::error::SiteError;

#[cfg(debug_assertions)]
pub fn default_log_level() -> Level {
    Level::Debug // Verbose when served by `trunk serve`
}

#[cfg(not(debug_assertions))]
pub fn default_log_level() -> Level {
    Level::Info
}

/// Timing, threshold and path settings for every behavior on the page.
///
/// Defaults match the published site. A page may override any subset by
/// embedding `<script type="application/json" id="siteConfig">`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub log_level: Option<String>,
    pub reveal: RevealConfig,
    pub counters: CounterConfig,
    pub media: MediaConfig,
    pub typewriter: TypewriterConfig,
    pub pop_in: PopInConfig,
    pub navigation: NavigationConfig,
    pub consent: ConsentConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub bottom_margin_px: f64,
    pub offset_px: f64,
    pub transition_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub threshold: f64,
    pub duration_ms: u32,
    pub tick_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub root_base: String,
    pub localized_base: String,
    pub localized_marker: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub threshold: f64,
    pub char_ms: u32,
    pub paragraph_pause_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PopInConfig {
    pub threshold: f64,
    pub process_stagger_ms: u32,
    pub pricing_stagger_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub mobile_breakpoint_px: f64,
    pub nav_offset_px: f64,
    pub logo_hide_after_px: f64,
    pub parallax_divisor: f64,
    pub tilt_max_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    pub show_delay_ms: u32,
    pub hide_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub restore_ms: u32,
    pub sent_label: String,
    pub sent_color: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            reveal: RevealConfig::default(),
            counters: CounterConfig::default(),
            media: MediaConfig::default(),
            typewriter: TypewriterConfig::default(),
            pop_in: PopInConfig::default(),
            navigation: NavigationConfig::default(),
            consent: ConsentConfig::default(),
            contact: ContactConfig::default(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 100.0,
            offset_px: 30.0,
            transition_secs: 0.6,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            duration_ms: 2000,
            tick_ms: 16,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_base: "assets/videos".to_string(),
            localized_base: "../assets/videos".to_string(),
            localized_marker: "/de/".to_string(),
            files: vec!["hero-1.mp4".to_string(), "hero-2.mp4".to_string()],
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            char_ms: 25,
            paragraph_pause_ms: 1000,
        }
    }
}

impl Default for PopInConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            process_stagger_ms: 150,
            pricing_stagger_ms: 100,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: 768.0,
            nav_offset_px: 80.0,
            logo_hide_after_px: 100.0,
            parallax_divisor: 50.0,
            tilt_max_deg: 10.0,
        }
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 1000,
            hide_ms: 300,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            restore_ms: 3000,
            sent_label: "Message Sent!".to_string(),
            sent_color: "#10b981".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or_else(default_log_level)
    }
}
