use log::{info, warn};

mod config;
mod dom;
mod error;
mod scheduler;
mod surface;
mod trigger;
mod viewport;
mod components {
    pub mod contact_form;
    pub mod cookie_consent;
    pub mod counter;
    pub mod media;
    pub mod navigation;
    pub mod pop_in;
    pub mod pricing;
    pub mod reveal;
    pub mod typewriter;
}
#[cfg(test)]
mod testing;

use config::SiteConfig;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let loaded = dom::load_config();
    let level = loaded
        .as_ref()
        .map(SiteConfig::log_level)
        .unwrap_or_else(|_| config::default_log_level());

    // Initialize logging
    console_log::init_with_level(level).expect("error initializing log");

    let config = loaded.unwrap_or_else(|err| {
        warn!("{}, using defaults", err);
        SiteConfig::default()
    });

    info!("Starting site behaviors");
    dom::greet();
    dom::mount(&config);
}
