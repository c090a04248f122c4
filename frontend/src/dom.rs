use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::js_sys;
use web_sys::{
    CssStyleSheet, Document, Element, Event, EventTarget, FormData, HtmlElement, HtmlFormElement,
    HtmlSourceElement, HtmlVideoElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollToOptions, Storage, Window,
};

use crate::components::contact_form::{ContactForm, ContactMessage};
use crate::components::cookie_consent::{
    initialize_optional_scripts, ConsentBanner, CookiePreference, PreferenceStore, SLIDE_DOWN_KEYFRAMES,
};
use crate::components::counter::{CounterAnimator, CounterPolicy};
use crate::components::media::{MediaElement, Playlist, SequentialPlayer};
use crate::components::navigation::{
    anchor_target, scroll_top_for, tilt_transform, HeroParallax, LogoVisibility, MobileMenu,
};
use crate::components::pop_in::PopInSequencer;
use crate::components::pricing::PricingSwitch;
use crate::components::reveal::RevealEngine;
use crate::components::typewriter::Narrator;
use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::scheduler::{BrowserScheduler, SharedScheduler};
use crate::surface::{Bounds, Rect, Surface};
use crate::viewport::WatchOptions;

const CONFIG_ID: &str = "siteConfig";
const MENU_TOGGLE: &str = ".mobile-menu-toggle";
const NAV_MENU: &str = ".nav-menu";
const NAV_LINKS: &str = ".nav-menu a";
const IN_PAGE_ANCHORS: &str = "a[href^=\"#\"]";
const LOGO: &str = ".logo";
const HERO_VISUAL: &str = ".hero-visual";
const VISUAL_CARDS: &str = ".visual-card";
const TILT: &str = "[data-tilt]";
const REVEAL_REGIONS: &str = ".services-center, .process-step, .work-item, .about-content, .contact-content";
const PROCESS_CARDS: &str = ".process-step";
const PRICING_FEATURES: &str = ".pricing-card li";
const PRICING_OPTIONS: &str = ".switch-option";
const PRICING_CARDS: &str = ".pricing-card";
const STAT_NUMBERS: &str = ".stat-number";
const STAT_VALUES: &str = ".stat-value[data-target]";
const STORY_SECTION: &str = ".about-story";
const COOKIE_BANNER_ID: &str = "cookieConsent";
const ACCEPT_ALL_ID: &str = "acceptAll";
const ACCEPT_NECESSARY_ID: &str = "acceptNecessary";
const HERO_VIDEO_ID: &str = "heroVideo";
const VIDEO_SOURCE_ID: &str = "videoSource";
const CONTACT_FORM: &str = ".contact-form";

#[derive(Debug, Clone, PartialEq)]
pub struct DomElement(HtmlElement);

impl DomElement {
    fn element(&self) -> &Element {
        self.0.as_ref()
    }
}

impl Surface for DomElement {
    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_style(&self, property: &str, value: &str) {
        let style = self.0.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            log::debug!("style {} rejected: {:?}", property, err);
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().add_1(class) {
            log::debug!("class {} not added: {:?}", class, err);
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().remove_1(class) {
            log::debug!("class {} not removed: {:?}", class, err);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

impl Bounds for DomElement {
    fn bounds(&self) -> Rect {
        let rect = self.0.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}

fn query_all_in(root: &Element, selector: &str) -> Vec<DomElement> {
    collect_nodes(root.query_selector_all(selector))
}

fn query_all(document: &Document, selector: &str) -> Vec<DomElement> {
    collect_nodes(document.query_selector_all(selector))
}

fn collect_nodes(nodes: Result<web_sys::NodeList, JsValue>) -> Vec<DomElement> {
    let Ok(nodes) = nodes else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(DomElement)
        .collect()
}

fn query_one(document: &Document, selector: &str) -> Option<DomElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(DomElement)
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

/// Page-lifetime listener.
fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), SiteError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn intersection_observer_supported(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

/// Calls `on_enter(index)` whenever `targets[index]` qualifies as visible.
/// A `true` return stops watching that target.
fn watch<F>(window: &Window, targets: &[DomElement], options: WatchOptions, on_enter: F) -> Result<(), SiteError>
where
    F: Fn(usize) -> bool + 'static,
{
    if targets.is_empty() {
        return Ok(());
    }
    if !intersection_observer_supported(window) {
        return watch_by_scroll(window, targets.to_vec(), options, on_enter);
    }

    let elements: Vec<Element> = targets.iter().map(|t| t.element().clone()).collect();
    let lookup = elements.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !options.accepts_entry(entry.is_intersecting(), entry.intersection_ratio()) {
                continue;
            }
            let target = entry.target();
            if let Some(index) = lookup.iter().position(|el| *el == target) {
                if on_enter(index) {
                    observer.unobserve(&target);
                }
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin());
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    for element in &elements {
        observer.observe(element);
    }
    Ok(())
}

/// Geometry fallback for browsers without `IntersectionObserver`.
fn watch_by_scroll<F>(window: &Window, targets: Vec<DomElement>, options: WatchOptions, on_enter: F) -> Result<(), SiteError>
where
    F: Fn(usize) -> bool + 'static,
{
    log::debug!("IntersectionObserver missing, watching {} targets on scroll", targets.len());
    let detached = RefCell::new(vec![false; targets.len()]);
    let scroll_window = window.clone();
    let check = move || {
        let (width, height) = viewport_size(&scroll_window);
        for (index, target) in targets.iter().enumerate() {
            let done = detached.borrow()[index];
            if done {
                continue;
            }
            let ratio = options.visible_ratio(target.bounds(), width, height);
            if options.qualifies(ratio) && on_enter(index) {
                detached.borrow_mut()[index] = true;
            }
        }
    };
    check();
    listen(window, "scroll", move |_| check())
}

struct HeroVideo {
    video: HtmlVideoElement,
    source: Option<HtmlSourceElement>,
}

impl MediaElement for HeroVideo {
    fn load_source(&self, src: &str) {
        match &self.source {
            Some(source) => source.set_src(src),
            None => self.video.set_src(src),
        }
        self.video.load();
    }

    fn play(&self, on_rejected: Box<dyn FnOnce(SiteError)>) {
        match self.video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    on_rejected(err.into());
                }
            }),
            Err(err) => on_rejected(err.into()),
        }
    }
}

struct LocalStore;

fn local_storage() -> Result<Storage, SiteError> {
    web_sys::window()
        .ok_or(SiteError::StorageUnavailable)?
        .local_storage()?
        .ok_or(SiteError::StorageUnavailable)
}

impl PreferenceStore for LocalStore {
    fn load(&self, key: &str) -> Result<Option<String>, SiteError> {
        Ok(local_storage()?.get_item(key)?)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SiteError> {
        local_storage()?.set_item(key, value)?;
        Ok(())
    }
}

/// Reads the optional `#siteConfig` JSON block.
pub fn load_config() -> Result<SiteConfig, SiteError> {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ID))
        .and_then(|el| el.text_content());
    match raw {
        Some(raw) if !raw.trim().is_empty() => SiteConfig::from_json(&raw),
        _ => Ok(SiteConfig::default()),
    }
}

pub fn greet() {
    gloo_console::log!(
        "%c🎨 Wortkraftmaster Portfolio",
        "font-size: 20px; font-weight: bold; color: #ff3700;"
    );
    gloo_console::log!("%cBuilt with modern web technologies", "font-size: 12px; color: #666;");
}

/// Attaches every behavior whose elements are on the page. Failures are
/// logged per behavior and never stop the others.
pub fn mount(config: &SiteConfig) {
    let Some(window) = web_sys::window() else {
        log::warn!("no window, page behaviors not attached");
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("no document, page behaviors not attached");
        return;
    };
    let scheduler: SharedScheduler = Rc::new(BrowserScheduler);

    let steps = [
        ("mobile menu", mount_mobile_menu(&window, &document, config)),
        ("anchor scrolling", mount_anchor_scrolling(&window, &document, config)),
        ("logo", mount_logo(&window, &document, config)),
        ("hero parallax", mount_parallax(&window, &document, config)),
        ("tilt", mount_tilt(&document, config)),
        ("reveal", mount_reveal(&window, &document, config)),
        ("hero video", mount_hero_video(&window, &document, config)),
        ("typewriter", mount_typewriter(&window, &document, config, &scheduler)),
        ("pricing switch", mount_pricing(&document)),
        ("cookie consent", mount_cookie_consent(&document, config, &scheduler)),
        ("contact form", mount_contact_form(&document, config, &scheduler)),
    ];
    for (name, result) in steps {
        if let Err(err) = result {
            log::warn!("{} not attached: {}", name, err);
        }
    }
    mount_counters(&window, &document, config, &scheduler);
    mount_pop_in(&window, &document, config, &scheduler);
}

fn mount_mobile_menu(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let (Some(toggle), Some(nav)) = (query_one(document, MENU_TOGGLE), query_one(document, NAV_MENU)) else {
        return Ok(());
    };
    let bars = query_all_in(toggle.element(), "span");
    let menu = Rc::new(MobileMenu::new(toggle.clone(), nav, bars));

    let on_toggle = Rc::clone(&menu);
    listen(&toggle.0, "click", move |_| on_toggle.toggle())?;

    for link in query_all(document, NAV_LINKS) {
        let menu = Rc::clone(&menu);
        let window = window.clone();
        let nav_config = config.navigation.clone();
        listen(&link.0, "click", move |_| {
            let (width, _) = viewport_size(&window);
            menu.on_link_click(width, &nav_config);
        })?;
    }
    Ok(())
}

fn mount_anchor_scrolling(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    for anchor in query_all(document, IN_PAGE_ANCHORS) {
        let window = window.clone();
        let document = document.clone();
        let nav_config = config.navigation.clone();
        let link = anchor.clone();
        listen(&anchor.0, "click", move |event| {
            let Some(href) = link.attribute("href") else {
                return;
            };
            let Some(selector) = anchor_target(&href) else {
                return;
            };
            event.prevent_default();
            // an id that is not a valid selector just means nothing to scroll to
            if let Some(target) = query_one(&document, selector) {
                let options = ScrollToOptions::new();
                options.set_top(scroll_top_for(f64::from(target.0.offset_top()), &nav_config));
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            }
        })?;
    }
    Ok(())
}

fn mount_logo(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let Some(logo) = query_one(document, LOGO) else {
        return Ok(());
    };
    let scroll_window = window.clone();
    let nav_config = config.navigation.clone();
    listen(window, "scroll", move |_| {
        let (width, _) = viewport_size(&scroll_window);
        let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
        LogoVisibility::for_scroll(width, scroll_y, &nav_config).apply(&logo);
    })
}

fn mount_parallax(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    if query_one(document, HERO_VISUAL).is_none() {
        return Ok(());
    }
    let (width, _) = viewport_size(window);
    let Some(parallax) = HeroParallax::new(query_all(document, VISUAL_CARDS), width, &config.navigation) else {
        return Ok(());
    };
    let move_window = window.clone();
    listen(window, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (width, height) = viewport_size(&move_window);
        parallax.on_pointer_move(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            width,
            height,
        );
    })
}

fn mount_tilt(document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let max_deg = config.navigation.tilt_max_deg;
    for element in query_all(document, TILT) {
        let tilted = element.clone();
        listen(&element.0, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let transform = tilt_transform(
                    tilted.bounds(),
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                    max_deg,
                );
                tilted.set_style("transform", &transform);
            }
        })?;
        let reset = element.clone();
        listen(&element.0, "mouseleave", move |_| reset.set_style("transform", ""))?;
    }
    Ok(())
}

fn mount_reveal(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let engine = RevealEngine::new(query_all(document, REVEAL_REGIONS), &config.reveal);
    let regions = engine.regions().to_vec();
    watch(
        window,
        &regions,
        RevealEngine::<DomElement>::watch_options(&config.reveal),
        move |index| engine.on_enter(index),
    )
}

fn mount_counters(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
    scheduler: &SharedScheduler,
) {
    let options = CounterAnimator::<DomElement>::watch_options(&config.counters);
    for (selector, policy) in [
        (STAT_NUMBERS, CounterPolicy::Text),
        (STAT_VALUES, CounterPolicy::Attribute),
    ] {
        let animator = CounterAnimator::new(
            query_all(document, selector),
            policy,
            &config.counters,
            Rc::clone(scheduler),
        );
        let elements = animator.elements().to_vec();
        if let Err(err) = watch(window, &elements, options, move |index| animator.on_enter(index)) {
            log::warn!("counters {} not attached: {}", selector, err);
        }
    }
}

fn mount_hero_video(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let Some(video) = by_id::<HtmlVideoElement>(document, HERO_VIDEO_ID) else {
        return Ok(());
    };
    let source = by_id::<HtmlSourceElement>(document, VIDEO_SOURCE_ID);
    let path = window.location().pathname()?;
    let playlist = Playlist::for_page(&path, &config.media)?;
    let player = Rc::new(SequentialPlayer::new(
        playlist,
        HeroVideo {
            video: video.clone(),
            source,
        },
    ));
    player.start();
    let on_ended = Rc::clone(&player);
    listen(&video, "ended", move |_| on_ended.on_ended())
}

fn mount_typewriter(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
    scheduler: &SharedScheduler,
) -> Result<(), SiteError> {
    let Some(section) = query_one(document, STORY_SECTION) else {
        return Ok(());
    };
    let paragraphs = query_all_in(section.element(), "p");
    let narrator = Narrator::new(section.clone(), paragraphs, &config.typewriter, Rc::clone(scheduler));
    watch(
        window,
        &[section],
        Narrator::<DomElement>::watch_options(&config.typewriter),
        move |_| narrator.on_enter(),
    )
}

fn mount_pop_in(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
    scheduler: &SharedScheduler,
) {
    let options = PopInSequencer::<DomElement>::watch_options(config.pop_in.threshold);
    for (selector, stagger_ms) in [
        (PROCESS_CARDS, config.pop_in.process_stagger_ms),
        (PRICING_FEATURES, config.pop_in.pricing_stagger_ms),
    ] {
        let sequencer = PopInSequencer::new(query_all(document, selector), stagger_ms, Rc::clone(scheduler));
        let items = sequencer.items().to_vec();
        if let Err(err) = watch(window, &items, options, move |index| sequencer.on_enter(index)) {
            log::warn!("pop-in {} not attached: {}", selector, err);
        }
    }
}

fn mount_pricing(document: &Document) -> Result<(), SiteError> {
    let switch = Rc::new(PricingSwitch::new(
        query_all(document, PRICING_OPTIONS),
        query_all(document, PRICING_CARDS),
    ));
    for (index, option) in switch.options().iter().enumerate() {
        let switch = Rc::clone(&switch);
        listen(&option.0, "click", move |_| switch.select(index))?;
    }
    Ok(())
}

fn inject_keyframes(document: &Document, rule: &str) -> Result<(), SiteError> {
    let Some(sheet) = document.style_sheets().get(0) else {
        return Ok(());
    };
    let sheet: CssStyleSheet = sheet
        .dyn_into()
        .map_err(|_| SiteError::Js("first stylesheet is not CSS".to_string()))?;
    let index = sheet.css_rules()?.length();
    sheet.insert_rule_with_index(rule, index)?;
    Ok(())
}

fn mount_cookie_consent(
    document: &Document,
    config: &SiteConfig,
    scheduler: &SharedScheduler,
) -> Result<(), SiteError> {
    let banner_element = by_id::<HtmlElement>(document, COOKIE_BANNER_ID).map(DomElement);
    if banner_element.is_some() {
        if let Err(err) = inject_keyframes(document, SLIDE_DOWN_KEYFRAMES) {
            log::debug!("slideDown keyframes not injected: {}", err);
        }
    }
    let banner = Rc::new(ConsentBanner::new(
        banner_element,
        LocalStore,
        &config.consent,
        Rc::clone(scheduler),
    ));
    let stored = banner.init();
    initialize_optional_scripts(stored);

    for (id, preference) in [
        (ACCEPT_ALL_ID, CookiePreference::All),
        (ACCEPT_NECESSARY_ID, CookiePreference::Necessary),
    ] {
        if let Some(button) = by_id::<HtmlElement>(document, id) {
            let banner = Rc::clone(&banner);
            listen(&button, "click", move |_| {
                banner.choose(preference);
            })?;
        }
    }
    Ok(())
}

fn form_field(data: &FormData, name: &str) -> String {
    data.get(name).as_string().unwrap_or_default()
}

fn mount_contact_form(
    document: &Document,
    config: &SiteConfig,
    scheduler: &SharedScheduler,
) -> Result<(), SiteError> {
    let Some(form) = document
        .query_selector(CONTACT_FORM)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(());
    };
    let button = form
        .query_selector("button[type=\"submit\"]")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(DomElement);
    let contact = ContactForm::new(button, &config.contact, Rc::clone(scheduler));

    let submitted = form.clone();
    listen(&form, "submit", move |event| {
        event.prevent_default();
        let message = match FormData::new_with_form(&submitted) {
            Ok(data) => ContactMessage {
                name: form_field(&data, "name"),
                email: form_field(&data, "email"),
                message: form_field(&data, "message"),
            },
            Err(err) => {
                log::warn!("could not read contact form: {:?}", err);
                ContactMessage::default()
            }
        };
        submitted.reset();
        contact.on_submitted(&message);
    })
}
