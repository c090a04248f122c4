use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MediaConfig;
use crate::error::SiteError;

pub trait MediaElement: 'static {
    /// Points the element at `src` and reloads it.
    fn load_source(&self, src: &str);
    /// Starts playback. A refused start is reported through `on_rejected`,
    /// possibly after this call returns.
    fn play(&self, on_rejected: Box<dyn FnOnce(SiteError)>);
}

/// Picks the asset base for the current page path.
pub fn resolve_base<'a>(path: &str, config: &'a MediaConfig) -> &'a str {
    if !config.localized_marker.is_empty() && path.contains(&config.localized_marker) {
        &config.localized_base
    } else {
        &config.root_base
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    sources: Vec<String>,
    index: usize,
}

impl Playlist {
    pub fn new(sources: Vec<String>) -> Result<Self, SiteError> {
        if sources.is_empty() {
            return Err(SiteError::EmptyPlaylist);
        }
        Ok(Self { sources, index: 0 })
    }

    pub fn for_page(path: &str, config: &MediaConfig) -> Result<Self, SiteError> {
        let base = resolve_base(path, config).trim_end_matches('/');
        Self::new(
            config
                .files
                .iter()
                .map(|file| format!("{}/{}", base, file))
                .collect(),
        )
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.sources[self.index]
    }

    #[cfg(test)]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn advance(&mut self) -> &str {
        self.index = (self.index + 1) % self.sources.len();
        self.current()
    }
}

/// Background video that walks its playlist forever, one item per `ended`.
pub struct SequentialPlayer<M: MediaElement> {
    playlist: RefCell<Playlist>,
    media: M,
    rejections: Rc<RefCell<usize>>,
}

impl<M: MediaElement> SequentialPlayer<M> {
    pub fn new(playlist: Playlist, media: M) -> Self {
        Self {
            playlist: RefCell::new(playlist),
            media,
            rejections: Rc::new(RefCell::new(0)),
        }
    }

    pub fn start(&self) {
        let src = self.playlist.borrow().current().to_string();
        self.load_and_play(&src);
    }

    pub fn on_ended(&self) {
        let src = self.playlist.borrow_mut().advance().to_string();
        self.load_and_play(&src);
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.playlist.borrow().index()
    }

    #[cfg(test)]
    pub fn rejections(&self) -> usize {
        *self.rejections.borrow()
    }

    fn load_and_play(&self, src: &str) {
        log::debug!("hero video -> {}", src);
        self.media.load_source(src);
        let rejections = Rc::clone(&self.rejections);
        let src = src.to_string();
        self.media.play(Box::new(move |err| {
            *rejections.borrow_mut() += 1;
            log::warn!("video {} did not start: {}", src, err);
        }));
    }
}
