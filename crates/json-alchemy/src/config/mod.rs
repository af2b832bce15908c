//! Configuration passed down through every wrap call.
//!
//! A [`Config`] bundles the collaborators a document needs: the hook
//! registry, the remote schema fetcher, the template renderer and the read
//! callbacks. Trees share one configuration through an `Rc`, which also holds
//! the per-URL cache of fetched schema documents.

mod callbacks;
mod fetch;
mod hooks;
mod render;

pub use callbacks::{Callbacks, ReadFn, ANY_ITEM};
pub use fetch::{FetchError, HttpFetcher, SchemaFetcher};
pub use hooks::{GetterFn, HookRegistry, SetterFn, ValidatorFn};
pub use render::{HandlebarsRenderer, TemplateRenderer};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

pub struct Config {
    hooks: HookRegistry,
    fetcher: Box<dyn SchemaFetcher>,
    renderer: Box<dyn TemplateRenderer>,
    callbacks: Rc<Callbacks>,
    remote_cache: RefCell<HashMap<String, Option<Rc<Value>>>>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            hooks: HookRegistry::new(),
            fetcher: Box::new(HttpFetcher::new()),
            renderer: Box::new(HandlebarsRenderer::new()),
            callbacks: Rc::new(Callbacks::new()),
            remote_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl SchemaFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = Rc::new(callbacks);
        self
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn renderer(&self) -> &dyn TemplateRenderer {
        self.renderer.as_ref()
    }

    pub(crate) fn callbacks(&self) -> Rc<Callbacks> {
        Rc::clone(&self.callbacks)
    }

    /// The document at `url`, fetched at most once. `None` when the fetch
    /// failed; the failure is logged and remembered.
    pub(crate) fn remote_document(&self, url: &str) -> Option<Rc<Value>> {
        if let Some(cached) = self.remote_cache.borrow().get(url) {
            return cached.clone();
        }
        let document = match self.fetcher.fetch(url) {
            Ok(document) => {
                debug!(url, "fetched remote schema");
                Some(Rc::new(document))
            }
            Err(error) => {
                warn!(url, %error, "remote schema unavailable, treating as unconstrained");
                None
            }
        };
        self.remote_cache
            .borrow_mut()
            .insert(url.to_string(), document.clone());
        document
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hooks", &self.hooks)
            .field("callbacks", &self.callbacks)
            .field("cached_urls", &self.remote_cache.borrow().len())
            .finish()
    }
}
