use std::collections::HashMap;
use std::sync::Arc;

mod adapters;
mod config;
mod error;
mod http;
mod location;
mod mapping;
mod rate_limiter;
mod signing;

// Re-export public types
pub use adapters::{Adapter, FakeAdapter, GoogleAdapter, Options, TomtomAdapter, DEFAULT_GEOMETRY};
pub use config::{merge, Config};
pub use error::{Error, Result};
pub use http::{BlockingClient, HttpClient, HttpResponse, DEFAULT_TIMEOUT};
pub use location::{Geometry, Location};
pub use rate_limiter::{Clock, RateLimiter, SystemClock, DEFAULT_QPS_LIMIT};

/// Adapter used when neither the call nor the configuration names one
pub const DEFAULT_ADAPTER: &str = GoogleAdapter::NAME;

/// Entry point: picks an adapter by name and forwards the query to it
pub struct Geoloco {
    adapters: HashMap<String, Arc<dyn Adapter>>,
    fake: Option<Arc<FakeAdapter>>,
    config: Config,
}

impl Geoloco {
    /// Dispatcher with the built-in adapters sharing one HTTP client
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        let fake = Arc::new(FakeAdapter::new());

        let mut geoloco = Self::empty();
        geoloco.register(GoogleAdapter::NAME, Arc::new(GoogleAdapter::new(http.clone())));
        geoloco.register(TomtomAdapter::<SystemClock>::NAME, Arc::new(TomtomAdapter::new(http)));
        geoloco.register(FakeAdapter::NAME, fake.clone());
        geoloco.fake = Some(fake);
        geoloco
    }

    /// Dispatcher without any adapter registered
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
            fake: None,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register an adapter under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, adapter: Arc<dyn Adapter>) {
        let name = name.into();
        log::debug!("Registering adapter {} as {}", adapter.name(), name);
        self.adapters.insert(name, adapter);
    }

    /// Names of all registered adapters, sorted
    pub fn adapter_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The built-in fake adapter, for stubbing results in tests
    ///
    /// `None` for dispatchers built with [`Geoloco::empty`].
    pub fn fake(&self) -> Option<Arc<FakeAdapter>> {
        self.fake.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the per-adapter default options
    pub fn set_config(&mut self, adapters: HashMap<String, Options>) {
        self.config.adapters = adapters;
    }

    pub fn reset_config(&mut self) {
        self.config.adapters.clear();
    }

    pub fn set_default_adapter(&mut self, adapter: impl Into<String>) {
        self.config.default_adapter = Some(adapter.into());
    }

    pub fn reset_default_adapter(&mut self) {
        self.config.default_adapter = None;
    }

    /// Adapter used when a call does not name one
    pub fn default_adapter(&self) -> &str {
        self.config
            .default_adapter
            .as_deref()
            .unwrap_or(DEFAULT_ADAPTER)
    }

    /// Geocode `query` with the named adapter (or the default one)
    ///
    /// Options configured for the adapter are merged with `options`, the
    /// call-site values winning on conflicting keys.
    pub fn geocode(&self, query: &str, adapter: Option<&str>, options: Options) -> Result<Vec<Location>> {
        let name = adapter.unwrap_or_else(|| self.default_adapter());
        let adapter = self
            .adapters
            .get(name)
            .ok_or_else(|| Error::UnknownAdapter(name.to_string()))?;

        let merged = self.config.merged_options(name, options);
        log::debug!("Dispatching {:?} to {} with {} option(s)", query, name, merged.len());

        let locations = adapter.geocode(query, &merged)?;
        log::info!("{} returned {} location(s) for {:?}", name, locations.len(), query);
        Ok(locations)
    }
}
