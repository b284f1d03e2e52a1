use std::sync::{Mutex, PoisonError};

use super::{Adapter, Options};
use crate::error::Result;
use crate::location::{Geometry, Location};

/// Coordinates of every default fake result
pub const DEFAULT_GEOMETRY: Geometry = Geometry::new(-19.9191248, -43.9386291);

/// In-memory adapter for tests: never touches the network
///
/// Returns a single location per call. Inside [`FakeAdapter::stubbing`] that
/// location is the stub, otherwise it is the fixed location given at
/// construction, or a default one carrying the queried address.
#[derive(Debug, Default)]
pub struct FakeAdapter {
    fixed: Option<Location>,
    stub: Mutex<Option<Location>>,
}

impl FakeAdapter {
    pub const NAME: &'static str = "fake";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fake that always answers with `location`
    pub fn with_location(location: Location) -> Self {
        Self {
            fixed: Some(location),
            stub: Mutex::new(None),
        }
    }

    /// Answer with `location` while `f` runs
    ///
    /// The stub is cleared when `f` returns or unwinds.
    pub fn stubbing<R>(&self, location: Location, f: impl FnOnce() -> R) -> R {
        *self.lock_stub() = Some(location);
        let _guard = StubGuard(&self.stub);
        f()
    }

    fn lock_stub(&self) -> std::sync::MutexGuard<'_, Option<Location>> {
        self.stub.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct StubGuard<'a>(&'a Mutex<Option<Location>>);

impl Drop for StubGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Adapter for FakeAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn geocode(&self, address: &str, _options: &Options) -> Result<Vec<Location>> {
        let location = self
            .lock_stub()
            .clone()
            .or_else(|| self.fixed.clone())
            .unwrap_or_else(|| Location {
                full_address: Some(address.to_string()),
                geometry: DEFAULT_GEOMETRY,
                ..Default::default()
            });

        Ok(vec![location])
    }
}
