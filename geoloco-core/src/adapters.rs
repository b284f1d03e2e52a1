use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::HttpResponse;
use crate::location::Location;

mod fake;
mod google;
mod tomtom;

pub use fake::{FakeAdapter, DEFAULT_GEOMETRY};
pub use google::GoogleAdapter;
pub use tomtom::TomtomAdapter;

/// Free-form adapter options: credentials, limits and the like
pub type Options = serde_json::Map<String, Value>;

/// A geocoding backend
pub trait Adapter: Send + Sync {
    /// Identifier the adapter is registered under
    fn name(&self) -> &'static str;

    /// Resolve a free-text address into zero or more locations
    fn geocode(&self, address: &str, options: &Options) -> Result<Vec<Location>>;
}

/// Read the merged options into an adapter's typed settings
pub(crate) fn parse_options<T: DeserializeOwned>(adapter: &'static str, options: &Options) -> Result<T> {
    serde_json::from_value(Value::Object(options.clone()))
        .map_err(|source| Error::InvalidOptions { adapter, source })
}

/// Every provider reports a 403 the same way, whatever the body looks like
pub(crate) fn check_forbidden(response: &HttpResponse) -> Result<()> {
    if response.status == 403 {
        log::warn!("Provider refused the request with HTTP 403");
        return Err(Error::Forbidden {
            status: response.status,
            body: response.body.clone(),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Accept `5`, `2.5` or `"5"` for numeric options
pub(crate) fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
