use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::form_urlencoded;
use url::Url;

use super::{check_forbidden, parse_options, Adapter, Options};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpResponse};
use crate::location::Location;
use crate::mapping::{as_text, pointer, Extractor, Field, FieldTable};
use crate::signing;

const API_HOST: &str = "https://maps.googleapis.com";
const GEOCODE_PATH: &str = "/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GoogleOptions {
    client_id: String,
    key: String,
}

/// Google Maps geocoding with signed (client id + key) requests
pub struct GoogleAdapter {
    http: Arc<dyn HttpClient>,
    table: FieldTable,
}

impl GoogleAdapter {
    pub const NAME: &'static str = "google";

    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            table: field_table(),
        }
    }

    fn geocode_url(address: &str, client_id: &str, key: &str) -> Result<Url> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client", client_id)
            .append_pair("address", address)
            .finish();

        let signed = signing::signed_url(API_HOST, GEOCODE_PATH, &query, key)?;
        Ok(Url::parse(&signed)?)
    }
}

impl Adapter for GoogleAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn geocode(&self, address: &str, options: &Options) -> Result<Vec<Location>> {
        let options: GoogleOptions = parse_options(Self::NAME, options)?;
        let url = Self::geocode_url(address, &options.client_id, &options.key)?;

        log::debug!("Geocoding {:?} via Google (client {})", address, options.client_id);

        let response = self.http.get(&url)?;
        let parsed = handle_errors(&response)?;
        Ok(self.table.map_results(&parsed))
    }
}

/// 403 first, then the `status` field inside the body
fn handle_errors(response: &HttpResponse) -> Result<Value> {
    check_forbidden(response)?;

    let parsed = response.json()?;
    let status = parsed.get("status").and_then(as_text);
    if status.as_deref() == Some("OK") {
        return Ok(parsed);
    }

    let message = parsed.get("error_message").and_then(as_text);
    let joined = [status, message]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" - ");

    log::warn!("Google geocoding failed: {}", joined);
    Err(Error::Provider(joined))
}

/// Value of the first address component tagged with `kind`
fn component(kind: &'static str, name: &'static str) -> Extractor {
    Box::new(move |result: &Value| {
        result
            .get("address_components")?
            .as_array()?
            .iter()
            .find(|entry| {
                entry
                    .get("types")
                    .and_then(Value::as_array)
                    .map(|types| types.iter().any(|t| t.as_str() == Some(kind)))
                    .unwrap_or(false)
            })?
            .get(name)
            .and_then(as_text)
    })
}

fn field_table() -> FieldTable {
    const LONG: &str = "long_name";
    const SHORT: &str = "short_name";

    FieldTable::new("/geometry/location/lat", "/geometry/location/lng")
        .field(Field::FullAddress, pointer("/formatted_address"))
        .field(Field::Street, component("route", LONG))
        .field(Field::Number, component("street_number", LONG))
        .field(Field::City, component("locality", LONG))
        .field(Field::District, component("administrative_area_level_2", LONG))
        .field(Field::Municipality, component("administrative_area_level_3", LONG))
        .field(Field::State, component("administrative_area_level_1", LONG))
        .field(Field::StateCode, component("administrative_area_level_1", SHORT))
        .field(Field::Zipcode, component("postal_code", LONG))
        .field(Field::Country, component("country", LONG))
        .field(Field::CountryCode, component("country", SHORT))
}
