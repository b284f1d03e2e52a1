use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use super::{check_forbidden, number_or_string, parse_options, Adapter, Options};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::location::Location;
use crate::mapping::{pointer, Field, FieldTable};
use crate::rate_limiter::{Clock, RateLimiter, SystemClock, DEFAULT_QPS_LIMIT};

const GEOCODE_URL: &str = "https://api.tomtom.com/search/2/geocode";

/// Bytes left unescaped in the address segment; spaces become `+`
const ADDRESS_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn default_qps_limit() -> f64 {
    DEFAULT_QPS_LIMIT
}

#[derive(Debug, Deserialize)]
struct TomtomOptions {
    key: String,
    /// Queries per second; 0 turns throttling off
    #[serde(default = "default_qps_limit", deserialize_with = "number_or_string")]
    qps_limit: f64,
}

/// TomTom Search geocoding, throttled per adapter instance
pub struct TomtomAdapter<C: Clock = SystemClock> {
    http: Arc<dyn HttpClient>,
    limiter: RateLimiter<C>,
    table: FieldTable,
}

impl TomtomAdapter<SystemClock> {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_clock(http, SystemClock)
    }
}

impl<C: Clock> TomtomAdapter<C> {
    pub const NAME: &'static str = "tomtom";

    pub fn with_clock(http: Arc<dyn HttpClient>, clock: C) -> Self {
        Self {
            http,
            limiter: RateLimiter::with_clock(clock),
            table: field_table(),
        }
    }

    fn geocode_url(address: &str, key: &str) -> Result<Url> {
        let escaped = address
            .split(' ')
            .map(|part| utf8_percent_encode(part, ADDRESS_ESCAPE).to_string())
            .collect::<Vec<_>>()
            .join("+");
        let mut url = Url::parse(&format!("{}/{}.json", GEOCODE_URL, escaped))?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }
}

impl<C: Clock> Adapter for TomtomAdapter<C> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn geocode(&self, address: &str, options: &Options) -> Result<Vec<Location>> {
        let options: TomtomOptions = parse_options(Self::NAME, options)?;
        let url = Self::geocode_url(address, &options.key)?;

        self.limiter
            .wait(options.qps_limit)
            .map_err(|source| Error::InvalidQpsLimit {
                limit: options.qps_limit,
                source,
            })?;
        log::debug!("Geocoding {:?} via TomTom", address);

        let response = self.http.get(&url)?;
        check_forbidden(&response)?;

        let parsed = response.json()?;
        Ok(self.table.map_results(&parsed))
    }
}

fn field_table() -> FieldTable {
    FieldTable::new("/position/lat", "/position/lon")
        .field(Field::FullAddress, pointer("/address/freeformAddress"))
        .field(Field::Street, pointer("/address/streetName"))
        .field(Field::Number, pointer("/address/streetNumber"))
        .field(Field::City, pointer("/address/municipality"))
        .field(Field::Zipcode, pointer("/address/postalCode"))
        .field(Field::District, pointer("/address/countrySecondarySubdivision"))
        .field(Field::Municipality, pointer("/address/countryTertiarySubdivision"))
        .field(Field::State, pointer("/address/countrySubdivisionName"))
        .field(Field::StateCode, pointer("/address/countrySubdivision"))
        .field(Field::Country, pointer("/address/country"))
        .field(Field::CountryCode, pointer("/address/countryCode"))
}
