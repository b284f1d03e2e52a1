//! Table-driven mapping from provider JSON to [`Location`]
//!
//! Each provider describes its response as a list of (field, extractor)
//! rows plus the JSON pointers of its coordinates. The rows are evaluated
//! uniformly, so adding a provider means writing a table, not new control
//! flow. A path that is absent from the response simply leaves the field
//! empty.

use serde_json::Value;

use crate::location::{Geometry, Location};

/// Pulls one string component out of a provider result
pub type Extractor = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Target field of a mapping row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FullAddress,
    Street,
    Number,
    Zipcode,
    District,
    City,
    Municipality,
    State,
    StateCode,
    Country,
    CountryCode,
}

impl Field {
    fn slot(self, location: &mut Location) -> &mut Option<String> {
        match self {
            Field::FullAddress => &mut location.full_address,
            Field::Street => &mut location.street,
            Field::Number => &mut location.number,
            Field::Zipcode => &mut location.zipcode,
            Field::District => &mut location.district,
            Field::City => &mut location.city,
            Field::Municipality => &mut location.municipality,
            Field::State => &mut location.state,
            Field::StateCode => &mut location.state_code,
            Field::Country => &mut location.country,
            Field::CountryCode => &mut location.country_code,
        }
    }
}

/// Per-provider field table
pub struct FieldTable {
    rows: Vec<(Field, Extractor)>,
    lat: &'static str,
    lng: &'static str,
}

impl FieldTable {
    /// Start a table whose coordinates live at the given JSON pointers
    pub fn new(lat: &'static str, lng: &'static str) -> Self {
        Self {
            rows: Vec::new(),
            lat,
            lng,
        }
    }

    pub fn field(mut self, field: Field, extractor: Extractor) -> Self {
        self.rows.push((field, extractor));
        self
    }

    /// Map a single provider result
    pub fn map(&self, result: &Value) -> Location {
        let geometry = Geometry::new(
            number_at(result, self.lat).unwrap_or(0.0),
            number_at(result, self.lng).unwrap_or(0.0),
        );

        let mut location = Location {
            geometry,
            ..Default::default()
        };

        for (field, extract) in &self.rows {
            *field.slot(&mut location) = extract(result);
        }

        location
    }

    /// Map the `results` array of a response body; a missing array is empty
    pub fn map_results(&self, body: &Value) -> Vec<Location> {
        body.get("results")
            .and_then(Value::as_array)
            .map(|results| results.iter().map(|result| self.map(result)).collect())
            .unwrap_or_default()
    }
}

/// Extractor reading the scalar at a JSON pointer
pub fn pointer(path: &'static str) -> Extractor {
    Box::new(move |value: &Value| value.pointer(path).and_then(as_text))
}

/// Render a scalar JSON node as text
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a coordinate, accepting both JSON numbers and numeric strings
pub fn number_at(value: &Value, path: &str) -> Option<f64> {
    match value.pointer(path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
