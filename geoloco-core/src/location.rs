use serde::{Deserialize, Serialize};

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub lat: f64,
    pub lng: f64,
}

impl Geometry {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single geocoded result
///
/// Every address component is optional: providers only return the parts
/// they know about, and a missing component is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Full formatted address as the provider renders it
    pub full_address: Option<String>,
    /// Street name
    pub street: Option<String>,
    /// House number on the street
    pub number: Option<String>,
    /// Postal code
    pub zipcode: Option<String>,
    /// District or county
    pub district: Option<String>,
    /// City
    pub city: Option<String>,
    /// Municipality the location belongs to
    pub municipality: Option<String>,
    /// Full state name
    pub state: Option<String>,
    /// Short state code, e.g. "PA"
    pub state_code: Option<String>,
    /// Country name
    pub country: Option<String>,
    /// Two-letter country code
    pub country_code: Option<String>,
    /// Coordinates of the result
    pub geometry: Geometry,
}

impl Location {
    /// Latitude, always the same as `geometry.lat`
    pub fn lat(&self) -> f64 {
        self.geometry.lat
    }

    /// Longitude, always the same as `geometry.lng`
    pub fn lng(&self) -> f64 {
        self.geometry.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_are_views_of_geometry() {
        let location = Location {
            geometry: Geometry::new(40.1, -75.9),
            ..Default::default()
        };

        assert_eq!(location.lat(), location.geometry.lat);
        assert_eq!(location.lng(), location.geometry.lng);
        assert_eq!(location.lat(), 40.1);
        assert_eq!(location.lng(), -75.9);
    }

    #[test]
    fn test_serializes_missing_components_as_null() -> anyhow::Result<()> {
        let location = Location {
            city: Some("Narvon".to_string()),
            geometry: Geometry::new(1.5, 2.5),
            ..Default::default()
        };

        let json = serde_json::to_value(&location)?;
        assert_eq!(json["city"], "Narvon");
        assert!(json["street"].is_null());
        assert_eq!(json["geometry"]["lat"], 1.5);
        assert_eq!(json["geometry"]["lng"], 2.5);

        Ok(())
    }
}
