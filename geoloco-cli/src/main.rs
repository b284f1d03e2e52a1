use anyhow::{Context, Result};
use geoloco_core::{BlockingClient, Config, Geoloco, Location, Options};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

mod cli;

fn main() -> Result<()> {
    let args = cli::parse_args();

    // Initialize logger with appropriate level based on verbose flag
    if std::env::var("RUST_LOG").is_err() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let config = match &args.config {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };

    let http = BlockingClient::with_timeout(Duration::from_secs(args.timeout))?;
    let geoloco = Geoloco::new(Arc::new(http)).with_config(config);

    let options: Options = args
        .options
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();

    let locations = geoloco
        .geocode(&args.address, args.adapter.as_deref(), options)
        .with_context(|| format!("Failed to geocode '{}'", args.address))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&locations)?);
    } else if locations.is_empty() {
        println!("No results");
    } else {
        for location in &locations {
            println!("{}", describe(location));
        }
    }

    Ok(())
}

/// One-line summary: coordinates followed by the address
fn describe(location: &Location) -> String {
    let address = location
        .full_address
        .clone()
        .or_else(|| {
            let parts: Vec<&str> = [&location.street, &location.city, &location.country]
                .into_iter()
                .filter_map(|part| part.as_deref())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        })
        .unwrap_or_else(|| "(no address)".to_string());

    format!("{:.7},{:.7}\t{}", location.lat(), location.lng(), address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoloco_core::Geometry;

    #[test]
    fn test_describe_full_address() {
        let location = Location {
            full_address: Some("2012 Main St, Narvon, PA 17555, USA".to_string()),
            geometry: Geometry::new(40.1281689, -75.9922155),
            ..Default::default()
        };
        assert_eq!(
            describe(&location),
            "40.1281689,-75.9922155\t2012 Main St, Narvon, PA 17555, USA"
        );
    }

    #[test]
    fn test_describe_falls_back_to_components() {
        let location = Location {
            street: Some("Dan Ave".to_string()),
            country: Some("United States".to_string()),
            ..Default::default()
        };
        assert_eq!(
            describe(&location),
            "0.0000000,0.0000000\tDan Ave, United States"
        );

        assert_eq!(
            describe(&Location::default()),
            "0.0000000,0.0000000\t(no address)"
        );
    }
}
