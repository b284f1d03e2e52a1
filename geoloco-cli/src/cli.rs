use clap::Parser;
use std::path::PathBuf;

/// Geocode a free-text address with one of several providers
#[derive(Parser, Debug)]
#[command(name = "geoloco")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turns addresses into coordinates via Google, TomTom or a fake provider", long_about = None)]
pub struct Args {
    /// Address to geocode
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Adapter to use (google, tomtom, fake); defaults to the configured one
    #[arg(short = 'a', long = "adapter")]
    pub adapter: Option<String>,

    /// Adapter option as KEY=VALUE, e.g. -o key=abc -o qps_limit=2
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    /// JSON file with per-adapter default options
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long = "timeout", default_value_t = 10)]
    pub timeout: u64,

    /// Print results as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Split `KEY=VALUE` at the first `=`
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    if key.is_empty() {
        return Err(format!("empty option name in '{}'", s));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Parses command-line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
