//! Command-line surface and its mapping onto fetch options.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tweetfetch_social::twitter::{
    DistanceUnit, Location, Radius, ResultType, SearchOptions, TimelineOptions,
};

/// Fetch tweets and print them as normalized JSON.
#[derive(Debug, Parser)]
#[command(name = "tweetfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file. Skipped when the default file is absent.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search recent tweets by text and/or location.
    Search(SearchArgs),
    /// Fetch a user's timeline, newest first.
    Timeline(TimelineArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long, short)]
    pub query: Option<String>,

    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Radius around the point; one mile when omitted.
    #[arg(long, requires = "lat")]
    pub radius: Option<f64>,

    /// Unit for `--radius`; miles when omitted.
    #[arg(long, value_enum, requires = "radius")]
    pub unit: Option<UnitArg>,

    #[arg(long, value_enum, default_value_t = ResultTypeArg::Recent)]
    pub result_type: ResultTypeArg,

    /// Target number of tweets; the last page may overshoot.
    #[arg(long, default_value_t = 200)]
    pub size: usize,
}

#[derive(Debug, Args)]
pub struct TimelineArgs {
    #[arg(long, short)]
    pub username: String,

    #[arg(long, default_value_t = 200)]
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    Miles,
    Kilometers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResultTypeArg {
    Recent,
    Popular,
    Mixed,
}

impl From<UnitArg> for DistanceUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Miles => DistanceUnit::Miles,
            UnitArg::Kilometers => DistanceUnit::Kilometers,
        }
    }
}

impl From<ResultTypeArg> for ResultType {
    fn from(kind: ResultTypeArg) -> Self {
        match kind {
            ResultTypeArg::Recent => ResultType::Recent,
            ResultTypeArg::Popular => ResultType::Popular,
            ResultTypeArg::Mixed => ResultType::Mixed,
        }
    }
}

impl SearchArgs {
    pub fn to_options(&self) -> SearchOptions {
        let location = match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
                radius: self.radius.map(|size| Radius {
                    size,
                    unit: self.unit.map(Into::into).unwrap_or_default(),
                }),
            }),
            _ => None,
        };
        SearchOptions {
            query: self.query.clone(),
            location,
            result_type: self.result_type.into(),
            result_size: self.size,
        }
    }
}

impl TimelineArgs {
    pub fn to_options(&self) -> TimelineOptions {
        TimelineOptions {
            username: self.username.clone(),
            result_size: self.size,
        }
    }
}
