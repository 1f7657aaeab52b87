use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wundertemp_core::{
    Config, OutputMode, PlaceResolver, ReportOptions, SortMode, TempDisplay, WeatherSource,
    parse_places, report,
};

const AFTER_HELP: &str = "\
If -c/-f are not given, both Celsius and Fahrenheit are displayed.
If -a/-n are not given, places are listed in the order requested.
If -t is not given, the data is printed as JSON.

Describe places as specifically as possible to get an exact match, e.g.

    wundertemp -c -t \"paris france, tokyo japan\"";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "wundertemp",
    version,
    about = "Scrape current temperature and condition for a list of places",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Comma-separated places, e.g. "san francisco ca, tokyo japan". Only the last one is used.
    #[arg(value_name = "PLACES")]
    pub places: Vec<String>,

    /// Print a text table instead of JSON.
    #[arg(short, long)]
    pub table: bool,

    /// Display temperatures in Celsius.
    #[arg(short, long, overrides_with = "fahrenheit")]
    pub celsius: bool,

    /// Display temperatures in Fahrenheit.
    #[arg(short, long, overrides_with = "celsius")]
    pub fahrenheit: bool,

    /// Sort places alphabetically.
    #[arg(short, long, overrides_with = "numeric")]
    pub alpha: bool,

    /// Sort places from lowest to highest temperature.
    #[arg(short, long, overrides_with = "alpha")]
    pub numeric: bool,

    /// Optional TOML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        setup_logging(self.verbose, self.quiet);

        let Some(places) = self.requested_places() else {
            Self::command().print_help()?;
            println!();
            return Ok(());
        };

        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let options = self.report_options(config.defaults);

        let resolver = PlaceResolver::from_config(&config).context("Failed to build HTTP client")?;
        info!("Checking {}...", resolver.host());

        let output = report(&places, &resolver, &config, options).await?;
        println!("{output}");

        Ok(())
    }

    /// Places from the last positional string, or `None` when none is usable.
    fn requested_places(&self) -> Option<Vec<String>> {
        let places = self.places.last().map(|s| parse_places(s)).unwrap_or_default();
        (!places.is_empty()).then_some(places)
    }

    /// Flags override whatever the config file sets as default.
    fn report_options(&self, defaults: ReportOptions) -> ReportOptions {
        let display = if self.celsius {
            TempDisplay::Celsius
        } else if self.fahrenheit {
            TempDisplay::Fahrenheit
        } else {
            defaults.display
        };

        let sort = if self.alpha {
            SortMode::Alphabetical
        } else if self.numeric {
            SortMode::Numeric
        } else {
            defaults.sort
        };

        let output = if self.table { OutputMode::Table } else { defaults.output };

        ReportOptions { display, sort, output }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
            0 => EnvFilter::new("wundertemp=info,wundertemp_core=info,warn"),
            1 => EnvFilter::new("wundertemp=debug,wundertemp_core=debug,info"),
            _ => EnvFilter::new("trace"),
        })
    };

    // a subscriber may already be installed (tests run `Cli::run` in-process)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
