//! forecast - Capacity-vs-demand forecast for time-boxed projects

mod cli;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use forecast_core::{
    export_report_to_html, export_table_to_csv, ConfigOverrides, ConfigParser, Forecast,
    ForecastConfig, ForecastError, ForecastReport, GermanHolidays,
};
use forecast_web::WebState;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "forecast",
    version,
    about = "Capacity-vs-demand forecast for time-boxed projects",
    long_about = "Distributes workday capacity across concurrently active projects by monthly\n\
                  weights and computes required daily pace, utilization, revenue and budget\n\
                  consumption per project.\n\
                  \n\
                  Examples:\n\
                    forecast report --config config/config.yml       # Terminal table\n\
                    forecast report --json                          # Full report as JSON\n\
                    forecast report --csv out/summary.csv           # Summary as CSV\n\
                    forecast html --output report.html              # HTML report\n\
                    forecast serve --port 8765                      # Live preview editor\n\
                  \n\
                  Environment Variables:\n\
                    FORECAST_CONFIG                  # Config file path\n\
                    FORECAST_HOST                    # Live preview bind host\n\
                    FORECAST_PORT                    # Live preview port\n\
                    RUST_LOG                         # Log filter (logs go to stderr)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Log at info level instead of warn
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "FORECAST_NO_COLOR", global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the forecast to the terminal
    Report {
        #[command(flatten)]
        config: ConfigArgs,
        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
        /// Also write the project summary as semicolon-separated CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
    /// Write the HTML report
    Html {
        #[command(flatten)]
        config: ConfigArgs,
        /// Destination file
        #[arg(long, short = 'o', default_value = "report.html")]
        output: PathBuf,
    },
    /// Run the live-preview editor
    Serve {
        /// Bind host
        #[arg(long, env = "FORECAST_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port for web server
        #[arg(long, env = "FORECAST_PORT", default_value = "8765")]
        port: u16,
        /// Config preloaded into the editor, if it exists
        #[arg(long, short = 'c', env = "FORECAST_CONFIG", default_value = "config/config.yml")]
        config: PathBuf,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to the YAML config
    #[arg(long, short = 'c', env = "FORECAST_CONFIG", default_value = "config/config.yml")]
    config: PathBuf,
    /// Override the planning period start (YYYY-MM-DD)
    #[arg(long)]
    planning_start: Option<NaiveDate>,
    /// Override the planning period end (YYYY-MM-DD)
    #[arg(long)]
    planning_end: Option<NaiveDate>,
    /// Override the rounding step for required hours per day
    #[arg(long)]
    round: Option<f64>,
}

impl ConfigArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            planning_start: self.planning_start,
            planning_end: self.planning_end,
            round_hours: self.round,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(hint) = e.downcast_ref::<ForecastError>().and_then(|fe| fe.suggestion()) {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr
fn init_logging(verbose: bool, no_color: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.mode {
        Mode::Report { config, json, csv } => run_report(&config, json, csv.as_deref(), cli.no_color),
        Mode::Html { config, output } => run_html(&config, &output),
        Mode::Serve { host, port, config } => run_serve(&host, port, &config).await,
    }
}

fn load_config(args: &ConfigArgs) -> Result<ForecastConfig> {
    let config = ConfigParser::parse_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    let config = args
        .overrides()
        .apply(config)
        .context("Invalid command-line overrides")?;
    Ok(config)
}

fn compute(args: &ConfigArgs) -> Result<ForecastReport> {
    let config = load_config(args)?;
    let report = Forecast::compute(&config, &GermanHolidays).context("Forecast computation failed")?;
    info!(
        projects = report.projects.len(),
        months = report.months.len(),
        "Computed forecast"
    );
    Ok(report)
}

fn run_report(args: &ConfigArgs, json: bool, csv: Option<&Path>, no_color: bool) -> Result<()> {
    let report = compute(args)?;

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        println!("{}", cli::format_report(&report, no_color));
    }

    if let Some(path) = csv {
        export_table_to_csv(&report.summary_table(), report.locale, path)?;
        info!(path = %path.display(), "Wrote CSV summary");
    }

    Ok(())
}

fn run_html(args: &ConfigArgs, output: &Path) -> Result<()> {
    let report = compute(args)?;
    export_report_to_html(&report, output)?;
    println!("Report written to {}", output.display());
    Ok(())
}

async fn run_serve(host: &str, port: u16, preload: &Path) -> Result<()> {
    let state = WebState::from_preload_path(preload)?;
    forecast_web::run(host, port, state).await
}
