use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use district_charts::api::{Dashboard, DashboardConfig, DashboardEvent, DashboardSources};
use district_charts::charts::ChartKind;
use district_charts::core::MetricKey;
use district_charts::telemetry::init_default_tracing;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render district comparison charts from CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one chart and write an HTML page (or bare SVG for `.svg` paths)
    Render(RenderArgs),
    /// Apply a JSON list of control events, then write the final page
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Category metadata CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    categories: PathBuf,

    /// District metrics CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    entities: PathBuf,

    /// Dashboard config JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Output path
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// scatter, slope, line or bullet
    #[arg(long)]
    chart: Option<String>,

    /// Metric key for the x axis (or the only axis)
    #[arg(long)]
    primary: Option<String>,

    /// Metric key for the y axis
    #[arg(long)]
    secondary: Option<String>,

    /// Start axes at zero
    #[arg(long)]
    zero_baseline: bool,

    /// Overlay the linear trend on scatterplots
    #[arg(long)]
    trend_line: bool,

    /// Hide the data table
    #[arg(long)]
    no_table: bool,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// JSON array of events
    #[arg(long, value_hint = ValueHint::FilePath)]
    events: PathBuf,
}

fn main() -> Result<()> {
    let _ = init_default_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Replay(args) => run_replay(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    DashboardConfig::from_json_str(&raw)
        .with_context(|| format!("parsing config {}", path.display()))
}

fn bootstrap(sources: &SourceArgs, config: DashboardConfig) -> Result<Dashboard> {
    let paths = DashboardSources::new(&sources.categories, &sources.entities);
    Dashboard::bootstrap(&paths, config).context("loading dashboard sources")
}

fn run_render(args: RenderArgs) -> Result<()> {
    let mut config = load_config(args.sources.config.as_deref())?;
    if let Some(chart) = &args.chart {
        config = config.with_chart(chart.parse::<ChartKind>()?);
    }
    if let Some(primary) = &args.primary {
        config = config.with_primary(primary.parse::<MetricKey>()?);
    }
    if let Some(secondary) = &args.secondary {
        config = config.with_secondary(secondary.parse::<MetricKey>()?);
    }
    if args.zero_baseline {
        config = config.with_zero_baseline(true);
    }
    if args.trend_line {
        config = config.with_trend_line(true);
    }
    if args.no_table {
        config = config.with_table_visible(false);
    }
    config.validate()?;

    let mut dashboard = bootstrap(&args.sources, config)?;
    dashboard.settle();
    write_output(&dashboard, &args.sources.out)
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let config = load_config(args.sources.config.as_deref())?;
    let raw = fs::read_to_string(&args.events)
        .with_context(|| format!("reading events {}", args.events.display()))?;
    let events = DashboardEvent::list_from_json_str(&raw)?;

    let mut dashboard = bootstrap(&args.sources, config)?;
    for event in events {
        if !dashboard.handle(event) {
            warn!("event ignored");
        }
        dashboard.settle();
    }
    write_output(&dashboard, &args.sources.out)
}

fn write_output(dashboard: &Dashboard, out: &Path) -> Result<()> {
    let is_svg = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let markup = if is_svg {
        dashboard.render_svg()?
    } else {
        dashboard.render_page()?
    };
    fs::write(out, markup).with_context(|| format!("writing {}", out.display()))?;
    info!(path = %out.display(), chart = %dashboard.selection().chart, "wrote output");
    Ok(())
}
