use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use windowed_series::{
    adapters::json::JsonRows,
    config::{self, SeriesConfig},
    series::{EvalRange, Series},
    trends::TrendSummary,
};

#[derive(Parser)]
#[command(version, about = "Windowed series CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Evaluate a series over JSON rows and print its trend summary.
    Trends(TrendsCmd),
}

#[derive(Args)]
struct TrendsCmd {
    /// JSON array of row objects.
    #[arg(long, value_name = "FILE")]
    data: PathBuf,
    /// Series definition (falls back to $WINDOWED_SERIES_CONFIG).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Trailing window for the statistics.
    #[arg(long)]
    window: Option<usize>,
    /// First N rows, or the last N when negative.
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["from", "to"])]
    length: Option<i64>,
    #[arg(long)]
    from: Option<i64>,
    #[arg(long, requires = "from")]
    to: Option<i64>,
    /// Include the projected records in the output.
    #[arg(long)]
    print_records: bool,
}

impl TrendsCmd {
    fn range_override(&self) -> Option<EvalRange> {
        match (self.length, self.from) {
            (Some(length), _) => Some(EvalRange::Length(length)),
            (None, Some(from)) => Some(EvalRange::Span { from, to: self.to }),
            (None, None) => None,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Trends(cmd) => run_trends(cmd),
    }
}

fn run_trends(cmd: TrendsCmd) -> Result<()> {
    // 1) Series definition
    let config_path = match &cmd.config {
        Some(path) => path.clone(),
        None => config::config_path_from_env()?,
    };
    let cfg: SeriesConfig = config::load_config_path(&config_path)
        .with_context(|| format!("load series config {}", config_path.display()))?;

    // 2) Rows
    let rows = JsonRows::from_path(&cmd.data)
        .with_context(|| format!("read rows {}", cmd.data.display()))?;
    tracing::info!(rows = rows.len(), data = %cmd.data.display(), "rows loaded");

    // 3) Evaluate + summarize
    let series = Series::from_config(&rows, &cfg);
    let range = cmd.range_override().or_else(|| cfg.eval_range());
    let points = series.evaluate(range);
    let window = cmd.window.or_else(|| cfg.trend_window());
    let summary = TrendSummary::compute(&points, window);

    let mut out = json!({
        "label": series.label(),
        "color": series.color(),
        "summary": summary,
    });
    if cmd.print_records {
        let records: Vec<_> = points.iter().map(|p| p.fields()).collect();
        out["records"] = serde_json::to_value(records)?;
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
