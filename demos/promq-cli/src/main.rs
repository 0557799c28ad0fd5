use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use promq_client::{ClientConfig, DEFAULT_STEP, QueryClient, QuerySpec, ResultItem, Timestamp};
use promq_observe::{LoggerConfig, LoggerFormat, LoggerLevel, init_logger};

#[derive(Debug, Parser)]
#[command(name = "promq")]
#[command(about = "Query a Prometheus-compatible server from the command line")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct ServerArgs {
    #[arg(
        long,
        short = 'u',
        env = "PROMETHEUS_URL",
        default_value = promq_client::DEFAULT_BASE_URL,
        help = "Base URL of the server. Example: http://127.0.0.1:9090"
    )]
    url: String,

    #[arg(long, default_value_t = 30, help = "Per-request timeout in seconds")]
    timeout: u64,

    #[arg(long, help = "Log filter directive, overrides PROMQ_LOG. Example: debug")]
    log_level: Option<LoggerLevel>,

    #[arg(long, help = "Log format (text|json), overrides PROMQ_LOG_FORMAT")]
    log_format: Option<LoggerFormat>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Evaluate one or more expressions at a single instant")]
    Query(QueryArgs),

    #[command(about = "Evaluate one or more expressions over a time range")]
    Range(RangeArgs),

    #[command(about = "List label names")]
    Labels(WindowArgs),

    #[command(about = "List values of a label")]
    LabelValues(LabelValuesArgs),

    #[command(about = "Show target discovery state")]
    Targets {
        #[arg(long, help = "Filter by state (active|dropped|any)")]
        state: Option<String>,
    },

    #[command(about = "Show loaded alerting and recording rules")]
    Rules,

    #[command(about = "Show active alerts")]
    Alerts,

    #[command(about = "Show alertmanager discovery state")]
    Alertmanagers,
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[arg(required = true, help = "Expressions; several are evaluated concurrently")]
    exprs: Vec<String>,

    #[arg(long, help = "Evaluation time (unix seconds), defaults to now")]
    time: Option<Timestamp>,

    #[arg(long = "label", short = 'l', value_parser = parse_label, help = "Extra request parameter key=value, repeatable")]
    labels: Vec<(String, String)>,
}

#[derive(Debug, Args)]
struct RangeArgs {
    #[arg(required = true, help = "Expressions; several are evaluated concurrently")]
    exprs: Vec<String>,

    #[command(flatten)]
    window: WindowArgs,

    #[arg(long, default_value = DEFAULT_STEP, help = "Resolution step, e.g. 15s or 1m")]
    step: String,

    #[arg(long = "label", short = 'l', value_parser = parse_label, help = "Extra request parameter key=value, repeatable")]
    labels: Vec<(String, String)>,
}

#[derive(Debug, Args)]
struct WindowArgs {
    #[arg(long, help = "Range start (unix seconds), defaults to 24h ago")]
    start: Option<Timestamp>,

    #[arg(long, help = "Range end (unix seconds), defaults to now")]
    end: Option<Timestamp>,
}

#[derive(Debug, Args)]
struct LabelValuesArgs {
    #[arg(help = "Label name")]
    name: String,

    #[command(flatten)]
    window: WindowArgs,

    #[arg(long = "match", short = 'm', help = "Series selector, repeatable")]
    matchers: Vec<String>,
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn specs(exprs: Vec<String>, labels: &[(String, String)]) -> Vec<QuerySpec> {
    exprs
        .into_iter()
        .map(|expr| QuerySpec::new(expr).with_labels(labels.iter().cloned()))
        .collect()
}

fn print_groups(groups: Vec<Vec<ResultItem>>) -> Result<()> {
    let out = if groups.len() == 1 {
        serde_json::to_string_pretty(&groups[0])?
    } else {
        serde_json::to_string_pretty(&groups)?
    };
    println!("{out}");
    Ok(())
}

fn print_data(data: Option<&Value>) -> Result<()> {
    let Some(data) = data else {
        bail!("response has no data");
    };
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_cfg = LoggerConfig::from_env()?;
    if let Some(level) = cli.server.log_level.clone() {
        log_cfg.level = level;
    }
    if let Some(format) = cli.server.log_format {
        log_cfg.format = format;
    }
    init_logger(&log_cfg)?;

    let cfg = ClientConfig::new(cli.server.url.as_str()).with_timeout_secs(cli.server.timeout);
    let client = QueryClient::from_config(cfg)
        .with_context(|| format!("cannot use server url {}", cli.server.url))?;
    info!(url = %client.base_url(), "client ready");

    match cli.command {
        Commands::Query(args) => {
            let specs = specs(args.exprs, &args.labels);
            debug!(count = specs.len(), "running instant queries");
            print_groups(client.queries(specs, args.time).await?)?;
        }
        Commands::Range(args) => {
            let specs = specs(args.exprs, &args.labels);
            debug!(count = specs.len(), "running range queries");
            let groups = client
                .queries_range(
                    specs,
                    args.window.start,
                    args.window.end,
                    Some(args.step.as_str()),
                )
                .await?;
            print_groups(groups)?;
        }
        Commands::Labels(window) => {
            let resp = client.labels(window.start, window.end).await?;
            print_data(resp.data())?;
        }
        Commands::LabelValues(args) => {
            let matchers: Vec<&str> = args.matchers.iter().map(String::as_str).collect();
            let resp = client
                .label_values(&args.name, args.window.start, args.window.end, &matchers)
                .await?;
            print_data(resp.data())?;
        }
        Commands::Targets { state } => {
            let resp = client.targets(state.as_deref()).await?;
            print_data(resp.data())?;
        }
        Commands::Rules => print_data(client.rules().await?.data())?,
        Commands::Alerts => print_data(client.alerts().await?.data())?,
        Commands::Alertmanagers => print_data(client.alertmanagers().await?.data())?,
    }

    Ok(())
}
