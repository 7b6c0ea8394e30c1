use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use socialplot::config::{ChartConfig, ChartOptions, ConfigFile};
use socialplot::csv_reader;
use socialplot::data::PlotData;
use socialplot::ir::ChartKind;
use socialplot::parser;
use socialplot::record::ParsePolicy;
use socialplot::runtime::{self, ChartJob};
use socialplot::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "socialplot")]
#[command(about = "Render social media engagement charts from CSV data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Box-plot of likes per platform (columns: Platform, Likes)
    Boxplot(ChartArgs),
    /// Grouped bars of average likes (columns: Platform, PostType, LikeAvg)
    Bar(ChartArgs),
    /// Line chart of average likes over time (columns: Date, LikeAvg)
    Line(ChartArgs),
    /// Render all three charts into a directory
    All(AllArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Output format (defaults to the config file's, then png)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// JSON config file with per-chart settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop rows with malformed numbers instead of failing
    #[arg(long)]
    skip_malformed: bool,
}

#[derive(Debug, Args)]
struct ChartArgs {
    /// Input CSV or JSON file (reads CSV from stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (writes to stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Style overrides, e.g. 'size(width: 800) | labs(title: "Likes")'
    #[arg(long)]
    style: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct AllArgs {
    /// Input for the box-plot
    #[arg(long)]
    boxplot: PathBuf,

    /// Input for the grouped bar chart
    #[arg(long)]
    bar: PathBuf,

    /// Input for the line chart
    #[arg(long)]
    line: PathBuf,

    /// Directory receiving boxplot.<ext>, bar.<ext> and line.<ext>
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Boxplot(args) => run_chart(ChartKind::Boxplot, &args),
        Command::Bar(args) => run_chart(ChartKind::GroupedBar, &args),
        Command::Line(args) => run_chart(ChartKind::Line, &args),
        Command::All(args) => run_all(&args),
    }
}

fn run_chart(kind: ChartKind, args: &ChartArgs) -> Result<()> {
    let file = load_config(&args.common)?;
    let style = args
        .style
        .as_deref()
        .map(parser::parse_style)
        .transpose()?;
    let config = resolve_config(&file, &args.common, kind, style.as_ref())?;
    let format = output_format(&file, &args.common);

    let data = match &args.input {
        Some(path) => PlotData::load(path)?,
        None => PlotData::from_csv(csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?),
    };

    let scene = runtime::build_chart(kind, &data, &config)
        .with_context(|| format!("Failed to build {} chart", kind))?;
    for warning in &scene.warnings {
        eprintln!("Warning: {}", warning);
    }

    let bytes = runtime::render(&scene, format).context("Failed to render chart")?;

    match &args.output {
        Some(path) => write_file(path, &bytes),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&bytes).context("Failed to write chart to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
            Ok(())
        }
    }
}

fn run_all(args: &AllArgs) -> Result<()> {
    let file = load_config(&args.common)?;
    let format = output_format(&file, &args.common);
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let inputs = [
        (ChartKind::Boxplot, &args.boxplot),
        (ChartKind::GroupedBar, &args.bar),
        (ChartKind::Line, &args.line),
    ];

    let mut failures = 0;
    let mut loaded = Vec::new();
    for (kind, path) in inputs {
        let prepared = PlotData::load(path)
            .and_then(|data| Ok((data, resolve_config(&file, &args.common, kind, None)?)));
        match prepared {
            Ok((data, config)) => loaded.push((kind, data, config)),
            Err(err) => {
                eprintln!("Error: {} chart: {:#}", kind, err);
                failures += 1;
            }
        }
    }

    let jobs: Vec<ChartJob<'_>> = loaded
        .iter()
        .map(|(kind, data, config)| ChartJob { kind: *kind, data, config })
        .collect();

    for (kind, result) in runtime::build_all(&jobs) {
        let written = result
            .map_err(anyhow::Error::from)
            .and_then(|scene| {
                for warning in &scene.warnings {
                    warn!("{} chart: {}", kind, warning);
                }
                let bytes = runtime::render(&scene, format)?;
                let path = args.out_dir.join(format!("{}.{}", kind, format.extension()));
                write_file(&path, &bytes)?;
                Ok(path)
            });

        match written {
            Ok(path) => info!("Wrote {}", path.display()),
            Err(err) => {
                eprintln!("Error: {} chart: {:#}", kind, err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} charts failed", failures, inputs.len()));
    }
    Ok(())
}

fn load_config(common: &CommonArgs) -> Result<ConfigFile> {
    match &common.config {
        Some(path) => ConfigFile::load(path),
        None => Ok(ConfigFile::default()),
    }
}

fn resolve_config(
    file: &ConfigFile,
    common: &CommonArgs,
    kind: ChartKind,
    style: Option<&ChartOptions>,
) -> Result<ChartConfig> {
    let mut config = file.resolve(kind, style)?;
    if common.skip_malformed {
        config.policy = ParsePolicy::SkipRow;
    }
    Ok(config)
}

fn output_format(file: &ConfigFile, common: &CommonArgs) -> OutputFormat {
    common.format.or(file.format).unwrap_or_default()
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
