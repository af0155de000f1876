use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use refbench::args;
use refbench::config::FileConfig;
use refbench::display;
use refbench::driver;
use refbench::stats;
use refbench::types::{OutputFormat, ProfilerRecord};

#[derive(Parser)]
#[command(
    name = "refbench",
    version,
    about = "Run a profiled Refal program repeatedly and summarise its profiler counters"
)]
struct Cli {
    /// <executable> [<input file> | <number of tests>] [<number of tests>]
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    positionals: Vec<String>,

    #[arg(long)]
    format: Option<OutputFormat>,

    #[arg(long)]
    json: bool,

    /// Digits read and printed after the decimal point of each duration
    #[arg(long)]
    precision: Option<usize>,

    /// TOML file with defaults for runs, precision and format
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "refbench=debug" } else { "refbench=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let config = args::resolve(&cli.positionals, file_config.defaults(cli.precision))?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format.or(file_config.format).unwrap_or_default()
    };

    let runs = driver::run_all(&config, |result| {
        if format == OutputFormat::Text {
            print!("{}", display::format_run(result, config.precision));
        }
    })?;

    let records: Vec<ProfilerRecord> = runs.iter().map(|r| r.values.clone()).collect();
    let summary = stats::summarize(&records);

    match format {
        OutputFormat::Text => print!("{}", display::format_summary(&summary, config.precision)),
        OutputFormat::Json => println!("{}", display::format_json(&config, &runs, &summary)),
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
