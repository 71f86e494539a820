//! Convert an OBJ file into C++ vertex/index array literals.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mesh_bake::config::DEFAULT_COLOR_SEED;
use mesh_bake::{BakeConfig, BakeError, BakeSummary, convert_file};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mesh-bake")]
#[command(about = "Bake an OBJ mesh into C++ vertex and index arrays")]
#[command(version)]
struct Cli {
    /// OBJ file to convert
    #[arg(default_value = "wang.obj")]
    input: PathBuf,

    /// Output file (default: <input stem>_output.txt next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for the per-vertex colors
    #[arg(long, default_value_t = DEFAULT_COLOR_SEED)]
    seed: u64,

    /// Index entries per output line
    #[arg(long = "per-line", default_value_t = 12)]
    per_line: usize,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> BakeConfig {
        BakeConfig::default()
            .with_seed(self.seed)
            .with_indices_per_line(self.per_line)
    }
}

/// `RUST_LOG` directives, when present, replace the `-v` level entirely.
fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

fn init_tracing(verbose: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<BakeSummary, BakeError> {
    convert_file(&cli.input, cli.output.as_deref(), &cli.config())
}

fn report<W: Write>(out: &mut W, summary: &BakeSummary, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, summary)?;
        return writeln!(out);
    }
    let output = summary
        .output
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    writeln!(out, "generated: {output}")?;
    writeln!(
        out,
        "vertices: {}, indices: {}",
        summary.vertex_count, summary.index_count
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(summary) => match report(&mut io::stdout().lock(), &summary, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("failed to write report: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
