//! pkviz CLI

mod fetch;
mod output;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "pkviz")]
#[command(about = "pkviz - charts for pharmacokinetic analysis results")]
#[command(version = pk_core::VERSION)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a saved analysis envelope (`/api/analysis/{id}/plot-data` JSON)
    Render {
        /// Analysis envelope JSON
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Fetch from a running analysis server and render
    Fetch {
        #[command(subcommand)]
        what: FetchCommands,
    },

    /// List the slot ids charts can be rendered into
    Slots,

    /// Print version
    Version,
}

#[derive(Subcommand)]
enum FetchCommands {
    /// Fetch and render an analysis result
    Analysis {
        /// Analysis id
        #[arg(long)]
        id: u64,

        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        chart: ChartArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Fetch a dataset: prints the preview table, writes the concentration plot
    Dataset {
        /// Dataset id
        #[arg(long)]
        id: u64,

        #[command(flatten)]
        server: ServerArgs,

        /// Output directory for the dataset plot. Nothing is written if omitted.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "plotly")]
        format: OutputFormat,

        /// Theme name (dark, light, minimal)
        #[arg(long)]
        theme: Option<String>,

        /// YAML rendering config
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
struct ServerArgs {
    /// Analysis server base URL
    #[arg(long, env = "PKVIZ_BASE_URL", default_value = "http://localhost:5000")]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,
}

/// Inputs that shape which charts are built.
#[derive(Args, Clone, Default)]
struct ChartArgs {
    /// Test-formulation profiles (`{subject: {times, concentrations}}`) for the overlay chart
    #[arg(long, requires = "reference")]
    test: Option<PathBuf>,

    /// Reference-formulation profiles
    #[arg(long, requires = "test")]
    reference: Option<PathBuf>,

    /// Subject shown by single-subject charts (defaults to the first)
    #[arg(long)]
    subject: Option<String>,

    /// Only render these slots (comma separated; `residualsPlot-*` for all residual plots)
    #[arg(long, value_delimiter = ',')]
    slots: Vec<String>,
}

/// Where and how rendered slots are written.
#[derive(Args, Clone)]
struct OutputArgs {
    /// Output directory
    #[arg(long)]
    out_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "plotly")]
    format: OutputFormat,

    /// Theme name for svg/png output (dark, light, minimal)
    #[arg(long)]
    theme: Option<String>,

    /// YAML rendering config for svg/png output
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Render { input, chart, out } => render::cmd_render(&input, &chart, &out),
        Commands::Fetch { what } => match what {
            FetchCommands::Analysis { id, server, chart, out } => {
                fetch::cmd_fetch_analysis(id, &server, &chart, &out)
            }
            FetchCommands::Dataset { id, server, out_dir, format, theme, config } => {
                let out = out_dir.map(|out_dir| OutputArgs { out_dir, format, theme, config });
                fetch::cmd_fetch_dataset(id, &server, out.as_ref())
            }
        },
        Commands::Slots => {
            cmd_slots();
            Ok(())
        }
        Commands::Version => {
            println!("pkviz {}", pk_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_slots() {
    for slot in pk_viz::SlotId::FIXED {
        println!("{slot}");
    }
    println!("residualsPlot-<subject>");
}
