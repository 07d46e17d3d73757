use anyhow::Result;
use blux_audit_tools::commands;
use blux_audit_tools::commands::analyze::{AnalyzeOptions, OutputFormat};
use blux_audit_tools::report::Scope;
use blux_audit_tools::utils::discovery::DEFAULT_AUDIT_PATH;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "blux-audit")]
#[command(about = "BLUX audit trail analysis tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, global = true, env = "BLUX_AUDIT_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze audit trails for operational, security and performance insights
    Analyze {
        /// Directory of audit trails (*.jsonl, *.jsonl.gz, *.jsonl.zst) or a single trail file
        #[arg(long, env = "BLUX_AUDIT_PATH", default_value = DEFAULT_AUDIT_PATH)]
        audit_path: String,

        /// Analyze only the last N hours or days (e.g. 24h, 7d)
        #[arg(long)]
        last: Option<String>,

        /// Type of analysis to perform
        #[arg(long = "type", value_enum, default_value_t = Scope::All)]
        scope: Scope,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Also export every count table to this CSV file
        #[arg(long)]
        export: Option<String>,

        /// Do not draw a progress bar while loading
        #[arg(long)]
        no_progress: bool,
    },

    /// Generate shell completion scripts
    GenerateCompletion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Commands::Analyze {
            audit_path,
            last,
            scope,
            format,
            output,
            export,
            no_progress,
        } => commands::analyze::run(&AnalyzeOptions {
            audit_path,
            last,
            scope,
            format,
            output,
            export,
            show_progress: !no_progress,
        }),
        Commands::GenerateCompletion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "blux-audit", &mut std::io::stdout());
            Ok(())
        }
    }
}
