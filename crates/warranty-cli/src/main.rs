use anyhow::Result;
use clap::Parser;
use warranty_cli::OutputFormat;
use warranty_cli::{commands, progress};
use warranty_core::Config;

#[derive(Parser)]
#[command(name = "warranty-check")]
#[command(author, version, long_about = None)]
#[command(
    about = "Look up HP warranty status for every serial number in serials.xlsx",
    long_about = "Reads serials.xlsx from the working directory, checks each serial number on \
                  HP's warranty page with a Chrome browser and writes the results to \
                  warranty_results.xlsx after every lookup. Serials that already have a result \
                  are skipped, so an interrupted run can simply be started again."
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format of the end-of-run summary
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    commands::run::execute(Config::default(), cli.format)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "warranty_check=debug,warranty_cli=debug,warranty_core=debug,\
             warranty_lookup=debug,warranty_browser=debug",
        )
    } else {
        EnvFilter::new(
            "warranty_check=info,warranty_cli=info,warranty_core=info,\
             warranty_lookup=info,warranty_browser=info",
        )
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(progress::log_writer)
        .with_target(false)
        .without_time()
        .init();
}
