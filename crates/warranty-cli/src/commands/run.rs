use crate::OutputFormat;
use crate::progress::BarProgress;
use anyhow::{Context, Result};
use warranty_browser::ChromeSessionLauncher;
use warranty_core::Config;
use warranty_core::store::{InputReader, ResultStore};
use warranty_lookup::{BatchDriver, RunSummary};

/// Run one batch: resume from the results file, look up every remaining
/// serial and print a summary.
pub fn execute(config: Config, format: OutputFormat) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let store = ResultStore::new(config.output_path.clone());
    let prior = store.load();

    tracing::info!("Reading serial numbers from {}", config.input_path.display());
    let work_items = InputReader::read_work_items(&config.input_path, &config.columns)?;

    if work_items.is_empty() {
        println!(
            "No serial numbers found in {}. Nothing to do.",
            config.input_path.display()
        );
        return Ok(());
    }

    let launcher = ChromeSessionLauncher::new(config.browser.clone());
    let output_path = store.path().to_path_buf();
    let mut driver =
        BatchDriver::new(config, launcher, store).with_progress(BarProgress::new());

    let report = runtime.block_on(driver.run(&work_items, prior))?;
    let summary = RunSummary::from_report(&report, work_items.len());

    match format {
        OutputFormat::Json => output_json(&summary)?,
        OutputFormat::Pretty => output_pretty(&summary, &output_path.display().to_string()),
    }

    Ok(())
}

fn output_json(summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{}", json);
    Ok(())
}

fn output_pretty(summary: &RunSummary, output_path: &str) {
    use console::style;

    println!("\n{}", style("Warranty Check Summary").bold().cyan());
    println!("{}", style("======================").cyan());

    println!("\n{}", style("Run:").bold());
    println!("  Serials in Input:     {}", summary.total_inputs);
    println!("  Already Processed:    {}", summary.already_done);
    println!("  Looked Up This Run:   {}", summary.processed);
    if summary.stopped_early {
        println!(
            "  {} {} serial(s) left; run again to resume",
            style("Stopped Early:").yellow().bold(),
            summary.remaining
        );
    }

    println!("\n{}", style("Results:").bold());
    println!("  Total Rows:           {}", summary.total_records);
    println!(
        "  With Warranty Data:   {}",
        style(summary.succeeded).green()
    );
    if summary.failed > 0 {
        println!("  Failed Lookups:       {}", style(summary.failed).red());
    } else {
        println!("  Failed Lookups:       0");
    }
    if summary.placeholder_rows > 0 {
        println!(
            "  {} {} row(s) still marked as in progress",
            style("Warning:").yellow().bold(),
            summary.placeholder_rows
        );
    }

    if !summary.status_counts.is_empty() {
        println!("\n{}", style("By Status:").bold());
        for (status, count) in &summary.status_counts {
            println!("  {:<28} {}", status, count);
        }
    }

    println!("\nResults saved to {}", style(output_path).bold());
}
