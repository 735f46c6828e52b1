mod bootstrap;

use anyhow::{Context, Result};
use summary_core::formatting::format_count;
use summary_core::settings::Settings;
use summary_data::pipeline::run_pipeline;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    let config = settings
        .pipeline_config()
        .context("invalid pipeline configuration")?;

    if settings.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let paths = settings.paths();
    bootstrap::ensure_output_dir(&paths.output_dir)?;

    tracing::info!(
        "Inventory summary v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        "Months: {} ({} .. {}), brands: {}, chunk size: {}",
        config.analysis_months.len(),
        config.analysis_months.first().map(String::as_str).unwrap_or("-"),
        config.analysis_months.last().map(String::as_str).unwrap_or("-"),
        config.valid_brands.join(", "),
        format_count(config.chunk_size),
    );

    let report = run_pipeline(&config, &paths)?;

    tracing::info!(
        "Done: {} processed, {} missing, {} failed -> {}",
        report.files_processed(),
        report.files_missing(),
        report.files_failed(),
        report.output_path.display()
    );

    Ok(())
}
