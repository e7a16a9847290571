use anyhow::Result;

use logkeep::config::Config;
use logkeep::logging;
use logkeep::retention::{CleanReport, LogFileCleaner, LogFileProvider};

fn report_outcome(report: &CleanReport) {
    if report.has_hard_failures() {
        tracing::warn!(
            "{} log files could not be deleted, will retry on next run",
            report.failures.iter().filter(|f| !f.is_already_gone()).count()
        );
    } else if !report.deleted.is_empty() {
        tracing::info!("Cleaned up {} old log files", report.deleted.len());
    }
}

fn main() -> Result<()> {
    let config = Config::load_or_create()?;
    let provider = config.provider()?;

    // Own logs go under data_dir so they never crowd out a host's logs_dir
    let (log_file_info, _guard) = logging::init_file_logging(&config.own_logs_dir())?;
    tracing::info!("Logging to: {}", log_file_info.path.display());

    let logs_dir = provider.log_directory()?;
    let cleaner = LogFileCleaner::new(&provider, config.max_log_files)?;

    if config.dry_run {
        let victims = cleaner.plan()?;
        for victim in &victims {
            tracing::info!(
                "Would delete {} (modified {})",
                victim.path.display(),
                victim.modified_at().format("%Y-%m-%d %H:%M:%S")
            );
        }
        tracing::info!(
            "Dry run: {} log files would be deleted from {}",
            victims.len(),
            logs_dir.display()
        );
        return Ok(());
    }

    report_outcome(&cleaner.clean()?);

    if let Some(own_provider) = config.own_logs_provider() {
        let own_cleaner = LogFileCleaner::new(own_provider, config.max_log_files)?;
        report_outcome(&own_cleaner.clean()?);
    }

    Ok(())
}
