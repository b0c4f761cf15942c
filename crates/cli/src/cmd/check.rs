//! Check command - validate configuration and print the sinks it creates

use anyhow::{Context, Result};
use lumber::{Logger, LoggerConfig, sink_settings};

/// Run the check command
pub fn run(config: &LoggerConfig) -> Result<()> {
    config.validate().context("invalid configuration")?;

    let logger = Logger::init(config.clone()).context("failed to build logger")?;

    println!("base path:  {}", config.path.display());
    println!("rotation:   {} MB, {} backups, {} days, compress={}",
        config.max_file_size, config.max_backups, config.max_age, config.compress);
    println!("caller:     {} (depth {})", config.caller, config.caller_depth);
    println!();

    for (id, file_type) in logger.routing().iter() {
        let settings = sink_settings(config, file_type);
        println!(
            "{id}  {file_type:<8} {:<5} >= {:<5} {}",
            settings.format,
            settings.level,
            settings.resolved_path().display()
        );
    }

    Ok(())
}
