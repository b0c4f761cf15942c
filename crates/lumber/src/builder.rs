//! Sink settings derived from the logger configuration

use std::path::PathBuf;

use lumber_config::LoggerConfig;
use lumber_encoding::EncoderConfig;
use lumber_routing::FileType;
use lumber_sinks::SinkSettings;

/// Base path plus the file type's suffix (`logs/app.log.ERROR`)
pub fn sink_path(config: &LoggerConfig, file_type: FileType) -> PathBuf {
    let mut path = config.path.as_os_str().to_owned();
    path.push(file_type.path_suffix());
    PathBuf::from(path)
}

/// Settings of the sink for `file_type`
///
/// The request sink takes `request_format`, every other sink `format`.
/// Rotation and caller settings are shared by all sinks.
pub fn sink_settings(config: &LoggerConfig, file_type: FileType) -> SinkSettings {
    let format = match file_type {
        FileType::Request => config.request_format,
        _ => config.format,
    };

    let encoder = EncoderConfig::default()
        .with_time_encoder(config.time_format)
        .with_caller_depth(config.caller_depth);

    SinkSettings {
        level: file_type.threshold(config.level),
        format,
        max_size_mb: config.max_file_size,
        max_backups: config.max_backups,
        max_age_days: config.max_age,
        compress: config.compress,
        local_time: config.local_time,
        caller: config.caller,
        encoder,
        ..SinkSettings::new(sink_path(config, file_type))
    }
}
